//! Default sink control through the PipeWire or PulseAudio command-line tools.

use super::{AudioEndpoint, AudioError, run_tool};

const WPCTL: &str = "wpctl";
const WPCTL_SINK: &str = "@DEFAULT_AUDIO_SINK@";
const PACTL: &str = "pactl";
const PACTL_SINK: &str = "@DEFAULT_SINK@";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MixerTool {
    Wpctl,
    Pactl,
}

/// Stateless: every call addresses whatever the current default sink is,
/// so a replaced or replugged device is picked up on the next call.
#[derive(Debug)]
pub(crate) struct CliMixer {
    tool: MixerTool,
}

impl CliMixer {
    /// Probe for a working tool. Tries wpctl first, then pactl.
    pub(crate) fn open() -> Result<Self, AudioError> {
        let tool = if run_tool(WPCTL, &["get-volume", WPCTL_SINK]).is_ok() {
            MixerTool::Wpctl
        } else if run_tool(PACTL, &["get-sink-mute", PACTL_SINK]).is_ok() {
            MixerTool::Pactl
        } else {
            return Err(AudioError::DeviceUnavailable(
                "neither wpctl nor pactl can reach a default sink".to_string(),
            ));
        };
        tracing::debug!(?tool, "mixer tool selected");
        Ok(Self { tool })
    }

    fn wpctl_status(&self) -> Result<(f32, bool), AudioError> {
        let out = run_tool(WPCTL, &["get-volume", WPCTL_SINK])?;
        parse_wpctl_volume(&out).ok_or(AudioError::Parse(out))
    }
}

impl AudioEndpoint for CliMixer {
    fn volume(&self) -> Result<f32, AudioError> {
        match self.tool {
            MixerTool::Wpctl => self.wpctl_status().map(|(level, _)| level),
            MixerTool::Pactl => {
                let out = run_tool(PACTL, &["get-sink-volume", PACTL_SINK])?;
                parse_pactl_volume(&out).ok_or(AudioError::Parse(out))
            }
        }
    }

    fn set_volume(&self, level: f32) -> Result<(), AudioError> {
        match self.tool {
            MixerTool::Wpctl => {
                let arg = format!("{level:.2}");
                run_tool(WPCTL, &["set-volume", WPCTL_SINK, &arg])?;
            }
            MixerTool::Pactl => {
                let arg = format!("{}%", (level * 100.0).round() as u32);
                run_tool(PACTL, &["set-sink-volume", PACTL_SINK, &arg])?;
            }
        }
        Ok(())
    }

    fn is_muted(&self) -> Result<bool, AudioError> {
        match self.tool {
            MixerTool::Wpctl => self.wpctl_status().map(|(_, muted)| muted),
            MixerTool::Pactl => {
                let out = run_tool(PACTL, &["get-sink-mute", PACTL_SINK])?;
                parse_pactl_mute(&out).ok_or(AudioError::Parse(out))
            }
        }
    }

    fn set_muted(&self, muted: bool) -> Result<(), AudioError> {
        let flag = if muted { "1" } else { "0" };
        match self.tool {
            MixerTool::Wpctl => run_tool(WPCTL, &["set-mute", WPCTL_SINK, flag])?,
            MixerTool::Pactl => run_tool(PACTL, &["set-sink-mute", PACTL_SINK, flag])?,
        };
        Ok(())
    }
}

/// `Volume: 0.40` or `Volume: 0.40 [MUTED]`
fn parse_wpctl_volume(out: &str) -> Option<(f32, bool)> {
    let rest = out.trim().strip_prefix("Volume:")?;
    let level = rest.split_whitespace().next()?.parse::<f32>().ok()?;
    Some((level, rest.contains("[MUTED]")))
}

/// Mean of the per-channel percentages on the `Volume:` line, e.g.
/// `Volume: front-left: 26214 /  40% / -23.88 dB,   front-right: ...`
fn parse_pactl_volume(out: &str) -> Option<f32> {
    let line = out
        .lines()
        .map(str::trim)
        .find(|l| l.starts_with("Volume:"))?;
    let percents: Vec<f32> = line
        .split_whitespace()
        .filter_map(|tok| tok.strip_suffix('%'))
        .filter_map(|n| n.parse::<f32>().ok())
        .collect();
    if percents.is_empty() {
        return None;
    }
    Some(percents.iter().sum::<f32>() / percents.len() as f32 / 100.0)
}

/// `Mute: yes` / `Mute: no`
fn parse_pactl_mute(out: &str) -> Option<bool> {
    match out.trim().strip_prefix("Mute:")?.trim() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wpctl_unmuted() {
        assert_eq!(parse_wpctl_volume("Volume: 0.40\n"), Some((0.40, false)));
    }

    #[test]
    fn wpctl_muted() {
        assert_eq!(
            parse_wpctl_volume("Volume: 0.75 [MUTED]\n"),
            Some((0.75, true))
        );
    }

    #[test]
    fn wpctl_boosted_level_is_passed_through() {
        assert_eq!(parse_wpctl_volume("Volume: 1.20"), Some((1.20, false)));
    }

    #[test]
    fn wpctl_garbage() {
        assert_eq!(parse_wpctl_volume("Translate ID error: default sink not found"), None);
        assert_eq!(parse_wpctl_volume("Volume: loud"), None);
        assert_eq!(parse_wpctl_volume(""), None);
    }

    #[test]
    fn pactl_stereo_volume() {
        let out = "Volume: front-left: 26214 /  40% / -23.88 dB,   front-right: 26214 /  40% / -23.88 dB\n        balance 0.00\n";
        let level = parse_pactl_volume(out).unwrap();
        assert!((level - 0.40).abs() < 1e-6);
    }

    #[test]
    fn pactl_unbalanced_channels_are_averaged() {
        let out = "Volume: front-left: 19661 /  30% / -31.37 dB,   front-right: 32768 /  50% / -18.06 dB";
        let level = parse_pactl_volume(out).unwrap();
        assert!((level - 0.40).abs() < 1e-6);
    }

    #[test]
    fn pactl_volume_without_percent() {
        assert_eq!(parse_pactl_volume("Volume: mono: 65536"), None);
        assert_eq!(parse_pactl_volume("No such entity"), None);
    }

    #[test]
    fn pactl_mute() {
        assert_eq!(parse_pactl_mute("Mute: yes\n"), Some(true));
        assert_eq!(parse_pactl_mute("Mute: no\n"), Some(false));
        assert_eq!(parse_pactl_mute("Mute: maybe"), None);
        assert_eq!(parse_pactl_mute("Failure: No such entity"), None);
    }
}
