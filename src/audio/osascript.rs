//! System output volume via AppleScript's `volume settings`.

use super::{AudioEndpoint, AudioError, run_tool};

const OSASCRIPT: &str = "osascript";

#[derive(Debug)]
pub(crate) struct AppleScriptMixer;

impl AppleScriptMixer {
    pub(crate) fn open() -> Result<Self, AudioError> {
        let mixer = Self;
        // `missing value` here means the output device has no volume control.
        mixer.volume()?;
        Ok(mixer)
    }

    fn eval(&self, script: &str) -> Result<String, AudioError> {
        run_tool(OSASCRIPT, &["-e", script]).map(|out| out.trim().to_string())
    }
}

impl AudioEndpoint for AppleScriptMixer {
    fn volume(&self) -> Result<f32, AudioError> {
        let out = self.eval("output volume of (get volume settings)")?;
        parse_output_volume(&out)
    }

    fn set_volume(&self, level: f32) -> Result<(), AudioError> {
        let percent = (level * 100.0).round() as u32;
        self.eval(&format!("set volume output volume {percent}"))?;
        Ok(())
    }

    fn is_muted(&self) -> Result<bool, AudioError> {
        let out = self.eval("output muted of (get volume settings)")?;
        match out.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            "missing value" => Err(AudioError::DeviceUnavailable(out)),
            _ => Err(AudioError::Parse(out)),
        }
    }

    fn set_muted(&self, muted: bool) -> Result<(), AudioError> {
        self.eval(&format!("set volume output muted {muted}"))?;
        Ok(())
    }
}

/// `0`..`100`, or `missing value` when the device exposes no volume.
fn parse_output_volume(out: &str) -> Result<f32, AudioError> {
    if out == "missing value" {
        return Err(AudioError::DeviceUnavailable(out.to_string()));
    }
    out.parse::<f32>()
        .map(|percent| percent / 100.0)
        .map_err(|_| AudioError::Parse(out.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_becomes_scalar() {
        assert_eq!(parse_output_volume("50").unwrap(), 0.5);
        assert_eq!(parse_output_volume("100").unwrap(), 1.0);
    }

    #[test]
    fn missing_value_means_no_device() {
        assert!(matches!(
            parse_output_volume("missing value"),
            Err(AudioError::DeviceUnavailable(_))
        ));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            parse_output_volume("loud"),
            Err(AudioError::Parse(_))
        ));
    }
}
