//! System output volume.
//!
//! `AudioController` talks to the default output device through the
//! `AudioEndpoint` trait. Every mutation re-reads the device afterwards and
//! returns that, because the OS may round or clamp the requested value.
//! Nothing is cached between calls.

#[cfg(all(unix, not(target_os = "macos")))]
mod cli;
#[cfg(target_os = "windows")]
mod endpoint;
#[cfg(target_os = "macos")]
mod osascript;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no active output device: {0}")]
    DeviceUnavailable(String),

    #[error("failed to run {program}: {source}")]
    Command {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("unexpected mixer output: {0:?}")]
    Parse(String),

    #[cfg(target_os = "windows")]
    #[error("core audio call failed: {0}")]
    Com(#[from] windows::core::Error),
}

/// Default output device, as seen by one OS mixer API.
///
/// Levels are scalars in [0, 1]. Implementations do not clamp; the
/// controller does.
pub trait AudioEndpoint {
    fn volume(&self) -> Result<f32, AudioError>;
    fn set_volume(&self, level: f32) -> Result<(), AudioError>;
    fn is_muted(&self) -> Result<bool, AudioError>;
    fn set_muted(&self, muted: bool) -> Result<(), AudioError>;
}

/// What a hotkey press asks of the mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeAction {
    ToggleMute,
    VolumeDown,
    VolumeUp,
}

impl VolumeAction {
    pub const ALL: [VolumeAction; 3] = [
        VolumeAction::ToggleMute,
        VolumeAction::VolumeDown,
        VolumeAction::VolumeUp,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VolumeAction::ToggleMute => "toggle-mute",
            VolumeAction::VolumeDown => "volume-down",
            VolumeAction::VolumeUp => "volume-up",
        }
    }
}

/// Snapshot of the device, read back after every change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeState {
    pub level: f32,
    pub muted: bool,
}

impl VolumeState {
    /// Shown when the device has never answered.
    pub const UNAVAILABLE_LABEL: &'static str = "Volume: N/A";

    pub fn percent(&self) -> u32 {
        (clamp_level(self.level) * 100.0).round() as u32
    }

    pub fn label(&self) -> String {
        if self.muted {
            "Volume: Muted".to_string()
        } else {
            format!("Volume: {}%", self.percent())
        }
    }
}

/// Clamp to [0, 1]; NaN counts as silence.
pub fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}

pub struct AudioController {
    endpoint: Box<dyn AudioEndpoint>,
    step: f32,
}

impl AudioController {
    pub fn new(endpoint: Box<dyn AudioEndpoint>, step: f32) -> Self {
        Self { endpoint, step }
    }

    /// Bind to the platform's default output device.
    pub fn open_default(step: f32) -> Result<Self, AudioError> {
        #[cfg(target_os = "windows")]
        let endpoint = endpoint::EndpointVolume::open()?;
        #[cfg(target_os = "macos")]
        let endpoint = osascript::AppleScriptMixer::open()?;
        #[cfg(all(unix, not(target_os = "macos")))]
        let endpoint = cli::CliMixer::open()?;

        tracing::info!(backend = std::any::type_name_of_val(&endpoint), "audio endpoint ready");
        Ok(Self::new(Box::new(endpoint), step))
    }

    pub fn volume(&self) -> Result<f32, AudioError> {
        self.endpoint.volume().map(clamp_level)
    }

    pub fn is_muted(&self) -> Result<bool, AudioError> {
        self.endpoint.is_muted()
    }

    /// Re-read both values from the device.
    pub fn state(&self) -> Result<VolumeState, AudioError> {
        Ok(VolumeState {
            level: self.volume()?,
            muted: self.is_muted()?,
        })
    }

    pub fn set_volume(&self, level: f32) -> Result<VolumeState, AudioError> {
        self.endpoint.set_volume(clamp_level(level))?;
        self.state()
    }

    pub fn set_muted(&self, muted: bool) -> Result<VolumeState, AudioError> {
        self.endpoint.set_muted(muted)?;
        self.state()
    }

    pub fn toggle_mute(&self) -> Result<VolumeState, AudioError> {
        let muted = self.endpoint.is_muted()?;
        self.set_muted(!muted)
    }

    pub fn increase_volume(&self) -> Result<VolumeState, AudioError> {
        let current = self.volume()?;
        self.set_volume(current + self.step)
    }

    pub fn decrease_volume(&self) -> Result<VolumeState, AudioError> {
        let current = self.volume()?;
        self.set_volume(current - self.step)
    }

    pub fn apply(&self, action: VolumeAction) -> Result<VolumeState, AudioError> {
        match action {
            VolumeAction::ToggleMute => self.toggle_mute(),
            VolumeAction::VolumeDown => self.decrease_volume(),
            VolumeAction::VolumeUp => self.increase_volume(),
        }
    }
}

/// Run a mixer tool and return its stdout.
#[cfg(not(target_os = "windows"))]
fn run_tool(program: &'static str, args: &[&str]) -> Result<String, AudioError> {
    let output = std::process::Command::new(program)
        .args(args)
        .output()
        .map_err(|source| AudioError::Command { program, source })?;
    if !output.status.success() {
        return Err(AudioError::CommandFailed {
            program,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
