//! Core Audio endpoint volume of the default render device.

use windows::Win32::Media::Audio::Endpoints::IAudioEndpointVolume;
use windows::Win32::Media::Audio::{IMMDeviceEnumerator, MMDeviceEnumerator, eConsole, eRender};
use windows::Win32::System::Com::{
    CLSCTX_ALL, COINIT_APARTMENTTHREADED, CoCreateInstance, CoInitializeEx,
};

use super::{AudioEndpoint, AudioError};

/// Holds only the device enumerator. The endpoint itself is resolved on
/// every call so an unplugged or switched default device never leaves a
/// dangling interface behind.
pub(crate) struct EndpointVolume {
    enumerator: IMMDeviceEnumerator,
}

impl EndpointVolume {
    /// Must run on the UI thread, which owns the COM apartment.
    pub(crate) fn open() -> Result<Self, AudioError> {
        unsafe {
            // S_FALSE / RPC_E_CHANGED_MODE: the windowing layer already
            // initialised COM on this thread, which is fine.
            let _ = CoInitializeEx(None, COINIT_APARTMENTTHREADED);
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)?;
            let endpoint = Self { enumerator };
            endpoint.endpoint()?;
            Ok(endpoint)
        }
    }

    fn endpoint(&self) -> Result<IAudioEndpointVolume, AudioError> {
        unsafe {
            let device = self
                .enumerator
                .GetDefaultAudioEndpoint(eRender, eConsole)
                .map_err(|e| AudioError::DeviceUnavailable(e.message().to_string()))?;
            Ok(device.Activate::<IAudioEndpointVolume>(CLSCTX_ALL, None)?)
        }
    }
}

impl AudioEndpoint for EndpointVolume {
    fn volume(&self) -> Result<f32, AudioError> {
        let endpoint = self.endpoint()?;
        Ok(unsafe { endpoint.GetMasterVolumeLevelScalar()? })
    }

    fn set_volume(&self, level: f32) -> Result<(), AudioError> {
        let endpoint = self.endpoint()?;
        unsafe { endpoint.SetMasterVolumeLevelScalar(level, std::ptr::null())? };
        Ok(())
    }

    fn is_muted(&self) -> Result<bool, AudioError> {
        let endpoint = self.endpoint()?;
        Ok(unsafe { endpoint.GetMute()? }.as_bool())
    }

    fn set_muted(&self, muted: bool) -> Result<(), AudioError> {
        let endpoint = self.endpoint()?;
        unsafe { endpoint.SetMute(muted, std::ptr::null())? };
        Ok(())
    }
}
