use std::time::Duration;

use futures::channel::mpsc;
use global_hotkey::hotkey::{Code, HotKey};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use iced::keyboard::key::Named;
use thiserror::Error;

use crate::app::Message;
use crate::audio::VolumeAction;

/// How often the bridge thread checks whether its stream was dropped.
const BRIDGE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum HotkeyError {
    #[error("global hotkey hook unavailable: {0}")]
    Manager(#[source] global_hotkey::Error),

    #[error("failed to register {key:?}: {source}")]
    Register {
        key: Code,
        #[source]
        source: global_hotkey::Error,
    },
}

/// F10 mutes, F11 lowers, F12 raises. No modifiers.
pub fn global_key(action: VolumeAction) -> Code {
    match action {
        VolumeAction::ToggleMute => Code::F10,
        VolumeAction::VolumeDown => Code::F11,
        VolumeAction::VolumeUp => Code::F12,
    }
}

pub fn hotkey(action: VolumeAction) -> HotKey {
    HotKey::new(None, global_key(action))
}

/// Reverse lookup for events coming off the global receiver.
pub fn action_for_id(id: u32) -> Option<VolumeAction> {
    VolumeAction::ALL
        .into_iter()
        .find(|&action| hotkey(action).id() == id)
}

/// Same keys, as seen by the focused window.
pub fn local_action(key: Named) -> Option<VolumeAction> {
    match key {
        Named::F10 => Some(VolumeAction::ToggleMute),
        Named::F11 => Some(VolumeAction::VolumeDown),
        Named::F12 => Some(VolumeAction::VolumeUp),
        _ => None,
    }
}

/// Owns the OS-level registrations for the volume keys.
///
/// Keys that fail to register are logged and left to the window's local
/// bindings. Every registered key is unregistered exactly once, either by
/// `unbind` or on drop.
pub struct HotkeyBinder {
    manager: GlobalHotKeyManager,
    bound: Vec<(VolumeAction, HotKey)>,
}

impl HotkeyBinder {
    pub fn bind() -> Result<Self, HotkeyError> {
        let manager = GlobalHotKeyManager::new().map_err(HotkeyError::Manager)?;
        let mut bound = Vec::with_capacity(VolumeAction::ALL.len());
        for action in VolumeAction::ALL {
            let key = hotkey(action);
            match manager.register(key) {
                Ok(()) => {
                    tracing::info!(action = action.label(), key = ?global_key(action), "global hotkey bound");
                    bound.push((action, key));
                }
                Err(source) => {
                    let err = HotkeyError::Register {
                        key: global_key(action),
                        source,
                    };
                    tracing::warn!(action = action.label(), "{err}; local binding only");
                }
            }
        }
        Ok(Self { manager, bound })
    }

    /// Actions whose key was registered with the OS.
    pub fn actions(&self) -> Vec<VolumeAction> {
        self.bound.iter().map(|(action, _)| *action).collect()
    }

    pub fn unbind(&mut self) {
        for (action, key) in self.bound.drain(..) {
            if let Err(e) = self.manager.unregister(key) {
                tracing::warn!(action = action.label(), "failed to unregister hotkey: {e}");
            }
        }
    }
}

impl Drop for HotkeyBinder {
    fn drop(&mut self) {
        if !self.bound.is_empty() {
            tracing::debug!(count = self.bound.len(), "releasing global hotkeys");
            self.unbind();
        }
    }
}

/// Bridge global hotkey presses onto the UI thread as messages.
///
/// The OS delivers events to a process-wide channel on its own thread; a
/// worker drains that channel and forwards presses. Releases are ignored.
pub(crate) fn hotkey_stream() -> impl futures::Stream<Item = Message> {
    let (tx, rx) = mpsc::unbounded();
    std::thread::spawn(move || {
        let receiver = GlobalHotKeyEvent::receiver();
        loop {
            match receiver.recv_timeout(BRIDGE_POLL) {
                Ok(event) => {
                    if event.state != HotKeyState::Pressed {
                        continue;
                    }
                    let Some(action) = action_for_id(event.id) else {
                        tracing::debug!(id = event.id, "ignoring unknown hotkey");
                        continue;
                    };
                    if tx.unbounded_send(Message::Hotkey(action)).is_err() {
                        break;
                    }
                }
                Err(e) if e.is_timeout() => {
                    if tx.is_closed() {
                        break;
                    }
                }
                Err(_) => {
                    tracing::warn!("global hotkey channel disconnected");
                    break;
                }
            }
        }
        tracing::debug!("hotkey bridge stopped");
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_match_function_row() {
        assert_eq!(global_key(VolumeAction::ToggleMute), Code::F10);
        assert_eq!(global_key(VolumeAction::VolumeDown), Code::F11);
        assert_eq!(global_key(VolumeAction::VolumeUp), Code::F12);
    }

    #[test]
    fn ids_round_trip_to_actions() {
        for action in VolumeAction::ALL {
            assert_eq!(action_for_id(hotkey(action).id()), Some(action));
        }
    }

    #[test]
    fn ids_are_distinct() {
        let ids: Vec<u32> = VolumeAction::ALL.iter().map(|&a| hotkey(a).id()).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[test]
    fn unknown_id_is_ignored() {
        let other = HotKey::new(None, Code::F9).id();
        assert_eq!(action_for_id(other), None);
    }

    #[test]
    fn local_and_global_bindings_agree() {
        let pairs = [
            (Named::F10, Code::F10),
            (Named::F11, Code::F11),
            (Named::F12, Code::F12),
        ];
        for (named, code) in pairs {
            let action = local_action(named).unwrap();
            assert_eq!(global_key(action), code);
        }
    }

    #[test]
    fn other_local_keys_do_nothing() {
        assert_eq!(local_action(Named::F9), None);
        assert_eq!(local_action(Named::Escape), None);
    }
}
