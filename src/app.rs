use chrono::Local;
use iced::{Element, Point, Subscription, Task, keyboard, mouse, window};

use crate::audio::{AudioController, VolumeAction, VolumeState};
use crate::border::BorderAnimator;
use crate::clock::ClockTicker;
use crate::config::{self, OverlayConfig};
use crate::drag::DragGesture;
use crate::hotkeys::{self, HotkeyBinder};
use crate::theme::OverlayTheme;
use crate::timer::{RepeatingTimer, TimerKind};

// --- Overlay State ---

pub(crate) struct Overlay {
    pub(crate) config: OverlayConfig,
    pub(crate) theme: OverlayTheme,
    pub(crate) border: BorderAnimator,
    pub(crate) clock: ClockTicker,
    border_timer: RepeatingTimer,
    clock_timer: RepeatingTimer,
    audio: Option<AudioController>,
    pub(crate) volume_label: String,
    hotkeys: Option<HotkeyBinder>,
    /// Actions already delivered as `Message::Hotkey`; their local key
    /// presses are dropped.
    global_actions: Vec<VolumeAction>,
    drag: DragGesture,
    pointer: Option<Point>,
    window_position: Option<Point>,
    closed: bool,
}

#[derive(Debug, Clone)]
pub(crate) enum Message {
    Tick(TimerKind),
    /// From the global hotkey hook, already marshaled onto the UI thread.
    Hotkey(VolumeAction),
    /// From the focused window's own key events.
    LocalKey(VolumeAction),
    PointerPressed,
    PointerMoved(Point),
    PointerReleased,
    WindowMoved(Point),
    Close,
}

pub(crate) fn run() -> iced::Result {
    tracing::info!(
        "fancy-clock v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    iced::application(Overlay::new, Overlay::update, Overlay::view)
        .title(Overlay::title)
        .window(window_settings(&OverlayConfig::reference()))
        .style(Overlay::style)
        .subscription(Overlay::subscription)
        .run()
}

fn window_settings(config: &OverlayConfig) -> window::Settings {
    window::Settings {
        size: config.window_size,
        position: window::Position::SpecificWith(config::place_window),
        resizable: false,
        decorations: false,
        transparent: true,
        level: window::Level::AlwaysOnTop,
        exit_on_close_request: false,
        ..Default::default()
    }
}

impl Overlay {
    fn new() -> (Self, Task<Message>) {
        Self::with_parts(OverlayConfig::reference(), open_audio, bind_hotkeys)
    }

    /// Boot with injectable platform pieces.
    fn with_parts(
        config: OverlayConfig,
        audio: impl FnOnce(&OverlayConfig) -> Option<AudioController>,
        hotkeys: impl FnOnce() -> Option<HotkeyBinder>,
    ) -> (Self, Task<Message>) {
        let audio = audio(&config);
        let volume_label = read_label(audio.as_ref());
        let hotkeys = hotkeys();
        let global_actions = hotkeys.as_ref().map(HotkeyBinder::actions).unwrap_or_default();
        let border = BorderAnimator::new(config.border_width, config.border_height);
        debug_assert_eq!(border.len(), config.segment_count());

        let mut overlay = Self {
            theme: OverlayTheme::dark(config.background_opacity),
            border,
            clock: ClockTicker::new(),
            border_timer: RepeatingTimer::new(TimerKind::Border, config.border_tick),
            clock_timer: RepeatingTimer::new(TimerKind::Clock, config.clock_tick),
            config,
            audio,
            volume_label,
            hotkeys,
            global_actions,
            drag: DragGesture::default(),
            pointer: None,
            window_position: None,
            closed: false,
        };

        overlay.clock.start();
        overlay.clock_timer.start();
        overlay.border.start();
        overlay.border_timer.start();
        tracing::info!(
            segments = overlay.border.len(),
            volume = %overlay.volume_label,
            global_hotkeys = overlay.global_actions.len(),
            "overlay ready"
        );

        (overlay, Task::none())
    }

    fn title(&self) -> String {
        String::from("Fancy Clock")
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick(TimerKind::Border) => {
                self.border.tick();
                Task::none()
            }
            Message::Tick(TimerKind::Clock) => {
                self.clock.tick(&Local::now());
                Task::none()
            }
            Message::Hotkey(action) => {
                self.apply_volume(action);
                Task::none()
            }
            Message::LocalKey(action) => {
                if self.global_actions.contains(&action) {
                    tracing::trace!(action = action.label(), "local key shadowed by global hotkey");
                } else {
                    self.apply_volume(action);
                }
                Task::none()
            }
            Message::PointerPressed => {
                if let Some(pointer) = self.pointer {
                    self.drag.press(pointer);
                    tracing::trace!(x = pointer.x, y = pointer.y, "drag started");
                }
                Task::none()
            }
            Message::PointerMoved(pointer) => {
                self.pointer = Some(pointer);
                let target = match self.window_position {
                    Some(window) => self.drag.motion(pointer, window),
                    None => None,
                };
                match target {
                    Some(target) => {
                        self.window_position = Some(target);
                        window::latest().and_then(move |id| window::move_to(id, target))
                    }
                    None => Task::none(),
                }
            }
            Message::PointerReleased => {
                if self.drag.is_active() {
                    tracing::trace!(position = ?self.window_position, "drag ended");
                }
                self.drag.release();
                Task::none()
            }
            Message::WindowMoved(position) => {
                // Mid-drag reports lag behind our own move requests.
                if !self.drag.is_active() {
                    self.window_position = Some(position);
                }
                Task::none()
            }
            Message::Close => {
                self.teardown();
                iced::exit()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        self.view_overlay()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subs = vec![
            self.border_timer.subscription(),
            self.clock_timer.subscription(),
            window::close_requests().map(|_id| Message::Close),
            window::events().filter_map(|(_id, event)| match event {
                window::Event::Opened { position, .. } => position.map(Message::WindowMoved),
                window::Event::Moved(position) => Some(Message::WindowMoved(position)),
                _ => None,
            }),
            iced::event::listen().filter_map(|event| match event {
                iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                    Some(Message::PointerPressed)
                }
                iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                    Some(Message::PointerReleased)
                }
                iced::Event::Mouse(mouse::Event::CursorMoved { position }) => {
                    Some(Message::PointerMoved(position))
                }
                iced::Event::Keyboard(keyboard::Event::KeyPressed {
                    key: keyboard::Key::Named(named),
                    ..
                }) => hotkeys::local_action(named).map(Message::LocalKey),
                _ => None,
            }),
        ];
        if self.hotkeys.is_some() {
            subs.push(Subscription::run(hotkeys::hotkey_stream));
        }
        Subscription::batch(subs)
    }

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: self.theme.background,
            text_color: self.theme.text,
        }
    }

    /// Apply a volume action and mirror the device's answer into the label.
    /// On failure the label keeps its previous text.
    fn apply_volume(&mut self, action: VolumeAction) {
        if self.audio.is_none() {
            self.audio = open_audio(&self.config);
        }
        let Some(audio) = &self.audio else {
            tracing::warn!(action = action.label(), "no audio device, ignoring");
            return;
        };
        match audio.apply(action) {
            Ok(state) => {
                self.volume_label = state.label();
                tracing::info!(action = action.label(), volume = %self.volume_label);
            }
            Err(e) => tracing::warn!(action = action.label(), "volume change failed: {e}"),
        }
    }

    /// Cancel both loops and release the global hook. Idempotent.
    fn teardown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.border_timer.cancel();
        self.clock_timer.cancel();
        self.border.stop();
        self.clock.stop();
        if let Some(mut binder) = self.hotkeys.take() {
            binder.unbind();
        }
        self.global_actions.clear();
        self.drag.release();
        tracing::info!(
            border = ?self.border.state(),
            phase = self.border.phase(),
            timers_running = self.border_timer.is_running() || self.clock_timer.is_running(),
            clock_running = self.clock.is_running(),
            "overlay closed"
        );
    }
}

fn open_audio(config: &OverlayConfig) -> Option<AudioController> {
    match AudioController::open_default(config.volume_step) {
        Ok(audio) => Some(audio),
        Err(e) => {
            tracing::warn!("audio control unavailable: {e}");
            None
        }
    }
}

fn bind_hotkeys() -> Option<HotkeyBinder> {
    match HotkeyBinder::bind() {
        Ok(binder) => Some(binder),
        Err(e) => {
            tracing::warn!("{e}; only local key bindings are active");
            None
        }
    }
}

fn read_label(audio: Option<&AudioController>) -> String {
    match audio.map(AudioController::state) {
        Some(Ok(state)) => state.label(),
        Some(Err(e)) => {
            tracing::warn!("failed to read volume: {e}");
            VolumeState::UNAVAILABLE_LABEL.to_string()
        }
        None => VolumeState::UNAVAILABLE_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::mock::MockEndpoint;

    fn overlay_with(endpoint: Option<MockEndpoint>) -> Overlay {
        let config = OverlayConfig {
            border_width: 10,
            border_height: 6,
            ..OverlayConfig::reference()
        };
        let (overlay, _task) = Overlay::with_parts(
            config,
            move |cfg| {
                endpoint.map(|e| AudioController::new(Box::new(e), cfg.volume_step))
            },
            || None,
        );
        overlay
    }

    #[test]
    fn boot_starts_both_loops() {
        let overlay = overlay_with(None);
        assert!(overlay.border_timer.is_running());
        assert!(overlay.clock_timer.is_running());
        assert!(overlay.clock.is_running());
        assert_eq!(overlay.border.len(), 32);
    }

    #[test]
    fn boot_reads_initial_volume() {
        let overlay = overlay_with(Some(MockEndpoint::with_level(0.42, false)));
        assert_eq!(overlay.volume_label, "Volume: 42%");
    }

    #[test]
    fn boot_without_device_shows_placeholder() {
        let overlay = overlay_with(None);
        assert_eq!(overlay.volume_label, VolumeState::UNAVAILABLE_LABEL);
    }

    #[test]
    fn border_tick_advances_phase() {
        let mut overlay = overlay_with(None);
        let _ = overlay.update(Message::Tick(TimerKind::Border));
        let _ = overlay.update(Message::Tick(TimerKind::Border));
        assert_eq!(overlay.border.phase(), 2);
    }

    #[test]
    fn hotkey_updates_label_from_device() {
        let endpoint = MockEndpoint::with_level(0.97, false);
        let mut overlay = overlay_with(Some(endpoint.clone()));
        let _ = overlay.update(Message::Hotkey(VolumeAction::VolumeUp));
        assert_eq!(overlay.volume_label, "Volume: 100%");
        assert_eq!(endpoint.device.borrow().level, 1.0);
    }

    #[test]
    fn local_key_applies_when_not_globally_bound() {
        let endpoint = MockEndpoint::with_level(0.5, false);
        let mut overlay = overlay_with(Some(endpoint.clone()));
        let _ = overlay.update(Message::LocalKey(VolumeAction::ToggleMute));
        assert_eq!(overlay.volume_label, "Volume: Muted");
        let _ = overlay.update(Message::LocalKey(VolumeAction::ToggleMute));
        assert_eq!(overlay.volume_label, "Volume: 50%");
    }

    #[test]
    fn local_key_for_global_action_is_dropped() {
        let endpoint = MockEndpoint::with_level(0.5, false);
        let mut overlay = overlay_with(Some(endpoint.clone()));
        overlay.global_actions = vec![VolumeAction::VolumeUp];

        let _ = overlay.update(Message::LocalKey(VolumeAction::VolumeUp));
        assert!(endpoint.device.borrow().writes.is_empty());
        assert_eq!(overlay.volume_label, "Volume: 50%");

        let _ = overlay.update(Message::Hotkey(VolumeAction::VolumeUp));
        assert_eq!(endpoint.device.borrow().writes.len(), 1);
        assert_eq!(overlay.volume_label, "Volume: 55%");

        // Keys that failed to register globally still work locally.
        let _ = overlay.update(Message::LocalKey(VolumeAction::ToggleMute));
        assert_eq!(overlay.volume_label, "Volume: Muted");
    }

    #[test]
    fn device_failure_keeps_previous_label() {
        let endpoint = MockEndpoint::with_level(0.3, false);
        let mut overlay = overlay_with(Some(endpoint.clone()));
        endpoint.device.borrow_mut().unplugged = true;
        let _ = overlay.update(Message::Hotkey(VolumeAction::VolumeDown));
        assert_eq!(overlay.volume_label, "Volume: 30%");
    }

    #[test]
    fn drag_moves_window_by_pointer_delta() {
        let mut overlay = overlay_with(None);
        let _ = overlay.update(Message::WindowMoved(Point::new(100.0, 100.0)));
        let _ = overlay.update(Message::PointerMoved(Point::new(50.0, 50.0)));
        let _ = overlay.update(Message::PointerPressed);
        let _ = overlay.update(Message::PointerMoved(Point::new(80.0, 70.0)));
        assert_eq!(overlay.window_position, Some(Point::new(130.0, 120.0)));

        let _ = overlay.update(Message::PointerReleased);
        let _ = overlay.update(Message::PointerMoved(Point::new(10.0, 10.0)));
        assert_eq!(overlay.window_position, Some(Point::new(130.0, 120.0)));
    }

    #[test]
    fn stale_move_reports_during_drag_do_not_pull_window_back() {
        let mut overlay = overlay_with(None);
        let _ = overlay.update(Message::WindowMoved(Point::new(100.0, 100.0)));
        let _ = overlay.update(Message::PointerMoved(Point::new(50.0, 50.0)));
        let _ = overlay.update(Message::PointerPressed);
        let _ = overlay.update(Message::PointerMoved(Point::new(80.0, 70.0)));
        assert_eq!(overlay.window_position, Some(Point::new(130.0, 120.0)));
        let _ = overlay.update(Message::PointerMoved(Point::new(60.0, 50.0)));
        assert_eq!(overlay.window_position, Some(Point::new(140.0, 120.0)));

        // The compositor confirms the first move only now.
        let _ = overlay.update(Message::WindowMoved(Point::new(130.0, 120.0)));
        let _ = overlay.update(Message::PointerMoved(Point::new(50.0, 50.0)));
        assert_eq!(overlay.window_position, Some(Point::new(140.0, 120.0)));

        let _ = overlay.update(Message::PointerReleased);
        let _ = overlay.update(Message::WindowMoved(Point::new(140.0, 120.0)));
        assert_eq!(overlay.window_position, Some(Point::new(140.0, 120.0)));
    }

    #[test]
    fn press_before_any_pointer_position_does_not_drag() {
        let mut overlay = overlay_with(None);
        let _ = overlay.update(Message::WindowMoved(Point::new(100.0, 100.0)));
        let _ = overlay.update(Message::PointerPressed);
        assert!(!overlay.drag.is_active());
    }

    #[test]
    fn close_cancels_timers_and_stops_loops() {
        let mut overlay = overlay_with(None);
        let _ = overlay.update(Message::Close);
        assert!(!overlay.border_timer.is_running());
        assert!(!overlay.clock_timer.is_running());
        assert!(!overlay.clock.is_running());
        assert!(overlay.hotkeys.is_none());
        assert!(overlay.global_actions.is_empty());

        let phase = overlay.border.phase();
        let _ = overlay.update(Message::Tick(TimerKind::Border));
        assert_eq!(overlay.border.phase(), phase);
    }

    #[test]
    fn close_twice_is_harmless() {
        let mut overlay = overlay_with(None);
        let _ = overlay.update(Message::Close);
        let _ = overlay.update(Message::Close);
        assert!(overlay.closed);
    }
}
