use std::time::Duration;

use futures::channel::mpsc;
use iced::Subscription;

use crate::app::Message;

/// Which loop a tick belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Border,
    Clock,
}

/// A start/cancel timer whose ticks arrive as `Message::Tick(kind)`.
///
/// The tick stream only exists while the timer is running: `subscription`
/// returns `Subscription::none()` otherwise, iced drops the stream, and the
/// worker thread exits on its next failed send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatingTimer {
    kind: TimerKind,
    interval: Duration,
    running: bool,
}

impl RepeatingTimer {
    pub fn new(kind: TimerKind, interval: Duration) -> Self {
        Self {
            kind,
            interval,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            tracing::debug!(kind = ?self.kind, interval_ms = self.interval.as_millis() as u64, "timer started");
        }
        self.running = true;
    }

    pub fn cancel(&mut self) {
        if self.running {
            tracing::debug!(kind = ?self.kind, "timer cancelled");
        }
        self.running = false;
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.is_running() {
            Subscription::run_with((self.kind, self.interval), tick_stream)
        } else {
            Subscription::none()
        }
    }
}

fn tick_stream(key: &(TimerKind, Duration)) -> mpsc::UnboundedReceiver<Message> {
    let (kind, interval) = *key;
    let (tx, rx) = mpsc::unbounded();
    std::thread::spawn(move || loop {
        std::thread::sleep(interval);
        if tx.unbounded_send(Message::Tick(kind)).is_err() {
            tracing::trace!(?kind, "tick stream closed");
            break;
        }
    });
    rx
}
