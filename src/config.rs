use std::time::Duration;

use iced::{Point, Size};

/// Fixed geometry and timing of the overlay.
///
/// Nothing here is read from disk or the environment: the widget has one
/// layout. Keeping the numbers together lets the border ring and the
/// window agree on dimensions, and lets tests build smaller rings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    /// Outer window size in logical pixels.
    pub window_size: Size,
    /// Distance of the window's right edge from the monitor's right edge,
    /// measured from the window's left edge (x = monitor width - this).
    pub right_inset: f32,
    /// Distance from the top of the monitor.
    pub top_inset: f32,
    /// Perimeter walked by the border ring. One segment per unit.
    pub border_width: u32,
    pub border_height: u32,
    /// Offset applied to every segment when drawn.
    pub border_offset: f32,
    pub border_stroke: f32,
    pub background_opacity: f32,
    pub border_tick: Duration,
    pub clock_tick: Duration,
    /// Volume change per F11/F12 press.
    pub volume_step: f32,
}

impl OverlayConfig {
    pub const fn reference() -> Self {
        Self {
            window_size: Size::new(260.0, 180.0),
            right_inset: 280.0,
            top_inset: 50.0,
            border_width: 258,
            border_height: 178,
            border_offset: 1.0,
            border_stroke: 2.0,
            background_opacity: 0.7,
            border_tick: Duration::from_millis(50),
            clock_tick: Duration::from_millis(1000),
            volume_step: 0.05,
        }
    }

    /// Number of segments in the border ring: one per unit of perimeter.
    pub fn segment_count(&self) -> usize {
        2 * (self.border_width as usize + self.border_height as usize)
    }

    /// Initial top-left placement near the top-right corner of a monitor.
    pub fn initial_position(&self, monitor: Size) -> Point {
        Point::new((monitor.width - self.right_inset).max(0.0), self.top_inset)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::reference()
    }
}

/// Placement callback for `window::Position::SpecificWith`, which only
/// accepts a plain function pointer.
pub fn place_window(_window: Size, monitor: Size) -> Point {
    OverlayConfig::reference().initial_position(monitor)
}
