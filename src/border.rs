//! Rotating rainbow border.
//!
//! The border is a ring of one-unit line segments walked clockwise around
//! the window. Every animation tick recolors the whole ring along a hue
//! gradient shifted by the current phase, then advances the phase by one
//! segment, so a full rotation takes `N` ticks.

use iced::widget::canvas::{self, Frame, Geometry, Path, Program, Stroke};
use iced::{Color, Point, Renderer, Theme, mouse};

/// 24-bit display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    /// `#rrggbb`
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_color(self) -> Color {
        Color::from_rgb8(self.r, self.g, self.b)
    }
}

/// Six-sector HSV to RGB. `h` wraps, so any real hue is accepted.
/// Channels are scaled by 255 and truncated.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let channel = |x: f64| (x.clamp(0.0, 1.0) * 255.0) as u8;
    if s == 0.0 {
        let c = channel(v);
        return Rgb { r: c, g: c, b: c };
    }
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match sector as u8 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

/// One piece of the border ring.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderSegment {
    pub index: usize,
    pub from: (u32, u32),
    pub to: (u32, u32),
    pub color: Rgb,
}

/// Walk a `width` x `height` rectangle and emit one segment per unit of
/// perimeter: top edge left to right, right edge top to bottom, bottom
/// edge right to left, left edge bottom to top.
pub fn perimeter_segments(width: u32, height: u32) -> Vec<BorderSegment> {
    let (w, h) = (width as usize, height as usize);
    let n = 2 * (w + h);
    (0..n)
        .map(|i| {
            let (from, to) = if i < w {
                let x = i as u32;
                ((x, 0), (x + 1, 0))
            } else if i < w + h {
                let y = (i - w) as u32;
                ((width, y), (width, y + 1))
            } else if i < 2 * w + h {
                let x = width - (i - w - h) as u32;
                ((x, height), (x - 1, height))
            } else {
                let y = height - (i - 2 * w - h) as u32;
                ((0, y), (0, y - 1))
            };
            BorderSegment {
                index: i,
                from,
                to,
                color: Rgb::WHITE,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Idle,
    Running,
}

pub struct BorderAnimator {
    segments: Vec<BorderSegment>,
    phase: usize,
    state: AnimatorState,
}

impl BorderAnimator {
    pub fn new(width: u32, height: u32) -> Self {
        let segments = perimeter_segments(width, height);
        tracing::debug!(segments = segments.len(), "border ring built");
        Self {
            segments,
            phase: 0,
            state: AnimatorState::Idle,
        }
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn start(&mut self) {
        if self.state == AnimatorState::Idle {
            self.state = AnimatorState::Running;
            tracing::debug!("border animation: Idle -> Running");
        }
    }

    /// Back to idle. The ring keeps its last colors.
    pub fn stop(&mut self) {
        if self.state == AnimatorState::Running {
            self.state = AnimatorState::Idle;
            tracing::debug!("border animation: Running -> Idle");
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn phase(&self) -> usize {
        self.phase
    }

    pub fn segments(&self) -> &[BorderSegment] {
        &self.segments
    }

    /// Hue of segment `i` at the current phase, in [0, 1).
    pub fn hue_of(&self, i: usize) -> f64 {
        let n = self.segments.len();
        ((i + self.phase) % n) as f64 / n as f64
    }

    /// Recolor the ring at the current phase, then advance the phase.
    /// Ignored while idle.
    pub fn tick(&mut self) {
        if self.state != AnimatorState::Running || self.segments.is_empty() {
            return;
        }
        let n = self.segments.len();
        for i in 0..n {
            let hue = self.hue_of(i);
            self.segments[i].color = hsv_to_rgb(hue, 1.0, 1.0);
        }
        tracing::trace!(phase = self.phase, head = %self.segments[0].color.hex(), "border tick");
        self.phase = (self.phase + 1) % n;
    }

    pub fn canvas(&self, offset: f32, stroke: f32) -> BorderCanvas<'_> {
        BorderCanvas {
            segments: self.segments(),
            offset,
            stroke,
        }
    }
}

/// Draws the ring, each segment in its own color.
pub struct BorderCanvas<'a> {
    segments: &'a [BorderSegment],
    offset: f32,
    stroke: f32,
}

impl<'a, Message> Program<Message> for BorderCanvas<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: iced::Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let at = |(x, y): (u32, u32)| Point::new(x as f32 + self.offset, y as f32 + self.offset);

        for segment in self.segments {
            let line = Path::line(at(segment.from), at(segment.to));
            frame.stroke(
                &line,
                Stroke::default()
                    .with_width(self.stroke)
                    .with_color(segment.color.to_color())
                    .with_line_cap(canvas::LineCap::Square),
            );
        }

        vec![frame.into_geometry()]
    }
}
