use iced::{Point, Vector};

/// Press-move-release gesture that drags the whole window.
///
/// Pointer positions are window-relative. The offset captured at press is
/// where the window was grabbed; while dragging, the window moves so the
/// grab point follows the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragGesture {
    anchor: Option<Point>,
}

impl DragGesture {
    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn press(&mut self, pointer: Point) {
        self.anchor = Some(pointer);
    }

    /// New window origin for a pointer motion, or `None` when no press is
    /// in progress.
    pub fn motion(&self, pointer: Point, window: Point) -> Option<Point> {
        let anchor = self.anchor?;
        let delta: Vector = pointer - anchor;
        Some(window + delta)
    }

    pub fn release(&mut self) {
        self.anchor = None;
    }
}
