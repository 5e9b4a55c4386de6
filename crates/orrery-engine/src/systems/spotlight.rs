use serde::Serialize;

/// Space left around the anchor element, in CSS pixels.
pub const SPOTLIGHT_PADDING: f32 = 8.0;

/// Axis-aligned rectangle in CSS pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || !self.x.is_finite() || !self.y.is_finite()
    }
}

/// Highlight region for a tutorial step. The anchor lookup is best effort:
/// a missing, empty or fully off-screen anchor lights the whole viewport.
pub fn spotlight(anchor: Option<Rect>, viewport_width: f32, viewport_height: f32, padding: f32) -> Rect {
    let full = Rect::new(0.0, 0.0, viewport_width.max(0.0), viewport_height.max(0.0));
    let Some(anchor) = anchor.filter(|a| !a.is_degenerate()) else {
        return full;
    };

    let left = (anchor.x - padding).max(0.0);
    let top = (anchor.y - padding).max(0.0);
    let right = (anchor.right() + padding).min(full.width);
    let bottom = (anchor.bottom() + padding).min(full.height);
    if right <= left || bottom <= top {
        return full;
    }
    Rect::new(left, top, right - left, bottom - top)
}
