use crate::systems::quality::QualityProfile;

/// Input event types the engine understands.
/// Pointer coordinates are CSS pixels relative to the canvas top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch/click began.
    PointerDown { x: f32, y: f32 },
    /// A touch/cursor moved.
    PointerMove { x: f32, y: f32 },
    /// A touch/click ended.
    PointerUp { x: f32, y: f32 },
    /// The pointer left the canvas or the browser took it over; any press in
    /// progress is abandoned without a click.
    PointerCancel,
    /// Scroll wheel; positive `delta_y` zooms out.
    Wheel { delta_y: f32 },
    /// Canvas size changed (CSS pixels) or the device pixel ratio did.
    Resize { width: f32, height: f32, dpr: f32 },
    /// Leave content view and return to the overview.
    Deselect,
    /// External quality selection.
    SetQuality(QualityProfile),
    /// Navigation menu picked a body by catalog index.
    Focus { index: usize },
}

/// Events pushed by host callbacks between frames, handled in arrival order
/// at the start of the next tick.
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Take everything queued so far.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
