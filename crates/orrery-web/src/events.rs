use orrery_engine::InputEvent;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, MouseEvent, WheelEvent};

/// DOM listener that unregisters itself when dropped.
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Canvas events the engine listens to.
pub const CANVAS_EVENTS: [&str; 6] =
    ["pointerdown", "pointermove", "pointerup", "pointercancel", "pointerleave", "wheel"];

/// Map a pointer event name and canvas-relative position to engine input.
pub fn pointer_input(kind: &str, x: f32, y: f32) -> Option<InputEvent> {
    match kind {
        "pointerdown" => Some(InputEvent::PointerDown { x, y }),
        "pointermove" => Some(InputEvent::PointerMove { x, y }),
        "pointerup" => Some(InputEvent::PointerUp { x, y }),
        // A release outside the canvas never reaches it.
        "pointercancel" | "pointerleave" => Some(InputEvent::PointerCancel),
        _ => None,
    }
}

/// Translate a DOM event raised on the canvas.
pub fn translate(event: &Event) -> Option<InputEvent> {
    if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
        return Some(InputEvent::Wheel { delta_y: wheel.delta_y() as f32 });
    }
    let mouse = event.dyn_ref::<MouseEvent>()?;
    pointer_input(&event.type_(), mouse.offset_x() as f32, mouse.offset_y() as f32)
}
