use orrery_engine::{Context, InputEvent, LoadJob, LoadOutcome, Notification, Rect};

use crate::renderer::WebRenderer;

/// Owns the engine context and the renderer it draws through.
///
/// The exported free functions in `lib.rs` reach it through a `thread_local!`
/// because wasm-bindgen cannot hand a borrowed context to JS.
/// Notifications are returned rather than dispatched so the JS callback never
/// runs while the runner is borrowed.
pub struct Runner {
    ctx: Context,
    renderer: WebRenderer,
}

impl Runner {
    pub fn new(ctx: Context, renderer: WebRenderer) -> Self {
        Self { ctx, renderer }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.ctx.push_input(event);
    }

    pub fn begin_loads(&mut self) -> Vec<LoadJob> {
        self.ctx.begin_loads()
    }

    /// Run one animation frame.
    pub fn frame(&mut self, now_ms: f64) -> Vec<Notification> {
        self.ctx.tick(now_ms, &mut self.renderer);
        self.ctx.drain_notifications()
    }

    pub fn complete_load(&mut self, outcome: LoadOutcome) -> Vec<Notification> {
        self.ctx.complete_load(outcome, &mut self.renderer);
        self.ctx.drain_notifications()
    }

    pub fn spotlight(&self, anchor: Option<Rect>) -> Rect {
        self.ctx.spotlight(anchor)
    }

    /// Release every renderer resource. Returns how many were released.
    pub fn dispose(&mut self) -> usize {
        self.ctx.dispose(&mut self.renderer)
    }
}

/// Split a notification into the event name and its JSON payload
/// (`null` for payload-less events).
pub fn encode(notification: &Notification) -> (&'static str, String) {
    let payload = serde_json::to_value(notification)
        .ok()
        .and_then(|mut v| v.get_mut("payload").map(serde_json::Value::take))
        .unwrap_or(serde_json::Value::Null);
    (notification.kind(), payload.to_string())
}
