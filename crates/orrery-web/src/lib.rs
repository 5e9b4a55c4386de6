//! Browser host for the orrery engine.
//!
//! Exports free functions through `#[wasm_bindgen]`; the engine context lives
//! in a `thread_local!` runner. The page supplies a canvas id and a
//! [`JsRenderer`] that consumes the packed frame buffer.

pub mod events;
pub mod fetch;
pub mod renderer;
pub mod runner;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use orrery_engine::{
    AssetLoader, BodyCatalog, Context, DeviceClass, DeviceWatch, EngineConfig, InputEvent, LoadJob,
    Notification, QualityProfile, Rect, Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, Window};

pub use renderer::{JsRenderer, WebRenderer};
pub use runner::Runner;

use events::Listener;

thread_local! {
    static RUNNER: RefCell<Option<Runner>> = const { RefCell::new(None) };
    static CALLBACK: RefCell<Option<js_sys::Function>> = const { RefCell::new(None) };
    static LISTENERS: RefCell<Vec<Listener>> = const { RefCell::new(Vec::new()) };
    static FRAME_LOOP: RefCell<Option<FrameLoop>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. `None` before init or after dispose.
fn with_runner<R>(f: impl FnOnce(&mut Runner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn push(event: InputEvent) {
    with_runner(|r| r.push_input(event));
}

/// Forward notifications to the page callback as `(kind, payloadJson)`.
fn dispatch(notifications: Vec<Notification>) {
    if notifications.is_empty() {
        return;
    }
    let Some(callback) = CALLBACK.with(|c| c.borrow().clone()) else {
        return;
    };
    for n in &notifications {
        let (kind, payload) = runner::encode(n);
        if let Err(e) = callback.call2(&JsValue::NULL, &JsValue::from_str(kind), &JsValue::from_str(&payload)) {
            log::warn!("notification callback threw on `{kind}`: {e:?}");
        }
    }
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

// -- Animation frames --

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Self-rescheduling `requestAnimationFrame` loop. Dropping it cancels the
/// pending frame and releases the callback.
struct FrameLoop {
    callback: Rc<RefCell<Option<FrameCallback>>>,
    pending: Rc<Cell<Option<i32>>>,
}

fn request_frame(callback: &FrameCallback) -> Option<i32> {
    let win = web_sys::window()?;
    win.request_animation_frame(callback.as_ref().unchecked_ref()).ok()
}

impl FrameLoop {
    fn start() -> Self {
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));

        let next = callback.clone();
        let id = pending.clone();
        *callback.borrow_mut() = Some(Closure::new(move |now_ms: f64| {
            id.set(None);
            if let Some(notifications) = with_runner(|r| r.frame(now_ms)) {
                dispatch(notifications);
            }
            // The page may have disposed from inside the callback.
            if let Some(cb) = next.borrow().as_ref() {
                id.set(request_frame(cb));
            }
        }));

        if let Some(cb) = callback.borrow().as_ref() {
            pending.set(request_frame(cb));
        }
        Self { callback, pending }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        if let (Some(id), Some(win)) = (self.pending.take(), web_sys::window()) {
            let _ = win.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

// -- Loading --

async fn load_body(loader: AssetLoader, job: LoadJob) {
    let outcome = loader
        .load(&job.descriptor, job.index, &job.ticket, |url| fetch::fetch_bytes(url.to_owned()))
        .await;
    if let Some(notifications) = with_runner(|r| r.complete_load(outcome)) {
        dispatch(notifications);
    }
}

fn attach_listeners(
    win: &Window,
    canvas: &HtmlCanvasElement,
    device: DeviceClass,
) -> Result<Vec<Listener>, JsValue> {
    let mut listeners = Vec::with_capacity(events::CANVAS_EVENTS.len() + 1);
    for kind in events::CANVAS_EVENTS {
        listeners.push(Listener::attach(canvas, kind, |event| {
            if let Some(input) = events::translate(&event) {
                push(input);
            }
        })?);
    }

    let canvas = canvas.clone();
    let mut watch = DeviceWatch::new(device);
    listeners.push(Listener::attach(win, "resize", move |_| {
        let Some(win) = web_sys::window() else {
            return;
        };
        let width = win.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(0.0) as f32;
        let user_agent = win.navigator().user_agent().unwrap_or_default();
        watch.observe(width, &user_agent);

        let dpr = win.device_pixel_ratio() as f32;
        push(InputEvent::Resize {
            width: canvas.client_width() as f32,
            height: canvas.client_height() as f32,
            dpr,
        });
    })?);
    Ok(listeners)
}

// -- Exports --

/// Build the scene on `canvas_id` and start rendering.
///
/// `catalog_json` and `config_json` override the built-in portfolio catalog
/// and engine defaults. Calling again replaces the previous instance.
#[wasm_bindgen]
pub fn orrery_init(
    canvas_id: &str,
    renderer: JsRenderer,
    catalog_json: Option<String>,
    config_json: Option<String>,
) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    orrery_dispose();

    let catalog = match catalog_json {
        Some(json) => BodyCatalog::from_json(&json).map_err(js_error)?,
        None => BodyCatalog::default(),
    };
    let config = match config_json {
        Some(json) => EngineConfig::from_json(&json).map_err(js_error)?,
        None => EngineConfig::default(),
    };

    let win = window()?;
    let document = win.document().ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{canvas_id}")))?
        .dyn_into()
        .map_err(JsValue::from)?;

    let screen_width = win.inner_width()?.as_f64().unwrap_or(0.0) as f32;
    let user_agent = win.navigator().user_agent().unwrap_or_default();
    let device = DeviceClass::detect(screen_width, &user_agent);
    log::info!("device class {device:?}");

    let viewport = Viewport::new(
        canvas.client_width() as f32,
        canvas.client_height() as f32,
        win.device_pixel_ratio() as f32,
    );
    let mut renderer = WebRenderer::new(renderer);
    let ctx = Context::new(catalog, config, device.defaults(), viewport, &mut renderer);
    let loader = ctx.loader();

    let mut runner = Runner::new(ctx, renderer);
    let jobs = runner.begin_loads();
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));

    let listeners = attach_listeners(&win, &canvas, device)?;
    LISTENERS.with(|cell| *cell.borrow_mut() = listeners);

    for job in jobs {
        wasm_bindgen_futures::spawn_local(load_body(loader, job));
    }
    FRAME_LOOP.with(|cell| *cell.borrow_mut() = Some(FrameLoop::start()));
    Ok(())
}

/// Register `callback(kind, payloadJson)` for engine notifications.
#[wasm_bindgen]
pub fn orrery_set_callback(callback: js_sys::Function) {
    CALLBACK.with(|c| *c.borrow_mut() = Some(callback));
}

/// Switch quality profile by name (`"high"` or `"medium"`).
#[wasm_bindgen]
pub fn orrery_set_quality(name: &str) -> Result<(), JsValue> {
    let profile: QualityProfile = name.parse().map_err(js_error)?;
    push(InputEvent::SetQuality(profile));
    Ok(())
}

/// Fly to a body by catalog index, as the navigation menu does.
#[wasm_bindgen]
pub fn orrery_focus(index: usize) {
    push(InputEvent::Focus { index });
}

/// Return from content view to the overview.
#[wasm_bindgen]
pub fn orrery_deselect() {
    push(InputEvent::Deselect);
}

/// Spotlight rectangle (JSON `{x, y, width, height}`) around the first
/// element matching `selector`, or the whole viewport.
#[wasm_bindgen]
pub fn orrery_spotlight(selector: Option<String>) -> Result<String, JsValue> {
    let anchor = selector
        .and_then(|s| window().ok()?.document()?.query_selector(&s).ok().flatten())
        .map(|el| {
            let r = el.get_bounding_client_rect();
            Rect::new(r.x() as f32, r.y() as f32, r.width() as f32, r.height() as f32)
        });
    let rect = with_runner(|r| r.spotlight(anchor)).ok_or_else(|| JsValue::from_str("not initialized"))?;
    serde_json::to_string(&rect).map_err(js_error)
}

/// Frames rendered so far.
#[wasm_bindgen]
pub fn orrery_frame_count() -> f64 {
    with_runner(|r| r.context().frame_count() as f64).unwrap_or(0.0)
}

/// Stop the frame loop, detach listeners, cancel loads and release every
/// renderer resource. Returns how many resources were released.
#[wasm_bindgen]
pub fn orrery_dispose() -> u32 {
    FRAME_LOOP.with(|cell| cell.borrow_mut().take());
    LISTENERS.with(|cell| cell.borrow_mut().clear());
    let runner = RUNNER.with(|cell| cell.borrow_mut().take());
    match runner {
        Some(mut runner) => {
            let released = runner.dispose();
            log::info!("disposed: {released} resources released");
            released as u32
        }
        None => 0,
    }
}
