//! Browser `fetch` adapter for body models.

use orrery_engine::AssetError;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

fn network(e: JsValue) -> AssetError {
    AssetError::Network(format!("{e:?}"))
}

/// GET `url` and return the body bytes. Non-2xx statuses are errors.
pub async fn fetch_bytes(url: String) -> Result<Vec<u8>, AssetError> {
    let win = web_sys::window().ok_or_else(|| AssetError::Network("no window".into()))?;
    let resp_val = JsFuture::from(win.fetch_with_str(&url)).await.map_err(network)?;
    let resp: web_sys::Response = resp_val.dyn_into().map_err(network)?;

    if !resp.ok() {
        return Err(AssetError::Http(resp.status()));
    }

    let buf_promise = resp.array_buffer().map_err(network)?;
    let buf_val = JsFuture::from(buf_promise).await.map_err(network)?;
    let u8 = js_sys::Uint8Array::new(&buf_val);
    let mut out = vec![0u8; u8.length() as usize];
    u8.copy_to(&mut out);
    Ok(out)
}
