use std::collections::{HashMap, HashSet};

use orrery_engine::components::geometry::Topology;
use orrery_engine::{
    pack_frame, FrameData, GeometryId, Material, MaterialId, RenderStats, Renderer, ResourceId,
    ShadowKind, ShadowSettings,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// WebGL renderer object supplied by the host page.
    ///
    /// Expected shape:
    /// ```text
    /// resize(width, height)
    /// setPixelRatio(ratio)
    /// setShadows(enabled, kind)          // kind: 0 basic, 1 pcf-soft
    /// setAntialias(enabled)              // called once, before the first render
    /// uploadGeometry(id, positions, normals, colors, indices, points)
    /// uploadMaterial(id, json)
    /// render(frame: Float32Array) -> { drawCalls, triangles, geometries, bufferBytes }
    /// release(kind, id)                  // kind: "geometry" | "material"
    /// ```
    pub type JsRenderer;

    #[wasm_bindgen(method, js_name = resize)]
    fn js_resize(this: &JsRenderer, width: u32, height: u32);

    #[wasm_bindgen(method, js_name = setPixelRatio)]
    fn js_set_pixel_ratio(this: &JsRenderer, ratio: f32);

    #[wasm_bindgen(method, js_name = setShadows)]
    fn js_set_shadows(this: &JsRenderer, enabled: bool, kind: u32);

    #[wasm_bindgen(method, js_name = setAntialias)]
    fn js_set_antialias(this: &JsRenderer, enabled: bool);

    #[wasm_bindgen(method, js_name = uploadGeometry)]
    fn js_upload_geometry(
        this: &JsRenderer,
        id: u32,
        positions: &[f32],
        normals: &[f32],
        colors: &[f32],
        indices: &[u32],
        points: bool,
    );

    #[wasm_bindgen(method, js_name = uploadMaterial)]
    fn js_upload_material(this: &JsRenderer, id: u32, json: &str);

    #[wasm_bindgen(method, js_name = render)]
    fn js_render(this: &JsRenderer, frame: &[f32]) -> JsValue;

    #[wasm_bindgen(method, js_name = release)]
    fn js_release(this: &JsRenderer, kind: &str, id: u32);
}

/// `Renderer` backed by a JS object. Geometry uploads once per id; materials
/// re-upload whenever their description changes (quality switches).
pub struct WebRenderer {
    js: JsRenderer,
    geometries: HashSet<u32>,
    /// Last uploaded description per material, with animated uniforms zeroed.
    materials: HashMap<u32, Material>,
    frame_buffer: Vec<f32>,
}

impl WebRenderer {
    pub fn new(js: JsRenderer) -> Self {
        Self {
            js,
            geometries: HashSet::new(),
            materials: HashMap::new(),
            frame_buffer: Vec::with_capacity(4096),
        }
    }

    fn sync_resources(&mut self, frame: &FrameData) {
        for item in &frame.draw_list.items {
            let geometry_id = item.geometry_id();
            if !self.geometries.contains(&geometry_id) {
                if let Some(g) = frame.resources.geometry(GeometryId(geometry_id)) {
                    self.js.js_upload_geometry(
                        geometry_id,
                        &flatten3(&g.positions),
                        &flatten3(&g.normals),
                        &flatten3(&g.colors),
                        &g.indices,
                        g.topology == Topology::Points,
                    );
                    self.geometries.insert(geometry_id);
                }
            }

            let material_id = item.material as u32;
            let Some(material) = frame.resources.material(MaterialId(material_id)) else {
                continue;
            };
            let key = static_part(material);
            if self.materials.get(&material_id) == Some(&key) {
                continue;
            }
            match serde_json::to_string(material) {
                Ok(json) => {
                    self.js.js_upload_material(material_id, &json);
                    self.materials.insert(material_id, key);
                }
                Err(e) => log::warn!("material {material_id}: {e}"),
            }
        }
    }
}

fn flatten3<T: Copy + Into<[f32; 3]>>(values: &[T]) -> Vec<f32> {
    values.iter().flat_map(|&v| v.into()).collect()
}

/// The glow shader's `time` uniform comes from the frame header instead.
fn static_part(material: &Material) -> Material {
    let mut m = *material;
    if let Material::Shader(shader) = &mut m {
        shader.uniforms.time = 0.0;
    }
    m
}

fn stat(obj: &JsValue, key: &str) -> f64 {
    js_sys::Reflect::get(obj, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

impl Renderer for WebRenderer {
    fn backend(&self) -> &'static str {
        "webgl2"
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.js.js_resize(width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.js.js_set_pixel_ratio(ratio);
    }

    fn set_shadows(&mut self, shadows: ShadowSettings) {
        let kind = match shadows.kind {
            ShadowKind::Basic => 0,
            ShadowKind::PcfSoft => 1,
        };
        self.js.js_set_shadows(shadows.enabled, kind);
    }

    fn set_antialias(&mut self, enabled: bool) {
        self.js.js_set_antialias(enabled);
    }

    fn draw(&mut self, frame: &FrameData) -> RenderStats {
        self.sync_resources(frame);
        pack_frame(frame, &mut self.frame_buffer);
        let stats = self.js.js_render(&self.frame_buffer);
        RenderStats {
            draw_calls: stat(&stats, "drawCalls") as u32,
            triangles: stat(&stats, "triangles") as u64,
            geometries: stat(&stats, "geometries") as u32,
            buffer_bytes: stat(&stats, "bufferBytes") as u64,
        }
    }

    fn release(&mut self, resource: ResourceId) {
        match resource {
            ResourceId::Geometry(GeometryId(id)) => {
                self.geometries.remove(&id);
                self.js.js_release("geometry", id);
            }
            ResourceId::Material(MaterialId(id)) => {
                self.materials.remove(&id);
                self.js.js_release("material", id);
            }
        }
    }
}
