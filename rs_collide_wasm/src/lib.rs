// rs_collide_wasm/src/lib.rs
// This is the public API for the wasm wrapper of the collision library.
// Browsers get no worker threads here, so every batch runs on the serial dispatcher.

use wasm_bindgen::prelude::*;
use js_sys::Float64Array;
use rs_collide::apis::easy_collision::EasyCollision;
use rs_collide::errors::CollisionError;
use rs_collide::models::{ConvexMesh, Vector3};
use rs_collide::scheduling::SerialDispatcher;
use rs_collide::utils::CollisionConstants;

fn to_js(error: CollisionError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
pub struct WasmCollision {
    collision: EasyCollision<SerialDispatcher>,
}

#[wasm_bindgen]
impl WasmCollision {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmCollision, JsValue> {
        let collision = EasyCollision::with_dispatcher(SerialDispatcher, CollisionConstants::default()).map_err(to_js)?;
        Ok(Self { collision })
    }

    #[wasm_bindgen]
    pub fn set_tolerances(&mut self, sign_epsilon: f64, contact_threshold: f64, max_toi_iterations: usize) -> Result<(), JsValue> {
        let constants = CollisionConstants::new(Some(sign_epsilon), Some(contact_threshold), Some(max_toi_iterations), None);
        self.collision.set_constants(constants).map_err(to_js)
    }

    /// Distance between the shapes, `-1` when they overlap.
    #[wasm_bindgen]
    pub fn distance(&self, a: &WasmShape, b: &WasmShape, x: f64, y: f64, z: f64) -> Result<f64, JsValue> {
        self.collision.distance(&a.0, &b.0, Vector3::new(x, y, z)).map_err(to_js)
    }

    /// Contact time in `[0, 1]`, `-1` when the shapes never meet.
    #[wasm_bindgen]
    pub fn time_of_impact(&self, a: &WasmShape, b: &WasmShape, offset: &[f64], velocity: &[f64]) -> Result<f64, JsValue> {
        let offset = vector_from(offset)?;
        let velocity = vector_from(velocity)?;
        let toi = self.collision.time_of_impact(&a.0, &b.0, offset, velocity).map_err(to_js)?;
        Ok(toi.map_or(-1.0, |toi| toi.time))
    }

    /// Per-vertex contact times of `moving` against `target`; `NaN` marks a miss.
    #[wasm_bindgen]
    pub fn swept_vertex_times(&mut self, moving: &WasmShape, target: &WasmShape, translation: &[f64], velocity: &[f64], cull: bool) -> Result<Float64Array, JsValue> {
        let translation = vector_from(translation)?;
        let velocity = vector_from(velocity)?;
        let times: Vec<f64> = self
            .collision
            .swept_vertex_times(&moving.0, &target.0, translation, velocity, cull)
            .into_iter()
            .map(|time| time.unwrap_or(f64::NAN))
            .collect();
        Ok(Float64Array::from(times.as_slice()))
    }
}

fn vector_from(values: &[f64]) -> Result<Vector3, JsValue> {
    match values {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => {
            web_sys::console::warn_1(&JsValue::from_str("expected a vector of three numbers"));
            Err(JsValue::from_str(&format!("Expected 3 coordinates, got {}", values.len())))
        }
    }
}

#[wasm_bindgen]
pub struct WasmShape(ConvexMesh);

#[wasm_bindgen]
impl WasmShape {
    #[wasm_bindgen]
    pub fn cuboid(half_x: f64, half_y: f64, half_z: f64) -> Result<WasmShape, JsValue> {
        ConvexMesh::cuboid(Vector3::new(half_x, half_y, half_z)).map(WasmShape).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn uv_sphere(radius: f64, segments: usize, rings: usize) -> Result<WasmShape, JsValue> {
        ConvexMesh::uv_sphere(radius, segments, rings).map(WasmShape).map_err(to_js)
    }

    /// Mesh from flat `[x, y, z, ...]` positions and `[a, b, c, ...]` triangle indices.
    #[wasm_bindgen]
    pub fn from_buffers(positions: &[f64], indices: &[u32]) -> Result<WasmShape, JsValue> {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Err(JsValue::from_str("Buffer lengths must be multiples of 3"));
        }
        let vertices = positions
            .chunks_exact(3)
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect();
        let triangles = indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
            .collect();
        ConvexMesh::new(vertices, triangles).map(WasmShape).map_err(to_js)
    }

    #[wasm_bindgen]
    pub fn vertex_count(&self) -> usize {
        self.0.vertices().len()
    }

    #[wasm_bindgen]
    pub fn face_count(&self) -> usize {
        self.0.faces().len()
    }
}
