//! events-globe
//!
//! An interactive 3D globe with points of interest placed by latitude and longitude.
//! The user drags to rotate it; after a few seconds without input it eases back onto
//! the nearest point and shows that point's information panel. Runs natively and on the
//! web through wgpu.
//!
//! High-level modules
//! - `camera`: fixed perspective projection and view
//! - `context`: window, surface, device and queue
//! - `data_structures`: entities, transforms, scenes, meshes and textures
//! - `engine`: the frame loop with delta time, clear, update and draw
//! - `flow`: the winit application and input translation
//! - `globe`: points of interest, drag interaction and the globe renderer
//! - `pipelines`: shader program, materials and mesh renderers
//! - `resources`: helpers to load images and other assets
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod engine;
pub mod flow;
pub mod globe;
pub mod pipelines;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use globe::config::{GlobeConfig, PointSpec};
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;

/// Web entry point: runs the globe with its default points on the page's `canvas`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    flow::run(GlobeConfig::default()).map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{:#}", e)))
}
