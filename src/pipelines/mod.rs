//! Render pipelines for the textured, tinted and blended meshes of the globe.

pub mod material;
pub mod mesh_renderer;
pub mod shader;
