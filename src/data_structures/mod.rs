//! Engine data structures: entities, transforms, scenes, meshes and textures.
//!
//! - `transform` holds position/rotation/scale with an optional non-owning parent
//! - `entity` is a named container with one slot per capability (update, draw)
//! - `scene` is the ordered list of entities the engine updates and draws each frame
//! - `rendering_state` carries projection, view and model matrices through a frame
//! - `mesh` contains CPU-side geometry and the built-in quad and sphere shapes
//! - `texture` contains the GPU texture wrapper and swappable texture slots

pub mod entity;
pub mod mesh;
pub mod rendering_state;
pub mod scene;
pub mod texture;
pub mod transform;
