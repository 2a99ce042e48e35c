//! Hierarchical placement of entities.
//!
//! A [`Transform`] stores position, rotation and scale relative to an optional parent.
//! Children only keep a weak handle to their parent, so the hierarchy never owns itself
//! and a parent that has been dropped simply stops contributing.

use std::{
    cell::RefCell,
    fmt::Debug,
    rc::{Rc, Weak},
};

use cgmath::{Matrix4, One, Quaternion, Vector2, Vector3, Vector4, Zero};

use crate::data_structures::entity::Entity;

/// Shared handle to a transform. Entities and hierarchy lookups hold these.
pub type SharedTransform = Rc<RefCell<Transform>>;

/// Per-frame hook invoked as `(delta_time, owning_entity)`.
pub type UpdateHook = Box<dyn FnMut(f32, &Entity)>;

pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
    parent: Option<Weak<RefCell<Transform>>>,
    on_update: Option<UpdateHook>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            parent: None,
            on_update: None,
        }
    }

    pub fn from_parts(
        position: Vector3<f32>,
        rotation: Quaternion<f32>,
        scale: Vector3<f32>,
    ) -> Self {
        Self {
            position,
            rotation,
            scale,
            ..Self::new()
        }
    }

    /// Wraps the transform into a shareable handle.
    pub fn shared(self) -> SharedTransform {
        Rc::new(RefCell::new(self))
    }

    /// The parent chain must stay acyclic; a cycle recurses without bound.
    pub fn set_parent(&mut self, parent: &SharedTransform) {
        self.parent = Some(Rc::downgrade(parent));
    }

    pub fn clear_parent(&mut self) {
        self.parent = None;
    }

    pub fn parent(&self) -> Option<SharedTransform> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_on_update(&mut self, hook: impl FnMut(f32, &Entity) + 'static) {
        self.on_update = Some(Box::new(hook));
    }

    /// Rotation, translation and scale composed into a single local matrix.
    pub fn local_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Local-to-world matrix. Recomputed on every call since parents move between reads.
    pub fn matrix(&self) -> Matrix4<f32> {
        match self.parent() {
            Some(parent) => parent.borrow().matrix() * self.local_matrix(),
            None => self.local_matrix(),
        }
    }

    pub fn world_position(&self) -> Vector3<f32> {
        match self.parent() {
            Some(parent) => {
                let world = parent.borrow().matrix() * self.position.extend(1.0);
                world.truncate()
            }
            None => self.position,
        }
    }

    /// Projects the transform's origin to normalized screen space, (0, 0) bottom-left
    /// and (1, 1) top-right.
    pub fn screen_position(
        &self,
        projection: &Matrix4<f32>,
        view: &Matrix4<f32>,
    ) -> Vector2<f32> {
        let clip = projection * view * self.matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = if clip.w.abs() > f32::EPSILON {
            Vector2::new(clip.x / clip.w, clip.y / clip.w)
        } else {
            Vector2::new(clip.x, clip.y)
        };
        (ndc + Vector2::new(1.0, 1.0)) * 0.5
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .field("has_parent", &self.parent.is_some())
            .field("has_on_update", &self.on_update.is_some())
            .finish()
    }
}

/// Runs the transform's hook for this frame.
///
/// The hook is taken out while it runs so it can borrow the transform it belongs to
/// through `entity`.
pub fn update(transform: &SharedTransform, delta_time: f32, entity: &Entity) {
    let hook = transform.borrow_mut().on_update.take();
    if let Some(mut hook) = hook {
        hook(delta_time, entity);
        let mut transform = transform.borrow_mut();
        if transform.on_update.is_none() {
            transform.on_update = Some(hook);
        }
    }
}
