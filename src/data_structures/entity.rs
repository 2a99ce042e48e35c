//! Entities and their capability slots.
//!
//! An [`Entity`] holds at most one component per capability kind: one updatable
//! ([`Transform`]) and one [`Drawable`]. Adding a component of a kind that is already
//! present replaces the previous occupant.

use std::fmt::Debug;

use crate::data_structures::{
    rendering_state::RenderingState,
    transform::{self, SharedTransform, Transform},
};

/// Everything a drawable needs to issue its draw call.
pub struct DrawContext<'a, 'pass> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub state: &'a mut RenderingState,
    pub render_pass: &'a mut wgpu::RenderPass<'pass>,
}

/// Capability of issuing a render call for the owning entity.
pub trait Drawable {
    fn draw(&self, entity: &Entity, dc: &mut DrawContext<'_, '_>);
}

/// A component classified by the capability slot it occupies.
pub enum Component {
    Updatable(SharedTransform),
    Drawable(Box<dyn Drawable>),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Updatable(_) => ComponentKind::Updatable,
            Component::Drawable(_) => ComponentKind::Drawable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Updatable,
    Drawable,
}

impl From<SharedTransform> for Component {
    fn from(transform: SharedTransform) -> Self {
        Component::Updatable(transform)
    }
}

impl From<Transform> for Component {
    fn from(transform: Transform) -> Self {
        Component::Updatable(transform.shared())
    }
}

impl From<Box<dyn Drawable>> for Component {
    fn from(drawable: Box<dyn Drawable>) -> Self {
        Component::Drawable(drawable)
    }
}

#[derive(Default)]
pub struct Entity {
    name: String,
    transform: Option<SharedTransform>,
    drawable: Option<Box<dyn Drawable>>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores `component` in its capability slot and returns whatever it displaced.
    pub fn add_component(&mut self, component: impl Into<Component>) -> Option<Component> {
        match component.into() {
            Component::Updatable(transform) => self
                .transform
                .replace(transform)
                .map(Component::Updatable),
            Component::Drawable(drawable) => {
                self.drawable.replace(drawable).map(Component::Drawable)
            }
        }
    }

    pub fn has_component(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Updatable => self.transform.is_some(),
            ComponentKind::Drawable => self.drawable.is_some(),
        }
    }

    pub fn transform(&self) -> Option<&SharedTransform> {
        self.transform.as_ref()
    }

    pub fn drawable(&self) -> Option<&dyn Drawable> {
        self.drawable.as_deref()
    }

    /// Ticks the updatable slot. Slots run in declaration order: updatable, then drawable.
    pub fn update(&self, delta_time: f32) {
        if let Some(transform) = &self.transform {
            transform::update(transform, delta_time, self);
        }
    }

    pub fn draw(&self, dc: &mut DrawContext<'_, '_>) {
        if let Some(drawable) = &self.drawable {
            drawable.draw(self, dc);
        }
    }
}

impl Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("transform", &self.transform)
            .field("drawable", &self.drawable.is_some())
            .finish()
    }
}
