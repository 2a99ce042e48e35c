use std::rc::Rc;

use crate::data_structures::entity::{DrawContext, Entity};

/// Entities in insertion order. Drawing follows the same order, there is no depth sort.
#[derive(Debug, Default)]
pub struct Scene {
    entities: Vec<Rc<Entity>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entity: Rc<Entity>) {
        self.entities.push(entity);
    }

    pub fn entities(&self) -> &[Rc<Entity>] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn update(&self, delta_time: f32) {
        self.entities
            .iter()
            .for_each(|entity| entity.update(delta_time));
    }

    pub fn draw(&self, dc: &mut DrawContext<'_, '_>) {
        self.entities.iter().for_each(|entity| entity.draw(dc));
    }
}
