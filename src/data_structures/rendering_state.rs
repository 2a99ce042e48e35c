use cgmath::{Matrix4, SquareMatrix};

use crate::camera::{Projection, default_view};

/// Matrices consumed while drawing a frame.
///
/// `model` is a single slot: a renderer overwrites it right before activating its
/// material and the value is consumed within the same draw call. Draws run strictly
/// one after another, which is what makes sharing the slot sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderingState {
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub model: Matrix4<f32>,
}

impl RenderingState {
    pub fn new(projection: &Projection) -> Self {
        Self {
            projection: projection.calc_matrix(),
            view: default_view(),
            model: Matrix4::identity(),
        }
    }

    pub fn model_view(&self) -> Matrix4<f32> {
        self.view * self.model
    }
}

impl Default for RenderingState {
    fn default() -> Self {
        Self {
            projection: Matrix4::identity(),
            view: Matrix4::identity(),
            model: Matrix4::identity(),
        }
    }
}
