//! Fixed perspective camera.
//!
//! The globe never moves the camera: the view matrix stays identity and only the
//! projection follows the surface size. Rotating the globe itself is what gives the
//! impression of an orbiting viewer.

use cgmath::{Deg, Matrix4, Rad, SquareMatrix, perspective};

/// cgmath builds OpenGL-style clip space (z in -1..1) while wgpu expects 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Debug, Clone)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// The projection the globe was tuned with: 45° vertical field of view, 0.1..100.
    pub fn globe_default(width: u32, height: u32) -> Self {
        Self::new(width, height, Deg(45.0), 0.1, 100.0)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// The camera sits at the origin looking down -z.
pub fn default_view() -> Matrix4<f32> {
    Matrix4::identity()
}
