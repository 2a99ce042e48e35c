//! Tuned constants of the globe and the default points of interest.

use std::f32::consts::FRAC_PI_4;

use cgmath::{Vector3, Vector4};
use instant::Duration;

/// A point of interest as configured: polar coordinates in degrees plus its labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSpec {
    pub name: String,
    pub text: String,
    pub latitude: f32,
    pub longitude: f32,
}

impl PointSpec {
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        latitude: f32,
        longitude: f32,
    ) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GlobeConfig {
    /// Distance of the points from the globe's centre, in globe units.
    pub surface_radius: f32,
    /// A point within this distance of the globe's front is highlighted.
    pub highlight_radius: f32,
    /// Radians of target rotation per pixel of pointer movement.
    pub drag_sensitivity: f32,
    /// Drag never pitches the globe further than this, in radians.
    pub pitch_limit: f32,
    pub recenter_delay: Duration,
    /// Slerp rate while dragging.
    pub drag_speed: f32,
    /// Slerp rate otherwise.
    pub idle_speed: f32,
    pub globe_position: Vector3<f32>,
    pub point_scale: f32,
    pub globe_subdivisions: u32,
    pub globe_texture: String,
    pub point_texture: String,
    pub globe_color: Vector4<f32>,
    pub point_color: Vector4<f32>,
    pub points: Vec<PointSpec>,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            surface_radius: 1.005,
            highlight_radius: 0.2,
            drag_sensitivity: 0.003,
            pitch_limit: FRAC_PI_4,
            recenter_delay: Duration::from_millis(3000),
            drag_speed: 4.0,
            idle_speed: 1.0,
            globe_position: Vector3::new(0.0, 0.0, -2.5),
            point_scale: 0.04,
            globe_subdivisions: 4,
            globe_texture: "textures/earth_whiteandalpha_4k.png".to_string(),
            point_texture: "textures/circle-64px.png".to_string(),
            globe_color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            point_color: Vector4::new(1.0, 0.0, 0.0, 1.0),
            points: default_points(),
        }
    }
}

fn default_points() -> Vec<PointSpec> {
    vec![
        PointSpec::new(
            "Madrid Hackathon",
            "Quantum Hackathon in Madrid Lorem ipsum dolor sit amet, consectetur adipiscing elit. In rutrum tellus eget lacus blandit sodales.",
            40.4167,
            -3.70325,
        ),
        PointSpec::new(
            "Sudafrica Qiskit Camp",
            "Quantum Lorem ipsum dolor sit amet, consectetur adipiscing elit. In rutrum tellus eget lacus blandit sodales.",
            -30.559482,
            22.937506,
        ),
        PointSpec::new(
            "New York Quantum",
            "Quantum Lorem ipsum dolor sit amet, consectetur adipiscing elit. In rutrum tellus eget lacus blandit sodales.",
            40.6643,
            -73.9385,
        ),
    ]
}
