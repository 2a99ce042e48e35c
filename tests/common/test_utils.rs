use std::{cell::RefCell, rc::Rc};

use events_globe::{
    GlobeConfig, PointSpec,
    data_structures::transform::{SharedTransform, Transform},
    globe::{
        interaction::GlobeInteraction,
        panel::{HeadlessPanel, InfoPanel},
        point_of_interest::{PointOfInterest, identity_camera},
    },
};

/// Panel that records every call on top of the headless panel's behaviour.
#[derive(Default)]
pub(crate) struct RecordingPanel {
    inner: HeadlessPanel,
    calls: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingPanel {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn shows(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with("show"))
            .count()
    }

    pub fn title(&self) -> String {
        self.inner.title()
    }

    pub fn text(&self) -> String {
        self.inner.text()
    }
}

impl InfoPanel for RecordingPanel {
    fn show(&self, title: &str, text: &str) {
        self.calls.borrow_mut().push(format!("show {}", title));
        self.inner.show(title, text);
    }

    fn hide(&self) {
        self.calls.borrow_mut().push("hide".to_string());
        self.inner.hide();
    }

    fn is_visible(&self) -> bool {
        self.inner.is_visible()
    }
}

#[allow(dead_code)]
pub(crate) fn globe_at(x: f32, y: f32, z: f32) -> SharedTransform {
    let mut globe = Transform::new();
    globe.position = [x, y, z].into();
    globe.shared()
}

#[allow(dead_code)]
pub(crate) fn spec(name: &str, latitude: f32, longitude: f32) -> PointSpec {
    PointSpec::new(name, format!("about {}", name), latitude, longitude)
}

/// A controller over a globe at the default position with the given points.
#[allow(dead_code)]
pub(crate) fn interaction_with(
    specs: &[PointSpec],
    panel: Rc<dyn InfoPanel>,
) -> GlobeInteraction {
    let config = GlobeConfig::default();
    let globe = globe_at(
        config.globe_position.x,
        config.globe_position.y,
        config.globe_position.z,
    );
    let mut interaction = GlobeInteraction::new(globe.clone(), &config);
    for spec in specs {
        interaction.push_point(PointOfInterest::new(
            spec,
            &globe,
            panel.clone(),
            &config,
            identity_camera(),
        ));
    }
    interaction
}

/// Angle between two rotations, in radians.
#[allow(dead_code)]
pub(crate) fn angle_between(a: cgmath::Quaternion<f32>, b: cgmath::Quaternion<f32>) -> f32 {
    use cgmath::InnerSpace;
    let dot = a.normalize().dot(b.normalize()).abs().min(1.0);
    2.0 * dot.acos()
}
