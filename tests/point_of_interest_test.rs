mod common;

use std::rc::Rc;

use cgmath::{
    InnerSpace, Matrix4, Rotation, SquareMatrix, Vector2, Vector3, assert_abs_diff_eq,
};
use events_globe::{
    GlobeConfig,
    data_structures::transform::Transform,
    globe::{
        panel::{HeadlessPanel, InfoPanel, PanelState},
        point_of_interest::{PointOfInterest, camera_matrices, identity_camera, polar_to_surface},
    },
};

use crate::common::test_utils::{RecordingPanel, globe_at, spec};

#[test]
fn equator_prime_meridian_sits_on_positive_x() {
    let (position, rotation) = polar_to_surface(0.0, 0.0, 1.005);
    assert_abs_diff_eq!(position, Vector3::new(1.005, 0.0, 0.0), epsilon = 1e-5);
    // The quad's +z normal points away from the globe.
    assert_abs_diff_eq!(
        rotation.rotate_vector(Vector3::unit_z()),
        Vector3::new(1.0, 0.0, 0.0),
        epsilon = 1e-5
    );
}

#[test]
fn north_pole_ignores_longitude() {
    for longitude in [0.0, -0.0, 45.0, -120.0, 180.0] {
        let (position, _) = polar_to_surface(90.0, longitude, 1.005);
        assert_abs_diff_eq!(position, Vector3::new(0.0, 1.005, 0.0), epsilon = 1e-5);
    }
}

#[test]
fn minus_ninety_longitude_faces_the_viewer() {
    let (position, _) = polar_to_surface(0.0, -90.0, 1.005);
    assert_abs_diff_eq!(position, Vector3::new(0.0, 0.0, 1.005), epsilon = 1e-5);
}

#[test]
fn every_point_faces_outward_at_surface_radius() {
    for (latitude, longitude) in [(40.4167, -3.70325), (-30.559482, 22.937506), (40.6643, -73.9385)] {
        let (position, rotation) = polar_to_surface(latitude, longitude, 1.005);
        assert_abs_diff_eq!(position.magnitude(), 1.005, epsilon = 1e-5);
        assert_abs_diff_eq!(
            rotation.rotate_vector(Vector3::unit_z()),
            position.normalize(),
            epsilon = 1e-5
        );
    }
}

#[test]
fn point_follows_globe_and_moves_immediately() {
    let config = GlobeConfig::default();
    let globe = globe_at(0.0, 0.0, -2.5);
    let panel: Rc<dyn InfoPanel> = Rc::new(HeadlessPanel::new());
    let mut point = PointOfInterest::new(&spec("zero", 0.0, 0.0), &globe, panel, &config, identity_camera());

    assert_eq!(point.polar_coords(), Vector2::new(0.0, 0.0));
    assert_abs_diff_eq!(point.world_position(), Vector3::new(1.005, 0.0, -2.5), epsilon = 1e-5);
    assert_abs_diff_eq!(
        point.transform().borrow().scale,
        Vector3::new(0.04, 0.04, 0.04),
        epsilon = 1e-6
    );

    point.set_polar_coords(Vector2::new(90.0, 10.0));
    assert_abs_diff_eq!(point.world_position(), Vector3::new(0.0, 1.005, -2.5), epsilon = 1e-5);
}

#[test]
fn update_refreshes_the_screen_position() {
    let config = GlobeConfig::default();
    let globe = Transform::new().shared();
    let panel: Rc<dyn InfoPanel> = Rc::new(HeadlessPanel::new());
    let camera = camera_matrices(Matrix4::identity(), Matrix4::identity());
    let point = PointOfInterest::new(&spec("front", 0.0, -90.0), &globe, panel, &config, camera.clone());

    assert_eq!(point.screen_position(), Vector2::new(0.0, 0.0));
    point.update(0.016);
    assert_abs_diff_eq!(point.screen_position(), Vector2::new(0.5, 0.5), epsilon = 1e-5);

    camera.set((Matrix4::from_translation(Vector3::new(0.5, 0.0, 0.0)), Matrix4::identity()));
    point.update(0.016);
    assert_abs_diff_eq!(point.screen_position(), Vector2::new(0.75, 0.5), epsilon = 1e-5);
}

#[test]
fn show_fills_the_panel_and_hide_is_idempotent() {
    let config = GlobeConfig::default();
    let globe = globe_at(0.0, 0.0, -2.5);
    let panel = RecordingPanel::new();
    let point = PointOfInterest::new(&spec("Madrid Hackathon", 40.4167, -3.70325), &globe, panel.clone(), &config, identity_camera());

    // Hiding a hidden panel does not reach the panel at all.
    point.hide_location_data_panel();
    assert!(panel.calls().is_empty());

    point.show_location_data_panel();
    assert!(panel.is_visible());
    assert_eq!(panel.title(), "Madrid Hackathon");
    assert_eq!(panel.text(), "about Madrid Hackathon");

    point.hide_location_data_panel();
    point.hide_location_data_panel();
    assert!(!panel.is_visible());
    assert_eq!(panel.calls(), vec!["show Madrid Hackathon", "hide"]);
}

#[test]
fn headless_hide_on_hidden_panel_changes_nothing() {
    let panel = HeadlessPanel::new();
    panel.hide();
    assert_eq!(panel.state(), PanelState::default());

    panel.show("title", "text");
    panel.hide();
    let hidden = panel.state();
    panel.hide();
    assert_eq!(panel.state(), hidden);
    assert_eq!(
        hidden,
        PanelState {
            visible: false,
            title: "title".to_string(),
            text: "text".to_string(),
        }
    );
}
