//! Points of interest pinned to the globe by latitude and longitude.

use std::{
    cell::Cell,
    f32::consts::{FRAC_PI_2, PI},
    ops::Deref,
    rc::Rc,
};

use cgmath::{Matrix4, Quaternion, Rad, Rotation, Rotation3, SquareMatrix, Vector2, Vector3};

use crate::{
    data_structures::{
        entity::{Component, Entity},
        transform::{SharedTransform, Transform},
    },
    globe::{
        config::{GlobeConfig, PointSpec},
        panel::InfoPanel,
    },
};

/// Projection and view matrices shared by every point for its screen position.
pub type CameraMatrices = Rc<Cell<(Matrix4<f32>, Matrix4<f32>)>>;

pub fn camera_matrices(projection: Matrix4<f32>, view: Matrix4<f32>) -> CameraMatrices {
    Rc::new(Cell::new((projection, view)))
}

/// Surface position and outward-facing rotation for polar coordinates in degrees.
///
/// Longitude turns about the globe's vertical axis, then latitude about its depth axis,
/// starting from the point `radius` units up. The facing rotation adds a -90° turn about
/// the local x axis so a quad lies flat on the surface.
pub fn polar_to_surface(
    latitude: f32,
    longitude: f32,
    radius: f32,
) -> (Vector3<f32>, Quaternion<f32>) {
    let coords = Quaternion::from_angle_y(Rad(longitude / 180.0 * PI - PI))
        * Quaternion::from_angle_z(Rad((-latitude + 90.0) / 180.0 * PI));
    let position = coords.rotate_vector(Vector3::new(0.0, radius, 0.0));
    let rotation = coords * Quaternion::from_angle_x(Rad(-FRAC_PI_2));
    (position, rotation)
}

pub struct PointOfInterest {
    entity: Rc<Entity>,
    transform: SharedTransform,
    polar_coords: Vector2<f32>,
    radius: f32,
    pub name: String,
    pub text: String,
    panel: Rc<dyn InfoPanel>,
    screen_position: Rc<Cell<Vector2<f32>>>,
}

impl PointOfInterest {
    /// A point parented to `parent`, placed at its configured coordinates.
    ///
    /// Its transform refreshes the point's screen position every frame from `camera`.
    pub fn new(
        spec: &PointSpec,
        parent: &SharedTransform,
        panel: Rc<dyn InfoPanel>,
        config: &GlobeConfig,
        camera: CameraMatrices,
    ) -> Self {
        let screen_position = Rc::new(Cell::new(Vector2::new(0.0, 0.0)));

        let mut transform = Transform::new();
        transform.scale = Vector3::new(config.point_scale, config.point_scale, config.point_scale);
        transform.set_parent(parent);
        let screen = screen_position.clone();
        transform.set_on_update(move |_, entity| {
            if let Some(transform) = entity.transform() {
                let (projection, view) = camera.get();
                screen.set(transform.borrow().screen_position(&projection, &view));
            }
        });
        let transform = transform.shared();

        let mut entity = Entity::new(spec.name.clone());
        entity.add_component(transform.clone());

        let mut point = Self {
            entity: Rc::new(entity),
            transform,
            polar_coords: Vector2::new(0.0, 0.0),
            radius: config.surface_radius,
            name: spec.name.clone(),
            text: spec.text.clone(),
            panel,
            screen_position,
        };
        point.set_polar_coords(Vector2::new(spec.latitude, spec.longitude));
        point
    }

    /// Puts `component` into the point's entity. Only possible before the entity is
    /// shared with a scene.
    pub fn add_component(
        &mut self,
        component: impl Into<Component>,
    ) -> anyhow::Result<Option<Component>> {
        match Rc::get_mut(&mut self.entity) {
            Some(entity) => Ok(entity.add_component(component)),
            None => anyhow::bail!("{} is already shared with a scene", self.name),
        }
    }

    pub fn entity(&self) -> Rc<Entity> {
        self.entity.clone()
    }

    pub fn transform(&self) -> &SharedTransform {
        &self.transform
    }

    /// (latitude, longitude) in degrees.
    pub fn polar_coords(&self) -> Vector2<f32> {
        self.polar_coords
    }

    /// Moves the point. Position and rotation are updated right away.
    pub fn set_polar_coords(&mut self, polar_coords: Vector2<f32>) {
        self.polar_coords = polar_coords;
        let (position, rotation) = polar_to_surface(polar_coords.x, polar_coords.y, self.radius);
        let mut transform = self.transform.borrow_mut();
        transform.position = position;
        transform.rotation = rotation;
    }

    pub fn world_position(&self) -> Vector3<f32> {
        self.transform.borrow().world_position()
    }

    /// Normalized screen position as of the last frame's update.
    pub fn screen_position(&self) -> Vector2<f32> {
        self.screen_position.get()
    }

    pub fn show_location_data_panel(&self) {
        self.panel.show(&self.name, &self.text);
    }

    pub fn hide_location_data_panel(&self) {
        if self.panel.is_visible() {
            self.panel.hide();
        }
    }
}

impl Deref for PointOfInterest {
    type Target = Entity;

    fn deref(&self) -> &Self::Target {
        &self.entity
    }
}

impl std::fmt::Debug for PointOfInterest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointOfInterest")
            .field("name", &self.name)
            .field("polar_coords", &self.polar_coords)
            .field("transform", &self.transform)
            .finish()
    }
}

/// Identity projection and view, for points that are never drawn.
pub fn identity_camera() -> CameraMatrices {
    camera_matrices(Matrix4::identity(), Matrix4::identity())
}
