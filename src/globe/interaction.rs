//! Drag-to-rotate, delayed recentering and highlighting of the point facing the viewer.
//!
//! The globe eases toward a target orientation, stored as `(pitch, yaw)` in radians.
//! Dragging moves the target directly; when a drag ends, a timer is armed and on expiry
//! the target snaps to the point closest to the globe's front. The visible rotation
//! always follows the target through a slerp, never jumps.
//!
//! ```text
//!            drag start                drag end
//!   Idle ─────────────────▶ Dragging ───────────▶ PendingRecenter
//!    ▲                        ▲                         │ │
//!    │                        └──── drag start ─────────┘ │
//!    └──────────── deadline passed: recenter ─────────────┘
//! ```

use cgmath::{InnerSpace, MetricSpace, Quaternion, Rad, Rotation3, Vector2, Vector3};
use instant::{Duration, Instant};

use crate::{
    data_structures::transform::SharedTransform,
    globe::{config::GlobeConfig, point_of_interest::PointOfInterest, pointer::DragEvent},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging,
    PendingRecenter { deadline: Instant },
}

/// Index of the position closest to `reference`, compared by squared distance.
///
/// With `max_distance` set, the closest position only counts when it lies within that
/// distance. Equal distances resolve to the earliest position.
pub fn nearest_point<I>(positions: I, reference: Vector3<f32>, max_distance: Option<f32>) -> Option<usize>
where
    I: IntoIterator<Item = Vector3<f32>>,
{
    let (index, min_distance) = positions
        .into_iter()
        .map(|position| position.distance2(reference))
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (index, distance)| match best {
            Some((_, min)) if distance >= min => best,
            _ => Some((index, distance)),
        })?;
    match max_distance {
        Some(max) if min_distance > max * max => None,
        _ => Some(index),
    }
}

/// Target angles that turn the given polar coordinates (degrees) toward the viewer.
pub fn recenter_target(polar_coords: Vector2<f32>) -> Vector2<f32> {
    Vector2::new(
        polar_coords.x.to_radians(),
        (-polar_coords.y - 90.0).to_radians(),
    )
}

pub fn target_rotation(target: Vector2<f32>) -> Quaternion<f32> {
    Quaternion::from_angle_x(Rad(target.x)) * Quaternion::from_angle_y(Rad(target.y))
}

pub struct GlobeInteraction {
    state: DragState,
    target: Vector2<f32>,
    globe: SharedTransform,
    points: Vec<PointOfInterest>,
    active_point: Option<usize>,
    drag_sensitivity: f32,
    pitch_limit: f32,
    recenter_delay: Duration,
    drag_speed: f32,
    idle_speed: f32,
    surface_radius: f32,
    highlight_radius: f32,
}

impl GlobeInteraction {
    pub fn new(globe: SharedTransform, config: &GlobeConfig) -> Self {
        Self {
            state: DragState::Idle,
            target: Vector2::new(0.0, 0.0),
            globe,
            points: Vec::new(),
            active_point: None,
            drag_sensitivity: config.drag_sensitivity,
            pitch_limit: config.pitch_limit,
            recenter_delay: config.recenter_delay,
            drag_speed: config.drag_speed,
            idle_speed: config.idle_speed,
            surface_radius: config.surface_radius,
            highlight_radius: config.highlight_radius,
        }
    }

    pub fn push_point(&mut self, point: PointOfInterest) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[PointOfInterest] {
        &self.points
    }

    pub fn globe(&self) -> &SharedTransform {
        &self.globe
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    /// `(pitch, yaw)` in radians.
    pub fn target(&self) -> Vector2<f32> {
        self.target
    }

    pub fn set_target(&mut self, target: Vector2<f32>) {
        self.target = target;
    }

    pub fn active_point(&self) -> Option<&PointOfInterest> {
        self.active_point.and_then(|index| self.points.get(index))
    }

    /// Starts a drag, discarding any pending recenter.
    pub fn on_drag_start(&mut self) {
        if let DragState::PendingRecenter { .. } = self.state {
            log::debug!("drag started, pending recenter cancelled");
        }
        self.state = DragState::Dragging;
    }

    /// Applies pointer `movement` (x right, y down, in pixels) to the target.
    ///
    /// Vertical movement pitches, horizontal movement yaws. A drag that reports no
    /// pressed buttons has missed its release and ends here.
    pub fn on_drag(&mut self, movement: Vector2<f32>, buttons_pressed: bool, now: Instant) {
        if !self.is_dragging() {
            return;
        }
        if !buttons_pressed {
            self.on_drag_end(now);
            return;
        }
        self.target += Vector2::new(movement.y, movement.x) * self.drag_sensitivity;
        self.target.x = self.target.x.clamp(-self.pitch_limit, self.pitch_limit);
    }

    /// Ends a drag and arms a fresh recenter timer.
    pub fn on_drag_end(&mut self, now: Instant) {
        if !self.is_dragging() {
            return;
        }
        self.state = DragState::PendingRecenter {
            deadline: now + self.recenter_delay,
        };
    }

    pub fn handle(&mut self, event: DragEvent, now: Instant) {
        match event {
            DragEvent::Start => self.on_drag_start(),
            DragEvent::Move {
                movement,
                buttons_pressed,
            } => self.on_drag(movement, buttons_pressed, now),
            DragEvent::End => self.on_drag_end(now),
        }
    }

    /// Fires the recenter timer once its deadline has passed. Returns whether it fired.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        match self.state {
            DragState::PendingRecenter { deadline } if now >= deadline => {
                self.state = DragState::Idle;
                self.recenter();
                true
            }
            _ => false,
        }
    }

    /// Per-frame step: ease the globe toward the target, then refresh the highlight.
    pub fn update(&mut self, delta_time: f32) {
        self.update_rotation(delta_time);
        self.update_highlight();
    }

    pub fn update_rotation(&mut self, delta_time: f32) {
        let speed = if self.is_dragging() {
            self.drag_speed
        } else {
            self.idle_speed
        };
        let amount = (speed * delta_time).clamp(0.0, 1.0);
        let target = target_rotation(self.target);
        let mut globe = self.globe.borrow_mut();
        globe.rotation = globe.rotation.slerp(target, amount).normalize();
    }

    /// Hides the previous point's panel and shows the panel of the point now within
    /// the highlight radius, if any.
    pub fn update_highlight(&mut self) {
        if let Some(point) = self.active_point() {
            point.hide_location_data_panel();
        }
        self.active_point = self.find_most_centered_point(Some(self.highlight_radius));
        if let Some(point) = self.active_point() {
            point.show_location_data_panel();
        }
    }

    /// The point the globe's front is closest to, in world space.
    pub fn front_point(&self) -> Vector3<f32> {
        Vector3::new(0.0, 0.0, self.surface_radius) + self.globe.borrow().world_position()
    }

    pub fn find_most_centered_point(&self, max_distance: Option<f32>) -> Option<usize> {
        nearest_point(
            self.points.iter().map(PointOfInterest::world_position),
            self.front_point(),
            max_distance,
        )
    }

    /// Aims the target at the closest point. Does nothing without points.
    pub fn recenter(&mut self) {
        let Some(index) = self.find_most_centered_point(None) else {
            return;
        };
        let point = &self.points[index];
        log::debug!("recentering on {}", point.name);
        self.target = recenter_target(point.polar_coords());
    }
}
