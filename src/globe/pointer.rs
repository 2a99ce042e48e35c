//! Pointer input translated into drag events.
//!
//! The left button arrives through window events, and a window only sees them while it
//! has focus and the cursor. A release outside of that is never delivered, so the
//! pressed state is dropped as soon as focus or the cursor leaves. The next raw motion
//! then reports no pressed buttons and ends the drag.

use cgmath::Vector2;
use winit::event::ElementState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start,
    Move {
        movement: Vector2<f32>,
        buttons_pressed: bool,
    },
    End,
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    left_pressed: bool,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self) -> bool {
        self.left_pressed
    }

    pub fn left_button(&mut self, state: ElementState) -> DragEvent {
        self.left_pressed = state.is_pressed();
        if self.left_pressed {
            DragEvent::Start
        } else {
            DragEvent::End
        }
    }

    /// Raw mouse motion in pixels.
    pub fn motion(&self, (dx, dy): (f64, f64)) -> DragEvent {
        DragEvent::Move {
            movement: Vector2::new(dx as f32, dy as f32),
            buttons_pressed: self.left_pressed,
        }
    }

    /// Focus or cursor left the window; a release from here on goes unseen.
    pub fn release_unobserved(&mut self) {
        if self.left_pressed {
            log::debug!("pointer left the window with the button held");
        }
        self.left_pressed = false;
    }
}
