//! The events globe built on the engine.
//!
//! - `config` holds the tuned constants and the default points
//! - `panel` is the information panel capability and its headless and DOM versions
//! - `point_of_interest` places points on the surface from latitude and longitude
//! - `interaction` is the drag, recenter and highlight controller
//! - `pointer` turns button and motion input into drag events
//! - `renderer` assembles scene, engine and controller into the running globe

pub mod config;
pub mod interaction;
pub mod panel;
pub mod point_of_interest;
pub mod pointer;
pub mod renderer;
