//! Procedural scenery generation for Skylift.
//!
//! Emits placement data only; the game crate registers the footprints with
//! the collision index and a presentation layer draws the shapes.

pub mod scatter;

pub use scatter::*;
