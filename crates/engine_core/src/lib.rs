//! Core types and utilities shared across the Skylift simulation crates:
//! - Transform and raw instance data for the render sink
//! - Fixed-timestep simulation clock
//! - The per-tick control-intent snapshot

pub mod controls;
pub mod time;
pub mod transform;

pub use controls::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used math types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
