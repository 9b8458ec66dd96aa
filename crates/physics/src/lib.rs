//! Winch and carrier physics for Skylift.
//!
//! The simulation core: a collidable-surface index answering downward-ray
//! queries, the rope chains hanging from the carrier's two winches, and the
//! carrier body integrator that drives them.

pub mod carrier;
pub mod rope;
pub mod surfaces;
pub mod winch;

pub use carrier::*;
pub use rope::*;
pub use surfaces::*;
pub use winch::*;

// Re-export Rapier for downstream crates
pub use rapier3d;
