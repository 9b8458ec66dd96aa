//! Per-tick control-intent snapshot consumed by the simulation core.

/// Flat set of boolean intents sampled once per fixed step.
///
/// Produced by the input layer; the simulation only ever reads it. Flight
/// intents drive the carrier body, the two extend/retract pairs drive the
/// winches independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    /// Move the carrier toward negative X.
    pub left: bool,
    /// Move the carrier toward positive X.
    pub right: bool,
    /// Raise the carrier's target height.
    pub ascend: bool,
    /// Lower the carrier's target height.
    pub descend: bool,
    /// Pay out the left winch line.
    pub left_extend: bool,
    /// Reel in the left winch line.
    pub left_retract: bool,
    /// Pay out the right winch line.
    pub right_extend: bool,
    /// Reel in the right winch line.
    pub right_retract: bool,
}
