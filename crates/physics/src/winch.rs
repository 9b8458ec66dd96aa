//! Winch length control: boolean intents to a target-length ramp.

use crate::rope::RopeChain;

/// Discrete winch drive state. Extending and retracting are mutually
/// exclusive by construction; simultaneous intents resolve to extending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WinchState {
    #[default]
    Idle,
    Extending,
    Retracting,
}

/// Per-rope state machine turning control intents into target-length steps.
#[derive(Debug, Default)]
pub struct WinchController {
    state: WinchState,
}

impl WinchController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the drive state from this tick's intent pair.
    pub fn set_intents(&mut self, extend: bool, retract: bool) {
        self.state = match (extend, retract) {
            (true, _) => WinchState::Extending,
            (false, true) => WinchState::Retracting,
            (false, false) => WinchState::Idle,
        };
    }

    pub fn state(&self) -> WinchState {
        self.state
    }

    /// Step the rope's target length once according to the current state.
    pub fn apply(&self, rope: &mut RopeChain) {
        let changed = match self.state {
            WinchState::Extending => rope.extend(),
            WinchState::Retracting => rope.retract(),
            WinchState::Idle => false,
        };
        if changed {
            log::trace!(
                "winch {:?}: target length {:.2}",
                self.state,
                rope.target_length()
            );
        }
    }
}
