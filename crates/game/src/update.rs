//! Frame advancement: drain fixed steps from the clock and tick the sim.

use crate::state::GameState;
use crate::render::RenderFrame;

/// Run one presentation frame: sample wall time, execute every due fixed
/// step, then clear the input edge state for the next batch of events.
pub fn frame(state: &mut GameState) {
    state.clock.frame();
    while state.clock.should_step() {
        fixed_step(state);
    }
    state.input.begin_frame();
}

/// One fixed simulation tick: controls snapshot, carrier (which updates both
/// ropes), then the render-sink capture.
pub fn fixed_step(state: &mut GameState) {
    let controls = state.input.controls();
    state.carrier.update(&controls, &state.surfaces);
    state.frame = RenderFrame::capture(&state.carrier);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use input::{ElementState, InputState, KeyCode};

    fn held(keys: &[KeyCode]) -> InputState {
        let mut input = InputState::new();
        for &key in keys {
            input.process_keyboard(key, ElementState::Pressed);
        }
        input
    }

    #[test]
    fn fixed_step_advances_carrier_and_frame() {
        let mut state = GameState::new(GameConfig::default());
        state.input = held(&[KeyCode::ArrowRight]);

        let start_x = state.carrier.position.x;
        for _ in 0..240 {
            fixed_step(&mut state);
        }
        assert!(state.carrier.position.x > start_x + 1.0);
        assert_eq!(state.frame.carrier.position, state.carrier.position);
    }

    #[test]
    fn winch_keys_drive_the_matching_rope() {
        let mut state = GameState::new(GameConfig::default());
        state.input = held(&[KeyCode::KeyQ]);

        let right_target = state.carrier.winches[1].rope.target_length();
        for _ in 0..120 {
            fixed_step(&mut state);
        }
        assert!(
            state.carrier.winches[0].rope.target_length()
                > state.carrier.winches[0].rope.config().min_length
        );
        assert_eq!(state.carrier.winches[1].rope.target_length(), right_target);
    }

    /// A short scripted sortie: fly right while lowering the left hook, then
    /// hold position. Exercises the whole per-tick pipeline end to end.
    #[test]
    fn scripted_flight_stays_well_formed() {
        let mut state = GameState::new(GameConfig {
            seed: 777,
            ..Default::default()
        });

        state.input = held(&[KeyCode::ArrowRight, KeyCode::KeyQ]);
        for _ in 0..600 {
            fixed_step(&mut state);
        }
        state.input = held(&[]);
        for _ in 0..300 {
            fixed_step(&mut state);
        }

        let min_height = state.carrier.config.min_height;
        assert!(state.carrier.position.y >= min_height - 1e-4);
        for winch in &state.carrier.winches {
            let rope = &winch.rope;
            let config = rope.config();
            assert!(rope.current_length() >= config.min_length - 1e-6);
            assert!(rope.current_length() <= config.max_length + 1e-6);
            for segment in rope.segments() {
                assert!(segment.position.is_finite());
                assert!(segment.velocity.is_finite());
            }
        }
        assert_eq!(state.frame.ropes.len(), 2);
    }
}
