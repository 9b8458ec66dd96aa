//! Helicopter carrier body: a continuous integrator with saturating clamps.
//!
//! The carrier has no discrete states. Intents push accelerations, velocity
//! is damped and clamped per axis, and the only hard constraint is the ground
//! clearance floor. Roll and pitch are purely visual, derived from realized
//! motion and smoothed so they never snap. The carrier owns both winches and
//! feeds them their anchor points plus its pre-update velocity each tick.

use std::f32::consts::TAU;

use engine_core::{Controls, Quat, Transform, Vec3};

use crate::rope::{RopeChain, RopeConfig};
use crate::surfaces::CollisionIndex;
use crate::winch::WinchController;

/// Height above the carrier's center from which its ground ray is cast.
const GROUND_PROBE_LIFT: f32 = 0.5;

/// Tunable constants for the carrier. All rates are per tick at the nominal
/// 60 Hz step.
#[derive(Debug, Clone)]
pub struct CarrierConfig {
    /// Horizontal acceleration while a directional intent is held.
    pub accel: f32,
    /// Fraction of horizontal velocity opposed per tick when idle.
    pub idle_brake: f32,
    /// Exponential horizontal velocity damping per tick.
    pub horizontal_damping: f32,
    /// Exponential vertical velocity damping per tick.
    pub vertical_damping: f32,
    /// Horizontal speed clamp.
    pub max_horizontal_speed: f32,
    /// Vertical speed clamp.
    pub max_vertical_speed: f32,
    /// Minimum clearance kept above the locally sensed ground.
    pub min_height: f32,
    /// Target-height step per tick while an ascend/descend intent is held.
    pub height_change_speed: f32,
    /// Amplitude of the idle hover bob.
    pub hover_amplitude: f32,
    /// Phase advance of the hover bob per tick, in radians.
    pub hover_frequency: f32,
    /// Vertical acceleration per unit of gap to the effective target height.
    pub lift_gain: f32,
    /// Roll angle per unit of realized horizontal acceleration.
    pub roll_response: f32,
    /// Visual roll clamp, radians.
    pub max_roll: f32,
    /// Lerp factor moving the roll toward its target each tick.
    pub roll_smoothing: f32,
    /// Pitch angle per unit of vertical velocity.
    pub pitch_response: f32,
    /// Visual pitch clamp, radians.
    pub max_pitch: f32,
    /// Lerp factor moving the pitch toward its target each tick.
    pub pitch_smoothing: f32,
    /// Rotor spin per tick, radians. Cosmetic only.
    pub rotor_speed: f32,
    /// Local-space winch anchor offsets, left then right.
    pub winch_offsets: [Vec3; 2],
    /// Rope tuning shared by both winches.
    pub rope: RopeConfig,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            accel: 0.012,
            idle_brake: 0.06,
            horizontal_damping: 0.97,
            vertical_damping: 0.92,
            max_horizontal_speed: 0.35,
            max_vertical_speed: 0.25,
            min_height: 1.5,
            height_change_speed: 0.05,
            hover_amplitude: 0.15,
            hover_frequency: 0.04,
            lift_gain: 0.004,
            roll_response: 18.0,
            max_roll: 0.35,
            roll_smoothing: 0.1,
            pitch_response: 1.2,
            max_pitch: 0.25,
            pitch_smoothing: 0.08,
            rotor_speed: 0.9,
            winch_offsets: [Vec3::new(-0.9, -0.35, 0.0), Vec3::new(0.9, -0.35, 0.0)],
            rope: RopeConfig::default(),
        }
    }
}

/// One winch: its drive state machine plus the rope it controls.
#[derive(Debug)]
pub struct Winch {
    pub controller: WinchController,
    pub rope: RopeChain,
}

/// The helicopter body. One instance per game session.
#[derive(Debug)]
pub struct CarrierBody {
    pub config: CarrierConfig,
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    /// Commanded hover height, clamped to the sensed ground floor.
    pub target_height: f32,
    /// Smoothed visual roll, radians.
    pub current_roll: f32,
    /// Smoothed visual pitch, radians.
    pub current_pitch: f32,
    /// Rotor spin angle, radians. Cosmetic.
    pub rotor_angle: f32,
    hover_phase: f32,
    pub winches: [Winch; 2],
}

impl CarrierBody {
    /// Spawn the carrier at `position` with both ropes fully wound in.
    pub fn new(config: CarrierConfig, position: Vec3) -> Self {
        let pose = Transform::from_position(position);
        let winches = config.winch_offsets.map(|offset| Winch {
            controller: WinchController::new(),
            rope: RopeChain::new(config.rope.clone(), pose.transform_point(offset)),
        });
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            target_height: position.y,
            current_roll: 0.0,
            current_pitch: 0.0,
            rotor_angle: 0.0,
            hover_phase: 0.0,
            winches,
            config,
        }
    }

    /// Advance the carrier and both ropes one tick.
    pub fn update(&mut self, controls: &Controls, surfaces: &CollisionIndex) {
        // Ropes couple to the velocity from before this tick's update so
        // there is no feedback within the tick.
        let velocity_before = self.velocity;

        // Horizontal: intent sets a signed constant, idle brakes toward rest.
        self.acceleration.x = if controls.left {
            -self.config.accel
        } else if controls.right {
            self.config.accel
        } else {
            -self.velocity.x * self.config.idle_brake
        };

        // Vertical target stepping, floored at min clearance above ground.
        if controls.ascend {
            self.target_height += self.config.height_change_speed;
        }
        if controls.descend {
            self.target_height -= self.config.height_change_speed;
        }
        if let Some(floor) = self.sensed_floor(surfaces) {
            if self.target_height < floor {
                self.target_height = floor;
            }
        }

        // Idle bob on top of the commanded height.
        self.hover_phase = (self.hover_phase + self.config.hover_frequency) % TAU;
        let effective_target =
            self.target_height + self.config.hover_amplitude * self.hover_phase.sin();

        // Spring-like pull toward the effective target, not a true spring-mass
        // integration; damping below keeps it from ringing.
        self.acceleration.y = (effective_target - self.position.y) * self.config.lift_gain;

        self.velocity += self.acceleration;
        self.velocity.x *= self.config.horizontal_damping;
        self.velocity.y *= self.config.vertical_damping;
        self.velocity.x = self
            .velocity
            .x
            .clamp(-self.config.max_horizontal_speed, self.config.max_horizontal_speed);
        self.velocity.y = self
            .velocity
            .y
            .clamp(-self.config.max_vertical_speed, self.config.max_vertical_speed);
        self.position += self.velocity;

        // Ground non-penetration at the new position.
        if let Some(floor) = self.sensed_floor(surfaces) {
            if self.position.y < floor {
                self.position.y = floor;
                self.velocity.y = 0.0;
                if self.target_height < floor {
                    self.target_height = floor;
                }
            }
        }

        // Visual roll from realized horizontal acceleration, smoothed.
        let realized_accel = self.velocity.x - velocity_before.x;
        let target_roll =
            (-realized_accel * self.config.roll_response).clamp(-self.config.max_roll, self.config.max_roll);
        self.current_roll += (target_roll - self.current_roll) * self.config.roll_smoothing;

        // Visual pitch from vertical velocity, smoothed.
        let target_pitch = (self.velocity.y * self.config.pitch_response)
            .clamp(-self.config.max_pitch, self.config.max_pitch);
        self.current_pitch += (target_pitch - self.current_pitch) * self.config.pitch_smoothing;

        self.rotor_angle = (self.rotor_angle + self.config.rotor_speed) % TAU;

        // Winches last: state from intents, then one rope tick each with the
        // freshly derived anchor points.
        self.winches[0]
            .controller
            .set_intents(controls.left_extend, controls.left_retract);
        self.winches[1]
            .controller
            .set_intents(controls.right_extend, controls.right_retract);

        let pose = self.pose();
        for (winch, offset) in self.winches.iter_mut().zip(self.config.winch_offsets) {
            winch.controller.apply(&mut winch.rope);
            let anchor = pose.transform_point(offset);
            winch.rope.update(anchor, velocity_before, surfaces);
        }
    }

    /// Current world pose (position plus visual roll and pitch).
    pub fn pose(&self) -> Transform {
        Transform::from_position_rotation(
            self.position,
            Quat::from_rotation_z(self.current_roll) * Quat::from_rotation_x(self.current_pitch),
        )
    }

    fn sensed_floor(&self, surfaces: &CollisionIndex) -> Option<f32> {
        surfaces
            .nearest_surface_below(self.position + Vec3::Y * GROUND_PROBE_LIFT)
            .map(|hit| hit.point.y + self.config.min_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfaces::SurfaceLayer;

    fn flat_scene(ground_height: f32) -> CollisionIndex {
        let mut index = CollisionIndex::new();
        index.register_ground_plane(ground_height, &[SurfaceLayer::Ground]);
        index
    }

    fn still_air() -> Controls {
        Controls::default()
    }

    #[test]
    fn ascend_ticks_raise_target_height_linearly() {
        let index = flat_scene(0.0);
        let config = CarrierConfig::default();
        let step = config.height_change_speed;
        let mut carrier = CarrierBody::new(config, Vec3::new(0.0, 6.0, 0.0));
        let start = carrier.target_height;

        let controls = Controls {
            ascend: true,
            ..Default::default()
        };
        let ticks = 120;
        for _ in 0..ticks {
            carrier.update(&controls, &index);
        }
        assert!((carrier.target_height - (start + ticks as f32 * step)).abs() < 1e-4);
        // Actual height chases the target from below, never overtaking it.
        assert!(carrier.position.y > start);
        assert!(carrier.position.y < carrier.target_height);
    }

    #[test]
    fn carrier_settles_on_the_clearance_floor() {
        let index = flat_scene(0.0);
        let config = CarrierConfig {
            hover_amplitude: 0.0,
            ..Default::default()
        };
        let min_height = config.min_height;
        let mut carrier = CarrierBody::new(config, Vec3::new(0.0, 8.0, 0.0));

        let controls = Controls {
            descend: true,
            ..Default::default()
        };
        for _ in 0..4_000 {
            carrier.update(&controls, &index);
        }
        assert!((carrier.position.y - min_height).abs() < 1e-5);
        assert_eq!(carrier.velocity.y, 0.0);
        assert!((carrier.target_height - min_height).abs() < 1e-5);
    }

    #[test]
    fn carrier_never_penetrates_raised_ground() {
        let index = flat_scene(4.0);
        let config = CarrierConfig {
            hover_amplitude: 0.0,
            ..Default::default()
        };
        let min_height = config.min_height;
        let mut carrier = CarrierBody::new(config, Vec3::new(0.0, 20.0, 0.0));

        let controls = Controls {
            descend: true,
            ..Default::default()
        };
        for _ in 0..4_000 {
            carrier.update(&controls, &index);
            assert!(carrier.position.y >= 4.0 + min_height - 1e-4);
        }
    }

    #[test]
    fn idle_braking_brings_the_carrier_to_rest() {
        let index = flat_scene(0.0);
        let mut carrier = CarrierBody::new(CarrierConfig::default(), Vec3::new(0.0, 10.0, 0.0));

        let push_right = Controls {
            right: true,
            ..Default::default()
        };
        for _ in 0..120 {
            carrier.update(&push_right, &index);
        }
        assert!(carrier.velocity.x > 0.01);

        for _ in 0..600 {
            carrier.update(&still_air(), &index);
        }
        assert!(carrier.velocity.x.abs() < 1e-3);
    }

    #[test]
    fn horizontal_speed_is_clamped() {
        let index = flat_scene(0.0);
        let config = CarrierConfig::default();
        let max = config.max_horizontal_speed;
        let mut carrier = CarrierBody::new(config, Vec3::new(0.0, 10.0, 0.0));

        let push_right = Controls {
            right: true,
            ..Default::default()
        };
        for _ in 0..1_000 {
            carrier.update(&push_right, &index);
            assert!(carrier.velocity.x <= max + 1e-6);
        }
    }

    #[test]
    fn roll_stays_bounded_and_smooth() {
        let index = flat_scene(0.0);
        let config = CarrierConfig::default();
        let max_roll = config.max_roll;
        let mut carrier = CarrierBody::new(config, Vec3::new(0.0, 10.0, 0.0));

        let mut previous = carrier.current_roll;
        for tick in 0..400 {
            // Alternate hard left/right to provoke the worst-case bank.
            let controls = Controls {
                left: tick % 80 < 40,
                right: tick % 80 >= 40,
                ..Default::default()
            };
            carrier.update(&controls, &index);
            assert!(carrier.current_roll.abs() <= max_roll + 1e-6);
            // Smoothing: one tick never moves the roll by more than the
            // full gap times the lerp factor.
            assert!((carrier.current_roll - previous).abs() <= 2.0 * max_roll);
            previous = carrier.current_roll;
        }
    }

    #[test]
    fn ropes_follow_the_winch_anchors() {
        let index = flat_scene(0.0);
        let config = CarrierConfig::default();
        let offsets = config.winch_offsets;
        let mut carrier = CarrierBody::new(config, Vec3::new(0.0, 10.0, 0.0));

        let controls = Controls {
            right: true,
            left_extend: true,
            ..Default::default()
        };
        for _ in 0..200 {
            carrier.update(&controls, &index);
            let pose = carrier.pose();
            for (winch, offset) in carrier.winches.iter().zip(offsets) {
                let anchor = pose.transform_point(offset);
                assert!((winch.rope.segments()[0].position - anchor).length() < 1e-5);
            }
        }
        // Only the left winch was paying out line.
        assert!(carrier.winches[0].rope.target_length() > carrier.winches[1].rope.target_length());
    }

    #[test]
    fn rotor_angle_advances_and_wraps() {
        let index = flat_scene(0.0);
        let mut carrier = CarrierBody::new(CarrierConfig::default(), Vec3::new(0.0, 10.0, 0.0));
        for _ in 0..500 {
            carrier.update(&still_air(), &index);
            assert!((0.0..TAU).contains(&carrier.rotor_angle));
        }
    }
}
