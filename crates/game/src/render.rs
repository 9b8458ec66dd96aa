//! Render sink: the per-tick output a presentation layer consumes.
//!
//! This is the simulation core's only output. Nothing here draws; a renderer
//! takes the transforms (or the raw instance matrices) and spans one
//! unit-length primitive per rope pair, plus the carrier pose.

use engine_core::{Transform, TransformRaw, Vec3};
use physics::CarrierBody;

/// Carrier visual state for one tick.
#[derive(Debug, Clone, Copy)]
pub struct CarrierPose {
    pub position: Vec3,
    /// Bank angle, radians.
    pub roll: f32,
    /// Nose angle, radians.
    pub pitch: f32,
    /// Rotor spin angle, radians.
    pub rotor_angle: f32,
}

/// One rope's visual state for one tick.
#[derive(Debug, Clone)]
pub struct RopeDraw {
    /// Midpoint pose and length scale per adjacent segment pair.
    pub segments: Vec<Transform>,
    pub hook_position: Vec3,
    /// Planar swing of the hook, radians.
    pub hook_angle: f32,
}

/// Everything the presentation layer needs for one tick.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub carrier: CarrierPose,
    pub ropes: Vec<RopeDraw>,
}

impl RenderFrame {
    /// Snapshot the carrier and both ropes after a simulation tick.
    pub fn capture(carrier: &CarrierBody) -> Self {
        Self {
            carrier: CarrierPose {
                position: carrier.position,
                roll: carrier.current_roll,
                pitch: carrier.current_pitch,
                rotor_angle: carrier.rotor_angle,
            },
            ropes: carrier
                .winches
                .iter()
                .map(|winch| RopeDraw {
                    segments: winch.rope.segment_transforms(),
                    hook_position: winch.rope.hook_position(),
                    hook_angle: winch.rope.hook_angle(),
                })
                .collect(),
        }
    }

    /// Flattened instance matrices for all rope segments, ready for upload.
    pub fn rope_instances(&self) -> Vec<TransformRaw> {
        self.ropes
            .iter()
            .flat_map(|rope| rope.segments.iter().map(TransformRaw::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Controls;
    use physics::{CarrierConfig, CollisionIndex};

    #[test]
    fn frame_covers_both_ropes() {
        let index = CollisionIndex::new();
        let config = CarrierConfig::default();
        let pairs = config.rope.segment_count - 1;
        let mut carrier = CarrierBody::new(config, Vec3::new(0.0, 10.0, 0.0));
        carrier.update(&Controls::default(), &index);

        let frame = RenderFrame::capture(&carrier);
        assert_eq!(frame.ropes.len(), 2);
        for rope in &frame.ropes {
            assert_eq!(rope.segments.len(), pairs);
        }
        assert_eq!(frame.rope_instances().len(), 2 * pairs);
    }

    #[test]
    fn frame_reflects_carrier_state() {
        let index = CollisionIndex::new();
        let mut carrier = CarrierBody::new(CarrierConfig::default(), Vec3::new(3.0, 12.0, 0.0));
        let push = Controls {
            right: true,
            ..Default::default()
        };
        for _ in 0..60 {
            carrier.update(&push, &index);
        }
        let frame = RenderFrame::capture(&carrier);
        assert_eq!(frame.carrier.position, carrier.position);
        assert_eq!(frame.carrier.roll, carrier.current_roll);
        assert_eq!(frame.carrier.rotor_angle, carrier.rotor_angle);
    }
}
