//! Winch rope simulation: a constrained particle chain with a dynamic rest
//! length.
//!
//! Each rope is an ordered chain of point masses. Segment 0 is pinned to the
//! winch anchor every tick (a hard constraint, not a force); the terminal
//! segment is the hook. Motion is explicit velocity integration with
//! exponential damping, inextensibility comes from iterated Gauss-Seidel
//! distance relaxation over stretched adjacent pairs (slack rope drapes
//! freely). More iterations means a stiffer looking rope. All constants are
//! per tick at the nominal 60 Hz step.

use engine_core::{Quat, Transform, Vec3};

use crate::surfaces::CollisionIndex;

/// Height above the hook from which its ground ray is cast.
const HOOK_RAY_LIFT: f32 = 0.5;

/// Tunable constants for one rope chain.
///
/// The default is the stiff, collision-aware tuning; [`RopeConfig::soft`]
/// gives the loose drape variant.
#[derive(Debug, Clone)]
pub struct RopeConfig {
    /// Number of point masses in the chain, hook included. Never resized.
    pub segment_count: usize,
    /// Shortest allowed rest length.
    pub min_length: f32,
    /// Longest allowed rest length.
    pub max_length: f32,
    /// Maximum change of both target and current length per tick.
    pub extend_speed: f32,
    /// Downward velocity gain per tick.
    pub gravity: f32,
    /// Exponential velocity damping per tick.
    pub damping: f32,
    /// Gauss-Seidel relaxation passes per tick.
    pub constraint_iterations: usize,
    /// Fraction of the carrier's velocity injected into the hook each tick.
    pub hook_momentum_transfer: f32,
    /// Vertical velocity reflection factor when the hook lands.
    pub bounce: f32,
    /// Horizontal velocity retention when the hook lands.
    pub friction: f32,
    /// Height the hook rests above a surface it collided with.
    pub hook_clearance: f32,
    /// Whether the hook collides with in-plane surfaces at all.
    pub hook_collision: bool,
}

impl Default for RopeConfig {
    fn default() -> Self {
        Self {
            segment_count: 15,
            min_length: 2.0,
            max_length: 14.0,
            extend_speed: 0.06,
            gravity: 0.015,
            damping: 0.98,
            constraint_iterations: 20,
            hook_momentum_transfer: 0.02,
            bounce: 0.4,
            friction: 0.85,
            hook_clearance: 0.25,
            hook_collision: true,
        }
    }
}

impl RopeConfig {
    /// Loose, non-colliding drape: fewer relaxation passes, gentler gravity.
    pub fn soft() -> Self {
        Self {
            gravity: 0.01,
            damping: 0.96,
            constraint_iterations: 3,
            hook_collision: false,
            ..Default::default()
        }
    }
}

/// One point mass in the chain.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub position: Vec3,
    /// Position before this tick's integration. Bookkeeping only; kept so a
    /// position-based integrator can be swapped in without a data change.
    pub prev_position: Vec3,
    pub velocity: Vec3,
}

impl Segment {
    fn at(position: Vec3) -> Self {
        Self {
            position,
            prev_position: position,
            velocity: Vec3::ZERO,
        }
    }
}

/// A single winch line: the particle chain plus its length state.
#[derive(Debug, Clone)]
pub struct RopeChain {
    config: RopeConfig,
    segments: Vec<Segment>,
    current_length: f32,
    target_length: f32,
}

impl RopeChain {
    /// Create a rope fully wound in at the anchor point.
    pub fn new(config: RopeConfig, anchor: Vec3) -> Self {
        let count = config.segment_count.max(2);
        let min_length = config.min_length;
        Self {
            segments: vec![Segment::at(anchor); count],
            current_length: min_length,
            target_length: min_length,
            config,
        }
    }

    /// Advance the rope one tick.
    ///
    /// `carrier_velocity` must be the carrier's velocity from before its own
    /// update this tick, so winch coupling never feeds back within a tick.
    pub fn update(&mut self, anchor: Vec3, carrier_velocity: Vec3, surfaces: &CollisionIndex) {
        // 1. Ramp current length toward the target.
        let step = (self.target_length - self.current_length)
            .clamp(-self.config.extend_speed, self.config.extend_speed);
        self.current_length =
            (self.current_length + step).clamp(self.config.min_length, self.config.max_length);

        // 2. Pin the head to the anchor.
        self.segments[0].position = anchor;

        // 3. Integrate the free segments.
        let last = self.segments.len() - 1;
        for i in 1..=last {
            let segment = &mut self.segments[i];
            segment.prev_position = segment.position;
            segment.velocity.y -= self.config.gravity;
            if i == last {
                segment.velocity += carrier_velocity * self.config.hook_momentum_transfer;
            }
            segment.position += segment.velocity;
            segment.velocity *= self.config.damping;
        }

        // 4. Hook ground collision.
        let floor = if self.config.hook_collision {
            self.resolve_hook_collision(surfaces)
        } else {
            None
        };

        // 5. Distance-constraint relaxation. Fold the net constraint
        // displacement back into velocity afterwards, so a taut rope settles
        // instead of accumulating speed against the constraints every tick.
        let pre_relax: Vec<Vec3> = self.segments.iter().map(|s| s.position).collect();
        self.relax();
        for (segment, before) in self.segments.iter_mut().zip(&pre_relax).skip(1) {
            segment.velocity += segment.position - *before;
        }

        // Relaxation of an over-length rope can push the hook back under the
        // sensed floor; restore the position clamp (velocity response already
        // happened in step 4).
        if let Some(floor) = floor {
            let hook = &mut self.segments[last];
            if hook.position.y < floor {
                hook.position.y = floor;
            }
        }
    }

    /// Raise the target length by one extend step. Returns whether the target
    /// actually changed (false once at the maximum).
    pub fn extend(&mut self) -> bool {
        let next = (self.target_length + self.config.extend_speed).min(self.config.max_length);
        if next == self.target_length {
            return false;
        }
        self.target_length = next;
        true
    }

    /// Lower the target length by one extend step. Returns whether the target
    /// actually changed (false once at the minimum).
    pub fn retract(&mut self) -> bool {
        let next = (self.target_length - self.config.extend_speed).max(self.config.min_length);
        if next == self.target_length {
            return false;
        }
        self.target_length = next;
        true
    }

    /// Per-pair render transforms: midpoint pose, orientation along the pair,
    /// and a Y scale equal to the pair's actual distance, so one unit-length
    /// primitive per pair spans a possibly nonuniform gap.
    pub fn segment_transforms(&self) -> Vec<Transform> {
        let mut transforms = Vec::with_capacity(self.segments.len() - 1);
        for pair in self.segments.windows(2) {
            let a = pair[0].position;
            let b = pair[1].position;
            let delta = b - a;
            let distance = delta.length();
            let rotation = if distance > f32::EPSILON {
                Quat::from_rotation_arc(Vec3::Y, delta / distance)
            } else {
                Quat::IDENTITY
            };
            transforms.push(Transform {
                position: (a + b) * 0.5,
                rotation,
                scale: Vec3::new(1.0, distance, 1.0),
            });
        }
        transforms
    }

    /// Planar swing angle of the hook, from the direction of the last pair.
    /// Zero when the rope hangs straight down.
    pub fn hook_angle(&self) -> f32 {
        let last = self.segments.len() - 1;
        let delta = self.segments[last].position - self.segments[last - 1].position;
        if delta.length_squared() <= f32::EPSILON {
            0.0
        } else {
            delta.x.atan2(-delta.y)
        }
    }

    /// World position of the hook (terminal segment).
    pub fn hook_position(&self) -> Vec3 {
        self.segments[self.segments.len() - 1].position
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn current_length(&self) -> f32 {
        self.current_length
    }

    pub fn target_length(&self) -> f32 {
        self.target_length
    }

    pub fn config(&self) -> &RopeConfig {
        &self.config
    }

    /// Rest distance between adjacent segments at the current length.
    pub fn rest_distance(&self) -> f32 {
        self.current_length / (self.segments.len() - 1) as f32
    }

    /// Clamp the hook against the nearest surface below it. Returns the
    /// sensed floor height (surface plus clearance) when a surface was found.
    fn resolve_hook_collision(&mut self, surfaces: &CollisionIndex) -> Option<f32> {
        let last = self.segments.len() - 1;
        let origin = self.segments[last].position + Vec3::Y * HOOK_RAY_LIFT;
        // First qualifying hit only; no multi-surface resolution.
        let hit = surfaces.nearest_surface_below(origin)?;
        let floor = hit.point.y + self.config.hook_clearance;
        let hook = &mut self.segments[last];
        if hook.position.y < floor {
            hook.position.y = floor;
            if hook.velocity.y < 0.0 {
                hook.velocity.y = -hook.velocity.y * self.config.bounce;
                hook.velocity.x *= self.config.friction;
                hook.velocity.z *= self.config.friction;
            }
        }
        Some(floor)
    }

    fn relax(&mut self) {
        let rest = self.rest_distance();
        let last = self.segments.len() - 1;
        for _ in 0..self.config.constraint_iterations {
            for i in 0..last {
                let delta = self.segments[i + 1].position - self.segments[i].position;
                let distance = delta.length();
                // Rope resists stretch, not compression: slack pairs are left
                // alone (which also guards the zero-length normalize).
                if distance <= rest {
                    continue;
                }
                let correction = delta * ((distance - rest) / distance);
                if i == 0 {
                    // The anchor never moves; the whole correction goes tailward.
                    self.segments[1].position -= correction;
                } else {
                    self.segments[i].position += correction * 0.5;
                    self.segments[i + 1].position -= correction * 0.5;
                }
            }
        }
    }
}
