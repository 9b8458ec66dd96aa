//! Scattered landscape scenery: trees and buildings along the flight strip.
//!
//! Placement is deterministic per seed. A Perlin density field thins the
//! scatter into natural-looking clumps and gaps instead of a uniform carpet.

use engine_core::Vec3;
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Placement parameters for one scattered level strip.
#[derive(Debug, Clone)]
pub struct ScatterConfig {
    pub seed: u64,
    /// The strip spans `[-world_half_extent, world_half_extent]` along X.
    pub world_half_extent: f32,
    pub tree_count: usize,
    pub building_count: usize,
    /// Radius around the origin kept free of scenery (carrier spawn).
    pub clear_radius: f32,
    /// Frequency of the Perlin density field along X.
    pub density_frequency: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world_half_extent: 80.0,
            tree_count: 30,
            building_count: 10,
            clear_radius: 6.0,
            density_frequency: 0.035,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneryKind {
    Tree,
    Building,
}

/// One placed scenery item. `position` is the center of its footprint box,
/// resting on the ground plane at y = 0.
#[derive(Debug, Clone, Copy)]
pub struct SceneryInstance {
    pub kind: SceneryKind,
    pub position: Vec3,
    pub half_extents: Vec3,
    pub rotation_y: f32,
}

/// Scatter trees and buildings across the strip. Deterministic for a given
/// config; placement failures (too crowded) are skipped, so the result may
/// hold fewer items than requested.
pub fn scatter(config: &ScatterConfig) -> Vec<SceneryInstance> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let density = Perlin::new(config.seed as u32);
    let mut placed: Vec<SceneryInstance> = Vec::new();

    place_kind(config, &mut rng, &density, &mut placed, SceneryKind::Building, config.building_count);
    place_kind(config, &mut rng, &density, &mut placed, SceneryKind::Tree, config.tree_count);

    log::info!(
        "scattered {} scenery items ({} requested) over ±{}",
        placed.len(),
        config.tree_count + config.building_count,
        config.world_half_extent
    );
    placed
}

fn place_kind(
    config: &ScatterConfig,
    rng: &mut StdRng,
    density: &Perlin,
    placed: &mut Vec<SceneryInstance>,
    kind: SceneryKind,
    count: usize,
) {
    // Bounded rejection sampling; give up on a slot after enough misses.
    let max_attempts = count.saturating_mul(20);
    let mut attempts = 0;
    let mut accepted = 0;

    while accepted < count && attempts < max_attempts {
        attempts += 1;
        let x = rng.gen_range(-config.world_half_extent..config.world_half_extent);
        if x.abs() < config.clear_radius {
            continue;
        }

        // Perlin density in [0,1]; sparse regions reject more candidates.
        let field = density.get([x as f64 * config.density_frequency, 0.5]);
        let keep_chance = 0.25 + 0.75 * ((field + 1.0) * 0.5);
        if rng.gen_range(0.0..1.0) > keep_chance {
            continue;
        }

        let half_extents = match kind {
            SceneryKind::Tree => Vec3::new(
                rng.gen_range(0.4..0.8),
                rng.gen_range(1.5..3.0),
                rng.gen_range(0.4..0.8),
            ),
            SceneryKind::Building => Vec3::new(
                rng.gen_range(1.5..4.0),
                rng.gen_range(2.0..6.0),
                rng.gen_range(1.5..3.0),
            ),
        };

        let candidate = SceneryInstance {
            kind,
            position: Vec3::new(x, half_extents.y, 0.0),
            half_extents,
            rotation_y: rng.gen_range(0.0..std::f32::consts::TAU),
        };
        if overlaps_existing(&candidate, placed) {
            continue;
        }
        placed.push(candidate);
        accepted += 1;
    }

    if accepted < count {
        log::debug!(
            "placed {}/{} {:?} items before running out of room",
            accepted,
            count,
            kind
        );
    }
}

fn overlaps_existing(candidate: &SceneryInstance, placed: &[SceneryInstance]) -> bool {
    placed.iter().any(|other| {
        let gap = (candidate.position.x - other.position.x).abs();
        // Footprints are yaw-rotated, so pad by the larger horizontal extent.
        let reach = candidate.half_extents.x.max(candidate.half_extents.z)
            + other.half_extents.x.max(other.half_extents.z);
        gap < reach
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_is_deterministic_per_seed() {
        let config = ScatterConfig {
            seed: 424242,
            ..Default::default()
        };
        let a = scatter(&config);
        let b = scatter(&config);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.position, y.position);
            assert_eq!(x.half_extents, y.half_extents);
            assert_eq!(x.rotation_y, y.rotation_y);
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = scatter(&ScatterConfig {
            seed: 1,
            ..Default::default()
        });
        let b = scatter(&ScatterConfig {
            seed: 2,
            ..Default::default()
        });
        assert!(!a.is_empty() && !b.is_empty());
        let same = a.len() == b.len()
            && a.iter()
                .zip(b.iter())
                .all(|(x, y)| x.position == y.position);
        assert!(!same, "different seeds should not reproduce the layout");
    }

    #[test]
    fn spawn_corridor_stays_clear() {
        let config = ScatterConfig {
            seed: 7,
            clear_radius: 10.0,
            ..Default::default()
        };
        for item in scatter(&config) {
            assert!(item.position.x.abs() >= config.clear_radius);
        }
    }

    #[test]
    fn scenery_rests_on_the_ground() {
        for item in scatter(&ScatterConfig::default()) {
            assert!((item.position.y - item.half_extents.y).abs() < 1e-6);
            assert!(item.half_extents.min_element() > 0.0);
        }
    }

    #[test]
    fn footprints_do_not_overlap() {
        let placed = scatter(&ScatterConfig {
            seed: 99,
            ..Default::default()
        });
        for (i, a) in placed.iter().enumerate() {
            for b in placed.iter().skip(i + 1) {
                let gap = (a.position.x - b.position.x).abs();
                let reach = a.half_extents.x.max(a.half_extents.z)
                    + b.half_extents.x.max(b.half_extents.z);
                assert!(gap >= reach - 1e-4);
            }
        }
    }
}
