//! Collidable surface registry and downward-ray queries.
//!
//! Scene setup registers surfaces here at load time; the simulation core only
//! ever reads, via [`CollisionIndex::nearest_surface_below`]. Queries are
//! side-effect-free and never observe a half-applied mutation: every
//! registration change refreshes the query pipeline before returning.

use engine_core::Vec3;
use rapier3d::na::{Isometry3, Vector3};
use rapier3d::prelude::*;

/// Opaque handle to a registered surface.
pub type SurfaceHandle = ColliderHandle;

/// How far below a query origin the downward ray probes.
const MAX_PROBE_DEPTH: f32 = 1_000.0;

/// Layer categories for registered surfaces.
///
/// In-plane layers (everything except `Default`) participate in downward-ray
/// queries; `Default` marks purely decorative geometry.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceLayer {
    /// Terrain and the base ground plane.
    Ground = 1 << 0,
    /// Vertical faces of buildings.
    Wall = 1 << 1,
    /// Scattered scenery footprints (trees, crates).
    Obstacle = 1 << 2,
    /// Landable flat tops (rooftops, pads).
    Platform = 1 << 3,
    /// Untagged decorative geometry; never returned by queries.
    Default = 1 << 4,
}

impl SurfaceLayer {
    fn group(self) -> Group {
        Group::from_bits_retain(self as u32)
    }

    /// The union of all queryable layers.
    pub fn in_plane() -> Group {
        Group::from_bits_retain(
            Self::Ground as u32 | Self::Wall as u32 | Self::Obstacle as u32 | Self::Platform as u32,
        )
    }
}

fn groups_for(layers: &[SurfaceLayer]) -> InteractionGroups {
    let mut membership = Group::empty();
    for layer in layers {
        membership |= layer.group();
    }
    InteractionGroups::new(membership, Group::ALL)
}

/// Result of a downward surface query.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceHit {
    /// The surface that was hit.
    pub surface: SurfaceHandle,
    /// World position of the hit.
    pub point: Vec3,
    /// Distance along the downward ray to the hit point.
    pub distance: f32,
}

/// Registry of collidable surfaces, queryable for the nearest surface below a
/// point. Built on a rapier collider set plus its query pipeline; no rigid
/// bodies and no stepping, queries only.
pub struct CollisionIndex {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    island_manager: IslandManager,
    query_pipeline: QueryPipeline,
}

impl Default for CollisionIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Register an infinite horizontal plane at the given height, tagged with
    /// the given layers.
    pub fn register_ground_plane(&mut self, height: f32, layers: &[SurfaceLayer]) -> SurfaceHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .translation(vector![0.0, height, 0.0])
            .collision_groups(groups_for(layers))
            .build();
        let handle = self.colliders.insert(collider);
        self.refresh();
        handle
    }

    /// Register a box surface. `rotation_y` is the yaw of the box in radians;
    /// `half_extents` are the local half sizes before rotation.
    pub fn register_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation_y: f32,
        layers: &[SurfaceLayer],
    ) -> SurfaceHandle {
        let translation = vector![center.x, center.y, center.z];
        let axisangle = Vector3::y_axis().into_inner() * (rotation_y as Real);
        let position = Isometry3::new(translation, axisangle);
        let collider = ColliderBuilder::cuboid(
            half_extents.x as Real,
            half_extents.y as Real,
            half_extents.z as Real,
        )
        .position(position)
        .collision_groups(groups_for(layers))
        .build();
        let handle = self.colliders.insert(collider);
        self.refresh();
        handle
    }

    /// Remove a surface by handle. Returns false (and logs a warning) if the
    /// handle is unknown; that is a caller logic fault, not a recoverable
    /// condition.
    pub fn unregister(&mut self, handle: SurfaceHandle) -> bool {
        let removed = self
            .colliders
            .remove(handle, &mut self.island_manager, &mut self.bodies, false)
            .is_some();
        if removed {
            self.refresh();
        } else {
            log::warn!("unregister of unknown surface handle {:?}", handle);
        }
        removed
    }

    /// Remove every registered surface.
    pub fn clear(&mut self) {
        self.colliders = ColliderSet::new();
        self.bodies = RigidBodySet::new();
        self.island_manager = IslandManager::new();
        self.refresh();
    }

    /// Number of registered surfaces.
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// True if no surfaces are registered.
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Find the nearest in-plane surface straight below `origin`.
    ///
    /// Only surfaces tagged with an in-plane layer qualify; `Default`-tagged
    /// decoration is invisible to this query.
    pub fn nearest_surface_below(&self, origin: Vec3) -> Option<SurfaceHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![0.0, -1.0, 0.0],
        );
        let filter = QueryFilter::default()
            .groups(InteractionGroups::new(Group::ALL, SurfaceLayer::in_plane()));

        self.query_pipeline
            .cast_ray(
                &self.bodies,
                &self.colliders,
                &ray,
                MAX_PROBE_DEPTH,
                true,
                filter,
            )
            .map(|(surface, toi)| {
                let point = ray.point_at(toi);
                SurfaceHit {
                    surface,
                    point: Vec3::new(point.x, point.y, point.z),
                    distance: toi,
                }
            })
    }

    fn refresh(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_plane_is_hit_from_above() {
        let mut index = CollisionIndex::new();
        index.register_ground_plane(2.0, &[SurfaceLayer::Ground]);
        let hit = index
            .nearest_surface_below(Vec3::new(3.0, 10.0, -4.0))
            .expect("ground plane should be hit");
        assert!((hit.point.y - 2.0).abs() < 1e-4);
        assert!((hit.distance - 8.0).abs() < 1e-4);
    }

    #[test]
    fn default_layer_is_invisible_to_queries() {
        let mut index = CollisionIndex::new();
        index.register_box(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            0.0,
            &[SurfaceLayer::Default],
        );
        assert!(index.nearest_surface_below(Vec3::new(0.0, 10.0, 0.0)).is_none());
    }

    #[test]
    fn nearest_of_stacked_surfaces_wins() {
        let mut index = CollisionIndex::new();
        index.register_ground_plane(0.0, &[SurfaceLayer::Ground]);
        index.register_box(
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(2.0, 1.0, 2.0),
            0.0,
            &[SurfaceLayer::Platform],
        );
        let hit = index
            .nearest_surface_below(Vec3::new(0.0, 10.0, 0.0))
            .expect("platform should be hit");
        // Box top is at y = 4, above the ground plane.
        assert!((hit.point.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn query_misses_beside_a_box() {
        let mut index = CollisionIndex::new();
        index.register_box(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            0.0,
            &[SurfaceLayer::Obstacle],
        );
        assert!(index.nearest_surface_below(Vec3::new(5.0, 10.0, 0.0)).is_none());
    }

    #[test]
    fn unregister_removes_surface() {
        let mut index = CollisionIndex::new();
        let handle = index.register_ground_plane(0.0, &[SurfaceLayer::Ground]);
        assert_eq!(index.len(), 1);
        assert!(index.unregister(handle));
        assert!(index.is_empty());
        assert!(index.nearest_surface_below(Vec3::new(0.0, 5.0, 0.0)).is_none());
        // Second removal of the same handle is a caller fault, reported as false.
        assert!(!index.unregister(handle));
    }

    #[test]
    fn clear_empties_the_index() {
        let mut index = CollisionIndex::new();
        index.register_ground_plane(0.0, &[SurfaceLayer::Ground]);
        index.register_box(
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::ONE,
            0.3,
            &[SurfaceLayer::Obstacle],
        );
        index.clear();
        assert!(index.is_empty());
        assert!(index.nearest_surface_below(Vec3::new(0.0, 5.0, 0.0)).is_none());
    }
}
