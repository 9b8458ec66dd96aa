//! Session state: the scene, the carrier, and the window event plumbing.

use engine_core::{SimClock, Vec3};
use input::InputState;
use physics::{CarrierBody, CarrierConfig, CollisionIndex, SurfaceLayer};
use procgen::{scatter, SceneryInstance, SceneryKind, ScatterConfig};
use winit::event::WindowEvent;
use winit::keyboard::PhysicalKey;

use crate::config::GameConfig;
use crate::render::RenderFrame;

/// Carrier spawn point, centered over the clear corridor.
const SPAWN: Vec3 = Vec3::new(0.0, 6.0, 0.0);

/// Everything one play session owns.
pub struct GameState {
    pub config: GameConfig,
    pub clock: SimClock,
    pub input: InputState,
    pub surfaces: CollisionIndex,
    pub scenery: Vec<SceneryInstance>,
    pub carrier: CarrierBody,
    /// Output of the most recent simulation tick.
    pub frame: RenderFrame,
    pub running: bool,
}

impl GameState {
    /// Build the scene and spawn the carrier. All surface registration
    /// happens here, before the first tick; the simulation only reads the
    /// index afterwards.
    pub fn new(config: GameConfig) -> Self {
        let mut surfaces = CollisionIndex::new();
        surfaces.register_ground_plane(0.0, &[SurfaceLayer::Ground]);

        let scenery = scatter(&ScatterConfig {
            seed: config.seed,
            world_half_extent: config.world_half_extent,
            tree_count: config.tree_count,
            building_count: config.building_count,
            ..Default::default()
        });
        for item in &scenery {
            let layers: &[SurfaceLayer] = match item.kind {
                SceneryKind::Tree => &[SurfaceLayer::Obstacle],
                // Buildings have landable flat tops.
                SceneryKind::Building => &[SurfaceLayer::Wall, SurfaceLayer::Platform],
            };
            surfaces.register_box(item.position, item.half_extents, item.rotation_y, layers);
        }
        log::info!(
            "scene ready: {} surfaces ({} scenery + ground)",
            surfaces.len(),
            scenery.len()
        );

        let carrier = CarrierBody::new(CarrierConfig::default(), SPAWN);
        let frame = RenderFrame::capture(&carrier);
        Self {
            config,
            clock: SimClock::new(),
            input: InputState::new(),
            surfaces,
            scenery,
            carrier,
            frame,
            running: true,
        }
    }

    /// Process one window event. Returns true when the app should exit.
    pub fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.input.process_keyboard(code, event.state);
                }
                if self.input.is_quit_pressed() {
                    self.running = false;
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}
