//! Skylift - helicopter winch arcade game: carrier, twin rope winches, and a
//! scattered landscape to pick things off of.

mod config;
mod render;
mod state;
mod update;

use anyhow::Result;
use state::GameState;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Application handler for winit.
struct App {
    window: Option<Arc<Window>>,
    state: Option<GameState>,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = config::GameConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("Skylift")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    config.window_width,
                    config.window_height,
                ));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.state = Some(GameState::new(config));
            self.window = Some(window);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            update::frame(state);

            // Heartbeat in the title bar until a renderer consumes the frames.
            if state.clock.ticks() % 30 == 0 {
                if let Some(window) = &self.window {
                    let pose = &state.frame.carrier;
                    window.set_title(&format!(
                        "Skylift — x {:.1}  y {:.1}  |  {:.0} fps  |  {:.0}s",
                        pose.position.x,
                        pose.position.y,
                        state.clock.fps(),
                        state.clock.elapsed_seconds()
                    ));
                }
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║                       Skylift                        ║");
    println!("╠══════════════════════════════════════════════════════╣");
    println!("║  CONTROLS:                                           ║");
    println!("║    Arrow Keys - Fly the carrier                      ║");
    println!("║    Q / A      - Left winch: lower / raise hook       ║");
    println!("║    E / D      - Right winch: lower / raise hook      ║");
    println!("║    Escape     - Quit                                 ║");
    println!("╚══════════════════════════════════════════════════════╝");

    log::info!("Starting Skylift");

    let event_loop = EventLoop::new()?;
    // Poll continuously so the fixed-step clock keeps draining even when no
    // window events arrive.
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
