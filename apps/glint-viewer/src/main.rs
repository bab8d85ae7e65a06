//! Glint demo viewer.
//!
//! Opens a fixed-size window, bootstraps a Vulkan session (GPU selection,
//! logical device, presentable swapchain), logs what was selected, and keeps
//! the window open until it is closed. Nothing is rendered.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p glint-viewer
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

use anyhow::Context;
use glint_gpu::select::device_type_name;
use glint_gpu::{Session, SessionConfig};
use glint_platform::{AppWindow, PlatformConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Glint viewer starting...");

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = Viewer {
        platform_config: PlatformConfig {
            title: "Glint viewer".to_string(),
            width: WIDTH,
            height: HEIGHT,
        },
        session_config: SessionConfig::new("Glint viewer"),
        state: None,
    };

    event_loop.run_app(&mut app).context("Event loop error")?;

    Ok(())
}

struct Viewer {
    platform_config: PlatformConfig,
    session_config: SessionConfig,
    state: Option<ViewerState>,
}

/// Field order matters: the session presents to the window's surface, so it
/// must drop before the window.
struct ViewerState {
    session: Session,
    // Kept alive for the session's surface
    #[allow(dead_code)]
    window: AppWindow,
}

impl Viewer {
    fn create_state(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<ViewerState> {
        let window = AppWindow::create(event_loop, &self.platform_config)?;
        let session = Session::bootstrap(&window, &self.session_config)?;

        let adapter = session.adapter();
        let swapchain = session.swapchain();
        info!(
            "Session ready: {} ({}), queue family {}, {} swapchain images",
            adapter.name,
            device_type_name(adapter.device_type),
            session.queue_family(),
            swapchain.images.len()
        );

        Ok(ViewerState { session, window })
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        match self.create_state(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                error!("Failed to bootstrap Vulkan session: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                // Session teardown runs here, in reverse acquisition order
                self.state = None;
                event_loop.exit();
            }
            _ => {}
        }
    }
}
