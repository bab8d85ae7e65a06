//! Windowing glue for the Glint Vulkan bootstrap.
//!
//! Wraps a `winit` window and implements the core's [`WindowSystem`]
//! collaborator interface via `ash-window`, so the GPU crate never names a
//! concrete windowing library.

use std::os::raw::c_char;
use std::sync::Arc;

use ash::vk;
use glint_gpu::{GpuError, WindowSystem};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use thiserror::Error;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Window creation failed: {0}")]
    WindowCreation(String),
    #[error("Event loop error: {0}")]
    EventLoop(String),
}

pub type Result<T> = std::result::Result<T, PlatformError>;

/// Platform configuration.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Glint".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// A window the Vulkan session can present to.
///
/// The window is fixed-size; the bootstrap does no swapchain recreation,
/// so resizing is disabled at creation.
pub struct AppWindow {
    window: Arc<Window>,
}

impl AppWindow {
    /// Create the application window.
    pub fn create(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;

        tracing::debug!("Window created: {}x{}", config.width, config.height);

        Ok(Self {
            window: Arc::new(window),
        })
    }

    /// The underlying winit window.
    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl WindowSystem for AppWindow {
    fn required_extensions(&self) -> glint_gpu::Result<Vec<*const c_char>> {
        let display = self
            .window
            .display_handle()
            .map_err(|e| GpuError::SurfaceCreation(format!("Failed to get display handle: {e}")))?;

        let extensions = ash_window::enumerate_required_extensions(display.as_raw())
            .map_err(GpuError::from)?;

        Ok(extensions.to_vec())
    }

    unsafe fn create_surface(
        &self,
        entry: &ash::Entry,
        instance: &ash::Instance,
    ) -> glint_gpu::Result<vk::SurfaceKHR> {
        let display = self
            .window
            .display_handle()
            .map_err(|e| GpuError::SurfaceCreation(format!("Failed to get display handle: {e}")))?;
        let window_handle = self
            .window
            .window_handle()
            .map_err(|e| GpuError::SurfaceCreation(format!("Failed to get window handle: {e}")))?;

        ash_window::create_surface(
            entry,
            instance,
            display.as_raw(),
            window_handle.as_raw(),
            None,
        )
        .map_err(|e| GpuError::SurfaceCreation(e.to_string()))
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width.max(1), size.height.max(1))
    }
}
