//! GPU error types.

use ash::vk;
use thiserror::Error;

/// GPU-related errors.
///
/// Every failure in this crate is reported as a value; the libraries never
/// terminate the process. The host application decides whether to retry,
/// fall back, or exit.
#[derive(Error, Debug)]
pub enum GpuError {
    /// Vulkan error.
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] vk::Result),

    /// The Vulkan loader could not be found or initialized.
    #[error("Failed to load Vulkan entry point: {0}")]
    EntryLoad(String),

    /// No adapter passed the suitability checks.
    #[error("No suitable GPU found")]
    NoSuitableGpu,

    /// Surface creation failed.
    #[error("Surface creation failed: {0}")]
    SurfaceCreation(String),

    /// Swapchain creation failed.
    #[error("Swapchain creation failed: {0}")]
    SwapchainCreation(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, GpuError>;
