//! Vulkan bootstrap core for Glint.
//!
//! This crate provides:
//! - Vulkan instance and logical device creation
//! - Physical device probing and scored selection
//! - Swapchain format/present-mode/extent negotiation
//! - An ordered session lifecycle with partial-teardown safety
//!
//! There is no frame loop here: the crate stops once a presentable
//! swapchain and its image views exist.

pub mod device;
pub mod error;
pub mod instance;
pub mod negotiate;
pub mod probe;
pub mod select;
pub mod session;
pub mod swapchain;
pub mod window;

pub use error::{GpuError, Result};
pub use negotiate::{negotiate, SwapchainConfig};
pub use probe::{AdapterProfile, SurfaceSupport};
pub use session::{Session, SessionConfig};
pub use swapchain::Swapchain;
pub use window::WindowSystem;
