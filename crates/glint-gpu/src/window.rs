//! Windowing collaborator interface.
//!
//! The bootstrap core never talks to a concrete windowing library. Whatever
//! owns the window and the event loop implements [`WindowSystem`] and hands
//! it to [`crate::Session::bootstrap`].

use crate::error::Result;
use ash::vk;
use std::os::raw::c_char;

/// Capabilities the windowing side must provide to the Vulkan core.
pub trait WindowSystem {
    /// Instance extensions required to present to this window system.
    fn required_extensions(&self) -> Result<Vec<*const c_char>>;

    /// Create a presentation surface for the given instance.
    ///
    /// # Safety
    /// The instance must be valid and must have been created with the
    /// extensions returned by [`Self::required_extensions`]. The returned
    /// surface is owned by the caller.
    unsafe fn create_surface(
        &self,
        entry: &ash::Entry,
        instance: &ash::Instance,
    ) -> Result<vk::SurfaceKHR>;

    /// Current framebuffer size in pixels, (width, height).
    fn framebuffer_size(&self) -> (u32, u32);
}
