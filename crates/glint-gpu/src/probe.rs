//! Adapter capability probing.
//!
//! Read-only queries against a candidate physical device: required device
//! extensions, the combined graphics/present queue family, and the surface
//! support snapshot. The results are gathered into a plain
//! [`AdapterProfile`] so that device scoring stays pure and testable.

use crate::error::Result;
use ash::vk;
use std::collections::HashSet;
use std::ffi::CStr;

/// Device extensions a candidate must support to be presentable.
pub fn required_device_extensions() -> Vec<&'static CStr> {
    vec![ash::khr::swapchain::NAME]
}

/// Pure check of the required extension set against the enumerated names.
/// Fails closed: every required extension must be present.
pub fn supports_required_extensions(available: &HashSet<String>) -> bool {
    required_device_extensions()
        .iter()
        .all(|ext| available.contains(ext.to_string_lossy().as_ref()))
}

/// Snapshot of what a surface supports on one adapter.
///
/// Valid only for the (adapter, surface) pair it was queried from, at the
/// moment it was queried.
pub struct SurfaceSupport {
    /// Raw surface capabilities.
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    /// Supported surface formats, in enumeration order.
    pub formats: Vec<vk::SurfaceFormatKHR>,
    /// Supported present modes.
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SurfaceSupport {
    /// A surface with zero formats or zero present modes cannot present.
    pub fn is_presentable(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}

/// Everything device selection needs to know about one candidate.
pub struct AdapterProfile {
    /// Device name, for diagnostics.
    pub name: String,
    /// Device type (discrete, integrated, ...).
    pub device_type: vk::PhysicalDeviceType,
    /// Maximum supported 2D image dimension.
    pub max_image_dimension_2d: u32,
    /// Whether every required device extension is present.
    pub has_required_extensions: bool,
    /// Index of a queue family supporting both graphics and present,
    /// if one exists.
    pub queue_family: Option<u32>,
    /// Whether the surface reported at least one format and present mode.
    pub presentable: bool,
}

/// Probe a candidate adapter against a surface.
///
/// # Safety
/// The instance, physical device, and surface must be valid, and the
/// surface loader must belong to the instance.
pub unsafe fn probe_adapter(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> Result<AdapterProfile> {
    let properties = instance.get_physical_device_properties(device);

    let name = CStr::from_ptr(properties.device_name.as_ptr())
        .to_string_lossy()
        .into_owned();

    // An enumeration failure counts as "no extensions", not as an error.
    let extensions = instance
        .enumerate_device_extension_properties(device)
        .unwrap_or_default();
    let available_extensions: HashSet<String> = extensions
        .iter()
        .filter_map(|ext| {
            CStr::from_ptr(ext.extension_name.as_ptr())
                .to_str()
                .ok()
                .map(String::from)
        })
        .collect();

    let queue_family = find_queue_family(instance, surface_loader, device, surface)?;

    let support = query_surface_support(surface_loader, device, surface)?;

    Ok(AdapterProfile {
        name,
        device_type: properties.device_type,
        max_image_dimension_2d: properties.limits.max_image_dimension2_d,
        has_required_extensions: supports_required_extensions(&available_extensions),
        queue_family,
        presentable: support.is_presentable(),
    })
}

/// Find a queue family supporting graphics and presentation to `surface`
/// simultaneously.
///
/// One combined family is a hard requirement of this bootstrap: adapters
/// that only expose split graphics and present families are rejected.
///
/// # Safety
/// The instance, physical device, and surface must be valid.
pub unsafe fn find_queue_family(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> Result<Option<u32>> {
    let families = instance.get_physical_device_queue_family_properties(device);

    for (i, family) in families.iter().enumerate() {
        let i = i as u32;
        let present = surface_loader.get_physical_device_surface_support(device, i, surface)?;
        if present && family.queue_flags.contains(vk::QueueFlags::GRAPHICS) {
            return Ok(Some(i));
        }
    }

    Ok(None)
}

/// Query the surface capability snapshot for an adapter.
///
/// Must be re-queried if the surface changes size.
///
/// # Safety
/// The physical device and surface must be valid.
pub unsafe fn query_surface_support(
    surface_loader: &ash::khr::surface::Instance,
    device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> Result<SurfaceSupport> {
    let capabilities =
        surface_loader.get_physical_device_surface_capabilities(device, surface)?;
    let formats = surface_loader.get_physical_device_surface_formats(device, surface)?;
    let present_modes =
        surface_loader.get_physical_device_surface_present_modes(device, surface)?;

    Ok(SurfaceSupport {
        capabilities,
        formats,
        present_modes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_fails_closed() {
        let empty = HashSet::new();
        assert!(!supports_required_extensions(&empty));

        let mut available = HashSet::new();
        available.insert("VK_KHR_swapchain".to_string());
        assert!(supports_required_extensions(&available));
    }

    #[test]
    fn empty_format_or_present_mode_list_is_not_presentable() {
        let support = SurfaceSupport {
            capabilities: vk::SurfaceCapabilitiesKHR::default(),
            formats: vec![],
            present_modes: vec![vk::PresentModeKHR::FIFO],
        };
        assert!(!support.is_presentable());

        let support = SurfaceSupport {
            capabilities: vk::SurfaceCapabilitiesKHR::default(),
            formats: vec![vk::SurfaceFormatKHR::default()],
            present_modes: vec![],
        };
        assert!(!support.is_presentable());

        let support = SurfaceSupport {
            capabilities: vk::SurfaceCapabilitiesKHR::default(),
            formats: vec![vk::SurfaceFormatKHR::default()],
            present_modes: vec![vk::PresentModeKHR::FIFO],
        };
        assert!(support.is_presentable());
    }
}
