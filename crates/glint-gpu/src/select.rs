//! Physical device selection.
//!
//! Candidates are probed into [`AdapterProfile`]s, scored, and the best
//! strictly-greater score wins. The scoring weights are compatibility
//! critical: discrete GPUs get a flat 1000-point bonus, plus the maximum
//! 2D image dimension as a proxy for capability.

use crate::error::{GpuError, Result};
use crate::probe::{probe_adapter, AdapterProfile};
use ash::vk;

/// Score a candidate for selection.
///
/// A candidate that is missing a required extension, has no combined
/// graphics/present queue family, or cannot present to the surface scores 0
/// and is excluded from selection.
pub fn score_adapter(profile: &AdapterProfile) -> u32 {
    if !profile.has_required_extensions || profile.queue_family.is_none() || !profile.presentable {
        return 0;
    }

    let mut score = 0;

    // Discrete GPUs have a significant performance advantage
    if profile.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
        score += 1000;
    }

    // Maximum possible size of textures affects graphics quality
    score + profile.max_image_dimension_2d
}

/// Pick the best-scoring candidate, or `None` if nothing scores above zero.
///
/// Only a strictly greater score replaces the current best, so ties keep
/// the earlier candidate. A candidate scoring 0 can never win, even as the
/// sole candidate.
pub fn select_best(profiles: &[AdapterProfile]) -> Option<usize> {
    let mut best = None;
    let mut best_score = 0;

    for (index, profile) in profiles.iter().enumerate() {
        let score = score_adapter(profile);
        if score > best_score {
            best_score = score;
            best = Some(index);
        }
    }

    best
}

/// Enumerate adapters, probe each against the surface, and pick the best.
///
/// # Safety
/// The instance and surface must be valid, and the surface loader must
/// belong to the instance.
pub unsafe fn pick_physical_device(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
) -> Result<(vk::PhysicalDevice, AdapterProfile)> {
    let devices = instance.enumerate_physical_devices()?;

    if devices.is_empty() {
        return Err(GpuError::NoSuitableGpu);
    }

    let mut profiles = Vec::with_capacity(devices.len());
    for &device in &devices {
        profiles.push(probe_adapter(instance, surface_loader, device, surface)?);
    }

    let index = select_best(&profiles).ok_or(GpuError::NoSuitableGpu)?;
    let profile = profiles.swap_remove(index);

    tracing::info!(
        "Selected GPU: {} ({})",
        profile.name,
        device_type_name(profile.device_type)
    );

    Ok((devices[index], profile))
}

/// Human-readable device type.
pub fn device_type_name(device_type: vk::PhysicalDeviceType) -> &'static str {
    match device_type {
        vk::PhysicalDeviceType::INTEGRATED_GPU => "Integrated",
        vk::PhysicalDeviceType::DISCRETE_GPU => "Discrete",
        vk::PhysicalDeviceType::VIRTUAL_GPU => "Virtual",
        vk::PhysicalDeviceType::CPU => "CPU",
        vk::PhysicalDeviceType::OTHER => "Other",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(
        device_type: vk::PhysicalDeviceType,
        max_dim: u32,
        extensions: bool,
        queue_family: Option<u32>,
        presentable: bool,
    ) -> AdapterProfile {
        AdapterProfile {
            name: "test".to_string(),
            device_type,
            max_image_dimension_2d: max_dim,
            has_required_extensions: extensions,
            queue_family,
            presentable,
        }
    }

    fn suitable(device_type: vk::PhysicalDeviceType, max_dim: u32) -> AdapterProfile {
        profile(device_type, max_dim, true, Some(0), true)
    }

    #[test]
    fn unsuitable_candidates_score_zero() {
        let no_ext = profile(vk::PhysicalDeviceType::DISCRETE_GPU, 8192, false, Some(0), true);
        assert_eq!(score_adapter(&no_ext), 0);

        let no_family = profile(vk::PhysicalDeviceType::DISCRETE_GPU, 8192, true, None, true);
        assert_eq!(score_adapter(&no_family), 0);

        let no_present = profile(vk::PhysicalDeviceType::DISCRETE_GPU, 8192, true, Some(0), false);
        assert_eq!(score_adapter(&no_present), 0);
    }

    #[test]
    fn no_candidate_with_extensions_means_no_selection() {
        let profiles = vec![
            profile(vk::PhysicalDeviceType::DISCRETE_GPU, 8192, false, Some(0), true),
            profile(vk::PhysicalDeviceType::INTEGRATED_GPU, 4096, false, Some(0), true),
        ];
        assert_eq!(select_best(&profiles), None);
    }

    #[test]
    fn sole_zero_score_candidate_is_never_selected() {
        let profiles = vec![profile(
            vk::PhysicalDeviceType::DISCRETE_GPU,
            8192,
            true,
            None,
            true,
        )];
        assert_eq!(select_best(&profiles), None);
    }

    #[test]
    fn strictly_greater_score_replaces_best() {
        let profiles = vec![
            suitable(vk::PhysicalDeviceType::INTEGRATED_GPU, 4096),
            suitable(vk::PhysicalDeviceType::INTEGRATED_GPU, 8192),
        ];
        assert_eq!(select_best(&profiles), Some(1));
    }

    #[test]
    fn equal_score_keeps_earlier_candidate() {
        let profiles = vec![
            suitable(vk::PhysicalDeviceType::INTEGRATED_GPU, 4096),
            suitable(vk::PhysicalDeviceType::INTEGRATED_GPU, 4096),
        ];
        assert_eq!(select_best(&profiles), Some(0));
    }

    #[test]
    fn discrete_gpu_beats_integrated() {
        // integrated 4096 scores 4096; discrete 8192 scores 9192
        let profiles = vec![
            suitable(vk::PhysicalDeviceType::INTEGRATED_GPU, 4096),
            suitable(vk::PhysicalDeviceType::DISCRETE_GPU, 8192),
        ];
        assert_eq!(score_adapter(&profiles[0]), 4096);
        assert_eq!(score_adapter(&profiles[1]), 9192);
        assert_eq!(select_best(&profiles), Some(1));
    }
}
