//! Swapchain configuration negotiation.
//!
//! Pure selection logic over an already-queried [`SurfaceSupport`] snapshot
//! and a requested framebuffer size. Nothing here talks to the driver, so
//! every rule is testable without a GPU or a window.

use crate::probe::SurfaceSupport;
use ash::vk;

/// Fully resolved swapchain configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapchainConfig {
    /// Chosen surface format and color space.
    pub format: vk::SurfaceFormatKHR,
    /// Chosen present mode.
    pub present_mode: vk::PresentModeKHR,
    /// Chosen extent in pixels.
    pub extent: vk::Extent2D,
    /// Number of images to request.
    pub image_count: u32,
}

/// Resolve a complete swapchain configuration.
///
/// `frame_rate_cap` forces the blocking vsync present mode even when a
/// low-latency mode is available; it is evaluated once, here.
pub fn negotiate(
    support: &SurfaceSupport,
    width: u32,
    height: u32,
    frame_rate_cap: bool,
) -> SwapchainConfig {
    SwapchainConfig {
        format: choose_surface_format(&support.formats),
        present_mode: choose_present_mode(&support.present_modes, frame_rate_cap),
        extent: choose_extent(&support.capabilities, width, height),
        image_count: choose_image_count(&support.capabilities),
    }
}

/// Select the surface format.
///
/// Prefers 8-bit BGRA in the nonlinear sRGB color space wherever it appears
/// in the supported set; otherwise falls back to the first supported format
/// in enumeration order. The caller guarantees the set is non-empty (an
/// adapter with an empty format list is rejected during probing).
pub fn choose_surface_format(available: &[vk::SurfaceFormatKHR]) -> vk::SurfaceFormatKHR {
    for format in available {
        if format.format == vk::Format::B8G8R8A8_SRGB
            && format.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        {
            return *format;
        }
    }

    available[0]
}

/// Select the present mode.
///
/// Mailbox (triple buffering, low latency) when available and no frame-rate
/// cap was requested; otherwise FIFO, which every driver must support.
pub fn choose_present_mode(
    available: &[vk::PresentModeKHR],
    frame_rate_cap: bool,
) -> vk::PresentModeKHR {
    if !frame_rate_cap && available.contains(&vk::PresentModeKHR::MAILBOX) {
        return vk::PresentModeKHR::MAILBOX;
    }

    vk::PresentModeKHR::FIFO
}

/// Select the swapchain extent.
///
/// A current extent of `u32::MAX` is the driver's "match the window" signal:
/// the requested size is used, clamped per axis into the supported range.
/// Any other current extent is fixed by the surface and used verbatim.
pub fn choose_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    width: u32,
    height: u32,
) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        capabilities.current_extent
    } else {
        vk::Extent2D {
            width: width.clamp(
                capabilities.min_image_extent.width,
                capabilities.max_image_extent.width,
            ),
            height: height.clamp(
                capabilities.min_image_extent.height,
                capabilities.max_image_extent.height,
            ),
        }
    }
}

/// Select the number of swapchain images to request.
///
/// One more than the minimum avoids waiting on the driver; a maximum of 0
/// means no upper bound.
pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let mut image_count = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 && image_count > capabilities.max_image_count {
        image_count = capabilities.max_image_count;
    }
    image_count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(format: vk::Format, color_space: vk::ColorSpaceKHR) -> vk::SurfaceFormatKHR {
        vk::SurfaceFormatKHR {
            format,
            color_space,
        }
    }

    fn capabilities(
        current: (u32, u32),
        min: (u32, u32),
        max: (u32, u32),
    ) -> vk::SurfaceCapabilitiesKHR {
        vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D {
                width: current.0,
                height: current.1,
            },
            min_image_extent: vk::Extent2D {
                width: min.0,
                height: min.1,
            },
            max_image_extent: vk::Extent2D {
                width: max.0,
                height: max.1,
            },
            ..Default::default()
        }
    }

    #[test]
    fn preferred_format_wins_regardless_of_position() {
        let formats = vec![
            format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::B8G8R8A8_SRGB, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        let chosen = choose_surface_format(&formats);
        assert_eq!(chosen.format, vk::Format::B8G8R8A8_SRGB);
        assert_eq!(chosen.color_space, vk::ColorSpaceKHR::SRGB_NONLINEAR);
    }

    #[test]
    fn format_falls_back_to_first_in_enumeration_order() {
        let formats = vec![
            format(vk::Format::R8G8B8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
            format(vk::Format::B8G8R8A8_UNORM, vk::ColorSpaceKHR::SRGB_NONLINEAR),
        ];
        assert_eq!(choose_surface_format(&formats), formats[0]);
    }

    #[test]
    fn mailbox_preferred_without_frame_rate_cap() {
        let modes = vec![vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX];
        assert_eq!(
            choose_present_mode(&modes, false),
            vk::PresentModeKHR::MAILBOX
        );
    }

    #[test]
    fn frame_rate_cap_forces_fifo_even_with_mailbox_available() {
        let modes = vec![vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::FIFO];
        assert_eq!(choose_present_mode(&modes, true), vk::PresentModeKHR::FIFO);
    }

    #[test]
    fn fifo_is_the_fallback_when_mailbox_is_missing() {
        let modes = vec![vk::PresentModeKHR::IMMEDIATE, vk::PresentModeKHR::FIFO];
        assert_eq!(choose_present_mode(&modes, false), vk::PresentModeKHR::FIFO);
    }

    #[test]
    fn fixed_current_extent_ignores_the_request() {
        let caps = capabilities((800, 600), (1, 1), (4096, 4096));
        let extent = choose_extent(&caps, 1920, 1080);
        assert_eq!(extent, vk::Extent2D { width: 800, height: 600 });
    }

    #[test]
    fn sentinel_extent_uses_requested_size_inside_bounds() {
        let caps = capabilities((u32::MAX, u32::MAX), (100, 100), (4096, 4096));
        let extent = choose_extent(&caps, 1920, 1080);
        assert_eq!(extent, vk::Extent2D { width: 1920, height: 1080 });
    }

    #[test]
    fn sentinel_extent_clamps_each_axis_independently() {
        let caps = capabilities((u32::MAX, u32::MAX), (200, 200), (1600, 900));
        let extent = choose_extent(&caps, 50, 2000);
        assert_eq!(extent, vk::Extent2D { width: 200, height: 900 });
    }

    #[test]
    fn image_count_is_min_plus_one_when_unbounded() {
        let caps = vk::SurfaceCapabilitiesKHR {
            min_image_count: 2,
            max_image_count: 0,
            ..Default::default()
        };
        assert_eq!(choose_image_count(&caps), 3);
    }

    #[test]
    fn image_count_clamps_to_nonzero_maximum() {
        let caps = vk::SurfaceCapabilitiesKHR {
            min_image_count: 2,
            max_image_count: 2,
            ..Default::default()
        };
        assert_eq!(choose_image_count(&caps), 2);
    }

    #[test]
    fn negotiate_resolves_every_field() {
        let support = SurfaceSupport {
            capabilities: vk::SurfaceCapabilitiesKHR {
                min_image_count: 2,
                max_image_count: 0,
                current_extent: vk::Extent2D {
                    width: u32::MAX,
                    height: u32::MAX,
                },
                min_image_extent: vk::Extent2D { width: 1, height: 1 },
                max_image_extent: vk::Extent2D {
                    width: 4096,
                    height: 4096,
                },
                ..Default::default()
            },
            formats: vec![format(
                vk::Format::B8G8R8A8_SRGB,
                vk::ColorSpaceKHR::SRGB_NONLINEAR,
            )],
            present_modes: vec![vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX],
        };

        let config = negotiate(&support, 1280, 720, false);
        assert_eq!(config.format.format, vk::Format::B8G8R8A8_SRGB);
        assert_eq!(config.present_mode, vk::PresentModeKHR::MAILBOX);
        assert_eq!(config.extent, vk::Extent2D { width: 1280, height: 720 });
        assert_eq!(config.image_count, 3);
    }
}
