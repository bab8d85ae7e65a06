//! Swapchain creation and teardown.

use crate::error::{GpuError, Result};
use crate::negotiate::SwapchainConfig;
use ash::vk;

/// Swapchain wrapper owning the presentable image set.
///
/// The image views match the images one to one and are destroyed together
/// with the swapchain.
pub struct Swapchain {
    pub swapchain: vk::SwapchainKHR,
    pub images: Vec<vk::Image>,
    pub image_views: Vec<vk::ImageView>,
    pub format: vk::Format,
    pub extent: vk::Extent2D,
}

impl Swapchain {
    /// Create a swapchain from a negotiated configuration.
    ///
    /// # Safety
    /// All handles must be valid, `config` must have been negotiated from a
    /// current capability snapshot of `surface`, and `queue_family` must be
    /// the combined graphics/present family.
    pub unsafe fn new(
        device: &ash::Device,
        swapchain_loader: &ash::khr::swapchain::Device,
        surface: vk::SurfaceKHR,
        surface_capabilities: &vk::SurfaceCapabilitiesKHR,
        config: &SwapchainConfig,
        queue_family: u32,
    ) -> Result<Self> {
        let queue_families = [queue_family];
        let create_info = vk::SwapchainCreateInfoKHR::default()
            .surface(surface)
            .min_image_count(config.image_count)
            .image_format(config.format.format)
            .image_color_space(config.format.color_space)
            .image_extent(config.extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
            .queue_family_indices(&queue_families)
            .pre_transform(surface_capabilities.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(config.present_mode)
            .clipped(true);

        let swapchain = swapchain_loader
            .create_swapchain(&create_info, None)
            .map_err(|e| GpuError::SwapchainCreation(e.to_string()))?;

        let images = match swapchain_loader.get_swapchain_images(swapchain) {
            Ok(images) => images,
            Err(e) => {
                swapchain_loader.destroy_swapchain(swapchain, None);
                return Err(GpuError::from(e));
            }
        };

        let image_views = match create_image_views(device, &images, config.format.format) {
            Ok(views) => views,
            Err(e) => {
                swapchain_loader.destroy_swapchain(swapchain, None);
                return Err(e);
            }
        };

        Ok(Self {
            swapchain,
            images,
            image_views,
            format: config.format.format,
            extent: config.extent,
        })
    }

    /// Destroy the swapchain, views first.
    ///
    /// # Safety
    /// All handles must be valid and the swapchain must not be in use.
    pub unsafe fn destroy(
        &self,
        device: &ash::Device,
        swapchain_loader: &ash::khr::swapchain::Device,
    ) {
        for &view in &self.image_views {
            device.destroy_image_view(view, None);
        }
        swapchain_loader.destroy_swapchain(self.swapchain, None);
    }
}

/// Create one 2D color view per swapchain image.
///
/// Destroys whatever was already created if a view fails partway through.
///
/// # Safety
/// The device and images must be valid.
unsafe fn create_image_views(
    device: &ash::Device,
    images: &[vk::Image],
    format: vk::Format,
) -> Result<Vec<vk::ImageView>> {
    let mut views = Vec::with_capacity(images.len());

    for &image in images {
        let view_info = vk::ImageViewCreateInfo::default()
            .image(image)
            .view_type(vk::ImageViewType::TYPE_2D)
            .format(format)
            .components(vk::ComponentMapping::default())
            .subresource_range(
                vk::ImageSubresourceRange::default()
                    .aspect_mask(vk::ImageAspectFlags::COLOR)
                    .base_mip_level(0)
                    .level_count(1)
                    .base_array_layer(0)
                    .layer_count(1),
            );

        match device.create_image_view(&view_info, None) {
            Ok(view) => views.push(view),
            Err(e) => {
                for &view in &views {
                    device.destroy_image_view(view, None);
                }
                return Err(GpuError::from(e));
            }
        }
    }

    Ok(views)
}
