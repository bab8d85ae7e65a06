//! Logical device creation.

use crate::error::{GpuError, Result};
use crate::probe::required_device_extensions;
use ash::vk;
use std::os::raw::c_char;

/// Create the logical device and retrieve the combined graphics/present
/// queue.
///
/// One queue from the single queue family that supports both graphics and
/// presentation; the default feature set is enough for a bootstrap that
/// records no commands.
///
/// # Safety
/// The instance and physical device must be valid, and `queue_family` must
/// be a valid queue family index on that device.
pub unsafe fn create_device(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
    queue_family: u32,
) -> Result<(ash::Device, vk::Queue)> {
    let queue_priority = 1.0_f32;
    let queue_create_info = vk::DeviceQueueCreateInfo::default()
        .queue_family_index(queue_family)
        .queue_priorities(std::slice::from_ref(&queue_priority));

    let extensions = required_device_extensions();
    let extension_names: Vec<*const c_char> = extensions.iter().map(|ext| ext.as_ptr()).collect();

    let features = vk::PhysicalDeviceFeatures::default();

    let device_create_info = vk::DeviceCreateInfo::default()
        .queue_create_infos(std::slice::from_ref(&queue_create_info))
        .enabled_extension_names(&extension_names)
        .enabled_features(&features);

    let device = instance
        .create_device(physical_device, &device_create_info, None)
        .map_err(GpuError::from)?;

    let queue = device.get_device_queue(queue_family, 0);

    Ok((device, queue))
}
