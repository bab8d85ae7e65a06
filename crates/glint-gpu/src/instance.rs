//! Vulkan instance creation.

use crate::error::Result;
use ash::vk;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Validation layers to enable in debug builds.
pub fn validation_layers() -> Vec<&'static CStr> {
    vec![c"VK_LAYER_KHRONOS_validation"]
}

/// Create a Vulkan instance.
///
/// `window_extensions` is the extension list supplied by the windowing
/// collaborator. Requested validation layers that are not installed are
/// logged and skipped; missing layers never fail instance creation.
///
/// # Safety
/// The entry must be a valid Vulkan entry point.
pub unsafe fn create_instance(
    entry: &ash::Entry,
    app_name: &str,
    window_extensions: &[*const c_char],
    enable_validation: bool,
) -> Result<ash::Instance> {
    let app_name = CString::new(app_name).unwrap_or_else(|_| c"Glint".to_owned());
    let engine_name = c"Glint";

    let app_info = vk::ApplicationInfo::default()
        .application_name(&app_name)
        .application_version(vk::make_api_version(0, 0, 1, 0))
        .engine_name(engine_name)
        .engine_version(vk::make_api_version(0, 0, 1, 0))
        .api_version(vk::API_VERSION_1_0);

    #[cfg_attr(not(target_os = "macos"), allow(unused_mut))]
    let mut extension_names: Vec<*const c_char> = window_extensions.to_vec();

    // Required for MoltenVK on macOS
    #[cfg(target_os = "macos")]
    extension_names.push(ash::khr::portability_enumeration::NAME.as_ptr());
    #[cfg(target_os = "macos")]
    let create_flags = vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR;
    #[cfg(not(target_os = "macos"))]
    let create_flags = vk::InstanceCreateFlags::empty();

    let layers = if enable_validation {
        available_validation_layers(entry)?
    } else {
        vec![]
    };
    let layer_names: Vec<*const c_char> = layers.iter().map(|l| l.as_ptr()).collect();

    let create_info = vk::InstanceCreateInfo::default()
        .application_info(&app_info)
        .enabled_extension_names(&extension_names)
        .enabled_layer_names(&layer_names)
        .flags(create_flags);

    let instance = entry.create_instance(&create_info, None)?;

    Ok(instance)
}

/// Filter the requested validation layers down to the installed ones,
/// warning about each layer that is missing.
///
/// # Safety
/// The entry must be a valid Vulkan entry point.
unsafe fn available_validation_layers(entry: &ash::Entry) -> Result<Vec<&'static CStr>> {
    let installed = entry.enumerate_instance_layer_properties()?;

    let layers = validation_layers()
        .into_iter()
        .filter(|layer| {
            let found = installed.iter().any(|props| {
                let name = CStr::from_ptr(props.layer_name.as_ptr());
                name == *layer
            });
            if !found {
                tracing::warn!(
                    "Validation layer {} not available, continuing without it",
                    layer.to_string_lossy()
                );
            }
            found
        })
        .collect();

    Ok(layers)
}
