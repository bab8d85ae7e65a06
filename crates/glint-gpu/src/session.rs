//! Session lifecycle.
//!
//! A [`Session`] owns the whole Vulkan bootstrap chain in strict acquisition
//! order: instance, surface, physical device selection, logical device,
//! swapchain and its image views. Release is the exact reverse. Each stage
//! lives in an optional slot so that teardown is safe from any state the
//! bootstrap reached, skipping resources that were never created; the same
//! release path runs on bootstrap failure and on drop.

use crate::device::create_device;
use crate::error::{GpuError, Result};
use crate::instance::create_instance;
use crate::negotiate::{negotiate, SwapchainConfig};
use crate::probe::{query_surface_support, AdapterProfile};
use crate::select::pick_physical_device;
use crate::swapchain::Swapchain;
use crate::window::WindowSystem;
use ash::vk;

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Application name passed to the driver.
    pub app_name: String,
    /// Enable Vulkan validation layers (default: debug builds only).
    pub validation: bool,
    /// Request a hard frame-rate cap: forces the blocking vsync present
    /// mode even when a low-latency mode is available.
    pub frame_rate_cap: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            app_name: "Glint".to_string(),
            validation: cfg!(debug_assertions),
            frame_rate_cap: false,
        }
    }
}

impl SessionConfig {
    /// Create a new config with the given application name.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Default::default()
        }
    }

    /// Enable or disable validation layers.
    #[must_use]
    pub fn with_validation(mut self, validation: bool) -> Self {
        self.validation = validation;
        self
    }

    /// Request or release a hard frame-rate cap.
    #[must_use]
    pub fn with_frame_rate_cap(mut self, cap: bool) -> Self {
        self.frame_rate_cap = cap;
        self
    }
}

/// A bootstrapped Vulkan session.
///
/// Every session returned by [`Session::bootstrap`] is fully initialized;
/// the optional slots only ever hold `None` during teardown and inside a
/// failed bootstrap.
pub struct Session {
    entry: ash::Entry,
    instance: Option<ash::Instance>,
    surface_loader: Option<ash::khr::surface::Instance>,
    surface: Option<vk::SurfaceKHR>,
    physical_device: vk::PhysicalDevice,
    adapter: Option<AdapterProfile>,
    queue_family: u32,
    device: Option<ash::Device>,
    queue: vk::Queue,
    swapchain_loader: Option<ash::khr::swapchain::Device>,
    swapchain: Option<Swapchain>,
    swapchain_config: Option<SwapchainConfig>,
}

impl Session {
    /// Acquire the whole bootstrap chain for the given window.
    ///
    /// On failure, everything acquired so far is released in reverse order
    /// before the error is returned.
    pub fn bootstrap<W: WindowSystem>(window: &W, config: &SessionConfig) -> Result<Self> {
        let entry =
            unsafe { ash::Entry::load() }.map_err(|e| GpuError::EntryLoad(e.to_string()))?;

        let mut session = Self {
            entry,
            instance: None,
            surface_loader: None,
            surface: None,
            physical_device: vk::PhysicalDevice::null(),
            adapter: None,
            queue_family: 0,
            device: None,
            queue: vk::Queue::null(),
            swapchain_loader: None,
            swapchain: None,
            swapchain_config: None,
        };

        if let Err(e) = unsafe { session.acquire(window, config) } {
            unsafe { session.release() };
            return Err(e);
        }

        Ok(session)
    }

    /// Run the acquisition stages in order, recording each resource in its
    /// slot as soon as it exists so [`Self::release`] can see it.
    ///
    /// # Safety
    /// Must only be called once, from [`Self::bootstrap`], on a session with
    /// every slot empty.
    unsafe fn acquire<W: WindowSystem>(
        &mut self,
        window: &W,
        config: &SessionConfig,
    ) -> Result<()> {
        let window_extensions = window.required_extensions()?;
        let instance = &*self.instance.insert(create_instance(
            &self.entry,
            &config.app_name,
            &window_extensions,
            config.validation,
        )?);
        tracing::debug!("Instance created");

        let surface_loader = &*self
            .surface_loader
            .insert(ash::khr::surface::Instance::new(&self.entry, instance));
        let surface = *self
            .surface
            .insert(window.create_surface(&self.entry, instance)?);
        tracing::debug!("Surface created");

        let (physical_device, adapter) =
            pick_physical_device(instance, surface_loader, surface)?;
        self.physical_device = physical_device;
        // A winning adapter always has a queue family; fail closed otherwise.
        self.queue_family = adapter.queue_family.ok_or(GpuError::NoSuitableGpu)?;
        self.adapter = Some(adapter);

        let (device, queue) = create_device(instance, physical_device, self.queue_family)?;
        let device = &*self.device.insert(device);
        self.queue = queue;
        tracing::debug!("Logical device created");

        let support = query_surface_support(surface_loader, physical_device, surface)?;
        let (width, height) = window.framebuffer_size();
        let swapchain_config = negotiate(&support, width, height, config.frame_rate_cap);

        let swapchain_loader = &*self
            .swapchain_loader
            .insert(ash::khr::swapchain::Device::new(instance, device));
        let swapchain = Swapchain::new(
            device,
            swapchain_loader,
            surface,
            &support.capabilities,
            &swapchain_config,
            self.queue_family,
        )?;
        tracing::info!(
            "Swapchain created: {}x{} ({} images, {:?})",
            swapchain.extent.width,
            swapchain.extent.height,
            swapchain.images.len(),
            swapchain_config.present_mode
        );
        self.swapchain = Some(swapchain);
        self.swapchain_config = Some(swapchain_config);

        Ok(())
    }

    /// Release every acquired resource in exact reverse order of
    /// acquisition, skipping slots that were never filled. Idempotent.
    ///
    /// # Safety
    /// No acquired resource may be in use.
    unsafe fn release(&mut self) {
        if let Some(device) = &self.device {
            let _ = device.device_wait_idle();
        }

        if let Some(swapchain) = self.swapchain.take() {
            // The device and loader exist whenever the swapchain does
            if let (Some(device), Some(loader)) = (&self.device, &self.swapchain_loader) {
                swapchain.destroy(device, loader);
            }
        }
        self.swapchain_loader = None;

        if let Some(device) = self.device.take() {
            device.destroy_device(None);
        }

        if let Some(surface) = self.surface.take() {
            if let Some(loader) = &self.surface_loader {
                loader.destroy_surface(surface, None);
            }
        }
        self.surface_loader = None;

        if let Some(instance) = self.instance.take() {
            instance.destroy_instance(None);
        }
    }

    /// The Vulkan instance.
    pub fn instance(&self) -> &ash::Instance {
        self.instance.as_ref().expect("session is initialized")
    }

    /// The logical device.
    pub fn device(&self) -> &ash::Device {
        self.device.as_ref().expect("session is initialized")
    }

    /// The selected physical device.
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// Profile of the selected adapter.
    pub fn adapter(&self) -> &AdapterProfile {
        self.adapter.as_ref().expect("session is initialized")
    }

    /// The combined graphics/present queue.
    pub fn queue(&self) -> vk::Queue {
        self.queue
    }

    /// Index of the combined graphics/present queue family.
    pub fn queue_family(&self) -> u32 {
        self.queue_family
    }

    /// The swapchain and its presentable image set.
    pub fn swapchain(&self) -> &Swapchain {
        self.swapchain.as_ref().expect("session is initialized")
    }

    /// The configuration the swapchain was negotiated with.
    pub fn swapchain_config(&self) -> &SwapchainConfig {
        self.swapchain_config
            .as_ref()
            .expect("session is initialized")
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        unsafe { self.release() };
    }
}
