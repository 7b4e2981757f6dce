//! wgpu device, queue, and surface management

use std::sync::Arc;
use winit::window::Window;

/// Error initializing the render context or pipeline
#[derive(Debug)]
pub enum RenderError {
    /// Surface creation failed
    CreateSurface(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found
    NoAdapter,
    /// Device request failed
    RequestDevice(wgpu::RequestDeviceError),
    /// The surface has no supported configuration
    SurfaceUnsupported,
    /// Shader source could not be used
    Shader(ember_core::asset::AssetError),
}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        RenderError::CreateSurface(e)
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderError::RequestDevice(e)
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::CreateSurface(e) => write!(f, "Surface creation failed: {}", e),
            RenderError::NoAdapter => write!(f, "No compatible GPU adapter found"),
            RenderError::RequestDevice(e) => write!(f, "Device request failed: {}", e),
            RenderError::SurfaceUnsupported => write!(f, "Surface configuration unsupported"),
            RenderError::Shader(e) => write!(f, "Shader error: {}", e),
        }
    }
}

impl std::error::Error for RenderError {}

/// WGPU state tied to one window
pub struct RenderContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
}

impl RenderContext {
    /// Create the instance, surface, adapter, and device for a window
    ///
    /// Any failure here is a fatal startup error for the application.
    pub async fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Ember Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await?;

        let size = window.inner_size();
        let config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(RenderError::SurfaceUnsupported)?;
        surface.configure(&device, &config);

        log::info!(
            "render context ready: {}x{} {:?}",
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
        })
    }

    /// Reconfigure the surface for a new window size
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Current viewport aspect ratio (width / height)
    pub fn aspect_ratio(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }
}
