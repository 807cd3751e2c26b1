use crate::camera::Camera;
use crate::display::RenderQuality;
use crate::labels::LabelLayout;
use crate::scene::Scene;
use crate::settings::RenderSettings;
use crate::state::{EdgePrograms, GpuContext, InputState};
use anyhow::Context;
use std::sync::Arc;
use winit::dpi::PhysicalSize;
use winit::window::Window;

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        /// 2D overlay canvas the labels are painted on.
        pub type LabelSurface = Option<crate::labels::WebLabelCanvas>;
    } else {
        /// Font used to lay labels out for hit testing.
        pub type LabelSurface = Option<crate::labels::GlyphMeasure>;
    }
}

/// Everything the demo needs besides the window.
pub struct DemoOptions {
    pub settings: RenderSettings,
    pub scene: Scene,
    pub labels: LabelSurface,
}

pub struct State {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    pub gpu: GpuContext<'static>,
    pub programs: EdgePrograms,
    pub input: InputState,

    pub camera: Camera,
    pub scene: Scene,
    pub settings: RenderSettings,
    pub quality_override: Option<RenderQuality>,
    pub quality: RenderQuality,

    pub label_surface: LabelSurface,
    pub labels: Vec<(usize, LabelLayout)>,
}

impl State {
    pub async fn new(window: Arc<Window>, options: DemoOptions) -> anyhow::Result<State> {
        #[allow(unused_mut)]
        let mut size = window.inner_size();

        #[cfg(target_arch = "wasm32")]
        {
            if size.width == 0 || size.height == 0 {
                size = winit::dpi::PhysicalSize::new(1920, 1080);
            }
        }

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let programs = EdgePrograms::new(&device, surface_format)?;

        log::info!(
            "{} nodes, {} edges, surface {}x{} {:?}",
            options.scene.nodes.len(),
            options.scene.edges.len(),
            config.width,
            config.height,
            surface_format
        );

        let gpu = GpuContext {
            surface,
            device,
            queue,
            config,
        };

        Ok(Self {
            window,
            size,
            gpu,
            programs,
            input: InputState::new(),
            camera: Camera::default(),
            scene: options.scene,
            settings: options.settings,
            quality_override: None,
            quality: RenderQuality::Fine,
            label_surface: options.labels,
            labels: Vec::new(),
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn viewport(&self) -> (f32, f32) {
        (self.size.width as f32, self.size.height as f32)
    }
}
