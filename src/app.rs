use crate::app_state::{DemoOptions, State};
use crate::scene::Scene;
use crate::settings::RenderSettings;
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

#[cfg(target_os = "macos")]
use winit::platform::macos::WindowAttributesExtMacOS;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

struct App {
    options: Option<DemoOptions>,
    state: Option<State>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let Some(mut options) = self.options.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("graph edges");

        #[cfg(target_os = "macos")]
        {
            window_attributes = window_attributes
                .with_titlebar_transparent(true)
                .with_title_hidden(false)
                .with_fullsize_content_view(true);
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => window,
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        #[cfg(target_arch = "wasm32")]
        {
            use winit::dpi::PhysicalSize;

            match mount_canvases(&window, &options.settings) {
                Some((size, labels)) => {
                    let _ = window.request_inner_size(PhysicalSize::new(size.0, size.1));
                    options.labels = Some(labels);
                }
                None => log::warn!("couldn't mount the canvases, labels are disabled"),
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        if options.labels.is_none() {
            options.labels = load_label_font(&options.settings);
        }

        pollster::block_on(async {
            match State::new(Arc::new(window), options).await {
                Ok(state) => self.state = Some(state),
                Err(err) => {
                    log::error!("failed to start renderer: {err:#}");
                    event_loop.exit();
                }
            }
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if window_id != state.window().id() || state.input(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                log::info!("WindowEvent::Resized: {}x{}", physical_size.width, physical_size.height);
                state.resize(physical_size);
            }
            WindowEvent::RedrawRequested => {
                state.update();
                match state.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                    Err(e) => log::warn!("{:?}", e),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window().request_redraw();
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_label_font(settings: &RenderSettings) -> crate::app_state::LabelSurface {
    let Some(path) = &settings.label_font_file else {
        log::info!("no label font configured, edge labels are disabled");
        return None;
    };

    match crate::labels::GlyphMeasure::load(path) {
        Ok(measure) => Some(measure),
        Err(err) => {
            log::warn!("{err:#}, edge labels are disabled");
            None
        }
    }
}

/// Options for the native demo.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, clap::Parser)]
#[command(author, version, about = "Draws a graph's edges with wgpu", long_about = None)]
struct Cli {
    /// Render settings JSON; defaults apply when omitted
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,
    /// Scene JSON; the built-in sample graph when omitted
    #[arg(long, value_name = "FILE")]
    scene: Option<PathBuf>,
}

#[cfg(not(target_arch = "wasm32"))]
impl Cli {
    fn into_options(self) -> anyhow::Result<DemoOptions> {
        let settings = match self.settings {
            Some(path) => RenderSettings::load(path)?,
            None => RenderSettings::default(),
        };
        let scene = match self.scene {
            Some(path) => Scene::load(path)?,
            None => Scene::sample(),
        };

        Ok(DemoOptions {
            settings,
            scene,
            labels: None,
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_options() -> anyhow::Result<DemoOptions> {
    use clap::Parser;
    Cli::parse().into_options()
}

#[cfg(target_arch = "wasm32")]
fn load_options() -> anyhow::Result<DemoOptions> {
    Ok(DemoOptions {
        settings: RenderSettings::default(),
        scene: Scene::sample(),
        labels: None,
    })
}

/// Attaches the surface canvas and a label overlay on top of it, sized to
/// the browser window. Returns the physical size and the overlay.
#[cfg(target_arch = "wasm32")]
fn mount_canvases(
    window: &Window,
    settings: &RenderSettings,
) -> Option<((u32, u32), crate::labels::WebLabelCanvas)> {
    use winit::platform::web::WindowExtWebSys;

    let web_window = web_sys::window()?;
    let document = web_window.document()?;
    let container = document.get_element_by_id("wasm-example")?;

    let canvas: web_sys::HtmlCanvasElement = window.canvas()?;
    let overlay: web_sys::HtmlCanvasElement =
        document.create_element("canvas").ok()?.dyn_into().ok()?;

    container.append_child(&canvas).ok()?;
    container.append_child(&overlay).ok()?;

    let device_pixel_ratio = web_window.device_pixel_ratio();
    let css_width = web_window.inner_width().ok()?.as_f64()?;
    let css_height = web_window.inner_height().ok()?.as_f64()?;
    let width = (css_width * device_pixel_ratio) as u32;
    let height = (css_height * device_pixel_ratio) as u32;

    for (element, layer) in [(&canvas, "0"), (&overlay, "1")] {
        element.set_width(width);
        element.set_height(height);

        let style = element.style();
        style.set_property("position", "absolute").ok()?;
        style.set_property("left", "0").ok()?;
        style.set_property("top", "0").ok()?;
        style.set_property("z-index", layer).ok()?;
        style.set_property("width", &format!("{}px", css_width as u32)).ok()?;
        style.set_property("height", &format!("{}px", css_height as u32)).ok()?;
    }
    overlay.style().set_property("pointer-events", "none").ok()?;

    log::info!(
        "Canvas size: {}x{} (CSS: {}x{}, DPR: {})",
        width,
        height,
        css_width as u32,
        css_height as u32,
        device_pixel_ratio
    );

    let context: web_sys::CanvasRenderingContext2d =
        overlay.get_context("2d").ok()??.dyn_into().ok()?;

    Some((
        (width, height),
        crate::labels::WebLabelCanvas::new(context, settings.label_font.clone()),
    ))
}

pub async fn run() -> anyhow::Result<()> {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            console_log::init_with_level(log::Level::Info)
                .map_err(|err| anyhow::anyhow!("couldn't initialize logger: {err}"))?;
        } else {
            env_logger::init();
        }
    }

    let options = load_options()?;
    let event_loop = EventLoop::new()?;
    let mut app = App {
        options: Some(options),
        state: None,
    };

    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn files_are_named_flags() {
        let cli = Cli::try_parse_from(["graph-edges-demo", "--scene", "scene.json"]).unwrap();
        assert_eq!(cli.scene, Some(PathBuf::from("scene.json")));
        assert_eq!(cli.settings, None);

        let cli = Cli::try_parse_from(["graph-edges-demo"]).unwrap();
        assert!(cli.settings.is_none() && cli.scene.is_none());
    }

    #[test]
    fn stray_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["graph-edges-demo", "scene.json"]).is_err());
        assert!(Cli::try_parse_from(["graph-edges-demo", "--zoom", "2"]).is_err());
    }

    #[test]
    fn defaults_without_files() {
        let options = Cli::try_parse_from(["graph-edges-demo"])
            .unwrap()
            .into_options()
            .unwrap();
        assert_eq!(options.scene, Scene::sample());
    }

    #[test]
    fn missing_scene_file_is_an_error() {
        let cli = Cli::try_parse_from(["graph-edges-demo", "--scene", "/no/such/scene.json"]).unwrap();
        assert!(cli.into_options().is_err());
    }
}
