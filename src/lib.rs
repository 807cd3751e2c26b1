pub mod bezier;
pub mod camera;
pub mod color;
pub mod display;
pub mod gpu;
pub mod groups;
pub mod labels;
pub mod math;
pub mod programs;
pub mod scene;
pub mod settings;
pub mod vertex;

mod app;
mod app_state;
mod event_handler;
mod renderer;
mod state;
mod update_logic;

// Re-export the main public interface
pub use app::run;
pub use camera::Camera;
pub use color::Color;
pub use display::{Direction, EdgeDisplayData, EdgeKind, NodeDisplayData, RenderQuality};
pub use gpu::RenderParams;
pub use programs::{EdgeGeometry, EdgeGeometryBuilder, EdgeProgram, ProgramBuffers};
pub use settings::RenderSettings;

// Re-export for WASM compatibility
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn start() {
    if let Err(err) = run().await {
        log::error!("{err:#}");
    }
}
