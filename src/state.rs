use wgpu::{Device, Queue, Surface, SurfaceConfiguration};

use crate::display::RenderQuality;
use crate::programs::{
    ArrowHeadGeometry, ClampedEdgeGeometry, CurvedEdgeGeometry, EdgeGeometryBuilder, EdgeProgram,
    SelfArrowHeadGeometry, SelfLoopGeometry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInputState {
    Idle,
    Pressed,
    Panning,
}

pub struct GpuContext<'a> {
    pub surface: Surface<'a>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
}

/// Pixels the pointer may move between press and release for a click.
pub const CLICK_SLOP: f32 = 4.0;

pub struct InputState {
    pub mouse_pos: [f32; 2],
    pub state: UserInputState,
    pub press_pos: [f32; 2],
    pub last_pos: [f32; 2],
}

impl InputState {
    pub fn new() -> Self {
        Self {
            mouse_pos: [0.0; 2],
            state: UserInputState::Idle,
            press_pos: [0.0; 2],
            last_pos: [0.0; 2],
        }
    }
}

/// One program per edge family, drawn in this order.
pub struct EdgePrograms {
    pub clamped: EdgeProgram<ClampedEdgeGeometry>,
    pub curved: EdgeProgram<CurvedEdgeGeometry>,
    pub self_loop: EdgeProgram<SelfLoopGeometry>,
    pub arrow_head: EdgeProgram<ArrowHeadGeometry>,
    pub self_arrow_head: EdgeProgram<SelfArrowHeadGeometry>,
}

impl EdgePrograms {
    pub fn new(device: &Device, format: wgpu::TextureFormat) -> anyhow::Result<Self> {
        Ok(Self {
            clamped: EdgeProgram::new(device, format, ClampedEdgeGeometry)?,
            curved: EdgeProgram::new(device, format, CurvedEdgeGeometry)?,
            self_loop: EdgeProgram::new(device, format, SelfLoopGeometry)?,
            arrow_head: EdgeProgram::new(device, format, ArrowHeadGeometry::new(RenderQuality::Fine))?,
            self_arrow_head: EdgeProgram::new(device, format, SelfArrowHeadGeometry)?,
        })
    }

    pub fn all(&self) -> [&dyn EdgeGeometryBuilder; 5] {
        [
            &self.clamped,
            &self.curved,
            &self.self_loop,
            &self.arrow_head,
            &self.self_arrow_head,
        ]
    }

    pub fn all_mut(&mut self) -> [&mut dyn EdgeGeometryBuilder; 5] {
        [
            &mut self.clamped,
            &mut self.curved,
            &mut self.self_loop,
            &mut self.arrow_head,
            &mut self.self_arrow_head,
        ]
    }
}
