//! Edge programs: per-edge geometry written into flat vertex buffers.
//!
//! A program is split in three parts. [`EdgeGeometry`] is the pure strategy
//! that knows how one edge turns into vertices. [`ProgramBuffers`] holds the
//! CPU-side arrays every edge writes into at its own offset. [`EdgeProgram`]
//! composes both with a [`GpuProgram`] and is what the host drives through the
//! [`EdgeGeometryBuilder`] trait.

pub mod arrow_head;
pub mod clamped;
pub mod curved;
pub mod self_arrow_head;
pub mod self_loop;

use crate::display::{EdgeDisplayData, NodeDisplayData, RenderQuality};
use crate::gpu::{GpuProgram, RenderParams, ShaderDesc};

pub use arrow_head::ArrowHeadGeometry;
pub use clamped::ClampedEdgeGeometry;
pub use curved::CurvedEdgeGeometry;
pub use self_arrow_head::SelfArrowHeadGeometry;
pub use self_loop::SelfLoopGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    /// Vertices per edge.
    pub points: usize,
    /// Floats per vertex.
    pub attributes: usize,
}

impl VertexLayout {
    pub const fn stride(&self) -> usize {
        self.points * self.attributes
    }
}

/// CPU-side buffers of one program. Edge `offset` owns the floats
/// `offset * stride .. (offset + 1) * stride` and nothing else.
#[derive(Debug, Clone)]
pub struct ProgramBuffers {
    pub layout: VertexLayout,
    pub vertex_array: Vec<f32>,
    pub indices_array: Vec<u32>,
}

impl ProgramBuffers {
    pub fn new(layout: VertexLayout) -> Self {
        Self {
            layout,
            vertex_array: Vec::new(),
            indices_array: Vec::new(),
        }
    }

    /// Resizes for `capacity` edges. Returns true when the vertex count
    /// changed and the indices need rebuilding.
    pub fn allocate(&mut self, capacity: usize) -> bool {
        let len = capacity * self.layout.stride();
        if len == self.vertex_array.len() {
            return false;
        }
        self.vertex_array.resize(len, 0.0);
        true
    }

    pub fn capacity(&self) -> usize {
        self.vertex_array.len() / self.layout.stride()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_array.len() / self.layout.attributes
    }

    pub fn slice(&self, offset: usize) -> Option<&[f32]> {
        let stride = self.layout.stride();
        self.vertex_array.get(offset * stride..(offset + 1) * stride)
    }

    pub fn slice_mut(&mut self, offset: usize) -> Option<&mut [f32]> {
        let stride = self.layout.stride();
        self.vertex_array
            .get_mut(offset * stride..(offset + 1) * stride)
    }

    pub fn has_nothing_to_render(&self) -> bool {
        self.vertex_array.is_empty()
    }
}

/// How one kind of edge becomes vertices.
pub trait EdgeGeometry {
    const NAME: &'static str;
    const LAYOUT: VertexLayout;

    /// Fills `slice` (exactly one stride) for a visible edge. Returns false
    /// when the edge cannot be drawn this frame; the caller then zeroes it.
    fn write(
        &self,
        slice: &mut [f32],
        source: &NodeDisplayData,
        target: &NodeDisplayData,
        edge: &EdgeDisplayData,
    ) -> bool;

    /// Index buffer for `vertex_count` vertices. Empty means the program
    /// draws its vertices as a plain triangle list.
    fn indices(&self, _vertex_count: usize) -> Vec<u32> {
        Vec::new()
    }

    fn set_quality(&mut self, _quality: RenderQuality) {}

    fn shader() -> ShaderDesc;

    fn vertex_layout() -> wgpu::VertexBufferLayout<'static>;
}

pub fn hide(buffers: &mut ProgramBuffers, offset: usize) {
    if let Some(slice) = buffers.slice_mut(offset) {
        slice.fill(0.0);
    }
}

/// Writes edge `offset` into `buffers`, zeroing its slice when hidden or when
/// the geometry gives up.
pub fn process<G: EdgeGeometry>(
    geometry: &G,
    buffers: &mut ProgramBuffers,
    source: &NodeDisplayData,
    target: &NodeDisplayData,
    edge: &EdgeDisplayData,
    hidden: bool,
    offset: usize,
) {
    let Some(slice) = buffers.slice_mut(offset) else {
        log::warn!(
            "{}: offset {} is past the allocated capacity",
            G::NAME,
            offset
        );
        return;
    };

    if hidden {
        slice.fill(0.0);
        return;
    }

    if !geometry.write(slice, source, target, edge) {
        slice.fill(0.0);
    }
}

pub fn compute_indices<G: EdgeGeometry>(geometry: &G, buffers: &mut ProgramBuffers) {
    buffers.indices_array = geometry.indices(buffers.vertex_count());
}

/// What the host sees of a program.
pub trait EdgeGeometryBuilder {
    fn name(&self) -> &'static str;

    fn allocate(&mut self, capacity: usize);

    fn set_quality(&mut self, quality: RenderQuality);

    fn process(
        &mut self,
        source: &NodeDisplayData,
        target: &NodeDisplayData,
        edge: &EdgeDisplayData,
        hidden: bool,
        offset: usize,
    );

    fn compute_indices(&mut self);

    fn buffer_data(&mut self, device: &wgpu::Device);

    fn render(&self, queue: &wgpu::Queue, pass: &mut wgpu::RenderPass<'_>, params: &RenderParams);
}

pub struct EdgeProgram<G: EdgeGeometry> {
    geometry: G,
    buffers: ProgramBuffers,
    gpu: GpuProgram,
}

impl<G: EdgeGeometry> EdgeProgram<G> {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        geometry: G,
    ) -> anyhow::Result<Self> {
        let gpu = GpuProgram::new(device, format, &G::shader(), G::vertex_layout())?;

        Ok(Self {
            geometry,
            buffers: ProgramBuffers::new(G::LAYOUT),
            gpu,
        })
    }

    pub fn buffers(&self) -> &ProgramBuffers {
        &self.buffers
    }
}

impl<G: EdgeGeometry> EdgeGeometryBuilder for EdgeProgram<G> {
    fn name(&self) -> &'static str {
        G::NAME
    }

    fn allocate(&mut self, capacity: usize) {
        if self.buffers.allocate(capacity) {
            self.compute_indices();
        }
    }

    fn set_quality(&mut self, quality: RenderQuality) {
        self.geometry.set_quality(quality);
    }

    fn process(
        &mut self,
        source: &NodeDisplayData,
        target: &NodeDisplayData,
        edge: &EdgeDisplayData,
        hidden: bool,
        offset: usize,
    ) {
        process(
            &self.geometry,
            &mut self.buffers,
            source,
            target,
            edge,
            hidden,
            offset,
        );
    }

    fn compute_indices(&mut self) {
        compute_indices(&self.geometry, &mut self.buffers);
    }

    fn buffer_data(&mut self, device: &wgpu::Device) {
        self.gpu.buffer_data(device, &self.buffers);
    }

    fn render(&self, queue: &wgpu::Queue, pass: &mut wgpu::RenderPass<'_>, params: &RenderParams) {
        if self.buffers.has_nothing_to_render() {
            return;
        }
        self.gpu.render(queue, pass, params);
    }
}
