use anyhow::bail;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// A program's WGSL source.
#[derive(Debug, Clone, Copy)]
pub struct ShaderDesc {
    pub label: &'static str,
    pub source: &'static str,
}

/// Runs `create` inside a validation error scope, turning anything wgpu
/// rejects into an error instead of leaving it to the uncaptured error
/// handler. Shader parse errors, missing entry points and vertex inputs that
/// don't match the buffer layout all surface here.
pub fn validated<T>(device: &wgpu::Device, label: &str, create: impl FnOnce() -> T) -> anyhow::Result<T> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();

    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => bail!("{label}: {err}"),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::GpuProgram;
    use crate::programs::{
        ArrowHeadGeometry, ClampedEdgeGeometry, CurvedEdgeGeometry, EdgeGeometry, EdgeProgram,
        SelfArrowHeadGeometry, SelfLoopGeometry,
    };
    use crate::vertex::EdgeVertex;

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Any adapter will do; machines without one skip the GPU tests.
    fn device() -> Option<wgpu::Device> {
        let instance = wgpu::Instance::default();
        let adapter =
            pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default())).ok()?;
        let (device, _queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default())).ok()?;
        Some(device)
    }

    #[test]
    fn bundled_shaders_build() {
        let Some(device) = device() else {
            return;
        };

        EdgeProgram::new(&device, FORMAT, CurvedEdgeGeometry).unwrap();
        EdgeProgram::new(&device, FORMAT, SelfLoopGeometry).unwrap();
        EdgeProgram::new(&device, FORMAT, ArrowHeadGeometry::default()).unwrap();
        EdgeProgram::new(&device, FORMAT, SelfArrowHeadGeometry).unwrap();
        EdgeProgram::new(&device, FORMAT, ClampedEdgeGeometry).unwrap();
    }

    #[test]
    fn rejects_layout_missing_a_shader_input() {
        let Some(device) = device() else {
            return;
        };

        // The arrow shader reads location 4, which edge vertices don't have.
        let err = GpuProgram::new(&device, FORMAT, &ArrowHeadGeometry::shader(), EdgeVertex::desc())
            .err()
            .unwrap();
        assert!(err.to_string().contains("Arrow Head Shader"));
    }

    #[test]
    fn rejects_broken_source() {
        let Some(device) = device() else {
            return;
        };

        let broken = ShaderDesc {
            label: "Broken Shader",
            source: "@vertex fn vs_main( -> @builtin(position) vec4<f32> {",
        };
        let err = GpuProgram::new(&device, FORMAT, &broken, EdgeVertex::desc())
            .err()
            .unwrap();
        assert!(err.to_string().contains("Broken Shader"));
    }

    #[test]
    fn scope_passes_value_through() {
        let Some(device) = device() else {
            return;
        };

        assert_eq!(validated(&device, "noop", || 7).unwrap(), 7);
    }
}
