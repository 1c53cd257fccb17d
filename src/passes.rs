mod denoise_bilateral;
mod denoise_spatial;
mod denoise_temporal;
mod horizon_denoise;
mod horizon_scan;
mod horizon_setup;
mod ray_generate;
mod tile_classify;
mod tile_compact;
mod trace_fallback;
mod trace_planar;
mod trace_screen;

pub(crate) use self::denoise_bilateral::*;
pub(crate) use self::denoise_spatial::*;
pub(crate) use self::denoise_temporal::*;
pub(crate) use self::horizon_denoise::*;
pub(crate) use self::horizon_scan::*;
pub(crate) use self::horizon_setup::*;
pub(crate) use self::ray_generate::*;
pub(crate) use self::tile_classify::*;
pub(crate) use self::tile_compact::*;
pub(crate) use self::trace_fallback::*;
pub(crate) use self::trace_planar::*;
pub(crate) use self::trace_screen::*;

use glam::UVec2;

use crate::buffers::{DescriptorSetLayout, DispatchBuffer};
use crate::{Error, Kernel, ShaderLibrary};

pub(crate) fn create_pipeline(
    device: &wgpu::Device,
    shaders: &dyn ShaderLibrary,
    kernel: Kernel,
    layout: &DescriptorSetLayout,
) -> Result<wgpu::ComputePipeline, Error> {
    let module = shaders
        .kernel(kernel)
        .ok_or(Error::MissingKernel(kernel))?;

    let name = kernel.name();

    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{name}_pipeline_layout")),
            bind_group_layouts: &[layout.layout()],
            push_constant_ranges: &[],
        });

    Ok(
        device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(name),
            layout: Some(&pipeline_layout),
            module,
            entry_point: "main",
        }),
    )
}

/// Records one dispatch in its own compute-pass scope.
///
/// The scope boundary is the ordering primitive here: a pass's reads are
/// guaranteed to observe any prior pass's writes, while dispatches inside
/// one scope may overlap. Every logical pass therefore gets exactly one
/// scope.
pub(crate) fn dispatch(
    encoder: &mut wgpu::CommandEncoder,
    label: &'static str,
    pipeline: &wgpu::ComputePipeline,
    bind_group: &wgpu::BindGroup,
    groups: UVec2,
) {
    let mut pass =
        encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some(label),
        });

    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.dispatch_workgroups(groups.x, groups.y, 1);
}

/// Like [`dispatch()`], but with workgroup counts read back from a buffer a
/// prior pass populated.
pub(crate) fn dispatch_indirect(
    encoder: &mut wgpu::CommandEncoder,
    label: &'static str,
    pipeline: &wgpu::ComputePipeline,
    bind_group: &wgpu::BindGroup,
    args: &DispatchBuffer,
) {
    let mut pass =
        encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some(label),
        });

    pass.set_pipeline(pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    pass.dispatch_workgroups_indirect(args.buffer(), 0);
}
