use crate::buffers::{
    BindingKind, DescriptorSetLayout, DispatchBuffer, StorageBuffer, Texture,
    RADIANCE_FORMAT, RAY_TIME_FORMAT,
};
use crate::{passes, Error, Kernel, SceneTextures, ShaderLibrary};

/// Resolves reflection rays against the planar capture, running before the
/// general screen trace and writing into the same ray buffers.
///
/// The two passes write disjoint pixel regions in the common case; where
/// they overlap, the screen-trace kernel's own precedence applies since it
/// runs second. This ordering is a deliberate seam, not a race: the pass
/// boundary between them orders the writes.
pub(crate) struct TracePlanarPass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
}

impl TracePlanarPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
    ) -> Result<Self, Error> {
        let layout = DescriptorSetLayout::new(
            device,
            "raylight_trace_planar",
            &[
                BindingKind::Uniform,
                BindingKind::Storage { read_only: true }, // tile list
                BindingKind::Texture2d,                   // ray data
                BindingKind::StorageTexture2d {
                    format: RAY_TIME_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
                BindingKind::StorageTexture2d {
                    format: RADIANCE_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
                BindingKind::Texture2d, // planar capture
                BindingKind::Texture2d, // depth
                BindingKind::Sampler,
            ],
        );

        let pipeline = passes::create_pipeline(
            device,
            shaders,
            Kernel::TracePlanar,
            &layout,
        )?;

        Ok(Self { layout, pipeline })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        frame_data: wgpu::BindingResource,
        scene: &SceneTextures,
        planar_capture: &wgpu::TextureView,
        tiles: &StorageBuffer,
        ray_data: &Texture,
        ray_time: &Texture,
        ray_radiance: &Texture,
        args: &DispatchBuffer,
    ) {
        let bind_group = self.layout.bind(
            device,
            vec![
                frame_data,
                tiles.binding(),
                wgpu::BindingResource::TextureView(ray_data.view()),
                wgpu::BindingResource::TextureView(ray_time.view()),
                wgpu::BindingResource::TextureView(ray_radiance.view()),
                wgpu::BindingResource::TextureView(planar_capture),
                wgpu::BindingResource::TextureView(scene.depth),
                wgpu::BindingResource::Sampler(scene.sampler),
            ],
        );

        // TODO(perf): dispatch only over tiles touching the planar capture
        // instead of the full tracing work-list.
        passes::dispatch_indirect(
            encoder,
            "raylight_trace_planar",
            &self.pipeline,
            &bind_group,
            args,
        );
    }
}
