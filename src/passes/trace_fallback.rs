use crate::buffers::{
    BindingKind, DescriptorSetLayout, DispatchBuffer, StorageBuffer, Texture,
    RADIANCE_FORMAT, RAY_TIME_FORMAT,
};
use crate::{passes, Error, Kernel, SceneTextures, ShaderLibrary};

/// Writes a filtered probe lookup through the ray buffers when actual
/// tracing is disabled or unsupported for the closure.
///
/// Downstream denoising is agnostic to which path produced the data, so
/// this pass shares the exact output contract of the screen trace.
pub(crate) struct TraceFallbackPass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
}

impl TraceFallbackPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
    ) -> Result<Self, Error> {
        let layout = DescriptorSetLayout::new(
            device,
            "raylight_trace_fallback",
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
                BindingKind::Texture2d, // depth
                BindingKind::Texture2d, // probe irradiance
                BindingKind::Texture2d, // probe reflection
                BindingKind::Sampler,
            ],
        );

        let pipeline = passes::create_pipeline(
            device,
            shaders,
            Kernel::TraceFallback,
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
                wgpu::BindingResource::TextureView(scene.depth),
                wgpu::BindingResource::TextureView(scene.probe_irradiance),
                wgpu::BindingResource::TextureView(scene.probe_reflection),
                wgpu::BindingResource::Sampler(scene.sampler),
            ],
        );

        passes::dispatch_indirect(
            encoder,
            "raylight_trace_fallback",
            &self.pipeline,
            &bind_group,
            args,
        );
    }
}
