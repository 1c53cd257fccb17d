use crate::buffers::{
    BindingKind, DescriptorSetLayout, DispatchBuffer, StorageBuffer, Texture,
    RADIANCE_FORMAT,
};
use crate::{passes, Error, Kernel, SceneTextures, ShaderLibrary};

/// Filters the horizon-scan outputs and blends them with the closure's
/// already-denoised radiance, writing the combined final radiance.
pub(crate) struct HorizonDenoisePass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
}

impl HorizonDenoisePass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
    ) -> Result<Self, Error> {
        let layout = DescriptorSetLayout::new(
            device,
            "raylight_horizon_denoise",
            &[
                BindingKind::Uniform,
                BindingKind::Storage { read_only: true }, // tile list
                BindingKind::Texture2d,                   // depth
                BindingKind::Texture2dArray,              // gbuffer
                BindingKind::Texture2d,                   // horizon radiance
                BindingKind::Texture2d,                   // horizon occlusion
                BindingKind::Texture2d,                   // traced radiance
                BindingKind::StorageTexture2d {
                    format: RADIANCE_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
                BindingKind::UintTexture2dArray, // tile mask
                BindingKind::Texture2d,          // probe irradiance
                BindingKind::Texture2d,          // probe reflection
                BindingKind::Sampler,
            ],
        );

        let pipeline = passes::create_pipeline(
            device,
            shaders,
            Kernel::HorizonDenoise,
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
        horizon_radiance: &Texture,
        horizon_occlusion: &Texture,
        in_radiance: &Texture,
        out_radiance: &Texture,
        tile_mask: &Texture,
        args: &DispatchBuffer,
    ) {
        let bind_group = self.layout.bind(
            device,
            vec![
                frame_data,
                tiles.binding(),
                wgpu::BindingResource::TextureView(scene.depth),
                wgpu::BindingResource::TextureView(scene.gbuffer),
                wgpu::BindingResource::TextureView(horizon_radiance.view()),
                wgpu::BindingResource::TextureView(horizon_occlusion.view()),
                wgpu::BindingResource::TextureView(in_radiance.view()),
                wgpu::BindingResource::TextureView(out_radiance.view()),
                wgpu::BindingResource::TextureView(tile_mask.view()),
                wgpu::BindingResource::TextureView(scene.probe_irradiance),
                wgpu::BindingResource::TextureView(scene.probe_reflection),
                wgpu::BindingResource::Sampler(scene.sampler),
            ],
        );

        passes::dispatch_indirect(
            encoder,
            "raylight_horizon_denoise",
            &self.pipeline,
            &bind_group,
            args,
        );
    }
}
