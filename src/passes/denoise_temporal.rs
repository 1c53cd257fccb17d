use crate::buffers::{
    BindingKind, DescriptorSetLayout, DispatchBuffer, StorageBuffer, Texture,
    RADIANCE_FORMAT, VARIANCE_FORMAT,
};
use crate::{passes, Error, Kernel, SceneTextures, ShaderLibrary};

/// Reprojects last frame's radiance/variance through the stored
/// view-projection matrix and blends them with the spatial result, weighted
/// by the reprojected tile-validity history.
///
/// The caller clears the tile-validity history beforehand whenever the
/// history is not trustworthy, which degrades the blend to "no history"
/// instead of sampling garbage.
pub(crate) struct DenoiseTemporalPass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
}

impl DenoiseTemporalPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
    ) -> Result<Self, Error> {
        let layout = DescriptorSetLayout::new(
            device,
            "raylight_denoise_temporal",
            &[
                BindingKind::Uniform,
                BindingKind::Storage { read_only: true }, // tile list
                BindingKind::Texture2d,                   // radiance history
                BindingKind::Texture2d,                   // variance history
                BindingKind::UintTexture2dArray,          // validity history
                BindingKind::Texture2d,                   // depth
                BindingKind::Texture2d,                   // hit depth
                BindingKind::Texture2d,                   // in radiance
                BindingKind::StorageTexture2d {
                    format: RADIANCE_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
                BindingKind::Texture2d, // in variance
                BindingKind::StorageTexture2d {
                    format: VARIANCE_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
            ],
        );

        let pipeline = passes::create_pipeline(
            device,
            shaders,
            Kernel::DenoiseTemporal,
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
        radiance_history: &Texture,
        variance_history: &Texture,
        tilemask_history: &Texture,
        hit_depth: &Texture,
        in_radiance: &Texture,
        out_radiance: &Texture,
        in_variance: &Texture,
        out_variance: &Texture,
        args: &DispatchBuffer,
    ) {
        let bind_group = self.layout.bind(
            device,
            vec![
                frame_data,
                tiles.binding(),
                wgpu::BindingResource::TextureView(radiance_history.view()),
                wgpu::BindingResource::TextureView(variance_history.view()),
                wgpu::BindingResource::TextureView(tilemask_history.view()),
                wgpu::BindingResource::TextureView(scene.depth),
                wgpu::BindingResource::TextureView(hit_depth.view()),
                wgpu::BindingResource::TextureView(in_radiance.view()),
                wgpu::BindingResource::TextureView(out_radiance.view()),
                wgpu::BindingResource::TextureView(in_variance.view()),
                wgpu::BindingResource::TextureView(out_variance.view()),
            ],
        );

        passes::dispatch_indirect(
            encoder,
            "raylight_denoise_temporal",
            &self.pipeline,
            &bind_group,
            args,
        );
    }
}
