use glam::UVec2;

use crate::buffers::{
    BindingKind, DescriptorSetLayout, Texture, TILE_MASK_FORMAT,
};
use crate::{passes, Error, Kernel, SceneTextures, ShaderLibrary};

/// Marks, per tile and per closure layer, whether tracing and/or denoising
/// must run, for both the ray-trace and the horizon-scan paths.
///
/// Runs once per frame for all closures combined; one workgroup per
/// full-resolution tile.
pub(crate) struct TileClassifyPass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
}

impl TileClassifyPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
    ) -> Result<Self, Error> {
        let mask = BindingKind::StorageTexture2dArray {
            format: TILE_MASK_FORMAT,
            access: wgpu::StorageTextureAccess::ReadWrite,
        };

        let layout = DescriptorSetLayout::new(
            device,
            "raylight_tile_classify",
            &[
                BindingKind::Uniform,
                BindingKind::Texture2d,      // depth
                BindingKind::Texture2dArray, // gbuffer
                mask,                        // raytrace tracing
                mask,                        // raytrace denoise
                mask,                        // horizon tracing
                mask,                        // horizon denoise
            ],
        );

        let pipeline = passes::create_pipeline(
            device,
            shaders,
            Kernel::TileClassify,
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
        raytrace_tracing: &Texture,
        raytrace_denoise: &Texture,
        horizon_tracing: &Texture,
        horizon_denoise: &Texture,
        groups: UVec2,
    ) {
        let bind_group = self.layout.bind(
            device,
            vec![
                frame_data,
                wgpu::BindingResource::TextureView(scene.depth),
                wgpu::BindingResource::TextureView(scene.gbuffer),
                wgpu::BindingResource::TextureView(raytrace_tracing.view()),
                wgpu::BindingResource::TextureView(raytrace_denoise.view()),
                wgpu::BindingResource::TextureView(horizon_tracing.view()),
                wgpu::BindingResource::TextureView(horizon_denoise.view()),
            ],
        );

        passes::dispatch(
            encoder,
            "raylight_tile_classify",
            &self.pipeline,
            &bind_group,
            groups,
        );
    }
}
