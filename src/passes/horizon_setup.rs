use glam::UVec2;

use crate::buffers::{
    BindingKind, DescriptorSetLayout, Texture, DOWNSAMPLED_NORMAL_FORMAT,
    RADIANCE_FORMAT,
};
use crate::{passes, Error, Kernel, SceneTextures, ShaderLibrary};

/// Downsamples scene radiance and normals to tracing resolution for the
/// horizon scan. Runs once per frame, before classification.
pub(crate) struct HorizonSetupPass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
}

impl HorizonSetupPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
    ) -> Result<Self, Error> {
        let layout = DescriptorSetLayout::new(
            device,
            "raylight_horizon_setup",
            &[
                BindingKind::Uniform,
                BindingKind::Texture2d,      // depth
                BindingKind::Texture2d,      // screen radiance
                BindingKind::Texture2dArray, // gbuffer
                BindingKind::StorageTexture2d {
                    format: RADIANCE_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
                BindingKind::StorageTexture2d {
                    format: DOWNSAMPLED_NORMAL_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
                BindingKind::Sampler,
            ],
        );

        let pipeline = passes::create_pipeline(
            device,
            shaders,
            Kernel::HorizonSetup,
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
        screen_radiance: &wgpu::TextureView,
        out_radiance: &Texture,
        out_normal: &Texture,
        groups: UVec2,
    ) {
        let bind_group = self.layout.bind(
            device,
            vec![
                frame_data,
                wgpu::BindingResource::TextureView(scene.depth),
                wgpu::BindingResource::TextureView(screen_radiance),
                wgpu::BindingResource::TextureView(scene.gbuffer),
                wgpu::BindingResource::TextureView(out_radiance.view()),
                wgpu::BindingResource::TextureView(out_normal.view()),
                wgpu::BindingResource::Sampler(scene.sampler),
            ],
        );

        passes::dispatch(
            encoder,
            "raylight_horizon_setup",
            &self.pipeline,
            &bind_group,
            groups,
        );
    }
}
