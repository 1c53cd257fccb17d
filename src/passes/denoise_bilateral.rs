use crate::buffers::{
    BindingKind, DescriptorSetLayout, DispatchBuffer, StorageBuffer, Texture,
    RADIANCE_FORMAT,
};
use crate::{
    passes, ClosureClass, Error, Kernel, SceneTextures, ShaderLibrary,
};

/// Edge-aware smoothing keyed by the temporal stage's variance output,
/// producing the final closure radiance.
pub(crate) struct DenoiseBilateralPass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
    label: &'static str,
}

impl DenoiseBilateralPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
        closure: ClosureClass,
    ) -> Result<Self, Error> {
        let kernel = Kernel::DenoiseBilateral(closure);

        let layout = DescriptorSetLayout::new(
            device,
            "raylight_denoise_bilateral",
            &[
                BindingKind::Uniform,
                BindingKind::Storage { read_only: true }, // tile list
                BindingKind::Texture2d,                   // depth
                BindingKind::Texture2dArray,              // gbuffer
                BindingKind::Texture2d,                   // in radiance
                BindingKind::StorageTexture2d {
                    format: RADIANCE_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
                BindingKind::Texture2d,          // in variance
                BindingKind::UintTexture2dArray, // tile mask
            ],
        );

        let pipeline =
            passes::create_pipeline(device, shaders, kernel, &layout)?;

        Ok(Self {
            layout,
            pipeline,
            label: kernel.name(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        frame_data: wgpu::BindingResource,
        scene: &SceneTextures,
        tiles: &StorageBuffer,
        in_radiance: &Texture,
        out_radiance: &Texture,
        in_variance: &Texture,
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
                wgpu::BindingResource::TextureView(in_radiance.view()),
                wgpu::BindingResource::TextureView(out_radiance.view()),
                wgpu::BindingResource::TextureView(in_variance.view()),
                wgpu::BindingResource::TextureView(tile_mask.view()),
            ],
        );

        passes::dispatch_indirect(
            encoder,
            self.label,
            &self.pipeline,
            &bind_group,
            args,
        );
    }
}
