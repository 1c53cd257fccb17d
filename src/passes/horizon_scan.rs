use crate::buffers::{
    BindingKind, DescriptorSetLayout, DispatchBuffer, StorageBuffer, Texture,
    OCCLUSION_FORMAT, RADIANCE_FORMAT,
};
use crate::{
    passes, ClosureClass, Error, Kernel, SceneTextures, ShaderLibrary,
};

/// Horizon-based visibility/radiance integration over the downsampled
/// inputs, per active tile of its own work-list. Alternative or supplement
/// to traced rays for rough closures.
pub(crate) struct HorizonScanPass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
    label: &'static str,
}

impl HorizonScanPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
        closure: ClosureClass,
    ) -> Result<Self, Error> {
        let kernel = Kernel::HorizonScan(closure);

        let layout = DescriptorSetLayout::new(
            device,
            "raylight_horizon_scan",
            &[
                BindingKind::Uniform,
                BindingKind::Storage { read_only: true }, // tile list
                BindingKind::Texture2d,                   // hi-z front
                BindingKind::Texture2d,                   // blue noise
                BindingKind::Texture2d,      // downsampled radiance
                BindingKind::Texture2d,      // downsampled normal
                BindingKind::Texture2dArray, // gbuffer
                BindingKind::StorageTexture2d {
                    format: RADIANCE_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
                BindingKind::StorageTexture2d {
                    format: OCCLUSION_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
                BindingKind::Sampler,
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
        downsampled_radiance: &Texture,
        downsampled_normal: &Texture,
        out_radiance: &Texture,
        out_occlusion: &Texture,
        args: &DispatchBuffer,
    ) {
        let bind_group = self.layout.bind(
            device,
            vec![
                frame_data,
                tiles.binding(),
                wgpu::BindingResource::TextureView(scene.hiz_front),
                wgpu::BindingResource::TextureView(scene.noise),
                wgpu::BindingResource::TextureView(
                    downsampled_radiance.view(),
                ),
                wgpu::BindingResource::TextureView(downsampled_normal.view()),
                wgpu::BindingResource::TextureView(scene.gbuffer),
                wgpu::BindingResource::TextureView(out_radiance.view()),
                wgpu::BindingResource::TextureView(out_occlusion.view()),
                wgpu::BindingResource::Sampler(scene.sampler),
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
