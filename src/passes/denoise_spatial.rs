use crate::buffers::{
    BindingKind, DescriptorSetLayout, DispatchBuffer, StorageBuffer, Texture,
    HIT_DEPTH_FORMAT, RADIANCE_FORMAT, VARIANCE_FORMAT,
};
use crate::{
    passes, ClosureClass, Error, Kernel, SceneTextures, ShaderLibrary,
};

/// Resolves the sparse, noisy per-ray hits into one radiance estimate per
/// full-resolution pixel, plus hit-variance and hit-depth side outputs for
/// the temporal stage.
///
/// Always runs for an active closure; the `skip_denoise` uniform flag turns
/// the kernel into a plain resolve without filtering, keeping a single code
/// path. Variance/hit-depth shrink to 1x1 placeholders when temporal
/// denoising is off so the binding contract stays uniform.
pub(crate) struct DenoiseSpatialPass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
    label: &'static str,
}

impl DenoiseSpatialPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
        closure: ClosureClass,
    ) -> Result<Self, Error> {
        let kernel = Kernel::DenoiseSpatial(closure);

        let layout = DescriptorSetLayout::new(
            device,
            "raylight_denoise_spatial",
            &[
                BindingKind::Uniform,
                BindingKind::Storage { read_only: true }, // tile list
                BindingKind::Texture2d,                   // blue noise
                BindingKind::Texture2d,                   // depth
                BindingKind::Texture2dArray,              // gbuffer
                BindingKind::Texture2d,                   // ray data
                BindingKind::Texture2d,                   // ray time
                BindingKind::Texture2d,                   // ray radiance
                BindingKind::StorageTexture2d {
                    format: RADIANCE_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
                BindingKind::StorageTexture2d {
                    format: VARIANCE_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
                BindingKind::StorageTexture2d {
                    format: HIT_DEPTH_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
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
        ray_data: &Texture,
        ray_time: &Texture,
        ray_radiance: &Texture,
        out_radiance: &Texture,
        out_variance: &Texture,
        out_hit_depth: &Texture,
        tile_mask: &Texture,
        args: &DispatchBuffer,
    ) {
        let bind_group = self.layout.bind(
            device,
            vec![
                frame_data,
                tiles.binding(),
                wgpu::BindingResource::TextureView(scene.noise),
                wgpu::BindingResource::TextureView(scene.depth),
                wgpu::BindingResource::TextureView(scene.gbuffer),
                wgpu::BindingResource::TextureView(ray_data.view()),
                wgpu::BindingResource::TextureView(ray_time.view()),
                wgpu::BindingResource::TextureView(ray_radiance.view()),
                wgpu::BindingResource::TextureView(out_radiance.view()),
                wgpu::BindingResource::TextureView(out_variance.view()),
                wgpu::BindingResource::TextureView(out_hit_depth.view()),
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
