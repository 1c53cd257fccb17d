use crate::buffers::{
    BindingKind, DescriptorSetLayout, DispatchBuffer, StorageBuffer, Texture,
    RAY_DATA_FORMAT,
};
use crate::{
    passes, ClosureClass, Error, Kernel, SceneTextures, ShaderLibrary,
};

/// Generates one ray per active pixel at tracing resolution, importance-
/// sampled from the closure's BSDF lobe and blue noise.
pub(crate) struct RayGeneratePass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
    label: &'static str,
}

impl RayGeneratePass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
        closure: ClosureClass,
    ) -> Result<Self, Error> {
        let kernel = Kernel::RayGenerate(closure);

        let layout = DescriptorSetLayout::new(
            device,
            "raylight_ray_generate",
            &[
                BindingKind::Uniform,
                BindingKind::Texture2d,      // blue noise
                BindingKind::Texture2dArray, // gbuffer
                BindingKind::Storage { read_only: true }, // tile list
                BindingKind::StorageTexture2d {
                    format: RAY_DATA_FORMAT,
                    access: wgpu::StorageTextureAccess::WriteOnly,
                },
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

    pub fn run(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        frame_data: wgpu::BindingResource,
        scene: &SceneTextures,
        tiles: &StorageBuffer,
        ray_data: &Texture,
        args: &DispatchBuffer,
    ) {
        let bind_group = self.layout.bind(
            device,
            vec![
                frame_data,
                wgpu::BindingResource::TextureView(scene.noise),
                wgpu::BindingResource::TextureView(scene.gbuffer),
                tiles.binding(),
                wgpu::BindingResource::TextureView(ray_data.view()),
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
