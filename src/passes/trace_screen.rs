use crate::buffers::{
    BindingKind, DescriptorSetLayout, DispatchBuffer, StorageBuffer, Texture,
    RADIANCE_FORMAT, RAY_TIME_FORMAT,
};
use crate::{
    passes, ClosureClass, Error, Kernel, SceneTextures, ShaderLibrary,
};

/// Resolves generated rays by marching the hi-z depth pyramid and fetching
/// radiance from the screen-radiance source on hit; misses fall through to
/// probe lookups inside the kernel.
pub(crate) struct TraceScreenPass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
    label: &'static str,
}

impl TraceScreenPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
        closure: ClosureClass,
    ) -> Result<Self, Error> {
        let kernel = Kernel::TraceScreen(closure);

        let layout = DescriptorSetLayout::new(
            device,
            "raylight_trace_screen",
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
                BindingKind::Texture2d, // screen radiance
                BindingKind::Texture2d, // depth
                BindingKind::Texture2d, // hi-z (front or back)
                BindingKind::Texture2d, // probe irradiance
                BindingKind::Texture2d, // probe reflection
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
        ray_data: &Texture,
        ray_time: &Texture,
        ray_radiance: &Texture,
        screen_radiance: &wgpu::TextureView,
        hiz: &wgpu::TextureView,
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
                wgpu::BindingResource::TextureView(screen_radiance),
                wgpu::BindingResource::TextureView(scene.depth),
                wgpu::BindingResource::TextureView(hiz),
                wgpu::BindingResource::TextureView(scene.probe_irradiance),
                wgpu::BindingResource::TextureView(scene.probe_reflection),
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
