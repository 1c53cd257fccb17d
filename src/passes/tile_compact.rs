use glam::UVec2;

use crate::buffers::{
    BindingKind, DescriptorSetLayout, DispatchBuffer, StorageBuffer, Texture,
};
use crate::{passes, Error, Kernel, ShaderLibrary};

/// Stream-compacts the sparse tile masks into dense work-lists and
/// indirect-dispatch workgroup counts.
///
/// Each active tile appends its coordinate to the matching list and bumps
/// that list's dispatch arguments atomically; duplicates cannot occur since
/// every tile is classified exactly once. Runs once per closure trace, with
/// the closure's uniform snapshot selecting the mask layer.
pub(crate) struct TileCompactPass {
    layout: DescriptorSetLayout,
    pipeline: wgpu::ComputePipeline,
}

impl TileCompactPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
    ) -> Result<Self, Error> {
        let rw = BindingKind::Storage { read_only: false };

        let layout = DescriptorSetLayout::new(
            device,
            "raylight_tile_compact",
            &[
                BindingKind::Uniform,
                BindingKind::UintTexture2dArray, // raytrace tracing mask
                BindingKind::UintTexture2dArray, // raytrace denoise mask
                BindingKind::UintTexture2dArray, // horizon tracing mask
                BindingKind::UintTexture2dArray, // horizon denoise mask
                rw,                              // raytrace tracing args
                rw,                              // raytrace denoise args
                rw,                              // horizon tracing args
                rw,                              // horizon denoise args
                rw,                              // raytrace tracing tiles
                rw,                              // raytrace denoise tiles
                rw,                              // horizon tracing tiles
                rw,                              // horizon denoise tiles
            ],
        );

        let pipeline = passes::create_pipeline(
            device,
            shaders,
            Kernel::TileCompact,
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
        masks: [&Texture; 4],
        args: [&DispatchBuffer; 4],
        lists: [&StorageBuffer; 4],
        groups: UVec2,
    ) {
        let mut resources = vec![frame_data];

        resources.extend(
            masks
                .iter()
                .map(|mask| wgpu::BindingResource::TextureView(mask.view())),
        );
        resources.extend(args.iter().map(|args| args.binding()));
        resources.extend(lists.iter().map(|list| list.binding()));

        let bind_group = self.layout.bind(device, resources);

        passes::dispatch(
            encoder,
            "raylight_tile_compact",
            &self.pipeline,
            &bind_group,
            groups,
        );
    }
}
