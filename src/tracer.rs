use std::mem;

use glam::{IVec2, Mat4, UVec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::buffers::{
    DispatchBuffer, StorageBuffer, Texture, DOWNSAMPLED_NORMAL_FORMAT,
    HIT_DEPTH_FORMAT, OCCLUSION_FORMAT, RADIANCE_FORMAT, RAY_DATA_FORMAT,
    RAY_TIME_FORMAT, TILE_MASK_FORMAT, VARIANCE_FORMAT,
};
use crate::denoise::DenoiseBuffer;
use crate::passes::{
    DenoiseBilateralPass, DenoiseSpatialPass, DenoiseTemporalPass,
    HorizonDenoisePass, HorizonScanPass, HorizonSetupPass, RayGeneratePass,
    TileClassifyPass, TileCompactPass, TraceFallbackPass, TracePlanarPass,
    TraceScreenPass,
};
use crate::pool::{TextureId, TextureKey, TexturePool};
use crate::uniforms::{FrameData, FrameUniforms, Snapshot};
use crate::{
    plan, ClosureClass, ClosureMask, Error, FramePlan, RayTraceBuffer,
    RayTraceResult, SceneTextures, ShaderLibrary, StagePlan, TileGrid,
    TraceOutput, TracingMethod, TracingOptions, ViewData,
};

/// Passes instantiated once per closure class, indexed by
/// [`ClosureClass::index()`].
struct ClosurePasses {
    ray_generate: RayGeneratePass,
    trace_screen: TraceScreenPass,
    denoise_spatial: DenoiseSpatialPass,
    denoise_bilateral: DenoiseBilateralPass,
    horizon_scan: HorizonScanPass,
}

/// Per-tile participation masks written by classification and consumed by
/// compaction; one layer per closure class.
///
/// Recreated whenever the tile grids change extent; their contents are
/// cleared at the start of every frame anyway, so nothing is lost.
struct TileMasks {
    raytrace_tracing: Texture,
    raytrace_denoise: Texture,
    horizon_tracing: Texture,
    horizon_denoise: Texture,
}

impl TileMasks {
    fn new(device: &wgpu::Device) -> Self {
        Self::with_grids(device, UVec2::ONE, UVec2::ONE)
    }

    fn with_grids(
        device: &wgpu::Device,
        denoise_tiles: UVec2,
        tracing_tiles: UVec2,
    ) -> Self {
        let mask = |label: &str, tiles: UVec2| {
            Texture::new_array(
                device,
                format!("raylight_tile_mask_{label}"),
                tiles,
                ClosureClass::COUNT as u32,
                TILE_MASK_FORMAT,
            )
        };

        Self {
            raytrace_tracing: mask("raytrace_tracing", tracing_tiles),
            raytrace_denoise: mask("raytrace_denoise", denoise_tiles),
            horizon_tracing: mask("horizon_tracing", tracing_tiles),
            horizon_denoise: mask("horizon_denoise", denoise_tiles),
        }
    }

    fn ensure(
        &mut self,
        device: &wgpu::Device,
        denoise_tiles: UVec2,
        tracing_tiles: UVec2,
    ) {
        if self.raytrace_denoise.size() != denoise_tiles
            || self.raytrace_tracing.size() != tracing_tiles
        {
            *self = Self::with_grids(device, denoise_tiles, tracing_tiles);
        }
    }

    fn clear(&self, encoder: &mut wgpu::CommandEncoder) {
        for mask in self.all() {
            mask.clear(encoder);
        }
    }

    /// Binding order shared with the compaction pass.
    fn all(&self) -> [&Texture; 4] {
        [
            &self.raytrace_tracing,
            &self.raytrace_denoise,
            &self.horizon_tracing,
            &self.horizon_denoise,
        ]
    }
}

/// Compacted tile work-lists and their indirect-dispatch arguments, one pair
/// per pipeline path and grid resolution.
struct WorkLists {
    raytrace_tracing: StorageBuffer,
    raytrace_denoise: StorageBuffer,
    horizon_tracing: StorageBuffer,
    horizon_denoise: StorageBuffer,
    raytrace_tracing_args: DispatchBuffer,
    raytrace_denoise_args: DispatchBuffer,
    horizon_tracing_args: DispatchBuffer,
    horizon_denoise_args: DispatchBuffer,
}

impl WorkLists {
    /// One packed tile coordinate per entry.
    const ENTRY_SIZE: u64 = mem::size_of::<u32>() as u64;

    fn new(device: &wgpu::Device) -> Self {
        let initial = u64::from(TileGrid::new(UVec2::ONE).list_capacity())
            * Self::ENTRY_SIZE;

        let list = |label: &str| {
            StorageBuffer::new(
                device,
                format!("raylight_tiles_{label}"),
                initial,
            )
        };

        let args = |label: &str| {
            DispatchBuffer::new(device, format!("raylight_dispatch_{label}"))
        };

        Self {
            raytrace_tracing: list("raytrace_tracing"),
            raytrace_denoise: list("raytrace_denoise"),
            horizon_tracing: list("horizon_tracing"),
            horizon_denoise: list("horizon_denoise"),
            raytrace_tracing_args: args("raytrace_tracing"),
            raytrace_denoise_args: args("raytrace_denoise"),
            horizon_tracing_args: args("horizon_tracing"),
            horizon_denoise_args: args("horizon_denoise"),
        }
    }

    fn ensure(&mut self, device: &wgpu::Device, plan: &FramePlan) {
        let tracing = u64::from(plan.tracing_grid.list_capacity())
            * Self::ENTRY_SIZE;
        let denoise = u64::from(plan.denoise_grid.list_capacity())
            * Self::ENTRY_SIZE;

        self.raytrace_tracing.ensure_size(device, tracing);
        self.horizon_tracing.ensure_size(device, tracing);
        self.raytrace_denoise.ensure_size(device, denoise);
        self.horizon_denoise.ensure_size(device, denoise);
    }

    /// Zeroes every argument buffer; must precede each compaction.
    fn clear_args(&self, encoder: &mut wgpu::CommandEncoder) {
        for args in self.args() {
            args.clear(encoder);
        }
    }

    /// Binding order shared with the compaction pass.
    fn args(&self) -> [&DispatchBuffer; 4] {
        [
            &self.raytrace_tracing_args,
            &self.raytrace_denoise_args,
            &self.horizon_tracing_args,
            &self.horizon_denoise_args,
        ]
    }

    /// Binding order shared with the compaction pass.
    fn lists(&self) -> [&StorageBuffer; 4] {
        [
            &self.raytrace_tracing,
            &self.raytrace_denoise,
            &self.horizon_tracing,
            &self.horizon_denoise,
        ]
    }
}

/// The whole indirect-lighting pipeline: classification, compaction, ray
/// generation, tracing and the three-stage denoiser plus the horizon-scan
/// path, for all three closure classes.
///
/// Owns the pipelines and the texture pool; the cross-frame denoising state
/// lives in the caller's [`RayTraceBuffer`] so several views can share one
/// tracer.
pub struct RayTracer {
    options: TracingOptions,
    uniforms: FrameUniforms,
    pool: TexturePool,
    tile_masks: TileMasks,
    lists: WorkLists,
    tile_classify: TileClassifyPass,
    tile_compact: TileCompactPass,
    trace_planar: TracePlanarPass,
    trace_fallback: TraceFallbackPass,
    denoise_temporal: DenoiseTemporalPass,
    horizon_setup: HorizonSetupPass,
    horizon_denoise: HorizonDenoisePass,
    closures: [ClosurePasses; ClosureClass::COUNT],
    frame_index: u64,
}

impl RayTracer {
    pub fn new(
        device: &wgpu::Device,
        shaders: &dyn ShaderLibrary,
        options: TracingOptions,
    ) -> Result<Self, Error> {
        // Tile masks and history-validity masks are zeroed on the GPU
        // timeline each frame; there is no fallback path for that.
        if !device.features().contains(wgpu::Features::CLEAR_TEXTURE) {
            return Err(Error::MissingFeature(
                wgpu::Features::CLEAR_TEXTURE,
            ));
        }

        log::info!("Initializing; options={options:?}");

        let per_closure = |closure| -> Result<ClosurePasses, Error> {
            Ok(ClosurePasses {
                ray_generate: RayGeneratePass::new(device, shaders, closure)?,
                trace_screen: TraceScreenPass::new(device, shaders, closure)?,
                denoise_spatial: DenoiseSpatialPass::new(
                    device, shaders, closure,
                )?,
                denoise_bilateral: DenoiseBilateralPass::new(
                    device, shaders, closure,
                )?,
                horizon_scan: HorizonScanPass::new(device, shaders, closure)?,
            })
        };

        Ok(Self {
            options,
            uniforms: FrameUniforms::new(device),
            pool: TexturePool::new(),
            tile_masks: TileMasks::new(device),
            lists: WorkLists::new(device),
            tile_classify: TileClassifyPass::new(device, shaders)?,
            tile_compact: TileCompactPass::new(device, shaders)?,
            trace_planar: TracePlanarPass::new(device, shaders)?,
            trace_fallback: TraceFallbackPass::new(device, shaders)?,
            denoise_temporal: DenoiseTemporalPass::new(device, shaders)?,
            horizon_setup: HorizonSetupPass::new(device, shaders)?,
            horizon_denoise: HorizonDenoisePass::new(device, shaders)?,
            closures: [
                per_closure(ClosureClass::Diffuse)?,
                per_closure(ClosureClass::Reflection)?,
                per_closure(ClosureClass::Refraction)?,
            ],
            frame_index: 0,
        })
    }

    pub fn options(&self) -> &TracingOptions {
        &self.options
    }

    /// Takes effect at the next [`Self::render()`] call; mid-frame the
    /// captured snapshot stays authoritative.
    pub fn set_options(&mut self, options: TracingOptions) {
        self.options = options;
    }

    /// Resolves a result token into its texture.
    ///
    /// Valid until the owning result is passed to [`Self::release()`].
    pub fn texture(&self, id: TextureId) -> &Texture {
        self.pool.get(id)
    }

    /// Records one frame of indirect lighting into `encoder`.
    ///
    /// `screen_radiance_front`/`back` are the front- and back-facing shaded
    /// radiance of the previous pipeline stage, both rendered with
    /// `radiance_persmat` (except the back buffer, which uses the render
    /// view's matrix and only feeds refraction). The returned handles stay
    /// resolvable until [`Self::release()`].
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        buffers: &mut RayTraceBuffer,
        scene: &SceneTextures,
        extent: UVec2,
        active_closures: ClosureMask,
        screen_radiance_front: &wgpu::TextureView,
        screen_radiance_back: &wgpu::TextureView,
        radiance_persmat: Mat4,
        main_view: ViewData,
        render_view: ViewData,
        allow_refraction_tracing: bool,
    ) -> RayTraceResult {
        let options = self.options;
        let plan = FramePlan::new(&options, extent, active_closures);

        log::debug!(
            "Rendering; extent={}x{}, active={active_closures:?}",
            extent.x,
            extent.y,
        );

        self.pool.begin_frame();
        self.frame_index += 1;

        self.tile_masks.ensure(
            device,
            plan.denoise_grid.tiles(),
            plan.tracing_grid.tiles(),
        );
        self.lists.ensure(device, &plan);
        self.tile_masks.clear(encoder);

        // Sub-pixel jitter of the tracing grid within the full grid, so the
        // quarter/half-res rays cover different pixels over time.
        let mut rng = StdRng::seed_from_u64(self.frame_index);

        let resolution_bias = IVec2::new(
            rng.gen_range(0..plan.resolution_scale) as i32,
            rng.gen_range(0..plan.resolution_scale) as i32,
        );

        let shared = FrameData::shared(
            &options,
            &plan,
            radiance_persmat,
            resolution_bias,
        );

        self.uniforms.write(queue, Snapshot::Shared, &shared);

        let mut horizon_inputs = None;

        if plan.use_horizon_scan {
            let radiance = self.pool.acquire(
                device,
                "raylight_downsampled_radiance",
                TextureKey::d2(plan.tracing_extent, RADIANCE_FORMAT),
            );

            let normal = self.pool.acquire(
                device,
                "raylight_downsampled_normal",
                TextureKey::d2(
                    plan.tracing_extent,
                    DOWNSAMPLED_NORMAL_FORMAT,
                ),
            );

            self.horizon_setup.run(
                device,
                encoder,
                self.uniforms.binding(Snapshot::Shared),
                scene,
                screen_radiance_front,
                self.pool.get(radiance),
                self.pool.get(normal),
                plan.tracing_grid.dispatch_per_tile(),
            );

            horizon_inputs = Some((radiance, normal));
        }

        if !active_closures.is_empty() {
            self.tile_classify.run(
                device,
                encoder,
                self.uniforms.binding(Snapshot::Shared),
                scene,
                &self.tile_masks.raytrace_tracing,
                &self.tile_masks.raytrace_denoise,
                &self.tile_masks.horizon_tracing,
                &self.tile_masks.horizon_denoise,
                plan.denoise_grid.dispatch_per_tile(),
            );
        }

        let diffuse = self.trace(
            device,
            queue,
            encoder,
            &mut buffers.closures[ClosureClass::Diffuse.index()],
            ClosureClass::Diffuse,
            active_closures,
            &plan,
            shared,
            scene,
            screen_radiance_front,
            radiance_persmat,
            main_view.persmat,
            false,
            horizon_inputs,
        );

        let reflect = self.trace(
            device,
            queue,
            encoder,
            &mut buffers.closures[ClosureClass::Reflection.index()],
            ClosureClass::Reflection,
            active_closures,
            &plan,
            shared,
            scene,
            screen_radiance_front,
            radiance_persmat,
            main_view.persmat,
            false,
            horizon_inputs,
        );

        // Refraction samples the back-facing radiance, which is always
        // rendered with the render view's own matrix; when the host cannot
        // provide a coherent back buffer it forces the fallback path.
        let refract = self.trace(
            device,
            queue,
            encoder,
            &mut buffers.closures[ClosureClass::Refraction.index()],
            ClosureClass::Refraction,
            active_closures,
            &plan,
            shared,
            scene,
            screen_radiance_back,
            render_view.persmat,
            main_view.persmat,
            !allow_refraction_tracing,
            None,
        );

        if let Some((radiance, normal)) = horizon_inputs {
            self.pool.release(radiance);
            self.pool.release(normal);
        }

        RayTraceResult {
            diffuse,
            reflect,
            refract,
        }
    }

    /// Traces and denoises a single closure class.
    #[allow(clippy::too_many_arguments)]
    fn trace(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        denoise_buf: &mut DenoiseBuffer,
        closure: ClosureClass,
        active_closures: ClosureMask,
        plan: &FramePlan,
        shared: FrameData,
        scene: &SceneTextures,
        screen_radiance: &wgpu::TextureView,
        radiance_persmat: Mat4,
        view_persmat: Mat4,
        force_fallback: bool,
        horizon_inputs: Option<(TextureId, TextureId)>,
    ) -> TraceOutput {
        if !active_closures.contains(closure.mask()) {
            // Inactive closure: hand back a 1x1 placeholder and leave the
            // persistent history exactly as it was, in case the closure
            // comes back next frame.
            let current = self.pool.acquire(
                device,
                "raylight_radiance_placeholder",
                TextureKey::d2(UVec2::ONE, RADIANCE_FORMAT),
            );

            return TraceOutput {
                current,
                history: None,
            };
        }

        let force_fallback =
            force_fallback || self.options.method == TracingMethod::None;

        let stages = StagePlan::new(&self.options);
        let snapshot = Snapshot::Closure(closure);

        self.uniforms.write(
            queue,
            snapshot,
            &shared.for_closure(
                closure,
                &stages,
                radiance_persmat,
                denoise_buf.history_persmat,
            ),
        );

        let passes = &self.closures[closure.index()];

        // Compaction: sparse masks to dense work-lists; the argument
        // buffers are zeroed first since the kernel accumulates into them.
        self.lists.clear_args(encoder);

        self.tile_compact.run(
            device,
            encoder,
            self.uniforms.binding(snapshot),
            self.tile_masks.all(),
            self.lists.args(),
            self.lists.lists(),
            plan.tracing_grid.dispatch_per_tile_thread(),
        );

        let tracing_key =
            |format| TextureKey::d2(plan.tracing_extent, format);

        let ray_data = self.pool.acquire(
            device,
            "raylight_ray_data",
            tracing_key(RAY_DATA_FORMAT),
        );
        let ray_time = self.pool.acquire(
            device,
            "raylight_ray_time",
            tracing_key(RAY_TIME_FORMAT),
        );
        let ray_radiance = self.pool.acquire(
            device,
            "raylight_ray_radiance",
            tracing_key(RADIANCE_FORMAT),
        );

        passes.ray_generate.run(
            device,
            encoder,
            self.uniforms.binding(snapshot),
            scene,
            &self.lists.raytrace_tracing,
            self.pool.get(ray_data),
            &self.lists.raytrace_tracing_args,
        );

        if force_fallback {
            self.trace_fallback.run(
                device,
                encoder,
                self.uniforms.binding(snapshot),
                scene,
                &self.lists.raytrace_tracing,
                self.pool.get(ray_data),
                self.pool.get(ray_time),
                self.pool.get(ray_radiance),
                &self.lists.raytrace_tracing_args,
            );
        } else {
            if closure == ClosureClass::Reflection {
                if let Some(planar_capture) = scene.planar_capture {
                    self.trace_planar.run(
                        device,
                        encoder,
                        self.uniforms.binding(snapshot),
                        scene,
                        planar_capture,
                        &self.lists.raytrace_tracing,
                        self.pool.get(ray_data),
                        self.pool.get(ray_time),
                        self.pool.get(ray_radiance),
                        &self.lists.raytrace_tracing_args,
                    );
                }
            }

            let hiz = if closure == ClosureClass::Refraction {
                scene.hiz_back
            } else {
                scene.hiz_front
            };

            passes.trace_screen.run(
                device,
                encoder,
                self.uniforms.binding(snapshot),
                scene,
                &self.lists.raytrace_tracing,
                self.pool.get(ray_data),
                self.pool.get(ray_time),
                self.pool.get(ray_radiance),
                screen_radiance,
                hiz,
                &self.lists.raytrace_tracing_args,
            );
        }

        // Spatial stage resolves rays to full resolution. Its side outputs
        // shrink to 1x1 placeholders when nothing will consume them.
        let aux_extent = if stages.use_temporal_denoise {
            plan.extent
        } else {
            UVec2::ONE
        };

        let spatial_out = self.pool.acquire(
            device,
            "raylight_radiance_spatial",
            TextureKey::d2(plan.extent, RADIANCE_FORMAT),
        );
        let hit_variance = self.pool.acquire(
            device,
            "raylight_hit_variance",
            TextureKey::d2(aux_extent, VARIANCE_FORMAT),
        );
        let hit_depth = self.pool.acquire(
            device,
            "raylight_hit_depth",
            TextureKey::d2(aux_extent, HIT_DEPTH_FORMAT),
        );

        passes.denoise_spatial.run(
            device,
            encoder,
            self.uniforms.binding(snapshot),
            scene,
            &self.lists.raytrace_denoise,
            self.pool.get(ray_data),
            self.pool.get(ray_time),
            self.pool.get(ray_radiance),
            self.pool.get(spatial_out),
            self.pool.get(hit_variance),
            self.pool.get(hit_depth),
            &self.tile_masks.raytrace_denoise,
            &self.lists.raytrace_denoise_args,
        );

        self.pool.release(ray_data);
        self.pool.release(ray_time);
        self.pool.release(ray_radiance);

        let mut result = TraceOutput {
            current: spatial_out,
            history: None,
        };

        if stages.use_temporal_denoise {
            let variance_extent = if stages.use_bilateral_denoise {
                plan.extent
            } else {
                UVec2::ONE
            };

            let temporal_out = self.pool.acquire(
                device,
                "raylight_radiance_temporal",
                TextureKey::d2(plan.extent, RADIANCE_FORMAT),
            );
            let denoise_variance = self.pool.acquire(
                device,
                "raylight_denoise_variance",
                TextureKey::d2(variance_extent, VARIANCE_FORMAT),
            );

            let (radiance_history, reallocated) = self.pool.ensure(
                device,
                "raylight_radiance_history",
                &mut denoise_buf.radiance_history,
                TextureKey::d2(plan.extent, RADIANCE_FORMAT),
            );
            let (variance_history, _) = self.pool.ensure(
                device,
                "raylight_variance_history",
                &mut denoise_buf.variance_history,
                TextureKey::d2(variance_extent, VARIANCE_FORMAT),
            );
            let (tilemask_history, _) = self.pool.ensure(
                device,
                "raylight_tilemask_history",
                &mut denoise_buf.tilemask_history,
                TextureKey {
                    size: plan.denoise_grid.tiles(),
                    layers: ClosureClass::COUNT as u32,
                    format: TILE_MASK_FORMAT,
                },
            );

            if plan::reset_history(reallocated, denoise_buf.valid_history) {
                // Degrades the temporal blend to "no history" everywhere
                // instead of sampling garbage.
                self.pool.get(tilemask_history).clear(encoder);
            }

            self.denoise_temporal.run(
                device,
                encoder,
                self.uniforms.binding(snapshot),
                scene,
                &self.lists.raytrace_denoise,
                self.pool.get(radiance_history),
                self.pool.get(variance_history),
                self.pool.get(tilemask_history),
                self.pool.get(hit_depth),
                self.pool.get(spatial_out),
                self.pool.get(temporal_out),
                self.pool.get(hit_variance),
                self.pool.get(denoise_variance),
                &self.lists.raytrace_denoise_args,
            );

            // Next frame's reprojection validates against the tiles that
            // participated this frame.
            self.tile_masks
                .raytrace_denoise
                .copy_to(encoder, self.pool.get(tilemask_history));

            self.pool.release(spatial_out);
            self.pool.release(hit_variance);
            self.pool.release(hit_depth);

            result = TraceOutput {
                current: temporal_out,
                history: Some(radiance_history),
            };

            if stages.use_bilateral_denoise {
                let bilateral_out = self.pool.acquire(
                    device,
                    "raylight_radiance_bilateral",
                    TextureKey::d2(plan.extent, RADIANCE_FORMAT),
                );

                passes.denoise_bilateral.run(
                    device,
                    encoder,
                    self.uniforms.binding(snapshot),
                    scene,
                    &self.lists.raytrace_denoise,
                    self.pool.get(temporal_out),
                    self.pool.get(bilateral_out),
                    self.pool.get(denoise_variance),
                    &self.tile_masks.raytrace_denoise,
                    &self.lists.raytrace_denoise_args,
                );

                // The temporal output, not the bilateral one, feeds next
                // frame's reprojection; move it into the history slots now.
                self.pool.swap(temporal_out, radiance_history);
                self.pool.swap(denoise_variance, variance_history);
                self.pool.release(temporal_out);

                result = TraceOutput {
                    current: bilateral_out,
                    history: None,
                };
            }

            self.pool.release(denoise_variance);
        } else {
            self.pool.release(hit_variance);
            self.pool.release(hit_depth);
        }

        denoise_buf.commit(stages.use_temporal_denoise, view_persmat);

        if let Some((down_radiance, down_normal)) = horizon_inputs {
            let horizon_radiance = self.pool.acquire(
                device,
                "raylight_horizon_radiance",
                tracing_key(RADIANCE_FORMAT),
            );
            let horizon_occlusion = self.pool.acquire(
                device,
                "raylight_horizon_occlusion",
                tracing_key(OCCLUSION_FORMAT),
            );

            passes.horizon_scan.run(
                device,
                encoder,
                self.uniforms.binding(snapshot),
                scene,
                &self.lists.horizon_tracing,
                self.pool.get(down_radiance),
                self.pool.get(down_normal),
                self.pool.get(horizon_radiance),
                self.pool.get(horizon_occlusion),
                &self.lists.horizon_tracing_args,
            );

            // The blend cannot be in place (the radiance format is not
            // read-write capable as a storage texture), so the combined
            // output takes over the result token's role.
            let combined = self.pool.acquire(
                device,
                "raylight_radiance_combined",
                TextureKey::d2(plan.extent, RADIANCE_FORMAT),
            );

            self.horizon_denoise.run(
                device,
                encoder,
                self.uniforms.binding(snapshot),
                scene,
                &self.lists.horizon_denoise,
                self.pool.get(horizon_radiance),
                self.pool.get(horizon_occlusion),
                self.pool.get(result.current),
                self.pool.get(combined),
                &self.tile_masks.horizon_denoise,
                &self.lists.horizon_denoise_args,
            );

            self.pool.release(horizon_radiance);
            self.pool.release(horizon_occlusion);
            self.pool.release(result.current);

            result.current = combined;
        }

        result
    }

    /// Returns a frame's result handles to the pool.
    ///
    /// Where the temporal stage was the last denoising stage, the current
    /// output is moved into the history slot here; the caller must therefore
    /// release every result before rendering the next frame.
    pub fn release(&mut self, result: RayTraceResult) {
        for output in [result.diffuse, result.reflect, result.refract] {
            if let Some(history) = output.history {
                self.pool.swap(output.current, history);
            }

            self.pool.release(output.current);
        }

        self.pool.end_frame();
    }
}
