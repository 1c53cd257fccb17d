use glam::UVec2;

use crate::{
    ClosureMask, DenoiseStages, TileGrid, TracingMethod, TracingOptions,
};

/// Per-frame derived values shared by all three closure traces.
///
/// Recomputed from scratch every frame; two frames with identical inputs
/// derive identical plans, which is what keeps dispatch sizing and tile
/// classification reproducible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FramePlan {
    pub extent: UVec2,
    pub resolution_scale: u32,
    pub tracing_extent: UVec2,
    /// Full-resolution tile grid; drives denoising work-lists.
    pub denoise_grid: TileGrid,
    /// Tracing-resolution tile grid; drives ray generation work-lists.
    pub tracing_grid: TileGrid,
    pub use_horizon_scan: bool,
}

impl FramePlan {
    pub fn new(
        options: &TracingOptions,
        extent: UVec2,
        active_closures: ClosureMask,
    ) -> Self {
        let mut use_horizon_scan = options.max_roughness < 1.0;

        // Horizon scanning only ever feeds diffuse and reflection closures;
        // its setup cost is unwarranted when neither can consume it.
        if active_closures == ClosureMask::REFRACTION
            || active_closures.is_empty()
        {
            use_horizon_scan = false;
        }

        let resolution_scale = options.resolution_scale();
        let tracing_extent = crate::tiles::div_ceil(extent, resolution_scale);

        Self {
            extent,
            resolution_scale,
            tracing_extent,
            denoise_grid: TileGrid::new(extent),
            tracing_grid: TileGrid::new(tracing_extent),
            use_horizon_scan,
        }
    }
}

/// Which denoising stages actually run for one closure trace.
///
/// Each stage requires the previous one: bilateral needs temporal needs
/// spatial needs the master switch. Spatial always runs as a pass (it is
/// what resolves rays to full resolution), but flips to a copy-through
/// kernel variant when spatial *denoising* is off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct StagePlan {
    pub use_spatial_denoise: bool,
    pub use_temporal_denoise: bool,
    pub use_bilateral_denoise: bool,
}

impl StagePlan {
    pub fn new(options: &TracingOptions) -> Self {
        let stages = options.denoise_stages;

        let use_spatial_denoise =
            options.use_denoise && stages.contains(DenoiseStages::SPATIAL);

        let use_temporal_denoise =
            use_spatial_denoise && stages.contains(DenoiseStages::TEMPORAL);

        let use_bilateral_denoise =
            use_temporal_denoise && stages.contains(DenoiseStages::BILATERAL);

        Self {
            use_spatial_denoise,
            use_temporal_denoise,
            use_bilateral_denoise,
        }
    }

    /// Uniform flag consumed by the spatial kernel: resolve rays but skip
    /// the actual filtering.
    pub fn skip_denoise(&self) -> bool {
        !self.use_spatial_denoise
    }
}

/// Whether the reprojected tile-validity history must be cleared before the
/// temporal stage samples it.
///
/// `reallocated` means the radiance history texture changed extent this
/// frame; sampling it (or the matching validity mask) would read garbage.
pub(crate) fn reset_history(reallocated: bool, valid_history: bool) -> bool {
    reallocated || !valid_history
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn options(use_denoise: bool, stages: DenoiseStages) -> TracingOptions {
        TracingOptions {
            use_denoise,
            denoise_stages: stages,
            ..Default::default()
        }
    }

    #[test]
    fn stage_gating_is_monotonic() {
        // Later stages never run without their prerequisite, regardless of
        // which bits the options request.
        for bits in 0..8 {
            for use_denoise in [false, true] {
                let stages = DenoiseStages::from_bits_truncate(bits);
                let plan = StagePlan::new(&options(use_denoise, stages));

                if plan.use_bilateral_denoise {
                    assert!(plan.use_temporal_denoise);
                }

                if plan.use_temporal_denoise {
                    assert!(plan.use_spatial_denoise);
                }

                if plan.use_spatial_denoise {
                    assert!(use_denoise);
                }
            }
        }
    }

    #[test]
    fn master_switch_disables_everything() {
        let plan = StagePlan::new(&options(false, DenoiseStages::all()));

        assert!(!plan.use_spatial_denoise);
        assert!(!plan.use_temporal_denoise);
        assert!(!plan.use_bilateral_denoise);
        assert!(plan.skip_denoise());
    }

    #[test]
    fn temporal_without_bilateral_still_runs_temporal() {
        let plan = StagePlan::new(&options(
            true,
            DenoiseStages::SPATIAL | DenoiseStages::TEMPORAL,
        ));

        assert!(plan.use_spatial_denoise);
        assert!(plan.use_temporal_denoise);
        assert!(!plan.use_bilateral_denoise);
    }

    #[rstest]
    #[case(ClosureMask::REFRACTION, false)]
    #[case(ClosureMask::empty(), false)]
    #[case(ClosureMask::DIFFUSE, true)]
    #[case(ClosureMask::REFLECTION, true)]
    #[case(ClosureMask::DIFFUSE | ClosureMask::REFRACTION, true)]
    #[case(ClosureMask::all(), true)]
    fn horizon_scan_skipped_without_diffuse_or_reflection(
        #[case] active: ClosureMask,
        #[case] expected: bool,
    ) {
        let plan = FramePlan::new(
            &TracingOptions::default(),
            UVec2::new(1920, 1080),
            active,
        );

        assert_eq!(expected, plan.use_horizon_scan);
    }

    #[test]
    fn horizon_scan_skipped_when_everything_traces() {
        let options = TracingOptions {
            max_roughness: 1.0,
            ..Default::default()
        };

        let plan = FramePlan::new(
            &options,
            UVec2::new(1920, 1080),
            ClosureMask::all(),
        );

        assert!(!plan.use_horizon_scan);
    }

    #[test]
    fn plans_are_reproducible() {
        let options = TracingOptions::default();
        let extent = UVec2::new(1280, 720);

        let a = FramePlan::new(&options, extent, ClosureMask::all());
        let b = FramePlan::new(&options, extent, ClosureMask::all());

        assert_eq!(a, b);
    }

    #[test]
    fn tracing_grid_uses_the_clamped_scale() {
        // resolution_scale = 3 clamps to 4; the tracing grid must be
        // computed from 4, not 3.
        let options = TracingOptions {
            resolution_scale: 3,
            ..Default::default()
        };

        let plan = FramePlan::new(
            &options,
            UVec2::new(1920, 1080),
            ClosureMask::all(),
        );

        assert_eq!(4, plan.resolution_scale);
        assert_eq!(UVec2::new(480, 270), plan.tracing_extent);
        assert_eq!(TileGrid::new(UVec2::new(480, 270)), plan.tracing_grid);
    }

    #[test]
    fn history_resets_on_reallocation_or_cold_start() {
        assert!(reset_history(true, true));
        assert!(reset_history(false, false));
        assert!(reset_history(true, false));
        assert!(!reset_history(false, true));
    }
}
