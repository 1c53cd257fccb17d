use bitflags::bitflags;

/// How rays get resolved against the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TracingMethod {
    /// No tracing at all; every ray falls back to a filtered probe lookup.
    /// Denoising still runs on top of the fallback signal.
    None,
    /// Screen-space ray marching against the hi-z depth buffer.
    #[default]
    ScreenSpace,
}

bitflags! {
    /// Which denoising stages the quality settings request.
    ///
    /// Stage execution is additionally gated on the previous stage having
    /// run; see [`crate::plan::StagePlan`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DenoiseStages: u32 {
        const SPATIAL = 1 << 0;
        const TEMPORAL = 1 << 1;
        const BILATERAL = 1 << 2;
    }
}

/// Per-frame quality/method configuration snapshot.
///
/// Captured once per [`crate::RayTracer::render()`] call; derived values
/// (resolution-scale clamp, roughness mask scale/bias, brightness clamp) are
/// computed from it exactly once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TracingOptions {
    pub method: TracingMethod,

    /// Master denoising switch; individual stage bits are ignored when this
    /// is off.
    pub use_denoise: bool,
    pub denoise_stages: DenoiseStages,

    /// Rays are generated at `full_resolution / resolution_scale`; clamped
    /// to the next power of two, minimum 1.
    pub resolution_scale: u32,

    /// Roughness above which screen tracing is not worth it; tiles fade
    /// towards the horizon-scan / fallback path over a fixed fade width.
    pub max_roughness: f32,

    /// Assumed thickness of on-screen geometry during ray marching.
    pub thickness: f32,

    /// Screen-trace precision knob, 0.0 = cheapest, 1.0 = best.
    pub quality: f32,

    /// Clamp for ray radiance samples; zero or negative disables clamping.
    pub sample_clamp: f32,
}

impl Default for TracingOptions {
    fn default() -> Self {
        Self {
            method: TracingMethod::ScreenSpace,
            use_denoise: true,
            denoise_stages: DenoiseStages::all(),
            resolution_scale: 2,
            max_roughness: 0.5,
            thickness: 0.2,
            quality: 0.25,
            sample_clamp: 10.0,
        }
    }
}

impl TracingOptions {
    /// Width of the smooth roughness fade; tiles within
    /// `[max_roughness, max_roughness + fade]` participate partially.
    pub(crate) const ROUGHNESS_FADE: f32 = 0.2;

    /// Effective resolution scale: next power of two, at least 1.
    pub fn resolution_scale(&self) -> u32 {
        self.resolution_scale.max(1).next_power_of_two()
    }

    pub(crate) fn roughness_mask_scale(&self) -> f32 {
        1.0 / Self::ROUGHNESS_FADE
    }

    pub(crate) fn roughness_mask_bias(&self) -> f32 {
        self.roughness_mask_scale() * self.max_roughness
    }

    pub(crate) fn brightness_clamp(&self) -> f32 {
        if self.sample_clamp > 0.0 {
            self.sample_clamp
        } else {
            1e20
        }
    }

    /// Trace precision as consumed by the kernels (lower is more precise).
    pub(crate) fn trace_quality(&self) -> f32 {
        1.0 - 0.95 * self.quality
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(3, 4)]
    #[case(4, 4)]
    #[case(5, 8)]
    fn resolution_scale_clamps_to_power_of_two(
        #[case] requested: u32,
        #[case] effective: u32,
    ) {
        let options = TracingOptions {
            resolution_scale: requested,
            ..Default::default()
        };

        assert_eq!(effective, options.resolution_scale());
    }

    #[test]
    fn roughness_mask_is_a_smooth_fade() {
        let options = TracingOptions {
            max_roughness: 0.4,
            ..Default::default()
        };

        assert_relative_eq!(5.0, options.roughness_mask_scale());
        assert_relative_eq!(2.0, options.roughness_mask_bias());
    }

    #[test]
    fn brightness_clamp_disabled_by_zero() {
        let enabled = TracingOptions {
            sample_clamp: 3.0,
            ..Default::default()
        };

        let disabled = TracingOptions {
            sample_clamp: 0.0,
            ..Default::default()
        };

        assert_relative_eq!(3.0, enabled.brightness_clamp());
        assert_relative_eq!(1e20, disabled.brightness_clamp());
    }
}
