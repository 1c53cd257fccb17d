use crate::ClosureClass;

/// Symbolic id of a compiled compute kernel.
///
/// The pipeline never looks inside a kernel; it only selects one by id,
/// binds resources in the order the kernel's interface expects and
/// dispatches it. Per-closure kernels are separate compilation variants of
/// the same source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kernel {
    TileClassify,
    TileCompact,
    RayGenerate(ClosureClass),
    TraceScreen(ClosureClass),
    TracePlanar,
    TraceFallback,
    DenoiseSpatial(ClosureClass),
    DenoiseTemporal,
    DenoiseBilateral(ClosureClass),
    HorizonSetup,
    HorizonScan(ClosureClass),
    HorizonDenoise,
}

impl Kernel {
    /// Symbolic name used for lookup and labeling.
    pub fn name(self) -> &'static str {
        match self {
            Self::TileClassify => "raylight_tile_classify",
            Self::TileCompact => "raylight_tile_compact",
            Self::RayGenerate(ClosureClass::Diffuse) => {
                "raylight_ray_generate_diffuse"
            }
            Self::RayGenerate(ClosureClass::Reflection) => {
                "raylight_ray_generate_reflect"
            }
            Self::RayGenerate(ClosureClass::Refraction) => {
                "raylight_ray_generate_refract"
            }
            Self::TraceScreen(ClosureClass::Diffuse) => {
                "raylight_trace_screen_diffuse"
            }
            Self::TraceScreen(ClosureClass::Reflection) => {
                "raylight_trace_screen_reflect"
            }
            Self::TraceScreen(ClosureClass::Refraction) => {
                "raylight_trace_screen_refract"
            }
            Self::TracePlanar => "raylight_trace_planar",
            Self::TraceFallback => "raylight_trace_fallback",
            Self::DenoiseSpatial(ClosureClass::Diffuse) => {
                "raylight_denoise_spatial_diffuse"
            }
            Self::DenoiseSpatial(ClosureClass::Reflection) => {
                "raylight_denoise_spatial_reflect"
            }
            Self::DenoiseSpatial(ClosureClass::Refraction) => {
                "raylight_denoise_spatial_refract"
            }
            Self::DenoiseTemporal => "raylight_denoise_temporal",
            Self::DenoiseBilateral(ClosureClass::Diffuse) => {
                "raylight_denoise_bilateral_diffuse"
            }
            Self::DenoiseBilateral(ClosureClass::Reflection) => {
                "raylight_denoise_bilateral_reflect"
            }
            Self::DenoiseBilateral(ClosureClass::Refraction) => {
                "raylight_denoise_bilateral_refract"
            }
            Self::HorizonSetup => "raylight_horizon_setup",
            Self::HorizonScan(ClosureClass::Diffuse) => {
                "raylight_horizon_scan_diffuse"
            }
            Self::HorizonScan(ClosureClass::Reflection) => {
                "raylight_horizon_scan_reflect"
            }
            Self::HorizonScan(ClosureClass::Refraction) => {
                "raylight_horizon_scan_refract"
            }
            Self::HorizonDenoise => "raylight_horizon_denoise",
        }
    }
}

/// Capability interface through which the environment provides compiled
/// kernels.
pub trait ShaderLibrary {
    fn kernel(&self, kernel: Kernel) -> Option<&wgpu::ShaderModule>;
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn kernel_names_are_unique() {
        let mut names = HashSet::new();

        let mut kernels = vec![
            Kernel::TileClassify,
            Kernel::TileCompact,
            Kernel::TracePlanar,
            Kernel::TraceFallback,
            Kernel::DenoiseTemporal,
            Kernel::HorizonSetup,
            Kernel::HorizonDenoise,
        ];

        for closure in ClosureClass::ALL {
            kernels.push(Kernel::RayGenerate(closure));
            kernels.push(Kernel::TraceScreen(closure));
            kernels.push(Kernel::DenoiseSpatial(closure));
            kernels.push(Kernel::DenoiseBilateral(closure));
            kernels.push(Kernel::HorizonScan(closure));
        }

        for kernel in kernels {
            assert!(names.insert(kernel.name()), "duplicate: {kernel:?}");
        }
    }
}
