//! Real-time denoised indirect lighting as a multi-pass compute pipeline.
//!
//! Each frame classifies the screen into 8x8 tiles per closure class
//! (diffuse, reflection, refraction), compacts the active tiles into dense
//! work-lists, generates and traces rays at a reduced resolution, and then
//! runs a three-stage denoiser (spatial, temporal, bilateral) plus an
//! independent horizon-scan path over the results. Persistent per-closure
//! history lives in a caller-owned [`RayTraceBuffer`]; everything transient
//! comes from an internal texture pool.
//!
//! The crate records GPU work into a caller-provided command encoder and
//! never owns a device, a surface or the compiled kernels; those arrive
//! through [`ShaderLibrary`].

mod buffers;
mod closure;
mod denoise;
mod options;
mod passes;
mod plan;
mod pool;
mod scene;
mod shaders;
mod tiles;
mod tracer;
mod uniforms;

pub use self::buffers::{
    Texture, DOWNSAMPLED_NORMAL_FORMAT, HIT_DEPTH_FORMAT, OCCLUSION_FORMAT,
    RADIANCE_FORMAT, RAY_DATA_FORMAT, RAY_TIME_FORMAT, TILE_MASK_FORMAT,
    VARIANCE_FORMAT,
};
pub use self::closure::{ClosureClass, ClosureMask};
pub use self::denoise::{RayTraceBuffer, RayTraceResult, TraceOutput};
pub use self::options::{DenoiseStages, TracingMethod, TracingOptions};
pub use self::pool::TextureId;
pub use self::scene::{SceneTextures, ViewData};
pub use self::shaders::{Kernel, ShaderLibrary};
pub use self::tiles::{TileGrid, GROUP_SIZE};
pub use self::tracer::RayTracer;

pub(crate) use self::plan::{FramePlan, StagePlan};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing required device feature: {0:?}")]
    MissingFeature(wgpu::Features),

    #[error("shader library provides no kernel `{}`", .0.name())]
    MissingKernel(Kernel),
}
