mod descriptor_set;
mod dispatch_buffer;
mod storage_buffer;
mod texture;
mod uniform_buffer;

pub(crate) use self::descriptor_set::*;
pub(crate) use self::dispatch_buffer::*;
pub(crate) use self::storage_buffer::*;
pub use self::texture::*;
pub(crate) use self::uniform_buffer::*;

/// Ray radiance, denoised radiance and history radiance.
pub const RADIANCE_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba16Float;

/// Packed ray direction + pdf.
pub const RAY_DATA_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba16Float;

/// Ray hit time, hit depth and hit variance.
pub const RAY_TIME_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;
pub const HIT_DEPTH_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::R32Float;
pub const VARIANCE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Float;

/// Per-tile participation bitmasks, one layer per closure class.
pub const TILE_MASK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Uint;

/// Horizon-scan visibility output.
pub const OCCLUSION_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::R32Float;

/// Downsampled scene normals consumed by the horizon scan.
pub const DOWNSAMPLED_NORMAL_FORMAT: wgpu::TextureFormat =
    wgpu::TextureFormat::Rgba8Unorm;
