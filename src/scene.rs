use glam::Mat4;

/// Read-only scene resources bound by the caller each frame.
///
/// The pipeline does not own or interpret any of these; they are the seam
/// to the surrounding deferred renderer.
pub struct SceneTextures<'a> {
    /// Scene depth at full resolution.
    pub depth: &'a wgpu::TextureView,
    /// Material/closure G-buffer, one layer per packed attribute plane.
    pub gbuffer: &'a wgpu::TextureView,
    /// Hi-z pyramid over front-facing depth; screen traces march this.
    pub hiz_front: &'a wgpu::TextureView,
    /// Hi-z pyramid over back-facing depth; used by refraction traces.
    pub hiz_back: &'a wgpu::TextureView,
    /// Irradiance probe volume, fallback for diffuse rays.
    pub probe_irradiance: &'a wgpu::TextureView,
    /// Reflection probe atlas, fallback for reflection/refraction rays.
    pub probe_reflection: &'a wgpu::TextureView,
    /// Planar reflection capture; when bound, reflection tiles touching it
    /// get a dedicated trace sub-pass before the general screen trace.
    pub planar_capture: Option<&'a wgpu::TextureView>,
    /// Blue-noise utility texture for ray direction sampling.
    pub noise: &'a wgpu::TextureView,
    pub sampler: &'a wgpu::Sampler,
}

/// Camera transform snapshot for one view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewData {
    /// View-projection matrix.
    pub persmat: Mat4,
}
