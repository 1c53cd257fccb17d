use glam::Mat4;

use crate::pool::TextureId;

/// Persistent cross-frame denoising state for one closure class.
///
/// The history textures live in the texture pool as persistent slots; this
/// struct only holds the tokens. An inactive closure's state is left exactly
/// as-is, so a closure that disappears for a few frames and comes back finds
/// its (stale but well-formed) history still in place and the validity flag
/// decides whether it gets sampled.
pub(crate) struct DenoiseBuffer {
    pub radiance_history: Option<TextureId>,
    pub variance_history: Option<TextureId>,
    /// Tile-validity mask matching `radiance_history`; cleared whenever the
    /// history must not be sampled.
    pub tilemask_history: Option<TextureId>,
    /// View-projection matrix the radiance history was rendered with.
    pub history_persmat: Mat4,
    pub valid_history: bool,
}

impl DenoiseBuffer {
    fn new() -> Self {
        Self {
            radiance_history: None,
            variance_history: None,
            tilemask_history: None,
            history_persmat: Mat4::IDENTITY,
            valid_history: false,
        }
    }

    /// End-of-trace bookkeeping: the history is only trustworthy next frame
    /// if the temporal stage actually populated it this frame.
    pub fn commit(&mut self, used_temporal: bool, persmat: Mat4) {
        if used_temporal {
            self.history_persmat = persmat;
        }

        self.valid_history = used_temporal;
    }
}

/// Caller-owned persistent state, one denoise buffer per closure class.
///
/// Kept outside [`crate::RayTracer`] so a host with several independent
/// views can give each its own history while sharing the pipelines.
pub struct RayTraceBuffer {
    pub(crate) closures: [DenoiseBuffer; 3],
}

impl Default for RayTraceBuffer {
    fn default() -> Self {
        Self {
            closures: [
                DenoiseBuffer::new(),
                DenoiseBuffer::new(),
                DenoiseBuffer::new(),
            ],
        }
    }
}

/// Handle to one closure's final radiance for this frame.
///
/// `history` is populated only when the temporal stage ran but the bilateral
/// stage did not: the current output then *becomes* next frame's history
/// when the handle is returned through [`crate::RayTracer::release()`]. The
/// bilateral path performs that exchange eagerly instead, since its final
/// output is not what gets fed back.
pub struct TraceOutput {
    pub(crate) current: TextureId,
    pub(crate) history: Option<TextureId>,
}

impl TraceOutput {
    /// Token of the final radiance texture, resolvable through
    /// [`crate::RayTracer::texture()`] until the result is released.
    pub fn id(&self) -> TextureId {
        self.current
    }
}

/// All three closure outputs of one [`crate::RayTracer::render()`] call.
pub struct RayTraceResult {
    pub diffuse: TraceOutput,
    pub reflect: TraceOutput,
    pub refract: TraceOutput,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_becomes_valid_only_after_temporal() {
        let mut target = DenoiseBuffer::new();

        assert!(!target.valid_history);

        // Frame 1: temporal ran.
        target.commit(true, Mat4::from_scale(glam::Vec3::splat(2.0)));

        assert!(target.valid_history);
        assert_eq!(
            Mat4::from_scale(glam::Vec3::splat(2.0)),
            target.history_persmat,
        );

        // Frame 2: denoising got switched off; the history is no longer
        // trustworthy but the stored matrix stays.
        target.commit(false, Mat4::IDENTITY);

        assert!(!target.valid_history);
        assert_eq!(
            Mat4::from_scale(glam::Vec3::splat(2.0)),
            target.history_persmat,
        );

        // Frame 3: back on; trusted again.
        target.commit(true, Mat4::IDENTITY);

        assert!(target.valid_history);
        assert_eq!(Mat4::IDENTITY, target.history_persmat);
    }

    #[test]
    fn skipped_closures_keep_their_state() {
        let mut buffers = RayTraceBuffer::default();

        buffers.closures[0].valid_history = true;
        buffers.closures[0].history_persmat = Mat4::ZERO;

        // A frame where the closure is inactive performs no commit at all;
        // nothing observes or mutates the buffer.
        assert!(buffers.closures[0].valid_history);
        assert_eq!(Mat4::ZERO, buffers.closures[0].history_persmat);
        assert!(!buffers.closures[1].valid_history);
    }
}
