use bytemuck::{Pod, Zeroable};
use glam::{IVec2, Mat4, UVec2, Vec2};

use crate::buffers::UniformBuffer;
use crate::{ClosureClass, FramePlan, StagePlan, TracingOptions};

/// Per-frame uniform block consumed by every kernel.
///
/// Some fields are only meaningful for one closure's passes (history
/// matrix, closure index); those passes bind the closure's own snapshot,
/// never a shared mutable block, so a pass can never observe another
/// closure's push. See [`FrameUniforms`].
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct FrameData {
    /// View-projection matrix the radiance source was rendered with.
    pub radiance_persmat: [[f32; 4]; 4],
    /// Previous frame's view-projection matrix, for history reprojection.
    pub history_persmat: [[f32; 4]; 4],
    pub full_resolution: [u32; 2],
    pub full_resolution_inv: [f32; 2],
    /// Sub-pixel offset of the tracing grid within the full grid.
    pub resolution_bias: [i32; 2],
    pub resolution_scale: u32,
    pub thickness: f32,
    pub quality: f32,
    pub brightness_clamp: f32,
    pub roughness_mask_scale: f32,
    pub roughness_mask_bias: f32,
    pub skip_denoise: u32,
    pub closure_index: u32,
    pub closure_active: u32,
    pub _pad0: u32,
}

impl FrameData {
    /// Fields valid for the passes shared between closures (classification,
    /// horizon setup).
    pub fn shared(
        options: &TracingOptions,
        plan: &FramePlan,
        radiance_persmat: Mat4,
        resolution_bias: IVec2,
    ) -> Self {
        Self {
            radiance_persmat: radiance_persmat.to_cols_array_2d(),
            history_persmat: Mat4::IDENTITY.to_cols_array_2d(),
            full_resolution: plan.extent.to_array(),
            full_resolution_inv: (Vec2::ONE
                / Vec2::new(plan.extent.x as f32, plan.extent.y as f32))
            .to_array(),
            resolution_bias: resolution_bias.to_array(),
            resolution_scale: plan.resolution_scale,
            thickness: options.thickness,
            quality: options.trace_quality(),
            brightness_clamp: options.brightness_clamp(),
            roughness_mask_scale: options.roughness_mask_scale(),
            roughness_mask_bias: options.roughness_mask_bias(),
            skip_denoise: 0,
            closure_index: 0,
            closure_active: 0,
            _pad0: 0,
        }
    }

    /// Extends a shared snapshot with closure-specific fields.
    pub fn for_closure(
        mut self,
        closure: ClosureClass,
        stages: &StagePlan,
        radiance_persmat: Mat4,
        history_persmat: Mat4,
    ) -> Self {
        self.radiance_persmat = radiance_persmat.to_cols_array_2d();
        self.history_persmat = history_persmat.to_cols_array_2d();
        self.skip_denoise = stages.skip_denoise() as u32;
        self.closure_index = closure.index() as u32;
        self.closure_active = closure.mask().bits();
        self
    }
}

/// Which uniform snapshot a pass binds.
///
/// One GPU buffer per snapshot: the shared one (written once per frame
/// before classification) and one per closure (written before that
/// closure's passes). A pass binding snapshot `Closure(c)` is guaranteed
/// to read the values pushed for `c` no matter how the other closures
/// interleave, removing the latest-push ordering hazard a single shared
/// block would have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Snapshot {
    Shared,
    Closure(ClosureClass),
}

impl Snapshot {
    pub const COUNT: usize = 1 + ClosureClass::COUNT;

    fn index(self) -> usize {
        match self {
            Self::Shared => 0,
            Self::Closure(closure) => 1 + closure.index(),
        }
    }
}

pub(crate) struct FrameUniforms {
    slots: [UniformBuffer<FrameData>; Snapshot::COUNT],
}

impl FrameUniforms {
    pub fn new(device: &wgpu::Device) -> Self {
        let slot = |label: &str| {
            UniformBuffer::new(device, format!("raylight_frame_data_{label}"))
        };

        Self {
            slots: [
                slot("shared"),
                slot("diffuse"),
                slot("reflect"),
                slot("refract"),
            ],
        }
    }

    pub fn write(
        &self,
        queue: &wgpu::Queue,
        snapshot: Snapshot,
        data: &FrameData,
    ) {
        self.slots[snapshot.index()].write(queue, data);
    }

    pub fn binding(&self, snapshot: Snapshot) -> wgpu::BindingResource {
        self.slots[snapshot.index()].binding()
    }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use glam::UVec2;

    use super::*;
    use crate::ClosureMask;

    #[test]
    fn frame_data_is_tightly_packed() {
        // std140-compatible: 16-byte aligned total, no implicit padding.
        assert_eq!(192, mem::size_of::<FrameData>());
        assert_eq!(0, mem::size_of::<FrameData>() % 16);
    }

    #[test]
    fn closure_snapshot_extends_the_shared_one() {
        let options = TracingOptions::default();
        let plan = FramePlan::new(
            &options,
            UVec2::new(1920, 1080),
            ClosureMask::all(),
        );
        let stages = StagePlan::new(&options);

        let shared = FrameData::shared(
            &options,
            &plan,
            Mat4::IDENTITY,
            IVec2::ZERO,
        );

        let reflect = shared.for_closure(
            ClosureClass::Reflection,
            &stages,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
        );

        assert_eq!(1, reflect.closure_index);
        assert_eq!(ClosureMask::REFLECTION.bits(), reflect.closure_active);
        assert_eq!(shared.thickness, reflect.thickness);
        assert_eq!(shared.full_resolution, reflect.full_resolution);
    }

    #[test]
    fn snapshot_indices_are_distinct() {
        let mut seen = [false; Snapshot::COUNT];

        seen[Snapshot::Shared.index()] = true;

        for closure in ClosureClass::ALL {
            let idx = Snapshot::Closure(closure).index();

            assert!(!seen[idx]);
            seen[idx] = true;
        }

        assert!(seen.iter().all(|seen| *seen));
    }
}
