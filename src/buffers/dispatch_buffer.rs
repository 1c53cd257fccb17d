use std::mem;

/// Indirect-dispatch argument buffer filled by the tile-compaction kernel.
///
/// Layout: `[groups_x, groups_y, groups_z, tile_count]`. The compaction
/// kernel bumps `tile_count` atomically as it appends tile coordinates to
/// the matching work-list and derives the workgroup counts from it; every
/// dependent pass is dispatched off this buffer and never iterates tiles by
/// a CPU-side count.
pub(crate) struct DispatchBuffer {
    buffer: wgpu::Buffer,
}

impl DispatchBuffer {
    const SIZE: u64 = 4 * mem::size_of::<u32>() as u64;

    pub fn new(device: &wgpu::Device, label: impl AsRef<str>) -> Self {
        let label = label.as_ref();

        log::debug!("Allocating dispatch buffer `{label}`");

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::INDIRECT
                | wgpu::BufferUsages::COPY_DST,
            size: Self::SIZE,
            mapped_at_creation: false,
        });

        Self { buffer }
    }

    /// Zeroes the arguments; must precede each compaction dispatch.
    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.clear_buffer(&self.buffer, 0, None);
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn binding(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}
