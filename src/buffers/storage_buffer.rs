/// GPU-only storage buffer; never written from the CPU, so it carries no
/// element type. Used for the compacted tile work-lists.
pub(crate) struct StorageBuffer {
    buffer: wgpu::Buffer,
    label: String,
    size: u64,
}

impl StorageBuffer {
    pub fn new(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        size: u64,
    ) -> Self {
        let label = label.as_ref();

        log::debug!("Allocating storage buffer `{label}`; size={size}");

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            usage: wgpu::BufferUsages::STORAGE,
            size,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            label: label.to_owned(),
            size,
        }
    }

    /// Grows the buffer to at least `size`, reallocating if necessary.
    ///
    /// Callers rebuild their bind groups each frame, so swapping the
    /// underlying allocation here is safe.
    pub fn ensure_size(&mut self, device: &wgpu::Device, size: u64) -> bool {
        if size <= self.size {
            return false;
        }

        *self = Self::new(device, &self.label, size);

        true
    }

    pub fn binding(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }
}
