use glam::UVec2;

/// Owned 2D (optionally layered) texture with a read-write-capable usage
/// set, so the same allocation can serve as a sampling source, a storage
/// image and a copy endpoint depending on the pass.
#[derive(Debug)]
pub struct Texture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: UVec2,
    layers: u32,
    format: wgpu::TextureFormat,
}

impl Texture {
    pub fn new(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        size: UVec2,
        format: wgpu::TextureFormat,
    ) -> Self {
        Self::new_array(device, label, size, 1, format)
    }

    pub fn new_array(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        size: UVec2,
        layers: u32,
        format: wgpu::TextureFormat,
    ) -> Self {
        let label = label.as_ref();

        log::debug!(
            "Allocating texture `{label}`; size={}x{}, layers={layers}, \
             format={format:?}",
            size.x,
            size.y,
        );

        assert!(size.x > 0);
        assert!(size.y > 0);
        assert!(layers > 0);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&Default::default());

        Self {
            texture,
            view,
            size,
            layers,
            format,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn layers(&self) -> u32 {
        self.layers
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Zeroes every texel and layer.
    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder) {
        encoder.clear_texture(
            &self.texture,
            &wgpu::ImageSubresourceRange::default(),
        );
    }

    /// Copies this texture's full extent into `dst`.
    pub fn copy_to(&self, encoder: &mut wgpu::CommandEncoder, dst: &Self) {
        assert_eq!(self.size, dst.size);
        assert_eq!(self.layers, dst.layers);
        assert_eq!(self.format, dst.format);

        encoder.copy_texture_to_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyTexture {
                texture: &dst.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::Extent3d {
                width: self.size.x,
                height: self.size.y,
                depth_or_array_layers: self.layers,
            },
        );
    }
}
