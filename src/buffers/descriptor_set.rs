/// Binding slot kind, declared once per pass at pipeline-creation time.
///
/// Transient resources are pooled and change identity every frame, so the
/// layout lives with the pass while bind groups are rebuilt per dispatch
/// from whatever the pool handed out.
#[derive(Clone, Copy, Debug)]
pub(crate) enum BindingKind {
    Uniform,
    Storage { read_only: bool },
    Texture2d,
    Texture2dArray,
    UintTexture2dArray,
    StorageTexture2d {
        format: wgpu::TextureFormat,
        access: wgpu::StorageTextureAccess,
    },
    StorageTexture2dArray {
        format: wgpu::TextureFormat,
        access: wgpu::StorageTextureAccess,
    },
    Sampler,
}

impl BindingKind {
    fn entry(self, binding: u32) -> wgpu::BindGroupLayoutEntry {
        let ty = match self {
            Self::Uniform => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },

            Self::Storage { read_only } => wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },

            Self::Texture2d => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float {
                    filterable: false,
                },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },

            Self::Texture2dArray => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float {
                    filterable: false,
                },
                view_dimension: wgpu::TextureViewDimension::D2Array,
                multisampled: false,
            },

            Self::UintTexture2dArray => wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Uint,
                view_dimension: wgpu::TextureViewDimension::D2Array,
                multisampled: false,
            },

            Self::StorageTexture2d { format, access } => {
                wgpu::BindingType::StorageTexture {
                    access,
                    format,
                    view_dimension: wgpu::TextureViewDimension::D2,
                }
            }

            Self::StorageTexture2dArray { format, access } => {
                wgpu::BindingType::StorageTexture {
                    access,
                    format,
                    view_dimension: wgpu::TextureViewDimension::D2Array,
                }
            }

            Self::Sampler => wgpu::BindingType::Sampler(
                wgpu::SamplerBindingType::NonFiltering,
            ),
        };

        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty,
            count: None,
        }
    }
}

/// A pass's bind-group layout plus the machinery to instantiate bind groups
/// against it each frame.
pub(crate) struct DescriptorSetLayout {
    name: &'static str,
    layout: wgpu::BindGroupLayout,
    len: usize,
}

impl DescriptorSetLayout {
    pub fn new(
        device: &wgpu::Device,
        name: &'static str,
        kinds: &[BindingKind],
    ) -> Self {
        let entries: Vec<_> = kinds
            .iter()
            .enumerate()
            .map(|(binding, kind)| kind.entry(binding as _))
            .collect();

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{name}_layout")),
                entries: &entries,
            });

        Self {
            name,
            layout,
            len: kinds.len(),
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind(
        &self,
        device: &wgpu::Device,
        resources: Vec<wgpu::BindingResource>,
    ) -> wgpu::BindGroup {
        assert_eq!(self.len, resources.len());

        let entries: Vec<_> = resources
            .into_iter()
            .enumerate()
            .map(|(binding, resource)| wgpu::BindGroupEntry {
                binding: binding as _,
                resource,
            })
            .collect();

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.name),
            layout: &self.layout,
            entries: &entries,
        })
    }
}
