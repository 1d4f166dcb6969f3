use image::{ImageBuffer, Rgba, RgbaImage};
use wgpu::util::DeviceExt;

use crate::components::material::MaterialComponent;

pub struct MaterialSystem {}

impl MaterialSystem {
    pub fn texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("2D Texture bind group layout"),
            entries: &[
                // Texture
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                // Sampler
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    // This should match the filterable field of the
                    // corresponding Texture entry above.
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    /// Uploads `image_data` and binds it against an existing layout, so the
    /// result can be swapped into a pipeline that was built before the image
    /// arrived.
    pub fn create_2d_texture_bind_group(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        image_data: &RgbaImage,
    ) -> wgpu::BindGroup {
        let dimensions = image_data.dimensions();
        let texture_size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1, // Single layer for 2D texture
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            size: texture_size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            label: Some("2D Texture"),
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image_data.as_raw(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(dimensions.0 * 4), // 4 bytes per pixel for RGBA
                rows_per_image: Some(dimensions.1),
            },
            texture_size,
        );

        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("2D Texture View"),
            dimension: Some(wgpu::TextureViewDimension::D2),
            ..Default::default()
        });

        let texture_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("2D Texture Sampler"),
            // wrap horizontally so the antimeridian seam samples cleanly
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&texture_sampler),
                },
            ],
            label: Some("2D Texture bind group"),
        })
    }

    /// Single-texel stand-in used while the globe texture is loading, and for
    /// good if it never loads.
    pub fn flat_fallback_image(color: [u8; 4]) -> RgbaImage {
        ImageBuffer::from_pixel(1, 1, Rgba(color))
    }

    pub fn create_texture_material(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image_data: &RgbaImage,
        shader: wgpu::ShaderModule,
    ) -> MaterialComponent {
        let bind_group_layout = MaterialSystem::texture_bind_group_layout(device);
        let bind_group = MaterialSystem::create_2d_texture_bind_group(
            device,
            queue,
            &bind_group_layout,
            image_data,
        );
        MaterialComponent {
            bind_group,
            bind_group_layout,
            shader,
        }
    }

    /// Unlit single colour, bound as a fragment uniform.
    pub fn create_color_material(
        device: &wgpu::Device,
        color: [f32; 4],
        shader: wgpu::ShaderModule,
    ) -> MaterialComponent {
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Color Uniform Buffer"),
            contents: bytemuck::bytes_of(&color),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("Color Uniform Bind Group Layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: color_buffer.as_entire_binding(),
            }],
            label: Some("Color Uniform Bind Group"),
        });

        MaterialComponent {
            bind_group,
            bind_group_layout,
            shader,
        }
    }
}
