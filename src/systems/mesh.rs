use std::f32::consts::PI;

use rand::{rngs::StdRng, Rng, SeedableRng};
use wgpu::util::DeviceExt;

use crate::components::mesh::{MeshComponent, PointVertex, Vertex};

pub struct MeshSystem {}

impl MeshSystem {
    pub fn create_vertex_buffer<T: bytemuck::Pod>(device: &wgpu::Device, data: &[T]) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn create_index_buffer(device: &wgpu::Device, data: &[u32]) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn create_model_matrix_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("Model Matrix Bind Group Layout"),
        })
    }

    pub fn create_model_matrix_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("Model Matrix Bind Group"),
        })
    }

    /// Uploads geometry together with a writable model matrix.
    pub fn create_mesh<T: bytemuck::Pod>(
        device: &wgpu::Device,
        vertices: &[T],
        indices: &[u32],
        model_matrix: [[f32; 4]; 4],
    ) -> MeshComponent {
        let model_matrix_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Model Matrix Buffer"),
            contents: bytemuck::cast_slice(&[model_matrix]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let model_matrix_bind_group_layout = MeshSystem::create_model_matrix_bind_group_layout(device);
        let model_matrix_bind_group = MeshSystem::create_model_matrix_bind_group(
            device,
            &model_matrix_bind_group_layout,
            &model_matrix_buffer,
        );

        MeshComponent {
            vertex_buffer: MeshSystem::create_vertex_buffer(device, vertices),
            index_buffer: MeshSystem::create_index_buffer(device, indices),
            num_indices: indices.len() as u32,
            model_matrix_bind_group_layout,
            model_matrix_bind_group,
            model_matrix_buffer,
        }
    }

    /// UV sphere with +Y through the poles. `u` runs from the antimeridian
    /// eastwards and `v` from the north pole down, which is how an
    /// equirectangular image is laid out in memory.
    pub fn generate_sphere_mesh(
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    ) -> (Vec<Vertex>, Vec<u32>) {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices = Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
        let mut indices = Vec::new();

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (sin_theta, cos_theta) = (u * 2.0 * PI).sin_cos();
                let (sin_phi, cos_phi) = (v * PI).sin_cos();

                vertices.push(Vertex {
                    position: [
                        -radius * cos_theta * sin_phi,
                        radius * cos_phi,
                        radius * sin_theta * sin_phi,
                    ],
                    tex_coords: [u, v],
                });
            }
        }

        let row = width_segments + 1;
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                // the first and last rings collapse to a point, so
                // only one triangle per quad survives there
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        (vertices, indices)
    }

    /// Points scattered through a box behind the globe: x and y in
    /// `[-spread/2, spread/2]`, z in `[-spread, 0]`. Anything past the far
    /// plane is simply clipped.
    pub fn generate_starfield(count: usize, spread: f32, seed: u64) -> (Vec<PointVertex>, Vec<u32>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let vertices: Vec<PointVertex> = (0..count)
            .map(|_| PointVertex {
                position: [
                    (rng.gen::<f32>() - 0.5) * spread,
                    (rng.gen::<f32>() - 0.5) * spread,
                    -rng.gen::<f32>() * spread,
                ],
            })
            .collect();
        let indices = (0..count as u32).collect();
        (vertices, indices)
    }
}
