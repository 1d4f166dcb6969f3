use wgpu::util::DeviceExt;

use crate::components::camera::{Camera, CameraComponent, CameraUniform};

pub struct CameraSystem<'a> {
    device: &'a wgpu::Device,
}

impl<'a> CameraSystem<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    pub fn create_camera(&self, screen_width: u32, screen_height: u32) -> CameraComponent {
        let camera = Camera::new(aspect_ratio(screen_width, screen_height));

        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update_view_proj(&camera);

        let camera_buffer = self.create_uniform_buffer(&camera_uniform);
        let camera_bind_group_layout =
            self.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                    label: Some("Camera Component Uniform Bind Group Layout"),
                });

        let camera_bind_group =
            self.create_uniform_bind_group(&camera_buffer, &camera_bind_group_layout);

        CameraComponent {
            camera,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            camera_bind_group_layout,
        }
    }

    fn create_uniform_buffer<T: bytemuck::Pod>(&self, data: &T) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Component Uniform Buffer"),
                contents: bytemuck::bytes_of(data),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
    }

    fn create_uniform_bind_group(
        &self,
        buffer: &wgpu::Buffer,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("Camera Component Uniform Bind Group"),
        })
    }
}

impl CameraSystem<'_> {
    pub fn resize(camera_component: &mut CameraComponent, screen_width: u32, screen_height: u32) {
        camera_component.camera.aspect = aspect_ratio(screen_width, screen_height);
    }

    pub fn update_uniform(queue: &wgpu::Queue, camera_component: &mut CameraComponent) {
        camera_component
            .camera_uniform
            .update_view_proj(&camera_component.camera);
        queue.write_buffer(
            &camera_component.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_component.camera_uniform]),
        );
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
