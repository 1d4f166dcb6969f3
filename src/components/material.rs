use bevy_ecs::component::Component;

#[derive(Component)]
pub struct MaterialComponent {
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub shader: wgpu::ShaderModule,
}

// wgpu handles are only !Send/!Sync on the web, where there is a single thread.
#[cfg(target_arch = "wasm32")]
unsafe impl Send for MaterialComponent {}
#[cfg(target_arch = "wasm32")]
unsafe impl Sync for MaterialComponent {}
