use crate::components::{
    camera::CameraComponent,
    material::MaterialComponent,
    mesh::{MeshComponent, PointVertex, Vertex},
    render_pipelines::RenderPipelineComponent,
};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub struct RenderPipelineSystem {}

impl RenderPipelineSystem {
    pub fn layout_desc(
        device: &wgpu::Device,
        label: &str,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
    ) -> wgpu::PipelineLayout {
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts,
            push_constant_ranges: &[],
        })
    }

    /// Filled triangles, used for the globe and the hotspot markers.
    pub fn mesh_pipeline_desc(
        device: &wgpu::Device,
        pipeline_layout: &wgpu::PipelineLayout,
        shader_module: &wgpu::ShaderModule,
        texture_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Render Pipeline"),
            layout: Some(pipeline_layout),

            vertex: wgpu::VertexState {
                module: shader_module,
                entry_point: "vs_main",
                buffers: &[Vertex::desc()],
            },

            // frag is technically optional, so we
            // have to wrap it in Some
            fragment: Some(wgpu::FragmentState {
                module: shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                // every three vertices will correspond to one triangle.
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                // a triangle is facing forward if the vertices are arranged in
                // a counter-clockwise direction
                front_face: wgpu::FrontFace::Ccw,
                // Some(wgpu::Face::Back) makes it so if objects are not facing
                // camera they are not rendered
                cull_mode: Some(wgpu::Face::Back),
                // anything other than Fill requires Features::NON_FILL_POLYGON_MODE
                polygon_mode: wgpu::PolygonMode::Fill,
                // Requires Features::DEPTH_CLIP_CONTROL
                unclipped_depth: false,
                // Requires Features::CONSERVATIVE_RASTERIZATION
                conservative: false,
            },
            depth_stencil: Some(RenderPipelineSystem::depth_stencil_state()),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                // related to anti-aliasing
                alpha_to_coverage_enabled: false,
            },
            // We won't be rendering to array textures so we can set this to None
            multiview: None,
        })
    }

    /// One pixel per vertex, used for the starfield.
    pub fn point_pipeline_desc(
        device: &wgpu::Device,
        pipeline_layout: &wgpu::PipelineLayout,
        shader_module: &wgpu::ShaderModule,
        texture_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Render Pipeline"),
            layout: Some(pipeline_layout),

            vertex: wgpu::VertexState {
                module: shader_module,
                entry_point: "vs_main",
                buffers: &[PointVertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::PointList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(RenderPipelineSystem::depth_stencil_state()),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        })
    }

    fn depth_stencil_state() -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    pub fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Mesh,
    Points,
}

impl RenderPipelineSystem {
    /// Layout is camera (0), material (1), model matrix (2) for every
    /// pipeline, matching the shaders.
    pub fn create_render_pipeline(
        device: &wgpu::Device,
        camera: &CameraComponent,
        material: &MaterialComponent,
        mesh: &MeshComponent,
        texture_format: wgpu::TextureFormat,
        kind: PipelineKind,
    ) -> RenderPipelineComponent {
        let bind_group_layouts: &[&wgpu::BindGroupLayout] = &[
            &camera.camera_bind_group_layout,
            &material.bind_group_layout,
            &mesh.model_matrix_bind_group_layout,
        ];
        let label = match kind {
            PipelineKind::Mesh => "Mesh Render Pipeline Layout",
            PipelineKind::Points => "Point Render Pipeline Layout",
        };
        let render_pipeline_layout =
            RenderPipelineSystem::layout_desc(device, label, bind_group_layouts);
        let render_pipeline = match kind {
            PipelineKind::Mesh => RenderPipelineSystem::mesh_pipeline_desc(
                device,
                &render_pipeline_layout,
                &material.shader,
                texture_format,
            ),
            PipelineKind::Points => RenderPipelineSystem::point_pipeline_desc(
                device,
                &render_pipeline_layout,
                &material.shader,
                texture_format,
            ),
        };
        RenderPipelineComponent {
            render_pipeline,
            render_pipeline_layout,
        }
    }
}
