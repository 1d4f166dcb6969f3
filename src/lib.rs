pub mod components;
pub mod constants;
pub mod systems;

use anyhow::Context;
use bevy_ecs::{query::With, world::World};
use components::{
    camera::{CameraComponent, IDENTITY_MATRIX_4},
    globe::{GlobeComponent, GroupTransformComponent},
    marker::MarkerComponent,
    material::MaterialComponent,
    mesh::MeshComponent,
    render_pipelines::RenderPipelineComponent,
};
use constants::*;
use systems::{
    camera::CameraSystem,
    hotspots::HotspotRegistry,
    interaction::InteractionState,
    material::MaterialSystem,
    mesh::MeshSystem,
    notification::NotificationSystem,
    render_pipelines::{PipelineKind, RenderPipelineSystem},
    rotation::GlobeRotation,
    texture::TextureLoader,
};
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{CursorIcon, Window, WindowBuilder},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

struct State {
    // renderer
    size: winit::dpi::PhysicalSize<u32>,
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    // scene
    world: World,
    camera_component: CameraComponent,
    hotspots: HotspotRegistry,
    globe_texture: TextureLoader,

    // interaction
    interaction: InteractionState,
    rotation: GlobeRotation,
    hovered: Option<usize>,
}

impl State {
    async fn new(window: &Window) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // Backends::all => Vulkan + Metal + DX12 + Browser WebGPU
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // # Safety
        // The surface needs to live as long as the window that created it.
        // The window is moved into the event loop closure alongside State, so
        // it outlives the surface.
        let surface =
            unsafe { instance.create_surface(window) }.context("creating window surface")?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can draw to this window")?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    // WebGL doesn't support all of wgpu's features
                    limits: wgpu::Limits::downlevel_webgl2_defaults(),
                    label: None,
                },
                None, // Trace path
            )
            .await
            .context("requesting GPU device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Shaders output linear colour and expect an sRGB surface to encode it.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no texture formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = RenderPipelineSystem::create_depth_view(&device, config.width, config.height);

        let camera_component = CameraSystem::new(&device).create_camera(config.width, config.height);
        let hotspots = HotspotRegistry::default();

        let mut world = World::new();
        State::spawn_starfield(&mut world, &device, &camera_component, config.format);
        State::spawn_globe(&mut world, &device, &queue, &camera_component, config.format);
        State::spawn_markers(&mut world, &device, &camera_component, &hotspots, config.format);
        let marker_count = world
            .query_filtered::<(), With<MarkerComponent>>()
            .iter(&world)
            .count();

        tracing::info!(
            width = config.width,
            height = config.height,
            format = ?config.format,
            markers = marker_count,
            "Scene ready"
        );

        Ok(Self {
            size,
            surface,
            device,
            queue,
            config,
            depth_view,
            world,
            camera_component,
            hotspots,
            globe_texture: TextureLoader::spawn(GLOBE_TEXTURE_PATH),
            interaction: InteractionState::new(),
            rotation: GlobeRotation::default(),
            hovered: None,
        })
    }

    fn spawn_starfield(
        world: &mut World,
        device: &wgpu::Device,
        camera_component: &CameraComponent,
        format: wgpu::TextureFormat,
    ) {
        let (vertices, indices) = MeshSystem::generate_starfield(STAR_COUNT, STAR_SPREAD, STAR_SEED);
        let mesh = MeshSystem::create_mesh(device, &vertices, &indices, IDENTITY_MATRIX_4);
        let material = MaterialSystem::create_color_material(
            device,
            STAR_COLOR,
            device.create_shader_module(wgpu::include_wgsl!("./shaders/color_shader.wgsl")),
        );
        let pipeline = RenderPipelineSystem::create_render_pipeline(
            device,
            camera_component,
            &material,
            &mesh,
            format,
            PipelineKind::Points,
        );
        world.spawn((mesh, material, pipeline));
    }

    // Starts on the flat fallback; the color map is swapped in by
    // `poll_globe_texture` once it has loaded.
    fn spawn_globe(
        world: &mut World,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        camera_component: &CameraComponent,
        format: wgpu::TextureFormat,
    ) {
        let (vertices, indices) =
            MeshSystem::generate_sphere_mesh(GLOBE_RADIUS, GLOBE_SEGMENTS, GLOBE_SEGMENTS);
        let mesh = MeshSystem::create_mesh(device, &vertices, &indices, IDENTITY_MATRIX_4);
        let material = MaterialSystem::create_texture_material(
            device,
            queue,
            &MaterialSystem::flat_fallback_image(GLOBE_FALLBACK_COLOR),
            device.create_shader_module(wgpu::include_wgsl!("./shaders/globe_shader.wgsl")),
        );
        let pipeline = RenderPipelineSystem::create_render_pipeline(
            device,
            camera_component,
            &material,
            &mesh,
            format,
            PipelineKind::Mesh,
        );
        world.spawn((
            mesh,
            material,
            pipeline,
            GlobeComponent,
            GroupTransformComponent {
                local_matrix: cgmath::Matrix4::from(IDENTITY_MATRIX_4),
            },
        ));
    }

    fn spawn_markers(
        world: &mut World,
        device: &wgpu::Device,
        camera_component: &CameraComponent,
        hotspots: &HotspotRegistry,
        format: wgpu::TextureFormat,
    ) {
        let (vertices, indices) =
            MeshSystem::generate_sphere_mesh(MARKER_RADIUS, MARKER_SEGMENTS, MARKER_SEGMENTS);

        for marker in hotspots.markers() {
            let local_matrix = cgmath::Matrix4::from_translation(marker.position);
            let mesh = MeshSystem::create_mesh(device, &vertices, &indices, local_matrix.into());
            let material = MaterialSystem::create_color_material(
                device,
                MARKER_COLOR,
                device.create_shader_module(wgpu::include_wgsl!("./shaders/color_shader.wgsl")),
            );
            let pipeline = RenderPipelineSystem::create_render_pipeline(
                device,
                camera_component,
                &material,
                &mesh,
                format,
                PipelineKind::Mesh,
            );
            world.spawn((
                mesh,
                material,
                pipeline,
                MarkerComponent,
                GroupTransformComponent { local_matrix },
            ));
            tracing::debug!(label = marker.label, position = ?marker.position, "Placed hotspot");
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view =
                RenderPipelineSystem::create_depth_view(&self.device, new_size.width, new_size.height);
            CameraSystem::resize(&mut self.camera_component, new_size.width, new_size.height);
        }
    }

    /// Returns true when the event was consumed.
    fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.interaction.pointer_moved(
                    position.x as f32,
                    position.y as f32,
                    self.size.width as f32,
                    self.size.height as f32,
                );
                true
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                match state {
                    ElementState::Pressed => self.interaction.pointer_pressed(),
                    ElementState::Released => {
                        self.interaction.pointer_released();
                        // a release is also a click
                        self.click();
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn pick(&self) -> Option<usize> {
        self.interaction.pick(
            self.camera_component.camera.build_view_projection_matrix(),
            self.rotation.matrix(),
            &self.hotspots,
        )
    }

    fn click(&self) {
        let clicked = self.interaction.clicked_label(
            self.camera_component.camera.build_view_projection_matrix(),
            self.rotation.matrix(),
            &self.hotspots,
        );
        if let Some(label) = clicked {
            NotificationSystem::notify_hotspot(label);
        }
    }

    fn cursor_icon(&self) -> CursorIcon {
        if self.hovered.is_some() {
            CursorIcon::Hand
        } else {
            CursorIcon::Default
        }
    }

    fn update(&mut self) {
        self.poll_globe_texture();

        self.rotation.advance(&self.interaction.drag());
        let group_matrix = self.rotation.matrix();
        let mut group_members = self
            .world
            .query::<(&MeshComponent, &GroupTransformComponent)>();
        for (mesh, transform) in group_members.iter(&self.world) {
            let model_matrix: [[f32; 4]; 4] = (group_matrix * transform.local_matrix).into();
            self.queue.write_buffer(
                &mesh.model_matrix_buffer,
                0,
                bytemuck::cast_slice(&[model_matrix]),
            );
        }

        CameraSystem::update_uniform(&self.queue, &mut self.camera_component);

        self.hovered = self.pick();
    }

    fn poll_globe_texture(&mut self) {
        match self.globe_texture.poll() {
            Some(Ok(image)) => {
                let mut globes = self
                    .world
                    .query_filtered::<&mut MaterialComponent, With<GlobeComponent>>();
                for mut material in globes.iter_mut(&mut self.world) {
                    let bind_group = MaterialSystem::create_2d_texture_bind_group(
                        &self.device,
                        &self.queue,
                        &material.bind_group_layout,
                        &image,
                    );
                    material.bind_group = bind_group;
                }
                tracing::info!(
                    width = image.width(),
                    height = image.height(),
                    "Globe texture loaded"
                );
            }
            Some(Err(err)) => {
                tracing::error!("Error loading globe texture, keeping flat shading: {err:#}");
            }
            None => {}
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // get the surface to provide a new SurfaceTexture that we will render to.
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // The encoder builds a command buffer that we can then send to the gpu.
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let mut drawables = self.world.query::<(
            &MeshComponent,
            &MaterialComponent,
            &RenderPipelineComponent,
        )>();

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: true,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: true,
                }),
                stencil_ops: None,
            }),
        });

        render_pass.set_bind_group(0, &self.camera_component.camera_bind_group, &[]);

        for (mesh, material, render_pipeline) in drawables.iter(&self.world) {
            render_pass.set_pipeline(&render_pipeline.render_pipeline);
            render_pass.set_bind_group(1, &material.bind_group, &[]);
            render_pass.set_bind_group(2, &mesh.model_matrix_bind_group, &[]);

            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
        }

        drop(render_pass);

        // submit will accept anything that implements IntoIter
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub async fn run() {
    cfg_if::cfg_if! {
        if #[cfg(target_arch = "wasm32")] {
            console_error_panic_hook::set_once();
            tracing_wasm::set_as_global_default();
        } else {
            tracing_subscriber::fmt::init()
        }
    }

    let event_loop = EventLoop::new();
    let window = match WindowBuilder::new()
        .with_title("Hotspot Globe")
        .build(&event_loop)
    {
        Ok(window) => window,
        Err(err) => {
            tracing::error!("Could not create window: {err}");
            return;
        }
    };

    #[cfg(target_arch = "wasm32")]
    {
        // Winit prevents sizing with CSS, so we have to
        // size the canvas to the browser window ourselves.
        use winit::dpi::LogicalSize;
        use winit::platform::web::WindowExtWebSys;

        let mounted = web_sys::window().and_then(|win| {
            let width = win.inner_width().ok()?.as_f64()?;
            let height = win.inner_height().ok()?.as_f64()?;
            window.set_inner_size(LogicalSize::new(width, height));

            let body = win.document()?.body()?;
            let canvas = web_sys::Element::from(window.canvas());
            body.append_child(&canvas).ok()?;
            Some(())
        });
        if mounted.is_none() {
            tracing::error!("Couldn't append canvas to document body");
            return;
        }
    }

    let mut state = match State::new(&window).await {
        Ok(state) => state,
        Err(err) => {
            tracing::error!("Could not initialise renderer: {err:#}");
            return;
        }
    };

    event_loop.run(move |event, _, control_flow| match event {
        Event::WindowEvent {
            ref event,
            window_id,
        } if window_id == window.id() => {
            if !state.input(event) {
                match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                state: ElementState::Pressed,
                                virtual_keycode: Some(VirtualKeyCode::Escape),
                                ..
                            },
                        ..
                    } => *control_flow = ControlFlow::Exit,
                    WindowEvent::Resized(physical_size) => {
                        state.resize(*physical_size);
                    }
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        // new_inner_size is &&mut so we have to dereference it twice
                        state.resize(**new_inner_size);
                    }
                    _ => {}
                }
            }
        }
        Event::RedrawRequested(window_id) if window_id == window.id() => {
            state.update();
            window.set_cursor_icon(state.cursor_icon());
            match state.render() {
                Ok(_) => {}
                // Reconfigure the surface if lost
                Err(wgpu::SurfaceError::Lost) => state.resize(state.size),
                // The system is out of memory, we should probably quit
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    tracing::error!("GPU out of memory, exiting");
                    *control_flow = ControlFlow::Exit
                }
                // All other errors (Outdated, Timeout) should be resolved by the next frame
                Err(e) => tracing::warn!("Dropped frame: {e:?}"),
            }
        }
        Event::MainEventsCleared => {
            // RedrawRequested will only trigger once, unless we manually
            // request it.
            window.request_redraw();
        }
        _ => {}
    });
}
