#[cfg(feature = "integration-tests")]
mod gpu {
    use std::{cell::RefCell, rc::Rc};

    use events_globe::{
        context::ErrorCallback,
        data_structures::{
            entity::{DrawContext, Entity},
            mesh::{icosphere, quad},
            rendering_state::RenderingState,
            texture::{Texture, TextureSlot},
            transform::Transform,
        },
        pipelines::{
            material::{BlendMode, Material, MaterialBinding},
            mesh_renderer::{MeshBuffers, MeshRenderer},
            shader::{FRAGMENT_SHADER, ShaderProgram, VERTEX_SHADER},
        },
    };

    const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    fn device() -> (wgpu::Device, wgpu::Queue) {
        futures::executor::block_on(async {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let adapter = instance
                .request_adapter(&wgpu::RequestAdapterOptions::default())
                .await
                .expect("No adapter available");
            adapter
                .request_device(&wgpu::DeviceDescriptor::default())
                .await
                .expect("No device available")
        })
    }

    fn recorder() -> (ErrorCallback, Rc<RefCell<Vec<String>>>) {
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = errors.clone();
        let on_error: ErrorCallback =
            Rc::new(move |message: &str| sink.borrow_mut().push(message.to_string()));
        (on_error, errors)
    }

    fn program(device: &wgpu::Device, queue: &wgpu::Queue, vs_source: &str) -> Rc<ShaderProgram> {
        let on_error: ErrorCallback = Rc::new(|_: &str| {});
        Rc::new(futures::executor::block_on(ShaderProgram::new(
            device,
            queue,
            TARGET_FORMAT,
            vs_source,
            FRAGMENT_SHADER,
            &on_error,
        )))
    }

    /// Records one render pass into a 64×64 offscreen target and returns the first
    /// validation error raised while recording or submitting it.
    fn draw_offscreen(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        draw: impl FnOnce(&mut DrawContext<'_, '_>),
    ) -> Option<wgpu::Error> {
        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen target"),
            size: wgpu::Extent3d {
                width: 64,
                height: 64,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let depth = Texture::create_depth_texture(device, [64, 64], "offscreen depth");

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("offscreen encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("offscreen pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            let mut state = RenderingState::default();
            let mut dc = DrawContext {
                device,
                queue,
                state: &mut state,
                render_pass: &mut render_pass,
            };
            draw(&mut dc);
        }
        queue.submit(std::iter::once(encoder.finish()));
        futures::executor::block_on(device.pop_error_scope())
    }

    #[test]
    fn textured_program_links_every_blend_mode() {
        let (device, queue) = device();
        let (on_error, errors) = recorder();
        let program = futures::executor::block_on(ShaderProgram::new(
            &device,
            &queue,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            VERTEX_SHADER,
            FRAGMENT_SHADER,
            &on_error,
        ));
        assert!(errors.borrow().is_empty(), "{:?}", errors.borrow());
        assert!(program.is_usable());
        for mode in [BlendMode::Alpha, BlendMode::Add, BlendMode::Multiply] {
            assert!(program.pipeline(mode).is_some());
        }
    }

    #[test]
    fn broken_shader_leaves_the_program_unusable() {
        let (device, queue) = device();
        let (on_error, errors) = recorder();
        let program = futures::executor::block_on(ShaderProgram::new(
            &device,
            &queue,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            "this is not wgsl",
            FRAGMENT_SHADER,
            &on_error,
        ));
        assert!(!program.is_usable());
        assert!(program.pipeline(BlendMode::Alpha).is_none());
        assert_eq!(errors.borrow().len(), 1);
        assert!(errors.borrow()[0].starts_with("An error occurred compiling the shaders"));
    }

    #[test]
    fn undecodable_image_keeps_the_placeholder() {
        let (device, queue) = device();
        assert!(Texture::from_bytes(&device, &queue, b"not an image", "broken.png").is_err());

        let slot = TextureSlot::new(Texture::placeholder(&device, &queue));
        let (on_error, _) = recorder();
        let program = futures::executor::block_on(ShaderProgram::new(
            &device,
            &queue,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            VERTEX_SHADER,
            FRAGMENT_SHADER,
            &on_error,
        ));
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let loaded = runtime.block_on(events_globe::resources::load_texture_into(
            &slot,
            "does/not/exist.png",
            &device,
            &queue,
        ));
        assert!(!loaded);
        // The placeholder still binds.
        let _ = slot.bind_group(&device, program.albedo_layout());
    }

    #[test]
    fn placed_entity_draws_without_validation_errors() {
        let (device, queue) = device();
        let material = Rc::new(Material::new(program(&device, &queue, VERTEX_SHADER)));
        let mut entity = Entity::new("pin");
        entity.add_component(Transform::new());
        entity.add_component(MeshRenderer::new(&device, quad(), material));

        let error = draw_offscreen(&device, &queue, |dc| entity.draw(dc));
        assert!(error.is_none(), "{:?}", error);
    }

    #[test]
    fn entity_without_transform_is_skipped() {
        let (device, queue) = device();
        let material = Rc::new(Material::new(program(&device, &queue, VERTEX_SHADER)));
        let mut entity = Entity::new("loose");
        entity.add_component(MeshRenderer::new(&device, quad(), material));

        let mut model_touched = false;
        let error = draw_offscreen(&device, &queue, |dc| {
            dc.state.model = cgmath::Matrix4::from_scale(7.0);
            entity.draw(dc);
            model_touched = dc.state.model != cgmath::Matrix4::from_scale(7.0);
        });
        assert!(error.is_none(), "{:?}", error);
        assert!(!model_touched);
    }

    #[test]
    fn unusable_program_refuses_to_activate_and_draws_nothing() {
        let (device, queue) = device();
        let broken = program(&device, &queue, "this is not wgsl");
        assert!(!broken.is_usable());
        let material = Rc::new(Material::new(broken.clone()));
        let binding = MaterialBinding::new(&device, &broken);

        let mut entity = Entity::new("pin");
        entity.add_component(Transform::new());
        entity.add_component(MeshRenderer::new(&device, quad(), material.clone()));

        let mut activated = true;
        // A draw without a pipeline would fail validation.
        let error = draw_offscreen(&device, &queue, |dc| {
            activated = material.activate(dc, &binding);
            entity.draw(dc);
        });
        assert!(!activated);
        assert!(error.is_none(), "{:?}", error);
    }

    #[test]
    fn renderers_share_uploaded_geometry() {
        let (device, queue) = device();
        let material = Rc::new(Material::new(program(&device, &queue, VERTEX_SHADER)));
        let shared = Rc::new(MeshBuffers::new(&device, &quad()));
        let first = MeshRenderer::new(&device, shared.clone(), material.clone());
        let second = MeshRenderer::new(&device, shared.clone(), material.clone());
        let own = MeshRenderer::new(&device, quad(), material);

        assert!(Rc::ptr_eq(first.buffers(), second.buffers()));
        assert!(!Rc::ptr_eq(first.buffers(), own.buffers()));
    }

    #[test]
    fn meshes_upload() {
        let (device, _queue) = device();
        let _quad = MeshBuffers::new(&device, &quad());
        let _globe = MeshBuffers::new(&device, &icosphere(4));
        let mut bare = quad();
        bare.uv = None;
        let _bare = MeshBuffers::new(&device, &bare);
    }
}
