use std::{rc::Rc, sync::Arc};

use cgmath::{One, Quaternion, Vector3};
use instant::Instant;
use winit::window::Window;

use crate::{
    context::ErrorCallback,
    data_structures::{
        entity::Entity,
        mesh,
        texture::{Texture, TextureSlot},
        transform::Transform,
    },
    engine::{Engine, EngineState},
    globe::{
        config::GlobeConfig,
        interaction::GlobeInteraction,
        panel::InfoPanel,
        point_of_interest::{CameraMatrices, PointOfInterest, camera_matrices},
        pointer::DragEvent,
    },
    pipelines::{
        material::Material,
        mesh_renderer::{MeshBuffers, MeshRenderer},
        shader::{FRAGMENT_SHADER, ShaderProgram, VERTEX_SHADER},
    },
    resources,
};

/// The events globe: a textured sphere with points of interest that the user rotates by
/// dragging and that recenters on the nearest point once left alone.
pub struct EventsWorldRenderer {
    engine: Engine,
    interaction: GlobeInteraction,
    camera: CameraMatrices,
}

impl EventsWorldRenderer {
    pub async fn new(
        window: Arc<Window>,
        config: GlobeConfig,
        panel: Rc<dyn InfoPanel>,
        on_error: ErrorCallback,
    ) -> Self {
        let engine = Engine::new(window, &on_error).await;
        Self::with_engine(engine, config, panel, on_error).await
    }

    /// Populates the engine's scene. An engine without a context gets no scene at all.
    pub async fn with_engine(
        engine: Engine,
        config: GlobeConfig,
        panel: Rc<dyn InfoPanel>,
        on_error: ErrorCallback,
    ) -> Self {
        let globe = Transform::from_parts(
            config.globe_position,
            Quaternion::one(),
            Vector3::new(1.0, 1.0, 1.0),
        )
        .shared();
        let state = engine.rendering_state();
        let camera = camera_matrices(state.projection, state.view);
        let interaction = GlobeInteraction::new(globe, &config);

        let mut renderer = Self {
            engine,
            interaction,
            camera,
        };
        renderer.populate_scene(&config, panel, &on_error).await;
        renderer
    }

    async fn populate_scene(
        &mut self,
        config: &GlobeConfig,
        panel: Rc<dyn InfoPanel>,
        on_error: &ErrorCallback,
    ) {
        let Some(ctx) = self.engine.context() else {
            return;
        };
        let device = &ctx.device;
        let queue = &ctx.queue;

        let shader = Rc::new(
            ShaderProgram::new(
                device,
                queue,
                ctx.config.format,
                VERTEX_SHADER,
                FRAGMENT_SHADER,
                on_error,
            )
            .await,
        );
        let mut entities = Vec::with_capacity(config.points.len() + 1);

        let globe_albedo = TextureSlot::new(Texture::placeholder(device, queue));
        {
            let mut material = Material::new(shader.clone());
            material.albedo = Some(globe_albedo.clone());
            material.color = config.globe_color;
            let renderer = MeshRenderer::new(
                device,
                mesh::icosphere(config.globe_subdivisions),
                Rc::new(material),
            );

            let mut world = Entity::new("world");
            world.add_component(self.interaction.globe().clone());
            world.add_component(renderer);
            entities.push(Rc::new(world));
        }

        let point_albedo = TextureSlot::new(Texture::placeholder(device, queue));
        {
            let mut material = Material::new(shader.clone());
            material.albedo = Some(point_albedo.clone());
            material.color = config.point_color;
            let material = Rc::new(material);
            let quad = Rc::new(MeshBuffers::new(device, &mesh::quad()));

            for spec in &config.points {
                let mut point = PointOfInterest::new(
                    spec,
                    self.interaction.globe(),
                    panel.clone(),
                    config,
                    self.camera.clone(),
                );
                let renderer = MeshRenderer::new(device, quad.clone(), material.clone());
                if let Err(e) = point.add_component(renderer) {
                    log::warn!("{:#}", e);
                }
                entities.push(point.entity());
                self.interaction.push_point(point);
            }
        }
        log::info!(
            "scene populated with {} points of interest",
            config.points.len()
        );

        resources::load_texture_into(&globe_albedo, &config.globe_texture, device, queue).await;
        resources::load_texture_into(&point_albedo, &config.point_texture, device, queue).await;

        let scene = self.engine.scene_mut();
        entities.into_iter().for_each(|entity| scene.push(entity));
    }

    /// Starts the frame loop and aims the globe at the nearest point.
    pub fn run(&mut self) {
        self.engine.run();
        self.interaction.recenter();
    }

    /// One frame: fire due timers, ease and highlight, then update and draw the scene.
    pub fn frame(&mut self, now: Instant) {
        self.interaction.poll_timers(now);
        let Some(delta_time) = self.engine.begin_frame(now) else {
            return;
        };
        self.interaction.update(delta_time);
        match self.engine.render_frame() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.engine.recover_surface();
            }
            Err(e) => log::error!("{}", e),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.engine.resize(width, height);
        let state = self.engine.rendering_state();
        self.camera.set((state.projection, state.view));
    }

    pub fn handle_drag(&mut self, event: DragEvent, now: Instant) {
        self.interaction.handle(event, now);
    }

    pub fn interaction(&self) -> &GlobeInteraction {
        &self.interaction
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.engine.state() == EngineState::Running
    }
}
