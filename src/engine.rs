//! Frame loop: delta time, clear, scene update and scene draw.
//!
//! Frames are driven by the platform's redraw requests, one after the other; the engine
//! never runs two frames at once and only yields between frames.

use std::{iter, sync::Arc};

use instant::{Duration, Instant};
use winit::window::Window;

use crate::{
    context::{Context, ErrorCallback},
    data_structures::{entity::DrawContext, rendering_state::RenderingState, scene::Scene},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
}

/// Measures the time between consecutive frames in seconds.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    time: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick; 0 on the first tick and never negative.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let delta = match self.last {
            Some(last) if now > last => now.duration_since(last),
            _ => Duration::ZERO,
        };
        self.last = Some(now);
        self.time += delta;
        delta.as_secs_f32()
    }

    /// Total time accumulated over all ticks.
    pub fn time(&self) -> Duration {
        self.time
    }
}

pub struct Engine {
    ctx: Option<Context>,
    rendering_state: RenderingState,
    scene: Scene,
    state: EngineState,
    clock: FrameClock,
    delta_time: f32,
}

impl Engine {
    pub async fn new(window: Arc<Window>, on_error: &ErrorCallback) -> Self {
        Self::with_context(Context::new(window).await, on_error)
    }

    /// Without a context the engine stays inert: it never starts and ignores every call.
    pub fn with_context(ctx: anyhow::Result<Context>, on_error: &ErrorCallback) -> Self {
        let ctx = match ctx {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                on_error(&format!(
                    "Unable to initialize the graphics context. Your browser or machine may not support it: {:#}",
                    e
                ));
                None
            }
        };
        let rendering_state = ctx
            .as_ref()
            .map(|ctx| RenderingState::new(&ctx.projection))
            .unwrap_or_default();
        Self {
            ctx,
            rendering_state,
            scene: Scene::new(),
            state: EngineState::Idle,
            clock: FrameClock::new(),
            delta_time: 0.0,
        }
    }

    pub fn context(&self) -> Option<&Context> {
        self.ctx.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut Context> {
        self.ctx.as_mut()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn rendering_state(&self) -> &RenderingState {
        &self.rendering_state
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn time(&self) -> Duration {
        self.clock.time()
    }

    /// `Idle → Running` and schedules the first frame.
    pub fn run(&mut self) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        if self.state == EngineState::Running {
            return;
        }
        self.state = EngineState::Running;
        ctx.window.request_redraw();
    }

    /// Starts a frame and returns its delta time, or `None` while not running.
    pub fn begin_frame(&mut self, now: Instant) -> Option<f32> {
        if self.state != EngineState::Running {
            return None;
        }
        self.delta_time = self.clock.tick(now);
        Some(self.delta_time)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(ctx) = &mut self.ctx {
            ctx.resize(width, height);
            self.rendering_state.projection = ctx.projection.calc_matrix();
        }
    }

    /// Clears colour and depth, updates then draws the scene, presents, and asks the
    /// platform for the next frame.
    pub fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let Some(ctx) = &self.ctx else {
            return Ok(());
        };
        if self.state != EngineState::Running {
            return Ok(());
        }
        ctx.window.request_redraw();

        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.scene.update(self.delta_time);

            let mut dc = DrawContext {
                device: &ctx.device,
                queue: &ctx.queue,
                state: &mut self.rendering_state,
                render_pass: &mut render_pass,
            };
            self.scene.draw(&mut dc);
        }

        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Reconfigures a lost or outdated surface at the window's current size.
    pub fn recover_surface(&mut self) {
        let size = match &self.ctx {
            Some(ctx) => ctx.window.inner_size(),
            None => return,
        };
        self.resize(size.width, size.height);
    }
}
