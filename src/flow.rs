//! Application event loop.
//!
//! Creates the window (the `canvas` element on the web), builds the globe once the GPU is
//! ready and translates winit input into drag events:
//!
//! 1. Left button pressed on the window starts a drag
//! 2. Raw mouse motion moves the globe's target while the button is held
//! 3. Releasing the button ends the drag and arms the recenter timer
//! 4. Losing focus or the cursor forgets the button, so the next motion ends the drag
//!
//! Each redraw runs one frame of the globe; the frame itself asks for the next one.

use std::{fmt::Debug, rc::Rc, sync::Arc};

use instant::Instant;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::UnwrapThrowExt;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{ErrorCallback, default_error_callback},
    globe::{
        config::GlobeConfig, panel::InfoPanel, pointer::PointerTracker,
        renderer::EventsWorldRenderer,
    },
};

pub(crate) enum AppEvent {
    #[allow(dead_code)]
    Initialized(Box<EventsWorldRenderer>),
}

impl Debug for AppEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<AppEvent>,
    renderer: Option<EventsWorldRenderer>,
    // Taken once the window exists.
    config: Option<GlobeConfig>,
    on_error: ErrorCallback,
    pointer: PointerTracker,
}

impl App {
    fn new(
        event_loop: &EventLoop<AppEvent>,
        config: GlobeConfig,
        on_error: ErrorCallback,
    ) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy,
            renderer: None,
            config: Some(config),
            on_error,
            pointer: PointerTracker::new(),
        })
    }

    fn start(&mut self, mut renderer: EventsWorldRenderer) {
        renderer.run();
        self.renderer = Some(renderer);
    }
}

fn info_panel() -> Rc<dyn InfoPanel> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(crate::globe::panel::DomPanel::new())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(crate::globe::panel::HeadlessPanel::new())
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.config.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("Events Globe");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                (self.on_error)(&format!("Unable to create a window: {}", e));
                event_loop.exit();
                return;
            }
        };

        let init_future =
            EventsWorldRenderer::new(window, config, info_panel(), self.on_error.clone());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let renderer = self.async_runtime.block_on(init_future);
            self.start(renderer);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let renderer = init_future.await;
                if proxy
                    .send_event(AppEvent::Initialized(Box::new(renderer)))
                    .is_err()
                {
                    log::error!("event loop closed before the globe was ready");
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Initialized(mut renderer) => {
                // The canvas may have been resized while the GPU was set up.
                if let Some(ctx) = renderer.engine().context() {
                    let size = ctx.window().inner_size();
                    renderer.resize(size.width, size.height);
                }
                self.start(*renderer);
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta } = event {
            renderer.handle_drag(self.pointer.motion(delta), Instant::now());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => renderer.resize(size.width, size.height),
            WindowEvent::RedrawRequested => renderer.frame(Instant::now()),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => renderer.handle_drag(self.pointer.left_button(state), Instant::now()),
            WindowEvent::Focused(false) | WindowEvent::CursorLeft { .. } => {
                self.pointer.release_unobserved()
            }
            _ => {}
        }
    }
}

/// Opens the globe in a window (native) or on the page's `canvas` element (web) and runs
/// it until the window closes.
pub fn run(config: GlobeConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<AppEvent> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<AppEvent> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(not(all(
        feature = "integration-tests",
        any(target_os = "linux", target_os = "windows")
    )))]
    let event_loop: EventLoop<AppEvent> = EventLoop::with_user_event().build()?;

    let mut app = App::new(&event_loop, config, default_error_callback())?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
