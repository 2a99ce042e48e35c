use std::rc::Rc;

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, assert_abs_diff_eq};
use events_globe::{
    GlobeConfig,
    camera::Projection,
    context::ErrorCallback,
    data_structures::{
        mesh::{icosphere, quad},
        rendering_state::RenderingState,
        texture::{is_power_of_two, mip_level_count, sampler_descriptor},
    },
    engine::{Engine, EngineState},
    globe::{panel::HeadlessPanel, renderer::EventsWorldRenderer},
    pipelines::material::{BlendMode, MaterialUniform},
};
use instant::{Duration, Instant};

#[test]
fn blend_modes_map_to_fixed_factor_pairs() {
    use wgpu::BlendFactor::*;
    assert_eq!(BlendMode::default(), BlendMode::Alpha);
    assert_eq!(BlendMode::Alpha.factors(), (SrcAlpha, OneMinusSrcAlpha));
    assert_eq!(BlendMode::Add.factors(), (SrcAlpha, One));
    assert_eq!(BlendMode::Multiply.factors(), (Zero, OneMinusSrc));

    let state = BlendMode::Add.blend_state();
    assert_eq!(state.color, state.alpha);
    assert_eq!(state.color.operation, wgpu::BlendOperation::Add);
}

#[test]
fn uniform_carries_projection_view_model_and_tint() {
    let state = RenderingState {
        projection: Matrix4::from_nonuniform_scale(2.0, 3.0, 1.0),
        view: Matrix4::from_translation(Vector3::new(0.0, 0.0, -1.0)),
        model: Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0)),
    };
    let tint = Vector4::new(1.0, 0.0, 0.0, 1.0);
    let uniform = MaterialUniform::new(&state, tint);

    let model_view: [[f32; 4]; 4] =
        Matrix4::from_translation(Vector3::new(1.0, 0.0, -1.0)).into();
    let projection: [[f32; 4]; 4] = state.projection.into();
    assert_eq!(uniform.model_view, model_view);
    assert_eq!(uniform.projection, projection);
    assert_eq!(uniform.color, [1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn default_rendering_state_is_identity() {
    let state = RenderingState::default();
    assert_eq!(state.model_view(), Matrix4::identity());
}

#[test]
fn quad_is_two_triangles_with_uvs() {
    let mesh = quad();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangles, vec![3, 1, 0, 2, 3, 0]);
    assert_eq!(mesh.uv.as_ref().map(Vec::len), Some(4));
}

#[test]
fn icosphere_is_a_closed_unit_sphere() {
    for level in 0..=3 {
        let mesh = icosphere(level);
        assert_eq!(mesh.index_count(), 60 * 4usize.pow(level));
        assert!(mesh.triangles.iter().all(|&i| (i as usize) < mesh.vertex_count()));
        assert_eq!(mesh.uv.as_ref().map(Vec::len), Some(mesh.vertex_count()));
        for v in &mesh.vertices {
            assert_abs_diff_eq!(Vector3::from(*v).magnitude(), 1.0, epsilon = 1e-5);
        }
    }
}

#[test]
fn icosphere_levels_are_capped_for_sixteen_bit_indices() {
    assert_eq!(icosphere(9).index_count(), icosphere(6).index_count());
}

#[test]
fn only_power_of_two_images_get_mips() {
    assert!(is_power_of_two(1));
    assert!(is_power_of_two(4096));
    assert!(!is_power_of_two(0));
    assert!(!is_power_of_two(640));
    assert_eq!(mip_level_count(1, 1), 1);
    assert_eq!(mip_level_count(256, 256), 9);
    assert_eq!(mip_level_count(4096, 2048), 13);
    assert_eq!(mip_level_count(640, 480), 1);
}

#[test]
fn samplers_wrap_u_across_the_sphere_seam() {
    let mipped = sampler_descriptor(mip_level_count(4096, 2048));
    assert_eq!(mipped.address_mode_u, wgpu::AddressMode::Repeat);
    assert_eq!(mipped.address_mode_v, wgpu::AddressMode::Repeat);
    assert_eq!(mipped.mipmap_filter, wgpu::FilterMode::Linear);

    // Seam vertices sit at u + 1, so even images without mips must repeat on u.
    let flat = sampler_descriptor(mip_level_count(640, 480));
    assert_eq!(flat.address_mode_u, wgpu::AddressMode::Repeat);
    assert_eq!(flat.address_mode_v, wgpu::AddressMode::ClampToEdge);
    assert_eq!(flat.mipmap_filter, wgpu::FilterMode::Nearest);
}

#[test]
fn projection_aspect_ignores_degenerate_sizes() {
    let mut projection = Projection::globe_default(800, 400);
    assert_eq!(projection.aspect(), 2.0);
    projection.resize(0, 600);
    assert_eq!(projection.aspect(), 2.0);
    projection.resize(600, 600);
    assert_eq!(projection.aspect(), 1.0);
    assert_eq!(Projection::globe_default(0, 0).aspect(), 1.0);
}

#[test]
fn engine_without_context_reports_and_stays_inert() {
    let errors = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = errors.clone();
    let on_error: ErrorCallback = Rc::new(move |message: &str| sink.borrow_mut().push(message.to_string()));

    let mut engine = Engine::with_context(Err(anyhow::anyhow!("no adapter")), &on_error);
    assert_eq!(errors.borrow().len(), 1);
    assert!(errors.borrow()[0].contains("no adapter"));

    engine.run();
    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(engine.begin_frame(Instant::now()), None);
    assert_eq!(engine.delta_time(), 0.0);
    assert_eq!(engine.time(), Duration::ZERO);
    engine.resize(800, 600);
    assert!(engine.render_frame().is_ok());
}

#[test]
fn globe_without_graphics_runs_as_a_no_op() {
    let on_error: ErrorCallback = Rc::new(|_: &str| {});
    let engine = Engine::with_context(Err(anyhow::anyhow!("no adapter")), &on_error);
    let mut globe = futures::executor::block_on(EventsWorldRenderer::with_engine(
        engine,
        GlobeConfig::default(),
        Rc::new(HeadlessPanel::new()),
        on_error,
    ));

    globe.run();
    globe.frame(Instant::now());
    assert!(!globe.is_running());
    assert!(globe.interaction().points().is_empty());
    assert!(globe.engine().scene().is_empty());
}
