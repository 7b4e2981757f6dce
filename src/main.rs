//! Ember - real-time 3D engine runtime
//!
//! Frame loop phases, in order: scripted update, physics step + transform
//! sync, render. The scene graph is mutated by the script host and the
//! physics bridge; the render pipeline reads one consistent view per frame.

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use ember_core::asset::{self, Material, Mesh};
use ember_core::fs::DiskFs;
use ember_core::{
    Engine, GameObject, RigidBody, Scene, SceneObject, SceneRef, StaticCollider, Vec3,
};
use ember_render::{ForwardPipeline, RenderContext, RenderPipeline};
use ember_script::{Dynamic, ScriptError, ScriptHost, ScriptObject};

use ember::config::AppConfig;

/// Main application state
struct App {
    config: AppConfig,
    engine: Engine,
    scene: SceneRef,
    material: Arc<Material>,
    host: ScriptHost,
    /// Scripted instance driven once per frame
    updater: Option<ScriptObject>,
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    pipeline: Option<ForwardPipeline>,
}

impl App {
    fn new() -> Result<Self, Box<dyn Error>> {
        let config = AppConfig::load().unwrap_or_else(|e| {
            log::warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        });

        let fs = DiskFs::new(&config.assets.root);

        // Shaders and the shared material; missing shaders are fatal
        let vertex = asset::load_shader(&fs, "/shaders/forward.vert.wgsl", asset::ShaderStage::Vertex)?;
        let fragment =
            asset::load_shader(&fs, "/shaders/forward.frag.wgsl", asset::ShaderStage::Fragment)?;
        let material = Arc::new(Material::new("forward", vertex, fragment)?);

        let engine = Engine::new();

        // Assemble the demo scene
        let mut scene = Scene::new("main").with_physics(config.physics.to_physics_config());
        scene
            .scene_world_mut()
            .camera_mut()
            .transform_mut()
            .set_position(Vec3::from(config.camera.start_position));
        {
            let camera = scene.scene_world_mut().camera_mut();
            camera.set_fov(config.camera.fov);
            camera.set_clip_planes(config.camera.near, config.camera.far);
        }

        scene.scene_world_mut().add_object(SceneObject::empty("blank"));

        let cube_mesh = Arc::new(Mesh::cube(1.0));
        let cube_key = scene.scene_world_mut().add_object(
            SceneObject::mesh("cube")
                .with_mesh(cube_mesh)
                .with_material(material.clone())
                .with_position(Vec3::new(0.0, 6.0, 0.0)),
        );

        // The cube follows a dynamic body; the floor keeps it in view
        let body = scene
            .physics_mut()
            .world_mut()
            .add_body(RigidBody::new_box(Vec3::new(0.0, 6.0, 0.0), Vec3::splat(1.0)).with_restitution(0.4));
        scene.physics_mut().bind(body, cube_key);
        scene
            .physics_mut()
            .world_mut()
            .add_static_collider(StaticCollider::floor(config.physics.floor_y));

        // Optional GLB model beside the cube
        if let Some(model_path) = &config.assets.model {
            match asset::gltf::load_mesh(&fs, model_path) {
                Ok(mesh) => {
                    scene.scene_world_mut().add_object(
                        SceneObject::mesh("model")
                            .with_mesh(mesh)
                            .with_material(material.clone())
                            .with_position(Vec3::new(5.0, 0.0, 0.0)),
                    );
                }
                Err(e) => log::warn!("Failed to load model '{}': {}", model_path, e),
            }
        }

        // A small gameplay rig exercising the parallel game world
        let rig = scene.game_world_mut().add_object(GameObject::new("rig"));
        scene
            .game_world_mut()
            .add_object(GameObject::new("rig_arm").with_parent(rig));

        let scene: SceneRef = Rc::new(RefCell::new(scene));
        engine.add_scene(scene.clone());

        // Script host: module parse failure is a startup error
        let mut host = ScriptHost::new().with_scene_registry(engine.scenes());
        host.load(&fs, &config.script.module)?;

        let updater = match host.get_type(&config.script.update_type) {
            Ok(ty) => {
                let mut instance = host.create_instance(&ty)?;
                // Wire the cube's transform into the scripted instance
                let scene_borrow = scene.borrow();
                let cube = scene_borrow
                    .scene_world()
                    .object(cube_key)
                    .expect("cube object was just added");
                let handle = host.register_transform(cube.transform_ref());
                host.set_ptr(&mut instance, "transform", handle)?;
                drop(scene_borrow);
                Some(instance)
            }
            Err(e) => {
                log::warn!("No scripted updater: {}", e);
                None
            }
        };

        // One-time scripted initialization, if the module declares it
        match host.call_entry_point() {
            Ok(()) => {}
            Err(ScriptError::EntryPointMissing) => {
                log::debug!("script module has no entry point")
            }
            Err(e) => log::error!("Script entry point failed: {}", e),
        }

        log::info!(
            "Scene '{}' ready with {} objects, {} scenes registered",
            scene.borrow().name,
            scene.borrow().scene_world().len(),
            engine.scene_count()
        );

        Ok(Self {
            config,
            engine,
            scene,
            material,
            host,
            updater,
            window: None,
            render_context: None,
            pipeline: None,
        })
    }

    /// Run one frame: scripts, then physics, then rendering
    fn frame(&mut self) {
        let dt = self.engine.clock.update();

        if let Some(updater) = &mut self.updater {
            if let Err(e) = self
                .host
                .call_virtual_method(updater, "update", vec![Dynamic::from(dt as f64)])
            {
                // Scripted failures are reported and never abort the loop
                log::error!("Scripted update failed: {}", e);
            }
        }

        self.scene.borrow_mut().step_physics(dt);

        if let (Some(ctx), Some(pipeline)) = (&self.render_context, &mut self.pipeline) {
            let scene = self.scene.borrow();
            pipeline.render(ctx, scene.scene_world());
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = Window::default_attributes()
                .with_title(&self.config.window.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                ));

            let window = match event_loop.create_window(window_attributes) {
                Ok(window) => Arc::new(window),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let render_context = match pollster::block_on(RenderContext::new(window.clone())) {
                Ok(ctx) => ctx,
                Err(e) => {
                    log::error!("Failed to create render context: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let pipeline = match ForwardPipeline::new(
                &render_context.device,
                render_context.config.format,
                &self.material,
            ) {
                Ok(pipeline) => pipeline,
                Err(e) => {
                    log::error!("Failed to create render pipeline: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.scene
                .borrow_mut()
                .scene_world_mut()
                .camera_mut()
                .set_aspect(render_context.aspect_ratio());

            window.request_redraw();
            self.window = Some(window);
            self.render_context = Some(render_context);
            self.pipeline = Some(pipeline);
            log::info!("initialized");
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                // Scripts shut down before scenes drop so foreign handles
                // die before their targets' owners
                self.host.shutdown();
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(ctx) = &mut self.render_context {
                    ctx.resize(physical_size);
                    self.scene
                        .borrow_mut()
                        .scene_world_mut()
                        .camera_mut()
                        .set_aspect(ctx.aspect_ratio());
                }
            }

            WindowEvent::RedrawRequested => {
                self.frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Starting Ember");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = match App::new() {
        Ok(app) => app,
        Err(e) => {
            log::error!("Startup failed: {}", e);
            std::process::exit(1);
        }
    };

    event_loop.run_app(&mut app).expect("Event loop error");
}
