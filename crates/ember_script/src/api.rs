//! Native API registered into the VM
//!
//! Scripts reach native state only through these functions. Transform
//! accessors take a foreign handle and resolve it through the host table
//! on every call, so a stale handle surfaces as a script exception with a
//! defined message instead of reading freed memory.

use ember_core::SceneRegistryRef;
use ember_math::Vec3;
use rhai::{Dynamic, Engine, EvalAltResult, Position};
use crate::error::ScriptError;
use crate::foreign::{ForeignHandle, ForeignTableRef};

fn runtime_err(e: ScriptError) -> Box<EvalAltResult> {
    EvalAltResult::ErrorRuntime(Dynamic::from(e.to_string()), Position::NONE).into()
}

/// Register the foreign-handle transform API and logging functions
pub(crate) fn register_core_api(engine: &mut Engine, table: ForeignTableRef) {
    engine.register_type_with_name::<ForeignHandle>("NativeRef");
    engine.register_type_with_name::<Vec3>("Vec3");
    engine.register_get("x", |v: &mut Vec3| v.x as f64);
    engine.register_get("y", |v: &mut Vec3| v.y as f64);
    engine.register_get("z", |v: &mut Vec3| v.z as f64);

    let t = table.clone();
    engine.register_fn(
        "position",
        move |h: ForeignHandle| -> Result<Vec3, Box<EvalAltResult>> {
            let transform = t.borrow().resolve(h).map_err(runtime_err)?;
            let position = transform.borrow().position();
            Ok(position)
        },
    );

    let t = table.clone();
    engine.register_fn(
        "set_position",
        move |h: ForeignHandle, x: f64, y: f64, z: f64| -> Result<(), Box<EvalAltResult>> {
            let transform = t.borrow().resolve(h).map_err(runtime_err)?;
            transform
                .borrow_mut()
                .set_position(Vec3::new(x as f32, y as f32, z as f32));
            Ok(())
        },
    );

    let t = table.clone();
    engine.register_fn(
        "angles",
        move |h: ForeignHandle| -> Result<Vec3, Box<EvalAltResult>> {
            let transform = t.borrow().resolve(h).map_err(runtime_err)?;
            let angles = transform.borrow().angles();
            Ok(angles)
        },
    );

    let t = table.clone();
    engine.register_fn(
        "set_angles",
        move |h: ForeignHandle, x: f64, y: f64, z: f64| -> Result<(), Box<EvalAltResult>> {
            let transform = t.borrow().resolve(h).map_err(runtime_err)?;
            transform
                .borrow_mut()
                .set_angles(Vec3::new(x as f32, y as f32, z as f32));
            Ok(())
        },
    );

    let t = table.clone();
    engine.register_fn(
        "scale",
        move |h: ForeignHandle| -> Result<Vec3, Box<EvalAltResult>> {
            let transform = t.borrow().resolve(h).map_err(runtime_err)?;
            let scale = transform.borrow().scale();
            Ok(scale)
        },
    );

    let t = table;
    engine.register_fn(
        "set_scale",
        move |h: ForeignHandle, x: f64, y: f64, z: f64| -> Result<(), Box<EvalAltResult>> {
            let transform = t.borrow().resolve(h).map_err(runtime_err)?;
            transform
                .borrow_mut()
                .set_scale(Vec3::new(x as f32, y as f32, z as f32));
            Ok(())
        },
    );

    engine.register_fn("log_info", |msg: &str| log::info!("[script] {}", msg));
    engine.register_fn("log_warn", |msg: &str| log::warn!("[script] {}", msg));
    engine.register_fn("log_error", |msg: &str| log::error!("[script] {}", msg));
}

/// Register scene-registry introspection
pub(crate) fn register_scene_api(engine: &mut Engine, registry: SceneRegistryRef) {
    engine.register_fn("scene_count", move || registry.borrow().len() as i64);
}
