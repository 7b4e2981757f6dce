//! The script host: VM lifecycle, type lookup, and the call boundary
//!
//! Lifecycle: Uninitialized -> Loaded (modules compiled, globals run) ->
//! Running (entry point invoked or instances created) -> Shutdown. Every
//! operation checks the state and fails with a defined error instead of
//! assuming callers sequence things correctly.
//!
//! VM exceptions are caught at the call boundary and converted to
//! [`ScriptError::Exception`]; they never unwind into native control flow.

use ember_core::fs::FileSystem;
use ember_core::{SceneRegistryRef, TransformRef};
use rhai::{CallFnOptions, Dynamic, Engine, EvalAltResult, Scope, AST};
use crate::api;
use crate::error::ScriptError;
use crate::foreign::{ForeignHandle, ForeignTable, ForeignTableRef};
use crate::object::{ScriptObject, ScriptType};

/// Host lifecycle state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostState {
    /// No module loaded yet
    Uninitialized,
    /// Modules compiled and global state initialized
    Loaded,
    /// Entry point invoked or instances live
    Running,
    /// Terminal; no further operations allowed
    Shutdown,
}

/// One compiled compilation unit
struct ScriptModule {
    name: String,
    ast: AST,
}

/// The embedded VM host
pub struct ScriptHost {
    engine: Engine,
    state: HostState,
    modules: Vec<ScriptModule>,
    /// All modules merged in load order; later units override earlier
    /// same-signature functions (the virtual-dispatch view)
    combined: Option<AST>,
    scope: Scope<'static>,
    foreign: ForeignTableRef,
}

impl Default for ScriptHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptHost {
    /// Create a host with the native API registered
    pub fn new() -> Self {
        let foreign = ForeignTable::new_ref();
        let mut engine = Engine::new();
        api::register_core_api(&mut engine, foreign.clone());
        Self {
            engine,
            state: HostState::Uninitialized,
            modules: Vec::new(),
            combined: None,
            scope: Scope::new(),
            foreign,
        }
    }

    /// Expose scene-registry introspection to scripts
    pub fn with_scene_registry(mut self, registry: SceneRegistryRef) -> Self {
        api::register_scene_api(&mut self.engine, registry);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> HostState {
        self.state
    }

    /// Register a native transform for scripted access; returns its token
    pub fn register_transform(&self, transform: &TransformRef) -> ForeignHandle {
        self.foreign.borrow_mut().register(transform)
    }

    /// Invalidate a previously registered token
    pub fn invalidate_handle(&self, handle: ForeignHandle) -> bool {
        self.foreign.borrow_mut().invalidate(handle)
    }

    /// The foreign-handle table
    pub fn foreign_table(&self) -> &ForeignTableRef {
        &self.foreign
    }

    /// Load and compile a module through the file-system boundary
    ///
    /// A parse failure is unrecoverable for the module and is treated by
    /// the application as a startup error.
    pub fn load(&mut self, fs: &dyn FileSystem, path: &str) -> Result<(), ScriptError> {
        let bytes = fs.read(path)?;
        let source = String::from_utf8(bytes).map_err(|e| ScriptError::Parse {
            module: path.to_string(),
            message: format!("module source is not UTF-8: {}", e),
        })?;
        self.load_source(path, &source)
    }

    /// Compile a module from source text
    ///
    /// Global statements run once here (global state initialization);
    /// function definitions become available for type lookup and calls.
    pub fn load_source(&mut self, name: &str, source: &str) -> Result<(), ScriptError> {
        match self.state {
            HostState::Uninitialized | HostState::Loaded => {}
            state => return Err(ScriptError::InvalidState { op: "load", state }),
        }

        let ast = self.engine.compile(source).map_err(|e| ScriptError::Parse {
            module: name.to_string(),
            message: e.to_string(),
        })?;

        self.engine
            .run_ast_with_scope(&mut self.scope, &ast)
            .map_err(|e| ScriptError::Exception(e.to_string()))?;

        self.combined = Some(match self.combined.take() {
            Some(base) => base.merge(&ast),
            None => ast.clone(),
        });
        self.modules.push(ScriptModule {
            name: name.to_string(),
            ast,
        });
        self.state = HostState::Loaded;
        log::info!("loaded script module: {}", name);
        Ok(())
    }

    /// All types matching a name, in declaration order across modules
    ///
    /// Type names are not unique across compilation units; callers that
    /// need one specific type disambiguate by position or by member
    /// presence via [`type_has_method`](Self::type_has_method).
    pub fn types(&self, name: &str) -> Vec<ScriptType> {
        let mut found = Vec::new();
        for (index, module) in self.modules.iter().enumerate() {
            for f in module.ast.iter_functions() {
                if f.name == name && f.params.is_empty() {
                    found.push(ScriptType::new(name, index));
                }
            }
        }
        found
    }

    /// The first type matching a name
    pub fn get_type(&self, name: &str) -> Result<ScriptType, ScriptError> {
        self.types(name)
            .into_iter()
            .next()
            .ok_or_else(|| ScriptError::TypeNotFound(name.to_string()))
    }

    /// Whether the type's compilation unit declares a method
    pub fn type_has_method(&self, ty: &ScriptType, method: &str) -> bool {
        self.modules
            .get(ty.module_index())
            .map(|module| module.ast.iter_functions().any(|f| f.name == method))
            .unwrap_or(false)
    }

    /// Create an instance by running the type's constructor in the VM
    ///
    /// The resulting field state is whatever the scripted constructor
    /// produced; the engine does not control it.
    pub fn create_instance(&mut self, ty: &ScriptType) -> Result<ScriptObject, ScriptError> {
        self.require_active("create_instance")?;
        let ast = &self
            .modules
            .get(ty.module_index())
            .ok_or_else(|| ScriptError::TypeNotFound(ty.name().to_string()))?
            .ast;
        let options = CallFnOptions::new().eval_ast(false).rewind_scope(true);
        let result: Dynamic = self
            .engine
            .call_fn_with_options(options, &mut self.scope, ast, ty.name(), ())
            .map_err(map_call_error)?;

        if result.read_lock::<rhai::Map>().is_none() {
            return Err(ScriptError::NotAnObject(ty.name().to_string()));
        }

        self.state = HostState::Running;
        Ok(ScriptObject::new(ty.clone(), result))
    }

    /// Call a method non-virtually: resolved in the declaring unit only
    pub fn call_method(
        &mut self,
        object: &mut ScriptObject,
        name: &str,
        args: Vec<Dynamic>,
    ) -> Result<Dynamic, ScriptError> {
        self.require_active("call_method")?;
        let ast = &self.modules[object.module_index()].ast;
        invoke(&self.engine, &mut self.scope, ast, name, object.data_mut(), args)
    }

    /// Call a method virtually: resolved in the merged view, where
    /// later-loaded units override earlier same-signature functions
    pub fn call_virtual_method(
        &mut self,
        object: &mut ScriptObject,
        name: &str,
        args: Vec<Dynamic>,
    ) -> Result<Dynamic, ScriptError> {
        self.require_active("call_virtual_method")?;
        let Some(ast) = self.combined.as_ref() else {
            return Err(ScriptError::InvalidState {
                op: "call_virtual_method",
                state: self.state,
            });
        };
        invoke(&self.engine, &mut self.scope, ast, name, object.data_mut(), args)
    }

    /// Write a foreign handle into an instance field
    ///
    /// The referenced native object must stay alive as long as the
    /// instance can observe it; the handle table enforces that a stale
    /// token fails with a defined error.
    pub fn set_ptr(
        &self,
        object: &mut ScriptObject,
        field: &str,
        handle: ForeignHandle,
    ) -> Result<(), ScriptError> {
        object.set_field(field, Dynamic::from(handle))
    }

    /// Invoke the module's entry point (`fn main()`) once
    pub fn call_entry_point(&mut self) -> Result<(), ScriptError> {
        self.require_active("call_entry_point")?;
        let module = &self.modules[0];
        let has_main = module
            .ast
            .iter_functions()
            .any(|f| f.name == "main" && f.params.is_empty());
        if !has_main {
            return Err(ScriptError::EntryPointMissing);
        }

        let options = CallFnOptions::new().eval_ast(false).rewind_scope(true);
        let _: Dynamic = self
            .engine
            .call_fn_with_options(options, &mut self.scope, &module.ast, "main", ())
            .map_err(map_call_error)?;
        self.state = HostState::Running;
        Ok(())
    }

    /// Enter the terminal state; all further operations fail
    pub fn shutdown(&mut self) {
        self.state = HostState::Shutdown;
        self.scope = Scope::new();
        log::info!("script host shut down");
    }

    fn require_active(&self, op: &'static str) -> Result<(), ScriptError> {
        match self.state {
            HostState::Loaded | HostState::Running => Ok(()),
            state => Err(ScriptError::InvalidState { op, state }),
        }
    }
}

/// Call a script function with `this` bound to the instance
fn invoke(
    engine: &Engine,
    scope: &mut Scope<'static>,
    ast: &AST,
    name: &str,
    this: &mut Dynamic,
    args: Vec<Dynamic>,
) -> Result<Dynamic, ScriptError> {
    let options = CallFnOptions::new()
        .eval_ast(false)
        .rewind_scope(true)
        .bind_this_ptr(this);
    engine
        .call_fn_with_options(options, scope, ast, name, args)
        .map_err(map_call_error)
}

fn map_call_error(e: Box<EvalAltResult>) -> ScriptError {
    match *e {
        EvalAltResult::ErrorFunctionNotFound(name, _) => ScriptError::MethodNotFound(name),
        other => ScriptError::Exception(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTER: &str = r#"
        fn Counter() {
            #{ count: 0 }
        }

        fn increment() {
            this.count += 1;
            this.count
        }

        fn fail() {
            throw "deliberate failure";
        }

        fn main() {
            log_info("entry point ran");
        }
    "#;

    fn loaded_host() -> ScriptHost {
        let mut host = ScriptHost::new();
        host.load_source("counter", COUNTER).unwrap();
        host
    }

    #[test]
    fn test_state_machine_progression() {
        let mut host = ScriptHost::new();
        assert_eq!(host.state(), HostState::Uninitialized);

        host.load_source("counter", COUNTER).unwrap();
        assert_eq!(host.state(), HostState::Loaded);

        let ty = host.get_type("Counter").unwrap();
        host.create_instance(&ty).unwrap();
        assert_eq!(host.state(), HostState::Running);

        host.shutdown();
        assert_eq!(host.state(), HostState::Shutdown);
    }

    #[test]
    fn test_operations_rejected_before_load() {
        let mut host = ScriptHost::new();
        let ty = ScriptType::new("Counter", 0);
        assert!(matches!(
            host.create_instance(&ty),
            Err(ScriptError::InvalidState { .. })
        ));
        assert!(matches!(
            host.call_entry_point(),
            Err(ScriptError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_operations_rejected_after_shutdown() {
        let mut host = loaded_host();
        host.shutdown();
        assert!(matches!(
            host.load_source("more", "fn More() { #{} }"),
            Err(ScriptError::InvalidState { .. })
        ));
        let ty = ScriptType::new("Counter", 0);
        assert!(matches!(
            host.create_instance(&ty),
            Err(ScriptError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_parse_error() {
        let mut host = ScriptHost::new();
        let result = host.load_source("broken", "fn Broken( {");
        assert!(matches!(result, Err(ScriptError::Parse { .. })));
        assert_eq!(host.state(), HostState::Uninitialized);
    }

    #[test]
    fn test_create_instance_and_call_method() {
        let mut host = loaded_host();
        let ty = host.get_type("Counter").unwrap();
        let mut obj = host.create_instance(&ty).unwrap();

        assert_eq!(obj.get_field("count").unwrap().as_int().unwrap(), 0);

        let result = host.call_method(&mut obj, "increment", vec![]).unwrap();
        assert_eq!(result.as_int().unwrap(), 1);
        assert_eq!(obj.get_field("count").unwrap().as_int().unwrap(), 1);
    }

    #[test]
    fn test_exception_is_isolated() {
        let mut host = loaded_host();
        let ty = host.get_type("Counter").unwrap();
        let mut obj = host.create_instance(&ty).unwrap();

        let result = host.call_method(&mut obj, "fail", vec![]);
        assert!(matches!(result, Err(ScriptError::Exception(_))));

        // The host keeps working after a scripted exception
        let result = host.call_method(&mut obj, "increment", vec![]).unwrap();
        assert_eq!(result.as_int().unwrap(), 1);
    }

    #[test]
    fn test_method_not_found() {
        let mut host = loaded_host();
        let ty = host.get_type("Counter").unwrap();
        let mut obj = host.create_instance(&ty).unwrap();

        let result = host.call_method(&mut obj, "missing_method", vec![]);
        assert!(matches!(result, Err(ScriptError::MethodNotFound(_))));
    }

    #[test]
    fn test_type_not_found() {
        let host = loaded_host();
        assert!(matches!(
            host.get_type("Ghost"),
            Err(ScriptError::TypeNotFound(_))
        ));
        assert!(host.types("Ghost").is_empty());
    }

    #[test]
    fn test_ambiguous_types_across_modules() {
        let mut host = loaded_host();
        host.load_source("second", "fn Counter() { #{ count: 100 } }")
            .unwrap();

        let candidates = host.types("Counter");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].module_index(), 0);
        assert_eq!(candidates[1].module_index(), 1);

        // Each candidate constructs from its own compilation unit
        let first = host.create_instance(&candidates[0]).unwrap();
        let second = host.create_instance(&candidates[1]).unwrap();
        assert_eq!(first.get_field("count").unwrap().as_int().unwrap(), 0);
        assert_eq!(second.get_field("count").unwrap().as_int().unwrap(), 100);
    }

    #[test]
    fn test_type_has_method() {
        let host = loaded_host();
        let ty = host.get_type("Counter").unwrap();
        assert!(host.type_has_method(&ty, "increment"));
        assert!(!host.type_has_method(&ty, "update"));
    }

    #[test]
    fn test_virtual_dispatch_uses_override() {
        let mut host = loaded_host();
        host.load_source("override", "fn increment() { this.count += 10; this.count }")
            .unwrap();

        let ty = host.get_type("Counter").unwrap();
        let mut obj = host.create_instance(&ty).unwrap();

        // Non-virtual: declaring unit's definition
        let direct = host.call_method(&mut obj, "increment", vec![]).unwrap();
        assert_eq!(direct.as_int().unwrap(), 1);

        // Virtual: later-loaded override wins
        let virt = host.call_virtual_method(&mut obj, "increment", vec![]).unwrap();
        assert_eq!(virt.as_int().unwrap(), 11);
    }

    #[test]
    fn test_entry_point() {
        let mut host = loaded_host();
        host.call_entry_point().unwrap();
        assert_eq!(host.state(), HostState::Running);
    }

    #[test]
    fn test_entry_point_missing() {
        let mut host = ScriptHost::new();
        host.load_source("no_main", "fn Thing() { #{} }").unwrap();
        assert!(matches!(
            host.call_entry_point(),
            Err(ScriptError::EntryPointMissing)
        ));
    }

    #[test]
    fn test_constructor_must_return_object() {
        let mut host = ScriptHost::new();
        host.load_source("scalar", "fn Scalar() { 42 }").unwrap();

        let ty = host.get_type("Scalar").unwrap();
        assert!(matches!(
            host.create_instance(&ty),
            Err(ScriptError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_method_args_are_marshaled() {
        let mut host = ScriptHost::new();
        host.load_source(
            "adder",
            "fn Adder() { #{ total: 0.0 } }\nfn add(amount) { this.total += amount; this.total }",
        )
        .unwrap();

        let ty = host.get_type("Adder").unwrap();
        let mut obj = host.create_instance(&ty).unwrap();

        let result = host
            .call_method(&mut obj, "add", vec![Dynamic::from(2.5_f64)])
            .unwrap();
        assert!((result.as_float().unwrap() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_global_statements_run_at_load() {
        let mut host = ScriptHost::new();
        host.load_source("globals", "let greeting = \"hi\"; fn Thing() { #{} }")
            .unwrap();
        // Load succeeded with a global statement present
        assert_eq!(host.state(), HostState::Loaded);
    }
}
