//! Scripted type descriptors and instance handles

use rhai::Dynamic;
use crate::error::ScriptError;

/// Descriptor of a scripted type
///
/// Identified by its constructor name and the compilation unit that
/// declared it; several units may declare types with the same name, so a
/// descriptor always carries both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptType {
    name: String,
    module: usize,
}

impl ScriptType {
    pub(crate) fn new(name: impl Into<String>, module: usize) -> Self {
        Self {
            name: name.into(),
            module,
        }
    }

    /// The declared type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the compilation unit that declared this type
    pub fn module_index(&self) -> usize {
        self.module
    }
}

/// A scripted instance living in the VM-managed heap
///
/// Wraps the object map produced by the type's constructor together with
/// the descriptor it was created from. Field writes through
/// [`set_field`](Self::set_field) bypass scripted construction; that is
/// how native-owned state is wired in after creation.
pub struct ScriptObject {
    ty: ScriptType,
    data: Dynamic,
}

impl ScriptObject {
    pub(crate) fn new(ty: ScriptType, data: Dynamic) -> Self {
        Self { ty, data }
    }

    /// The descriptor this instance was created from
    pub fn script_type(&self) -> &ScriptType {
        &self.ty
    }

    /// The declared type name
    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    pub(crate) fn module_index(&self) -> usize {
        self.ty.module_index()
    }

    pub(crate) fn data_mut(&mut self) -> &mut Dynamic {
        &mut self.data
    }

    /// Write a field directly, bypassing scripted construction
    pub fn set_field(&mut self, name: &str, value: Dynamic) -> Result<(), ScriptError> {
        match self.data.write_lock::<rhai::Map>() {
            Some(mut map) => {
                map.insert(name.into(), value);
                Ok(())
            }
            None => Err(ScriptError::FieldWrite(name.to_string())),
        }
    }

    /// Read a field's current value
    pub fn get_field(&self, name: &str) -> Option<Dynamic> {
        self.data
            .read_lock::<rhai::Map>()
            .and_then(|map| map.get(name).cloned())
    }

    /// Names of the fields currently present on the instance
    pub fn field_names(&self) -> Vec<String> {
        self.data
            .read_lock::<rhai::Map>()
            .map(|map| map.keys().map(|k| k.to_string()).collect())
            .unwrap_or_default()
    }
}
