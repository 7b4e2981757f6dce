//! Script host error type

use ember_core::asset::AssetError;
use crate::host::HostState;

/// Error from the script host
///
/// VM-level exceptions are converted to [`Exception`](ScriptError::Exception)
/// at the call boundary and never unwind into native control flow. The
/// remaining variants turn what the original design left as undefined
/// behavior into checked errors.
#[derive(Debug)]
pub enum ScriptError {
    /// Reading the module through the file-system boundary failed
    Load(AssetError),
    /// The module source failed to compile
    Parse {
        /// Compilation unit name
        module: String,
        /// Compiler message
        message: String,
    },
    /// Operation not allowed in the host's current state
    InvalidState {
        /// The attempted operation
        op: &'static str,
        /// The state the host was in
        state: HostState,
    },
    /// No type with the requested name exists
    TypeNotFound(String),
    /// A constructor did not produce an object map
    NotAnObject(String),
    /// No method with the requested name on the instance's type
    MethodNotFound(String),
    /// The VM raised an exception during a call
    Exception(String),
    /// A field write targeted a non-map instance
    FieldWrite(String),
    /// A foreign handle whose native owner no longer exists
    StaleHandle,
    /// The module declares no entry point
    EntryPointMissing,
}

impl From<AssetError> for ScriptError {
    fn from(e: AssetError) -> Self {
        ScriptError::Load(e)
    }
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScriptError::Load(e) => write!(f, "Module load failed: {}", e),
            ScriptError::Parse { module, message } => {
                write!(f, "Module '{}' failed to compile: {}", module, message)
            }
            ScriptError::InvalidState { op, state } => {
                write!(f, "Operation '{}' not allowed in state {:?}", op, state)
            }
            ScriptError::TypeNotFound(name) => write!(f, "No scripted type named '{}'", name),
            ScriptError::NotAnObject(name) => {
                write!(f, "Constructor '{}' did not return an object", name)
            }
            ScriptError::MethodNotFound(name) => write!(f, "No scripted method named '{}'", name),
            ScriptError::Exception(msg) => write!(f, "Script exception: {}", msg),
            ScriptError::FieldWrite(name) => {
                write!(f, "Cannot write field '{}' on a non-object instance", name)
            }
            ScriptError::StaleHandle => write!(f, "Foreign handle target no longer exists"),
            ScriptError::EntryPointMissing => write!(f, "Module has no entry point"),
        }
    }
}

impl std::error::Error for ScriptError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ScriptError::TypeNotFound("Spinner".to_string());
        assert_eq!(format!("{}", err), "No scripted type named 'Spinner'");

        let err = ScriptError::StaleHandle;
        assert_eq!(format!("{}", err), "Foreign handle target no longer exists");
    }

    #[test]
    fn test_from_asset_error() {
        let err: ScriptError = AssetError::NotFound("/code.rhai".to_string()).into();
        assert!(matches!(err, ScriptError::Load(_)));
    }
}
