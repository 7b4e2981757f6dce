//! Embedded scripting VM bridge
//!
//! This crate hosts a [rhai](https://rhai.rs) virtual machine and exposes
//! bidirectional calls between native engine objects and scripted
//! instances.
//!
//! ## Scripted types
//!
//! A scripted *type* is declared by a zero-parameter constructor function
//! bearing the type name and returning an object map:
//!
//! ```rhai
//! fn Spinner() {
//!     #{ ticks: 0, speed: 30.0 }
//! }
//!
//! fn update(dt) {
//!     this.ticks += 1;
//! }
//! ```
//!
//! Methods are functions in the same compilation unit, invoked with `this`
//! bound to the instance map. Several compilation units may declare types
//! with the same name; lookups can enumerate every candidate. In the
//! merged view used for virtual dispatch, functions from later-loaded
//! units override earlier same-signature ones.
//!
//! ## Foreign handles
//!
//! Native state (a [`Transform`](ember_core::Transform)) is wired into a
//! scripted instance as an opaque [`ForeignHandle`] token. The host keeps
//! a table mapping tokens to weak references; once the native owner is
//! destroyed (or the token explicitly invalidated), scripted access fails
//! with a defined error instead of touching freed memory.

mod api;
mod error;
mod foreign;
mod host;
mod object;

pub use error::ScriptError;
pub use foreign::{ForeignHandle, ForeignTable, ForeignTableRef};
pub use host::{HostState, ScriptHost};
pub use object::{ScriptObject, ScriptType};

// Re-exported so callers can build argument lists without importing rhai
pub use rhai::Dynamic;
