//! Host type system for the activation engine.
//!
//! # Role
//!
//! This crate owns the type descriptors, initializers and dynamic values that the
//! activation engine in `forge-activator` reads. Descriptors are immutable once built and
//! are compared by identity, so they can serve directly as cache keys.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Type`] | Cheap handle to an immutable [`TypeDesc`]. |
//! | [`TypeBuilder`] | Validating constructor for user-defined types. |
//! | [`Initializer`] | One constructor: parameter list, visibility and body. |
//! | [`Value`] | Dynamic instance representation. |
//!
//! # Host Primitives
//!
//! The [`host`] module exposes the reflective primitives consumed by the engine: zero values,
//! raw allocation, initializer invocation and the generic public-only default construction.

pub mod host;

mod error;
mod id;
mod init;
mod ty;
mod value;

pub use error::{InvokeError, TypeError};
pub use id::TypeId;
pub use init::{Fields, InitBody, Initializer, Param, ParamMode, Visibility};
pub use ty::{FieldDesc, FieldInit, Primitive, Type, TypeBuilder, TypeDesc, TypeKind};
pub use value::{Object, ObjectRef, StructValue, Value};

#[cfg(test)]
mod tests;
