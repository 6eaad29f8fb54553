//! Core types for managed-heap layout estimation.
//!
//! This crate provides the model the estimator works on: value categories,
//! the primitive width table, the read-only type-introspection capability,
//! an in-memory type registry, JSON schemas, runtime values and errors.
//!
//! # Overview
//!
//! - [`Category`] - The six categories every type falls into
//! - [`PrimitiveKind`] - Built-in primitives and their fixed widths
//! - [`TypeIntrospection`] - Questions the estimator asks about types
//! - [`TypeRegistry`] - Arena-backed introspection with a builder API
//! - [`Schema`] - JSON type declarations loaded into a registry
//! - [`Value`] - A runtime value to be measured
//! - [`ScaleError`] - Everything that can go wrong
//!
//! # Examples
//!
//! ```
//! use core_types::{Category, PrimitiveKind, TypeIntrospection, TypeRegistry, Value};
//!
//! let mut registry = TypeRegistry::new();
//! let int32 = registry.primitive(PrimitiveKind::Int32);
//! let node = registry
//!     .class("Node")
//!     .field("value", int32)
//!     .finish()
//!     .unwrap();
//!
//! assert_eq!(registry.category_of(&node), Category::ReferenceType);
//! let value = Value::instance(node);
//! assert_eq!(value.runtime_type(), Some(&node));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod category;
mod error;
mod introspection;
mod registry;
mod schema;
mod value;

pub use category::{Category, PrimitiveKind};
pub use error::{ScaleError, ScaleResult};
pub use introspection::TypeIntrospection;
pub use registry::{
    FieldDef, TypeBuilder, TypeDef, TypeId, TypeRegistry, TypeShape, ARRAY_SUFFIX,
    OBJECT_TYPE_NAME, STRING_TYPE_NAME, VALUE_TYPE_NAME,
};
pub use schema::{FieldDecl, Schema, TypeDecl};
pub use value::Value;
