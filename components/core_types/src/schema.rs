//! User-supplied type schemas.
//!
//! A schema is a JSON document listing classes, structs and enums. Field
//! types may name a built-in, any declared type (in any order), or either
//! followed by `[]` suffixes for arrays:
//!
//! ```json
//! {
//!   "types": [
//!     { "kind": "enum", "name": "Color", "underlying": "Byte" },
//!     { "kind": "struct", "name": "Pixel",
//!       "fields": [ { "name": "color", "type": "Color" },
//!                   { "name": "depth", "type": "Int64" } ] },
//!     { "kind": "class", "name": "Canvas", "base": "Widget",
//!       "fields": [ { "name": "pixels", "type": "Pixel[]" } ] },
//!     { "kind": "class", "name": "Widget" }
//!   ]
//! }
//! ```
//!
//! Loading a schema produces a [`TypeRegistry`]. Self-embedding structs and
//! inheritance loops are rejected during loading, so every registry handed
//! to the estimator is acyclic.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{PrimitiveKind, ScaleError, ScaleResult, TypeId, TypeRegistry};

/// A schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// Declared types
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

/// One declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum TypeDecl {
    /// Reference type
    Class {
        /// Type name
        name: String,
        /// Base class name; defaults to the object root
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base: Option<String>,
        /// Own instance fields
        #[serde(default)]
        fields: Vec<FieldDecl>,
    },
    /// Value type
    Struct {
        /// Type name
        name: String,
        /// Instance fields
        #[serde(default)]
        fields: Vec<FieldDecl>,
    },
    /// Enumeration
    Enum {
        /// Type name
        name: String,
        /// Underlying primitive name
        #[serde(default = "default_underlying")]
        underlying: String,
    },
}

impl TypeDecl {
    /// Declared name.
    pub fn name(&self) -> &str {
        match self {
            TypeDecl::Class { name, .. } | TypeDecl::Struct { name, .. } | TypeDecl::Enum { name, .. } => {
                name
            }
        }
    }
}

fn default_underlying() -> String {
    PrimitiveKind::Int32.name().to_string()
}

/// One declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    /// Field name
    pub name: String,
    /// Field type name
    #[serde(rename = "type")]
    pub ty: String,
}

impl Schema {
    /// Parses a schema from JSON text.
    pub fn from_json(text: &str) -> ScaleResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a schema file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ScaleResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScaleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Builds a registry holding the built-ins plus every declared type.
    ///
    /// # Errors
    ///
    /// Fails on unknown or duplicate names, enums over non-primitives,
    /// non-class bases, self-embedding structs and inheritance loops.
    pub fn to_registry(&self) -> ScaleResult<TypeRegistry> {
        let mut registry = TypeRegistry::new();

        // Reserve every name first so declarations may refer forward.
        let mut declared = Vec::with_capacity(self.types.len());
        for decl in &self.types {
            let id = match decl {
                TypeDecl::Class { name, .. } => registry.declare_class(name)?,
                TypeDecl::Struct { name, .. } => registry.declare_struct(name)?,
                TypeDecl::Enum { name, underlying } => {
                    let kind = underlying.parse::<PrimitiveKind>().map_err(|()| {
                        ScaleError::InvalidSchema(format!(
                            "enum `{name}` has non-primitive underlying type `{underlying}`"
                        ))
                    })?;
                    registry.enumeration(name, kind)?
                }
            };
            declared.push(id);
        }

        for (decl, id) in self.types.iter().zip(declared) {
            match decl {
                TypeDecl::Class { base, fields, .. } => {
                    let base = base.as_deref().map(|b| registry.resolve(b)).transpose()?;
                    let fields = resolve_fields(&mut registry, fields)?;
                    define(&mut registry, id, base, fields)?;
                }
                TypeDecl::Struct { fields, .. } => {
                    let fields = resolve_fields(&mut registry, fields)?;
                    define(&mut registry, id, None, fields)?;
                }
                TypeDecl::Enum { .. } => {}
            }
        }

        debug!(
            "loaded schema: {} declared types, {} registered in total",
            self.types.len(),
            registry.len()
        );
        Ok(registry)
    }
}

fn resolve_fields(
    registry: &mut TypeRegistry,
    fields: &[FieldDecl],
) -> ScaleResult<Vec<(String, TypeId)>> {
    fields
        .iter()
        .map(|field| Ok::<_, ScaleError>((field.name.clone(), registry.resolve(&field.ty)?)))
        .collect()
}

fn define(
    registry: &mut TypeRegistry,
    id: TypeId,
    base: Option<TypeId>,
    fields: Vec<(String, TypeId)>,
) -> ScaleResult<TypeId> {
    let mut builder = registry.define(id);
    if let Some(base) = base {
        builder = builder.base(base);
    }
    for (name, ty) in fields {
        builder = builder.field(&name, ty);
    }
    builder.finish()
}
