//! Error types for layout estimation and schema loading.
//!
//! Every fallible operation in the workspace reports a [`ScaleError`].
//! Estimation either produces a complete size or fails before producing
//! anything; there are no partial results.

use thiserror::Error;

/// Errors raised while building type registries or estimating sizes.
#[derive(Debug, Error)]
pub enum ScaleError {
    /// The value to measure is absent.
    #[error("cannot estimate the size of an absent value")]
    NullArgument,

    /// A type classified as primitive has no entry in the width table.
    #[error("type `{type_name}` is not a primitive with a known width")]
    UnsupportedPrimitiveType {
        /// Name of the offending type
        type_name: String,
    },

    /// A string or array value was supplied without its length.
    #[error("value of type `{type_name}` needs an element count")]
    MissingLength {
        /// Name of the array or string type
        type_name: String,
    },

    /// An array type does not report an element type.
    #[error("array type `{type_name}` has no element type")]
    MissingElementType {
        /// Name of the array type
        type_name: String,
    },

    /// The computed size does not fit in `usize`.
    #[error("size of `{type_name}` overflows the address space")]
    SizeOverflow {
        /// Name of the type being measured
        type_name: String,
    },

    /// A type name could not be resolved.
    #[error("unknown type `{0}`")]
    UnknownType(String),

    /// A type name was declared twice.
    #[error("type `{0}` is declared more than once")]
    DuplicateType(String),

    /// A value type embeds itself, or an inheritance chain loops.
    #[error("type `{0}` has a cyclic layout")]
    CyclicLayout(String),

    /// A schema is structurally invalid.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    /// Platform parameters are out of range.
    #[error("invalid platform configuration: {0}")]
    InvalidConfig(String),

    /// Schema or configuration JSON could not be parsed.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema or configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path of the file
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used throughout the workspace.
pub type ScaleResult<T> = Result<T, ScaleError>;
