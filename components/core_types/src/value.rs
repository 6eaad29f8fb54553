//! Runtime values as seen by the estimator.
//!
//! Only the static type of a value and, for arrays and strings, its element
//! count influence its size. Contents never do, so a [`Value`] carries
//! nothing else.

/// A runtime value to be measured.
///
/// `T` is the type handle of the introspection capability in use.
///
/// # Examples
///
/// ```
/// use core_types::{TypeRegistry, Value};
///
/// let registry = TypeRegistry::new();
/// let greeting = Value::string(registry.string_type(), "héllo");
///
/// assert_eq!(greeting.length(), Some(5));
/// assert!(!greeting.is_null());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<T> {
    /// The absent value
    Null,
    /// A value whose size depends only on its type
    Instance(T),
    /// An array or string together with its element count
    Sequence {
        /// Array or string type
        ty: T,
        /// Element count (UTF-16 code units for strings)
        length: usize,
    },
}

impl<T> Value<T> {
    /// Creates a value of type `ty`.
    pub fn instance(ty: T) -> Self {
        Value::Instance(ty)
    }

    /// Creates an array value of type `ty` with `length` elements.
    pub fn array(ty: T, length: usize) -> Self {
        Value::Sequence { ty, length }
    }

    /// Creates a string value of type `ty` holding `text`.
    ///
    /// Length is measured in UTF-16 code units, so characters outside the
    /// basic multilingual plane count twice.
    pub fn string(ty: T, text: &str) -> Self {
        Value::Sequence {
            ty,
            length: text.encode_utf16().count(),
        }
    }

    /// Returns whether this is the absent value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The runtime type, or `None` for the absent value.
    pub fn runtime_type(&self) -> Option<&T> {
        match self {
            Value::Null => None,
            Value::Instance(ty) | Value::Sequence { ty, .. } => Some(ty),
        }
    }

    /// Element count of arrays and strings.
    pub fn length(&self) -> Option<usize> {
        match self {
            Value::Sequence { length, .. } => Some(*length),
            _ => None,
        }
    }
}

impl<T> From<Option<Value<T>>> for Value<T> {
    fn from(value: Option<Value<T>>) -> Self {
        value.unwrap_or(Value::Null)
    }
}
