//! Value categories and the primitive width table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The category of a runtime type.
///
/// Every type maps to exactly one category. The estimator dispatches on
/// this tag with a single `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Built-in scalar with a fixed width
    Primitive,
    /// Immutable UTF-16 string
    String,
    /// Single-dimension array
    Array,
    /// Type embedded inline wherever it is used
    ValueType,
    /// Type allocated independently on the heap
    ReferenceType,
    /// Named constants over an underlying primitive
    Enumeration,
}

impl Category {
    /// Returns whether instances of this category are embedded inline
    /// rather than referenced through a pointer.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            Category::Primitive | Category::ValueType | Category::Enumeration
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Primitive => "primitive",
            Category::String => "string",
            Category::Array => "array",
            Category::ValueType => "value type",
            Category::ReferenceType => "reference type",
            Category::Enumeration => "enumeration",
        };
        f.write_str(name)
    }
}

/// Built-in primitive kinds known to the runtime.
///
/// `IntPtr` and `UIntPtr` are native-sized integers a host may classify as
/// primitive. They deliberately have no entry in the width table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// 1-byte boolean
    Boolean,
    /// Unsigned 8-bit integer
    Byte,
    /// Signed 8-bit integer
    SByte,
    /// Signed 16-bit integer
    Int16,
    /// Unsigned 16-bit integer
    UInt16,
    /// UTF-16 code unit
    Char,
    /// Signed 32-bit integer
    Int32,
    /// Unsigned 32-bit integer
    UInt32,
    /// Single-precision float
    Single,
    /// Signed 64-bit integer
    Int64,
    /// Unsigned 64-bit integer
    UInt64,
    /// Double-precision float
    Double,
    /// 128-bit decimal
    Decimal,
    /// Signed native-sized integer
    IntPtr,
    /// Unsigned native-sized integer
    UIntPtr,
}

impl PrimitiveKind {
    /// Every primitive kind, in width-table order.
    pub const ALL: [PrimitiveKind; 15] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::SByte,
        PrimitiveKind::Int16,
        PrimitiveKind::UInt16,
        PrimitiveKind::Char,
        PrimitiveKind::Int32,
        PrimitiveKind::UInt32,
        PrimitiveKind::Single,
        PrimitiveKind::Int64,
        PrimitiveKind::UInt64,
        PrimitiveKind::Double,
        PrimitiveKind::Decimal,
        PrimitiveKind::IntPtr,
        PrimitiveKind::UIntPtr,
    ];

    /// Returns the fixed width in bytes, or `None` for kinds without a
    /// table entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_types::PrimitiveKind;
    ///
    /// assert_eq!(PrimitiveKind::Int32.width(), Some(4));
    /// assert_eq!(PrimitiveKind::Decimal.width(), Some(16));
    /// assert_eq!(PrimitiveKind::IntPtr.width(), None);
    /// ```
    pub fn width(self) -> Option<usize> {
        match self {
            PrimitiveKind::Boolean | PrimitiveKind::Byte | PrimitiveKind::SByte => Some(1),
            PrimitiveKind::Int16 | PrimitiveKind::UInt16 | PrimitiveKind::Char => Some(2),
            PrimitiveKind::Int32 | PrimitiveKind::UInt32 | PrimitiveKind::Single => Some(4),
            PrimitiveKind::Int64 | PrimitiveKind::UInt64 | PrimitiveKind::Double => Some(8),
            PrimitiveKind::Decimal => Some(16),
            PrimitiveKind::IntPtr | PrimitiveKind::UIntPtr => None,
        }
    }

    /// Canonical type name used by registries and schemas.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::SByte => "SByte",
            PrimitiveKind::Int16 => "Int16",
            PrimitiveKind::UInt16 => "UInt16",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::Int32 => "Int32",
            PrimitiveKind::UInt32 => "UInt32",
            PrimitiveKind::Single => "Single",
            PrimitiveKind::Int64 => "Int64",
            PrimitiveKind::UInt64 => "UInt64",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Decimal => "Decimal",
            PrimitiveKind::IntPtr => "IntPtr",
            PrimitiveKind::UIntPtr => "UIntPtr",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or(())
    }
}
