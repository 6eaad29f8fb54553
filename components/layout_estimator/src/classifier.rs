//! Type classification and primitive widths.

use core_types::{Category, ScaleError, ScaleResult, TypeIntrospection};

/// Answers which category a type belongs to and how wide primitives are.
pub struct TypeClassifier<'a, I: TypeIntrospection> {
    types: &'a I,
}

impl<I: TypeIntrospection> Clone for TypeClassifier<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: TypeIntrospection> Copy for TypeClassifier<'_, I> {}

impl<'a, I: TypeIntrospection> TypeClassifier<'a, I> {
    /// Creates a classifier over an introspection source.
    pub fn new(types: &'a I) -> Self {
        TypeClassifier { types }
    }

    /// Category of `ty`.
    pub fn classify(&self, ty: &I::Type) -> Category {
        self.types.category_of(ty)
    }

    /// Fixed width of a primitive type.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::UnsupportedPrimitiveType`] when `ty` is not a
    /// primitive or its kind has no entry in the width table. Either case
    /// means the introspection source and the table disagree.
    pub fn primitive_width(&self, ty: &I::Type) -> ScaleResult<usize> {
        self.types
            .primitive_kind_of(ty)
            .and_then(|kind| kind.width())
            .ok_or_else(|| ScaleError::UnsupportedPrimitiveType {
                type_name: self.types.type_name(ty),
            })
    }
}
