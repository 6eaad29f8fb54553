//! The read-only type-introspection capability consumed by the estimator.
//!
//! Any source of type metadata can drive the estimator: a registry built
//! in code, a schema loaded from disk, or a bridge to a host runtime's
//! reflection. The estimator only ever asks the questions below.

use std::fmt::Debug;

use crate::{Category, PrimitiveKind};

/// Read-only access to the layout-relevant facts about types.
///
/// Implementations must report categories consistently: a type whose
/// category is [`Category::Primitive`] should answer
/// [`primitive_kind_of`](Self::primitive_kind_of), and one whose category is
/// [`Category::Array`] should answer [`element_type_of`](Self::element_type_of).
///
/// Value types must never embed themselves, directly or through other
/// value-type fields, and inheritance chains must be finite.
pub trait TypeIntrospection {
    /// Handle identifying a type.
    type Type: Clone + PartialEq + Debug;

    /// Returns the category of `ty`.
    fn category_of(&self, ty: &Self::Type) -> Category;

    /// Returns the primitive kind of `ty`, if it is a primitive.
    fn primitive_kind_of(&self, ty: &Self::Type) -> Option<PrimitiveKind>;

    /// Returns the types of the instance fields declared directly on `ty`,
    /// in declaration order. Inherited fields are not included.
    fn declared_fields(&self, ty: &Self::Type) -> Vec<Self::Type>;

    /// Returns the base type of `ty`, or `None` at the hierarchy root.
    fn base_type_of(&self, ty: &Self::Type) -> Option<Self::Type>;

    /// Returns the element type of an array type.
    fn element_type_of(&self, ty: &Self::Type) -> Option<Self::Type>;

    /// Returns whether `ty` is one of the implicit roots (the universal
    /// object root or the value-type root). Roots contribute no fields.
    fn is_implicit_root(&self, ty: &Self::Type) -> bool;

    /// Human-readable name of `ty`, used in diagnostics only.
    fn type_name(&self, ty: &Self::Type) -> String;
}

impl<I: TypeIntrospection + ?Sized> TypeIntrospection for &I {
    type Type = I::Type;

    fn category_of(&self, ty: &Self::Type) -> Category {
        (**self).category_of(ty)
    }

    fn primitive_kind_of(&self, ty: &Self::Type) -> Option<PrimitiveKind> {
        (**self).primitive_kind_of(ty)
    }

    fn declared_fields(&self, ty: &Self::Type) -> Vec<Self::Type> {
        (**self).declared_fields(ty)
    }

    fn base_type_of(&self, ty: &Self::Type) -> Option<Self::Type> {
        (**self).base_type_of(ty)
    }

    fn element_type_of(&self, ty: &Self::Type) -> Option<Self::Type> {
        (**self).element_type_of(ty)
    }

    fn is_implicit_root(&self, ty: &Self::Type) -> bool {
        (**self).is_implicit_root(ty)
    }

    fn type_name(&self, ty: &Self::Type) -> String {
        (**self).type_name(ty)
    }
}
