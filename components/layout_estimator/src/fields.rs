//! Field size accumulation over inheritance chains.
//!
//! A type's field payload is the sum over its own declared fields and those
//! of every ancestor up to (not including) the implicit roots. Value-typed
//! fields are embedded, so their payload is computed recursively; anything
//! allocated separately costs one pointer.

use core_types::{Category, ScaleError, ScaleResult, TypeIntrospection};
use log::trace;

use crate::{AlignmentPolicy, TypeClassifier};

/// Sums the sizes of a type's fields, including inherited ones.
pub struct FieldSizeAccumulator<'a, I: TypeIntrospection> {
    types: &'a I,
    classifier: TypeClassifier<'a, I>,
    alignment: AlignmentPolicy,
    pointer_size: usize,
}

impl<'a, I: TypeIntrospection> FieldSizeAccumulator<'a, I> {
    /// Creates an accumulator.
    pub fn new(types: &'a I, alignment: AlignmentPolicy, pointer_size: usize) -> Self {
        FieldSizeAccumulator {
            types,
            classifier: TypeClassifier::new(types),
            alignment,
            pointer_size,
        }
    }

    /// Total field payload of `ty` and its ancestors.
    ///
    /// With `align_result` the sum is rounded up by the alignment policy.
    /// Enumerations are accumulated without alignment so that they report
    /// exactly the width of their underlying primitive.
    pub fn accumulate_fields(&self, ty: &I::Type, align_result: bool) -> ScaleResult<usize> {
        let mut total: usize = 0;
        let mut level = Some(ty.clone());

        while let Some(current) = level.filter(|t| !self.types.is_implicit_root(t)) {
            let fields = self.types.declared_fields(&current);
            trace!(
                "accumulating {} field(s) declared on {}",
                fields.len(),
                self.types.type_name(&current)
            );
            for field in &fields {
                let size = self.field_size(field)?;
                total = total.checked_add(size).ok_or_else(|| self.overflow(ty))?;
            }
            level = self.types.base_type_of(&current);
        }

        if align_result {
            self.alignment.align(total).ok_or_else(|| self.overflow(ty))
        } else {
            Ok(total)
        }
    }

    /// Bytes one field of type `field` occupies inside its owner.
    pub fn field_size(&self, field: &I::Type) -> ScaleResult<usize> {
        match self.classifier.classify(field) {
            Category::Primitive => self.classifier.primitive_width(field),
            Category::Enumeration => self.accumulate_fields(field, false),
            category if category.is_inline() => self.accumulate_fields(field, true),
            _ => Ok(self.pointer_size),
        }
    }

    fn overflow(&self, ty: &I::Type) -> ScaleError {
        ScaleError::SizeOverflow {
            type_name: self.types.type_name(ty),
        }
    }
}
