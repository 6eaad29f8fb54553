//! Exclusive size estimation.
//!
//! The estimator dispatches on the category of a value's runtime type:
//!
//! | category       | size                                                         |
//! |----------------|--------------------------------------------------------------|
//! | primitive      | table width                                                  |
//! | string         | `len * char + 4 + char + header`                             |
//! | array          | `max(align(len * element + 4) + header, min_object)`         |
//! | reference type | `max(align(fields) + header, min_object)`                    |
//! | value type     | `align(fields)`, no header                                   |
//! | enumeration    | `fields` (the underlying primitive), no header               |
//!
//! Sizes are exclusive: a reference-typed field or element costs one
//! pointer no matter how large the object it points to is.

use std::fmt;

use core_types::{Category, ScaleError, ScaleResult, TypeIntrospection, Value};
use log::debug;
use serde::Serialize;

use crate::{
    AlignmentPolicy, FieldSizeAccumulator, PlatformConfig, TypeClassifier, LENGTH_FIELD_SIZE,
};

/// The terms that make up an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizeBreakdown {
    /// Category of the measured value
    pub category: Category,
    /// Content bytes before alignment
    pub payload: usize,
    /// Content bytes after alignment
    pub aligned: usize,
    /// Object header bytes charged
    pub header: usize,
    /// Whether the minimum object size was applied
    pub clamped: bool,
    /// Final exclusive size
    pub total: usize,
}

impl fmt::Display for SizeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes ({}: payload {}, aligned {}, header {}",
            self.total, self.category, self.payload, self.aligned, self.header
        )?;
        if self.clamped {
            write!(f, ", raised to minimum object size")?;
        }
        write!(f, ")")
    }
}

/// Estimates the exclusive heap footprint of runtime values.
///
/// # Examples
///
/// ```
/// use core_types::{TypeRegistry, Value};
/// use layout_estimator::{PlatformConfig, SizeEstimator};
///
/// let mut registry = TypeRegistry::new();
/// let ints = registry.resolve("Int32[]").unwrap();
/// let estimator = SizeEstimator::new(&registry, PlatformConfig::x64()).unwrap();
///
/// assert_eq!(estimator.estimate_exclusive_size(&Value::array(ints, 10)).unwrap(), 64);
/// ```
pub struct SizeEstimator<'a, I: TypeIntrospection> {
    types: &'a I,
    config: PlatformConfig,
    classifier: TypeClassifier<'a, I>,
    fields: FieldSizeAccumulator<'a, I>,
    alignment: AlignmentPolicy,
}

impl<'a, I: TypeIntrospection> SizeEstimator<'a, I> {
    /// Creates an estimator for the platform described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::InvalidConfig`] if `config` fails validation.
    pub fn new(types: &'a I, config: PlatformConfig) -> ScaleResult<Self> {
        config.validate()?;
        let alignment = AlignmentPolicy::new(&config);
        Ok(SizeEstimator {
            types,
            config,
            classifier: TypeClassifier::new(types),
            fields: FieldSizeAccumulator::new(types, alignment, config.pointer_size()),
            alignment,
        })
    }

    /// Platform parameters in use.
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Exclusive size of `value` in bytes.
    ///
    /// # Errors
    ///
    /// Fails with [`ScaleError::NullArgument`] for [`Value::Null`], with
    /// [`ScaleError::MissingLength`] for an array or string supplied
    /// without its length, and with the classifier's errors for types the
    /// width table does not know.
    pub fn estimate_exclusive_size(&self, value: &Value<I::Type>) -> ScaleResult<usize> {
        self.estimate_breakdown(value).map(|breakdown| breakdown.total)
    }

    /// Exclusive size of `value` with its intermediate terms.
    pub fn estimate_breakdown(&self, value: &Value<I::Type>) -> ScaleResult<SizeBreakdown> {
        let ty = value.runtime_type().ok_or(ScaleError::NullArgument)?;
        let category = self.classifier.classify(ty);

        let breakdown = match category {
            Category::Primitive => {
                let width = self.classifier.primitive_width(ty)?;
                self.inline(category, width, width)
            }
            Category::String => {
                let length = self.length_of(value, ty)?;
                self.string(ty, length)?
            }
            Category::Array => {
                let length = self.length_of(value, ty)?;
                self.array(ty, length)?
            }
            Category::ReferenceType => {
                let payload = self.fields.accumulate_fields(ty, false)?;
                let aligned = self.align(payload, ty)?;
                self.heap_object(ty, category, payload, aligned)?
            }
            Category::ValueType => {
                let payload = self.fields.accumulate_fields(ty, false)?;
                let aligned = self.align(payload, ty)?;
                self.inline(category, payload, aligned)
            }
            Category::Enumeration => {
                let payload = self.fields.accumulate_fields(ty, false)?;
                self.inline(category, payload, payload)
            }
        };

        debug!("{}: {}", self.types.type_name(ty), breakdown);
        Ok(breakdown)
    }

    fn string(&self, ty: &I::Type, length: usize) -> ScaleResult<SizeBreakdown> {
        let char_width = self.config.char_width;
        // Characters, then the length field and the terminator.
        let payload = length
            .checked_mul(char_width)
            .and_then(|chars| chars.checked_add(LENGTH_FIELD_SIZE + char_width))
            .ok_or_else(|| self.overflow(ty))?;
        let header = self.config.header_size();
        Ok(SizeBreakdown {
            category: Category::String,
            payload,
            aligned: payload,
            header,
            clamped: false,
            total: payload.checked_add(header).ok_or_else(|| self.overflow(ty))?,
        })
    }

    fn array(&self, ty: &I::Type, length: usize) -> ScaleResult<SizeBreakdown> {
        let element = self
            .types
            .element_type_of(ty)
            .ok_or_else(|| ScaleError::MissingElementType {
                type_name: self.types.type_name(ty),
            })?;
        let element_size = match self.classifier.classify(&element) {
            Category::Primitive => self.classifier.primitive_width(&element)?,
            category if category.is_inline() => self.fields.accumulate_fields(&element, true)?,
            _ => self.config.pointer_size(),
        };
        let payload = length
            .checked_mul(element_size)
            .and_then(|elements| elements.checked_add(LENGTH_FIELD_SIZE))
            .ok_or_else(|| self.overflow(ty))?;
        let aligned = self.align(payload, ty)?;
        self.heap_object(ty, Category::Array, payload, aligned)
    }

    fn heap_object(
        &self,
        ty: &I::Type,
        category: Category,
        payload: usize,
        aligned: usize,
    ) -> ScaleResult<SizeBreakdown> {
        let header = self.config.header_size();
        let min = self.config.min_object_size();
        let raw_total = aligned.checked_add(header).ok_or_else(|| self.overflow(ty))?;
        Ok(SizeBreakdown {
            category,
            payload,
            aligned,
            header,
            clamped: raw_total < min,
            total: raw_total.max(min),
        })
    }

    fn inline(&self, category: Category, payload: usize, aligned: usize) -> SizeBreakdown {
        SizeBreakdown {
            category,
            payload,
            aligned,
            header: 0,
            clamped: false,
            total: aligned,
        }
    }

    fn length_of(&self, value: &Value<I::Type>, ty: &I::Type) -> ScaleResult<usize> {
        value.length().ok_or_else(|| ScaleError::MissingLength {
            type_name: self.types.type_name(ty),
        })
    }

    fn align(&self, raw: usize, ty: &I::Type) -> ScaleResult<usize> {
        self.alignment.align(raw).ok_or_else(|| self.overflow(ty))
    }

    fn overflow(&self, ty: &I::Type) -> ScaleError {
        ScaleError::SizeOverflow {
            type_name: self.types.type_name(ty),
        }
    }
}
