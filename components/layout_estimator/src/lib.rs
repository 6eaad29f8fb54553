//! Layout Estimator - exclusive heap-size estimation
//!
//! This component provides:
//! - Platform parameters of the modelled runtime (pointer width, header,
//!   minimum object size, large-allocation threshold)
//! - Type classification and the primitive width table
//! - Field accumulation over inheritance chains and embedded value types
//! - Two-regime alignment for small and large allocations
//! - The estimator that ties them together
//!
//! # Examples
//!
//! ```
//! use core_types::{PrimitiveKind, TypeRegistry, Value};
//! use layout_estimator::{PlatformConfig, SizeEstimator};
//!
//! let mut registry = TypeRegistry::new();
//! let int64 = registry.primitive(PrimitiveKind::Int64);
//! let byte = registry.primitive(PrimitiveKind::Byte);
//! let pair = registry
//!     .structure("Pair")
//!     .field("l", int64)
//!     .field("b", byte)
//!     .finish()
//!     .unwrap();
//! let pairs = registry.array_of(pair).unwrap();
//!
//! let estimator = SizeEstimator::new(&registry, PlatformConfig::x64()).unwrap();
//! assert_eq!(estimator.estimate_exclusive_size(&Value::instance(pair)).unwrap(), 16);
//! assert_eq!(estimator.estimate_exclusive_size(&Value::array(pairs, 10)).unwrap(), 184);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod alignment;
pub mod classifier;
pub mod estimator;
pub mod fields;
pub mod platform;

// Re-export main types
pub use alignment::AlignmentPolicy;
pub use classifier::TypeClassifier;
pub use estimator::{SizeBreakdown, SizeEstimator};
pub use fields::FieldSizeAccumulator;
pub use platform::{
    PlatformConfig, PointerWidth, DEFAULT_CHAR_WIDTH, DEFAULT_LARGE_ALLOCATION_ALIGNMENT_MASK,
    DEFAULT_LARGE_ALLOCATION_THRESHOLD, LENGTH_FIELD_SIZE,
};
