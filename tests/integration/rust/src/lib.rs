//! Integration test suite for Object Scales
//!
//! This crate verifies that schema loading, layout estimation and the CLI
//! session work together across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use core_types;
    pub use layout_estimator;
    pub use scales_cli;
}
