//! Platform parameters of the modelled runtime.
//!
//! The defaults describe the host: pointer width follows the target this
//! crate is compiled for, everything else uses the runtime's stock values.
//! A configuration can also be loaded from JSON, where every key is
//! optional:
//!
//! ```json
//! { "pointer_width": 4, "large_allocation_threshold": 85000 }
//! ```

use std::fmt;
use std::path::Path;

use core_types::{ScaleError, ScaleResult};
use serde::{Deserialize, Serialize};

/// Objects at or above this many bytes live in the large-allocation region.
pub const DEFAULT_LARGE_ALLOCATION_THRESHOLD: usize = 85_000;

/// Large allocations are always aligned to 8 bytes.
pub const DEFAULT_LARGE_ALLOCATION_ALIGNMENT_MASK: usize = 7;

/// Width of a UTF-16 code unit.
pub const DEFAULT_CHAR_WIDTH: usize = 2;

/// Width of the element-count field of arrays and strings.
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Width of a native pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PointerWidth {
    /// 32-bit platforms
    Four,
    /// 64-bit platforms
    Eight,
}

impl PointerWidth {
    /// Pointer width of the compilation target.
    pub fn host() -> Self {
        if cfg!(target_pointer_width = "32") {
            PointerWidth::Four
        } else {
            PointerWidth::Eight
        }
    }

    /// Width in bytes.
    pub fn bytes(self) -> usize {
        match self {
            PointerWidth::Four => 4,
            PointerWidth::Eight => 8,
        }
    }
}

impl TryFrom<usize> for PointerWidth {
    type Error = ScaleError;

    fn try_from(bytes: usize) -> Result<Self, Self::Error> {
        match bytes {
            4 => Ok(PointerWidth::Four),
            8 => Ok(PointerWidth::Eight),
            other => Err(ScaleError::InvalidConfig(format!(
                "pointer width must be 4 or 8 bytes, got {other}"
            ))),
        }
    }
}

impl From<PointerWidth> for usize {
    fn from(width: PointerWidth) -> usize {
        width.bytes()
    }
}

impl fmt::Display for PointerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bytes() * 8)
    }
}

/// Layout parameters of the target runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformConfig {
    /// Width of references and of the header words
    pub pointer_width: PointerWidth,
    /// Raw size at which the large-allocation alignment takes over
    pub large_allocation_threshold: usize,
    /// Alignment mask applied to large allocations
    pub large_allocation_alignment_mask: usize,
    /// Width of one string character
    pub char_width: usize,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        PlatformConfig {
            pointer_width: PointerWidth::host(),
            large_allocation_threshold: DEFAULT_LARGE_ALLOCATION_THRESHOLD,
            large_allocation_alignment_mask: DEFAULT_LARGE_ALLOCATION_ALIGNMENT_MASK,
            char_width: DEFAULT_CHAR_WIDTH,
        }
    }
}

impl PlatformConfig {
    /// Stock 32-bit runtime.
    pub fn x86() -> Self {
        Self::default().with_pointer_width(PointerWidth::Four)
    }

    /// Stock 64-bit runtime.
    pub fn x64() -> Self {
        Self::default().with_pointer_width(PointerWidth::Eight)
    }

    /// Replaces the pointer width.
    pub fn with_pointer_width(mut self, width: PointerWidth) -> Self {
        self.pointer_width = width;
        self
    }

    /// Replaces the large-allocation threshold.
    pub fn with_large_allocation_threshold(mut self, threshold: usize) -> Self {
        self.large_allocation_threshold = threshold;
        self
    }

    /// Width of a reference in bytes.
    pub fn pointer_size(&self) -> usize {
        self.pointer_width.bytes()
    }

    /// Per-object header: the sync-block word and the type pointer.
    pub fn header_size(&self) -> usize {
        2 * self.pointer_size()
    }

    /// Smallest size any heap object occupies.
    pub fn min_object_size(&self) -> usize {
        3 * self.pointer_size()
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::InvalidConfig`] for a zero threshold, a zero
    /// character width, or a large-allocation mask that is not one less
    /// than a power of two.
    pub fn validate(&self) -> ScaleResult<()> {
        if self.large_allocation_threshold == 0 {
            return Err(ScaleError::InvalidConfig(
                "large allocation threshold must be positive".to_string(),
            ));
        }
        if self.char_width == 0 {
            return Err(ScaleError::InvalidConfig(
                "character width must be positive".to_string(),
            ));
        }
        let mask = self.large_allocation_alignment_mask;
        if !mask.checked_add(1).is_some_and(usize::is_power_of_two) {
            return Err(ScaleError::InvalidConfig(format!(
                "large allocation alignment mask {mask:#x} is not 2^n - 1"
            )));
        }
        Ok(())
    }

    /// Parses and validates a configuration from JSON text.
    pub fn from_json(text: &str) -> ScaleResult<Self> {
        let config: PlatformConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ScaleResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScaleError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }
}
