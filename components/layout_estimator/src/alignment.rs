//! Size-class dependent alignment.
//!
//! Small objects are padded to the pointer width. Objects whose raw size
//! reaches the large-allocation threshold live in a separate region with
//! its own fixed alignment, independent of the pointer width.

use crate::PlatformConfig;

/// Rounds raw sizes up to the boundary of their size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentPolicy {
    small_mask: usize,
    large_mask: usize,
    threshold: usize,
}

impl AlignmentPolicy {
    /// Derives the policy from platform parameters.
    pub fn new(config: &PlatformConfig) -> Self {
        AlignmentPolicy {
            small_mask: config.pointer_size() - 1,
            large_mask: config.large_allocation_alignment_mask,
            threshold: config.large_allocation_threshold,
        }
    }

    /// Mask applied to a raw size of `raw` bytes.
    pub fn mask_for(&self, raw: usize) -> usize {
        if raw < self.threshold {
            self.small_mask
        } else {
            self.large_mask
        }
    }

    /// Rounds `raw` up to its alignment boundary, or `None` on overflow.
    ///
    /// # Examples
    ///
    /// ```
    /// use layout_estimator::{AlignmentPolicy, PlatformConfig};
    ///
    /// let policy = AlignmentPolicy::new(&PlatformConfig::x64());
    /// assert_eq!(policy.align(44), Some(48));
    /// assert_eq!(policy.align(48), Some(48));
    ///
    /// let policy = AlignmentPolicy::new(&PlatformConfig::x86());
    /// assert_eq!(policy.align(9), Some(12));
    /// ```
    pub fn align(&self, raw: usize) -> Option<usize> {
        let mask = self.mask_for(raw);
        raw.checked_add(mask).map(|padded| padded & !mask)
    }
}
