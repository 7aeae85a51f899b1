//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Clamp a usize to the u32 range and downcast, saturating at the maximum.
#[must_use]
pub fn clamp_usize_to_u32(value: usize) -> u32 {
    cast::<usize, u32>(value).unwrap_or(u32::MAX)
}
