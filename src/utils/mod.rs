//! Internal utility functions for imageops-binarize.
//!
//! This module contains common functionality used across different image operations.

use std::ops::Range;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::Error;

/// Intensity written for background pixels by every binarizer.
pub const BACKGROUND: u8 = 0;

/// Intensity written for foreground pixels by every binarizer.
pub const FOREGROUND: u8 = 255;

/// Rounds a floating-point intensity to the nearest 8-bit value.
///
/// Halfway cases round to the even neighbour, and the result is clamped into
/// `[0, 255]` so that out-of-range inputs cannot wrap.
///
/// # Arguments
///
/// * `value` - The intensity to round
///
/// # Returns
///
/// The rounded 8-bit intensity
#[inline]
pub fn round_to_u8(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

/// Validates that a floating-point parameter is finite.
///
/// # Arguments
///
/// * `name` - The parameter name reported in the error
/// * `value` - The value to check
///
/// # Returns
///
/// `Ok(())` if the value is finite, otherwise `Error::InvalidParameter`
pub fn validate_finite(name: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParameter { name, value })
    }
}

/// Runs `f` once for every row in `rows`, handing it the row index and the
/// mutable row slice of a row-major `data` buffer.
///
/// With the `rayon` feature the rows are processed on the global thread pool.
/// Every row is written by exactly one call, so the result does not depend
/// on scheduling.
///
/// `width` must be non-zero and `rows` must lie inside `data`.
pub fn for_each_row<T, F>(data: &mut [T], width: usize, rows: Range<usize>, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    let first = rows.start;
    let band = &mut data[rows.start * width..rows.end * width];

    #[cfg(feature = "rayon")]
    band.par_chunks_mut(width)
        .enumerate()
        .for_each(|(offset, row)| f(first + offset, row));

    #[cfg(not(feature = "rayon"))]
    band.chunks_mut(width)
        .enumerate()
        .for_each(|(offset, row)| f(first + offset, row));
}
