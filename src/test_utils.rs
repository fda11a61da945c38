//! Test utilities for imageops-binarize
//!
//! This module provides common fixtures for testing image operations.
//! It is only compiled when running tests.

#[cfg(test)]
use image::Luma;
#[cfg(test)]
use imageproc::definitions::Image;

/// Creates a grayscale image filled with a single intensity.
#[cfg(test)]
pub fn create_uniform_image(width: u32, height: u32, value: u8) -> Image<Luma<u8>> {
    Image::from_pixel(width, height, Luma([value]))
}

/// Creates a vertical step edge: columns left of `width / 2` hold `left`,
/// the remaining columns hold `right`.
#[cfg(test)]
pub fn create_step_image(width: u32, height: u32, left: u8, right: u8) -> Image<Luma<u8>> {
    Image::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Luma([left])
        } else {
            Luma([right])
        }
    })
}

/// Creates a horizontal gradient spanning `[0, 255]`.
#[cfg(test)]
pub fn create_gradient_image(width: u32, height: u32) -> Image<Luma<u8>> {
    Image::from_fn(width, height, |x, _| {
        Luma([(x * 255 / width.saturating_sub(1).max(1)) as u8])
    })
}

/// Creates a deterministic pseudo-random image.
///
/// A linear congruential generator keeps the pattern stable across runs so
/// failures are reproducible.
#[cfg(test)]
pub fn create_noise_image(width: u32, height: u32, seed: u32) -> Image<Luma<u8>> {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    Image::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        Luma([(state >> 24) as u8])
    })
}

/// Returns `true` if every sample of the image is 0 or 255.
#[cfg(test)]
pub fn is_binary(image: &Image<Luma<u8>>) -> bool {
    image.as_raw().iter().all(|&v| v == 0 || v == 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_step_image_splits_at_half_width() {
        let image = create_step_image(10, 4, 10, 200);
        assert_eq!(image.dimensions(), (10, 4));
        assert_eq!(image.get_pixel(4, 0), &Luma([10]));
        assert_eq!(image.get_pixel(5, 3), &Luma([200]));
    }

    #[test]
    fn create_gradient_image_spans_full_range() {
        let image = create_gradient_image(16, 2);
        assert_eq!(image.get_pixel(0, 0), &Luma([0]));
        assert_eq!(image.get_pixel(15, 1), &Luma([255]));
    }

    #[test]
    fn create_noise_image_is_deterministic() {
        assert_eq!(create_noise_image(8, 8, 42), create_noise_image(8, 8, 42));
        assert_ne!(create_noise_image(8, 8, 42), create_noise_image(8, 8, 43));
    }

    #[test]
    fn is_binary_detects_intermediate_values() {
        assert!(is_binary(&create_step_image(4, 4, 0, 255)));
        assert!(!is_binary(&create_uniform_image(4, 4, 128)));
    }
}
