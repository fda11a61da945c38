use log::trace;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::Image;
use image::Luma;

/// Number of intensity levels of an 8-bit image
pub const LEVELS: usize = 256;

#[cfg(feature = "rayon")]
const CHUNK_SIZE: usize = 64 * 1024;

/// Intensity histogram of an 8-bit gray image
///
/// One count per intensity level, together with the running (cumulative)
/// counts. The counts always sum to `width * height` of the source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; LEVELS],
    cumulative: [u64; LEVELS],
}

impl Histogram {
    /// Counts every sample of `image`
    ///
    /// With the `rayon` feature the image is split into chunks that are counted
    /// in parallel and merged afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use imageops_binarize::{Histogram, Image};
    /// use image::Luma;
    ///
    /// let image: Image<Luma<u8>> = Image::from_raw(2, 2, vec![0, 0, 7, 255]).unwrap();
    /// let histogram = Histogram::from_image(&image);
    /// assert_eq!(histogram.counts()[0], 2);
    /// assert_eq!(histogram.cumulative()[7], 3);
    /// assert_eq!(histogram.total(), 4);
    /// ```
    pub fn from_image(image: &Image<Luma<u8>>) -> Self {
        let counts = count_levels(image.as_raw());
        trace!(
            "histogram built over {}x{} samples",
            image.width(),
            image.height()
        );
        Self::from_counts(counts)
    }

    /// Wraps precomputed per-level counts.
    pub fn from_counts(counts: [u64; LEVELS]) -> Self {
        let mut cumulative = [0u64; LEVELS];
        let mut running = 0u64;
        for (slot, &count) in cumulative.iter_mut().zip(counts.iter()) {
            running += count;
            *slot = running;
        }
        Self { counts, cumulative }
    }

    pub fn counts(&self) -> &[u64; LEVELS] {
        &self.counts
    }

    /// `cumulative()[t]` is the number of samples with intensity `<= t`.
    pub fn cumulative(&self) -> &[u64; LEVELS] {
        &self.cumulative
    }

    /// Total number of counted samples.
    pub fn total(&self) -> u64 {
        self.cumulative[LEVELS - 1]
    }
}

#[cfg(not(feature = "rayon"))]
fn count_levels(samples: &[u8]) -> [u64; LEVELS] {
    let mut counts = [0u64; LEVELS];
    for &value in samples {
        counts[value as usize] += 1;
    }
    counts
}

#[cfg(feature = "rayon")]
fn count_levels(samples: &[u8]) -> [u64; LEVELS] {
    samples
        .par_chunks(CHUNK_SIZE)
        .fold(
            || [0u64; LEVELS],
            |mut counts, chunk| {
                for &value in chunk {
                    counts[value as usize] += 1;
                }
                counts
            },
        )
        .reduce(
            || [0u64; LEVELS],
            |mut merged, partial| {
                for (m, p) in merged.iter_mut().zip(partial.iter()) {
                    *m += p;
                }
                merged
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_noise_image, create_step_image};

    #[test]
    fn test_counts_sum_to_pixel_count() {
        let image = create_noise_image(37, 29, 11);
        let histogram = Histogram::from_image(&image);

        assert_eq!(histogram.counts().iter().sum::<u64>(), 37 * 29);
        assert_eq!(histogram.total(), 37 * 29);
    }

    #[test]
    fn test_step_image_histogram() {
        let histogram = Histogram::from_image(&create_step_image(20, 20, 10, 200));

        assert_eq!(histogram.counts()[10], 200);
        assert_eq!(histogram.counts()[200], 200);
        assert_eq!(histogram.cumulative()[9], 0);
        assert_eq!(histogram.cumulative()[10], 200);
        assert_eq!(histogram.cumulative()[199], 200);
        assert_eq!(histogram.cumulative()[200], 400);
    }

    #[test]
    fn test_empty_image_histogram() {
        let image: Image<Luma<u8>> = Image::new(0, 0);
        let histogram = Histogram::from_image(&image);
        assert_eq!(histogram.total(), 0);
    }

    #[test]
    fn test_cumulative_is_non_decreasing() {
        let histogram = Histogram::from_image(&create_noise_image(16, 16, 5));
        assert!(histogram.cumulative().windows(2).all(|w| w[0] <= w[1]));
    }
}
