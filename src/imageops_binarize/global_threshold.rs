use imageproc::contrast::otsu_level;
use imageproc::map::map_colors;
use log::debug;

use crate::imageops_binarize::histogram::Histogram;
use crate::utils::{BACKGROUND, FOREGROUND};
use crate::Image;
use image::Luma;

/// Added to class sizes before dividing so an empty class has a finite mean.
pub const EPSILON: f64 = 1e-8;

/// Level that maximises the between-class variance of `histogram`
///
/// Every candidate `t` in `0..=255` splits the histogram into `[0, t]` and
/// `[t + 1, 255]`, scored as `w0 * w1 * (mu0 - mu1)^2`. The first maximum in
/// ascending order wins, and `0` is returned when no candidate scores above
/// zero (uniform or empty images).
///
/// Class counts and intensity sums are carried forward as exact integers, so
/// the result is the same as recomputing both classes from scratch at every
/// candidate.
pub fn between_class_variance_level(histogram: &Histogram) -> u8 {
    let counts = histogram.counts();
    let total = histogram.total();
    if total == 0 {
        return 0;
    }

    let total_sum: u64 = counts
        .iter()
        .enumerate()
        .map(|(level, &count)| level as u64 * count)
        .sum();

    let mut best_level = 0u8;
    let mut best_variance = 0.0f64;
    let mut lower_count = 0u64;
    let mut lower_sum = 0u64;

    for (level, &count) in counts.iter().enumerate() {
        lower_count += count;
        lower_sum += level as u64 * count;

        let w0 = lower_count as f64 / total as f64;
        let w1 = 1.0 - w0;
        let mu0 = lower_sum as f64 / (lower_count as f64 + EPSILON);
        let mu1 = (total_sum - lower_sum) as f64 / ((total - lower_count) as f64 + EPSILON);
        let variance = w0 * w1 * (mu0 - mu1) * (mu0 - mu1);

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

/// Maps every sample strictly above `level` to 255 and the rest to 0.
pub fn apply_global_threshold(image: &Image<Luma<u8>>, level: u8) -> Image<Luma<u8>> {
    map_colors(image, |Luma([value])| {
        if value > level {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

/// Whole-image binarization from a single histogram-derived level
///
/// Unlike the local binarizers there is no border region: every pixel,
/// including those on the image edge, is compared with the same level.
pub trait GlobalVarianceThreshold {
    /// Level chosen by the between-class variance search
    fn global_variance_level(&self) -> u8;

    /// Binarizes with [`GlobalVarianceThreshold::global_variance_level`]
    ///
    /// # Examples
    ///
    /// ```
    /// use imageops_binarize::{GlobalVarianceThreshold, Image};
    /// use image::Luma;
    ///
    /// let image: Image<Luma<u8>> =
    ///     Image::from_fn(20, 20, |x, _| if x < 10 { Luma([10]) } else { Luma([200]) });
    ///
    /// let binary = image.binarize_global_variance();
    /// assert_eq!(binary.get_pixel(9, 0), &Luma([0]));
    /// assert_eq!(binary.get_pixel(10, 0), &Luma([255]));
    /// ```
    fn binarize_global_variance(&self) -> Image<Luma<u8>>;

    /// Binarizes with the Otsu level computed by `imageproc`
    fn binarize_otsu(&self) -> Image<Luma<u8>>;
}

impl GlobalVarianceThreshold for Image<Luma<u8>> {
    fn global_variance_level(&self) -> u8 {
        between_class_variance_level(&Histogram::from_image(self))
    }

    fn binarize_global_variance(&self) -> Image<Luma<u8>> {
        let level = self.global_variance_level();
        debug!("between-class variance level: {level}");
        apply_global_threshold(self, level)
    }

    fn binarize_otsu(&self) -> Image<Luma<u8>> {
        let level = otsu_level(self);
        debug!("otsu level: {level}");
        apply_global_threshold(self, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imageops_binarize::histogram::LEVELS;
    use crate::test_utils::{create_noise_image, create_step_image, create_uniform_image, is_binary};

    /// Scores every candidate from scratch without running sums.
    fn exhaustive_level(histogram: &Histogram) -> u8 {
        let counts = histogram.counts();
        let total = histogram.total() as f64;
        let weighted = |range: std::ops::Range<usize>| -> (u64, u64) {
            range.fold((0, 0), |(n, s), v| (n + counts[v], s + v as u64 * counts[v]))
        };

        let mut best = (0u8, 0.0f64);
        for t in 0..LEVELS {
            let (n0, s0) = weighted(0..t + 1);
            let (n1, s1) = weighted(t + 1..LEVELS);
            let w0 = n0 as f64 / total;
            let w1 = 1.0 - w0;
            let mu0 = s0 as f64 / (n0 as f64 + EPSILON);
            let mu1 = s1 as f64 / (n1 as f64 + EPSILON);
            let variance = w0 * w1 * (mu0 - mu1) * (mu0 - mu1);
            if variance > best.1 {
                best = (t as u8, variance);
            }
        }
        best.0
    }

    #[test]
    fn step_image_is_split_at_the_edge() {
        let image = create_step_image(20, 20, 10, 200);
        let level = image.global_variance_level();
        assert!((10..200).contains(&level), "level {level}");

        let binary = image.binarize_global_variance();
        for (x, _, pixel) in binary.enumerate_pixels() {
            let expected = if x < 10 { 0 } else { 255 };
            assert_eq!(pixel[0], expected);
        }
    }

    #[test]
    fn first_maximum_wins() {
        // Every split between the two populated levels scores the same
        let image = create_step_image(20, 20, 10, 200);
        assert_eq!(image.global_variance_level(), 10);
    }

    #[test]
    fn running_sums_match_exhaustive_recompute() {
        for seed in 0..8 {
            let image = create_noise_image(31, 17, seed);
            let histogram = Histogram::from_image(&image);
            assert_eq!(
                between_class_variance_level(&histogram),
                exhaustive_level(&histogram),
                "seed {seed}"
            );
        }
    }

    #[test]
    fn uniform_image_selects_zero() {
        let image = create_uniform_image(10, 10, 128);
        assert_eq!(image.global_variance_level(), 0);
        assert!(image
            .binarize_global_variance()
            .pixels()
            .all(|p| p[0] == 255));

        let black = create_uniform_image(10, 10, 0);
        assert!(black.binarize_global_variance().pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn output_is_binary_everywhere() {
        let image = create_noise_image(40, 30, 21);
        assert!(is_binary(&image.binarize_global_variance()));
        assert!(is_binary(&image.binarize_otsu()));
    }

    #[test]
    fn binary_input_is_reproduced() {
        let image = create_step_image(16, 16, 0, 255);
        assert_eq!(image.binarize_global_variance(), image);
    }

    #[test]
    fn apply_global_threshold_is_strict() {
        let image: Image<Luma<u8>> = Image::from_raw(3, 1, vec![99, 100, 101]).unwrap();
        let binary = apply_global_threshold(&image, 100);
        assert_eq!(binary.as_raw(), &vec![0, 0, 255]);
    }

    #[test]
    fn otsu_splits_step_image() {
        let image = create_step_image(20, 20, 10, 200);
        let binary = image.binarize_otsu();
        assert_eq!(binary.get_pixel(0, 0), &Luma([0]));
        assert_eq!(binary.get_pixel(19, 19), &Luma([255]));
    }
}
