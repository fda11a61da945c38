use itertools::{Itertools, MinMaxResult};
use imageproc::map::map_colors;
use log::debug;

use crate::imageops_binarize::histogram::LEVELS;
use crate::utils::round_to_u8;
use crate::Image;
use image::Luma;

/// Monotonic point transforms that stretch intensities onto `[0, 255]`
///
/// Both transforms derive their scale from the image's own extrema and then
/// remap each pixel independently. Results are rounded to the nearest
/// integer, ties to even.
pub trait IntensityRemap {
    /// Logarithmic compression, `255 * ln(1 + v) / ln(1 + max)`
    ///
    /// An all-black image has no dynamic range to scale by and is returned as
    /// all zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use imageops_binarize::{Image, IntensityRemap};
    /// use image::Luma;
    ///
    /// let image: Image<Luma<u8>> = Image::from_raw(3, 1, vec![0, 15, 63]).unwrap();
    /// let compressed = image.log_compress();
    /// assert_eq!(compressed.as_raw(), &vec![0, 170, 255]);
    /// ```
    fn log_compress(&self) -> Self;

    /// Linear min-max stretch, `255 * (v - min) / max(max - min, 1)`
    ///
    /// A uniform image maps to all zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use imageops_binarize::{Image, IntensityRemap};
    /// use image::Luma;
    ///
    /// let image: Image<Luma<u8>> = Image::from_raw(3, 1, vec![50, 75, 100]).unwrap();
    /// let stretched = image.linear_stretch();
    /// assert_eq!(stretched.as_raw(), &vec![0, 128, 255]);
    /// ```
    fn linear_stretch(&self) -> Self;
}

impl IntensityRemap for Image<Luma<u8>> {
    fn log_compress(&self) -> Self {
        let (MinMaxResult::MinMax(_, max) | MinMaxResult::OneElement(max)) = extrema(self) else {
            return self.clone();
        };

        if max == 0 {
            debug!("log compression of an all-black image, returning zeros");
            return apply_lut(self, &[0; LEVELS]);
        }

        let scale = 255.0 / f64::from(max).ln_1p();
        let lut = build_lut(|v| scale * f64::from(v).ln_1p());
        apply_lut(self, &lut)
    }

    fn linear_stretch(&self) -> Self {
        let (min, max) = match extrema(self) {
            MinMaxResult::MinMax(min, max) => (min, max),
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::NoElements => return self.clone(),
        };

        let range = f64::from((max - min).max(1));
        if max == min {
            debug!("linear stretch of a uniform image, returning zeros");
        }

        let lut = build_lut(|v| 255.0 * f64::from(v.saturating_sub(min)) / range);
        apply_lut(self, &lut)
    }
}

fn extrema(image: &Image<Luma<u8>>) -> MinMaxResult<u8> {
    image.as_raw().iter().copied().minmax()
}

fn build_lut<F>(f: F) -> [u8; LEVELS]
where
    F: Fn(u8) -> f64,
{
    let mut lut = [0u8; LEVELS];
    for (value, slot) in (0..=u8::MAX).zip(lut.iter_mut()) {
        *slot = round_to_u8(f(value));
    }
    lut
}

fn apply_lut(image: &Image<Luma<u8>>, lut: &[u8; LEVELS]) -> Image<Luma<u8>> {
    map_colors(image, |Luma([value])| Luma([lut[value as usize]]))
}
