//! Square-window statistics over gray images.
//!
//! Two flavours are provided. [`window_min_max`] and [`window_mean_std`] scan
//! a single window sample by sample. [`MinMaxPlanes`] and [`MomentTables`]
//! answer the same questions for every interior pixel of an image and are what
//! the local binarizers use; their results are bit-identical to the
//! per-window scans.

use std::ops::Range;

use itertools::iproduct;
use log::trace;

use crate::imageops_binarize::summed_area_table::{CreateSummedAreaTable, SummedAreaTable};
use crate::utils::for_each_row;
use crate::Image;
use image::Luma;

/// Square neighbourhood centred on a pixel
///
/// The window covers `half_radius = radius / 2` pixels on each side of the
/// centre, so a radius of 15 gives a 15x15 window and a radius of 16 gives a
/// 17x17 window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Centre column
    pub x: u32,
    /// Centre row
    pub y: u32,
    /// Nominal window size
    pub radius: u32,
}

impl Window {
    pub const fn new(x: u32, y: u32, radius: u32) -> Self {
        Self { x, y, radius }
    }

    /// Number of pixels covered on each side of the centre.
    pub const fn half_radius(&self) -> u32 {
        self.radius / 2
    }

    /// Side length of the covered square, `2 * half_radius + 1`.
    pub const fn side(&self) -> u32 {
        2 * self.half_radius() + 1
    }

    /// Number of samples in the window.
    pub const fn area(&self) -> u64 {
        let side = self.side() as u64;
        side * side
    }

    /// Whether the whole window lies inside a `width` x `height` image.
    pub const fn is_interior(&self, width: u32, height: u32) -> bool {
        let h = self.half_radius();
        self.x >= h
            && self.y >= h
            && (self.x as u64) + (h as u64) < width as u64
            && (self.y as u64) + (h as u64) < height as u64
    }
}

/// Minimum and maximum of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MinMax {
    pub min: u8,
    pub max: u8,
}

impl MinMax {
    /// Half of the max-minus-min range.
    pub fn half_spread(&self) -> f64 {
        f64::from(self.max - self.min) / 2.0
    }
}

/// Mean and population standard deviation of a window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeanStd {
    pub mean: f64,
    pub std_dev: f64,
}

/// Pixel ranges whose windows fit entirely inside the image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteriorBounds {
    pub columns: Range<u32>,
    pub rows: Range<u32>,
}

/// Interior of a `width` x `height` image for windows of the given size
///
/// Returns `None` when no pixel has a fully contained window, which includes
/// zero-sized images.
pub fn interior_bounds(width: u32, height: u32, radius: u32) -> Option<InteriorBounds> {
    let h = radius / 2;
    let columns = h..width.saturating_sub(h);
    let rows = h..height.saturating_sub(h);

    if columns.is_empty() || rows.is_empty() {
        None
    } else {
        Some(InteriorBounds { columns, rows })
    }
}

/// Minimum and maximum of the samples inside `window`
///
/// # Panics
///
/// The window must lie inside the image; no bounds clipping is performed.
pub fn window_min_max(image: &Image<Luma<u8>>, window: &Window) -> MinMax {
    let h = window.half_radius();
    let mut result = MinMax {
        min: u8::MAX,
        max: u8::MIN,
    };

    for (y, x) in iproduct!(window.y - h..=window.y + h, window.x - h..=window.x + h) {
        let Luma([value]) = *image.get_pixel(x, y);
        result.min = result.min.min(value);
        result.max = result.max.max(value);
    }

    result
}

/// Mean and population standard deviation of the samples inside `window`
///
/// Sums and squared sums are accumulated as integers and reduced by the same
/// routine [`MomentTables::get`] uses, so both agree bit for bit.
///
/// # Panics
///
/// The window must lie inside the image; no bounds clipping is performed.
pub fn window_mean_std(image: &Image<Luma<u8>>, window: &Window) -> MeanStd {
    let h = window.half_radius();
    let (sum, squared) = iproduct!(window.y - h..=window.y + h, window.x - h..=window.x + h)
        .map(|(y, x)| u64::from(image.get_pixel(x, y)[0]))
        .fold((0u64, 0u64), |(s, q), v| (s + v, q + v * v));

    moments_from_sums(window.area(), sum, squared)
}

/// Population mean and standard deviation of `n` samples from their sum and
/// sum of squares.
///
/// The variance numerator `n * sum(v^2) - sum(v)^2` is evaluated in exact
/// integer arithmetic, so flat windows report a standard deviation of exactly
/// zero.
fn moments_from_sums(n: u64, sum: u64, squared: u64) -> MeanStd {
    let n = u128::from(n);
    let numerator = n * u128::from(squared) - u128::from(sum) * u128::from(sum);

    MeanStd {
        mean: sum as f64 / n as f64,
        std_dev: (numerator as f64 / (n * n) as f64).sqrt(),
    }
}

/// Window minimum and maximum for every interior pixel
///
/// Built with a separable two-pass scan: a horizontal min/max over each row,
/// followed by a vertical min/max over the horizontal results. Entries outside
/// the interior are left at their default and must not be read.
pub struct MinMaxPlanes {
    planes: Vec<MinMax>,
    width: u32,
    bounds: InteriorBounds,
}

impl MinMaxPlanes {
    /// Returns `None` when the image has no interior for this window size.
    pub fn new(image: &Image<Luma<u8>>, radius: u32) -> Option<Self> {
        let (width, height) = image.dimensions();
        let bounds = interior_bounds(width, height, radius)?;
        let h = (radius / 2) as usize;
        let w = width as usize;
        let columns = bounds.columns.start as usize..bounds.columns.end as usize;
        let raw = image.as_raw();

        trace!("building min/max planes {width}x{height} with half radius {h}");

        let mut horizontal = vec![MinMax::default(); w * height as usize];
        for_each_row(&mut horizontal, w, 0..height as usize, |y, out| {
            let row = &raw[y * w..(y + 1) * w];
            for x in columns.clone() {
                out[x] = row[x - h..=x + h]
                    .iter()
                    .fold(MinMax { min: u8::MAX, max: u8::MIN }, |acc, &v| MinMax {
                        min: acc.min.min(v),
                        max: acc.max.max(v),
                    });
            }
        });

        let rows = bounds.rows.start as usize..bounds.rows.end as usize;
        let mut planes = vec![MinMax::default(); w * height as usize];
        for_each_row(&mut planes, w, rows, |y, out| {
            for x in columns.clone() {
                out[x] = (y - h..=y + h)
                    .map(|yy| horizontal[yy * w + x])
                    .fold(MinMax { min: u8::MAX, max: u8::MIN }, |acc, v| MinMax {
                        min: acc.min.min(v.min),
                        max: acc.max.max(v.max),
                    });
            }
        });

        Some(Self {
            planes,
            width,
            bounds,
        })
    }

    /// Window statistics centred on interior pixel `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> MinMax {
        self.planes[y as usize * self.width as usize + x as usize]
    }

    pub fn bounds(&self) -> &InteriorBounds {
        &self.bounds
    }
}

/// Integral tables of sums and squared sums for window moments
pub struct MomentTables {
    sum: SummedAreaTable<u64>,
    squared: SummedAreaTable<u64>,
    half_radius: u32,
    bounds: InteriorBounds,
}

impl MomentTables {
    /// Returns `None` when the image has no interior for this window size.
    pub fn new(image: &Image<Luma<u8>>, radius: u32) -> Option<Self> {
        let (width, height) = image.dimensions();
        let bounds = interior_bounds(width, height, radius)?;

        trace!("building moment tables {width}x{height} with radius {radius}");

        Some(Self {
            sum: image.create_summed_area_table(),
            squared: image.create_squared_summed_area_table(),
            half_radius: radius / 2,
            bounds,
        })
    }

    /// Mean and population standard deviation of the window centred on
    /// interior pixel `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> MeanStd {
        let h = self.half_radius as i32;
        let (xi, yi) = (x as i32, y as i32);
        let s = self.sum.rectangle_sum(xi - h, yi - h, xi + h, yi + h);
        let q = self.squared.rectangle_sum(xi - h, yi - h, xi + h, yi + h);

        moments_from_sums(Window::new(x, y, 2 * self.half_radius).area(), s, q)
    }

    pub fn bounds(&self) -> &InteriorBounds {
        &self.bounds
    }
}
