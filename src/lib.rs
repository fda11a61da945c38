mod error;
mod imageops_binarize;
#[cfg(test)]
mod test_utils;
mod utils;

use image::{ImageBuffer, Pixel};

pub use error::Error;
pub use imageops_binarize::global_threshold::{
    apply_global_threshold, between_class_variance_level, GlobalVarianceThreshold,
};
pub use imageops_binarize::histogram::Histogram;
pub use imageops_binarize::local_contrast::{ContrastParams, LocalContrastBinarize};
pub use imageops_binarize::local_statistical::{LocalStatisticalBinarize, StatisticalParams};
pub use imageops_binarize::remap::IntensityRemap;
pub use imageops_binarize::summed_area_table::{CreateSummedAreaTable, SummedAreaTable};
pub use imageops_binarize::transform::{transform_image, Transform};
pub use imageops_binarize::window_statistics::{
    interior_bounds, window_mean_std, window_min_max, InteriorBounds, MeanStd, MinMax,
    MinMaxPlanes, MomentTables, Window,
};

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;
