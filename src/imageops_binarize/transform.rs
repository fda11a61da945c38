use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::Error;
use crate::imageops_binarize::global_threshold::GlobalVarianceThreshold;
use crate::imageops_binarize::local_contrast::{ContrastParams, LocalContrastBinarize};
use crate::imageops_binarize::local_statistical::{LocalStatisticalBinarize, StatisticalParams};
use crate::imageops_binarize::remap::IntensityRemap;
use crate::Image;
use image::Luma;

/// A gray-image transform together with its parameters
///
/// Batch drivers that fan one input out to several transforms keep a list of
/// these and call [`Transform::apply`] for each entry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Transform {
    /// Local spread test, see [`LocalContrastBinarize`]
    LocalContrast(ContrastParams),
    /// Local mean/std test, see [`LocalStatisticalBinarize`]
    LocalStatistical(StatisticalParams),
    /// Histogram between-class variance threshold
    GlobalVariance,
    /// Otsu threshold computed by `imageproc`
    Otsu,
    /// Logarithmic compression
    LogCompress,
    /// Linear min-max stretch
    LinearStretch,
}

impl Transform {
    /// The default fan-out of a batch run: both local binarizers, both
    /// remaps and the global variance threshold, with default parameters.
    pub fn batch_defaults() -> Vec<Self> {
        vec![
            Self::LocalContrast(ContrastParams::default()),
            Self::LocalStatistical(StatisticalParams::default()),
            Self::LogCompress,
            Self::LinearStretch,
            Self::GlobalVariance,
        ]
    }

    /// Stable identifier, suitable as an output directory name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LocalContrast(_) => "local_contrast",
            Self::LocalStatistical(_) => "local_statistical",
            Self::GlobalVariance => "global_variance",
            Self::Otsu => "otsu",
            Self::LogCompress => "log_compress",
            Self::LinearStretch => "linear_stretch",
        }
    }

    /// Whether every output pixel outside the copied border is 0 or 255.
    pub const fn is_binarizer(&self) -> bool {
        !matches!(self, Self::LogCompress | Self::LinearStretch)
    }

    /// Runs the transform on `image`, producing a new image of the same size
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - A local binarizer parameter is not finite
    /// * `Error::ImageBufferCreationFailed` - The result buffer could not be built
    pub fn apply(&self, image: &Image<Luma<u8>>) -> Result<Image<Luma<u8>>, Error> {
        debug!(
            "applying {} to {}x{} image",
            self.name(),
            image.width(),
            image.height()
        );

        match self {
            Self::LocalContrast(params) => image.binarize_local_contrast(params),
            Self::LocalStatistical(params) => image.binarize_local_statistical(params),
            Self::GlobalVariance => Ok(image.binarize_global_variance()),
            Self::Otsu => Ok(image.binarize_otsu()),
            Self::LogCompress => Ok(image.log_compress()),
            Self::LinearStretch => Ok(image.linear_stretch()),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transform {
    type Err = Error;

    /// Parses a [`Transform::name`] into the default parameterisation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local_contrast" => Ok(Self::LocalContrast(ContrastParams::default())),
            "local_statistical" => Ok(Self::LocalStatistical(StatisticalParams::default())),
            "global_variance" => Ok(Self::GlobalVariance),
            "otsu" => Ok(Self::Otsu),
            "log_compress" => Ok(Self::LogCompress),
            "linear_stretch" => Ok(Self::LinearStretch),
            other => Err(Error::UnknownTransform(other.to_owned())),
        }
    }
}

/// Applies `transform` to a possibly absent input
///
/// This is the boundary a batch driver calls after decoding an image. A
/// missing input fails with `Error::MissingInput` before any work is done.
///
/// # Examples
///
/// ```
/// use imageops_binarize::{transform_image, Error, Image, Transform};
/// use image::Luma;
///
/// let image: Image<Luma<u8>> = Image::from_pixel(8, 8, Luma([40]));
/// let stretched = transform_image(Some(&image), &Transform::LinearStretch).unwrap();
/// assert_eq!(stretched.dimensions(), (8, 8));
///
/// assert_eq!(
///     transform_image(None, &Transform::Otsu),
///     Err(Error::MissingInput)
/// );
/// ```
pub fn transform_image(
    input: Option<&Image<Luma<u8>>>,
    transform: &Transform,
) -> Result<Image<Luma<u8>>, Error> {
    let image = input.ok_or(Error::MissingInput)?;
    transform.apply(image)
}
