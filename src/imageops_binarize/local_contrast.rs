use log::debug;

use crate::error::Error;
use crate::imageops_binarize::window_statistics::MinMaxPlanes;
use crate::utils::{for_each_row, validate_finite, BACKGROUND, FOREGROUND};
use crate::Image;
use image::Luma;

/// Parameters of the local contrast (spread) test
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContrastParams {
    /// Half-range at or below which a window counts as flat background
    pub sensitivity: f64,
    /// Window size; the window spans `window_size / 2` pixels on each side
    pub window_size: u32,
}

impl Default for ContrastParams {
    fn default() -> Self {
        Self {
            sensitivity: 15.0,
            window_size: 15,
        }
    }
}

impl ContrastParams {
    #[must_use]
    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    #[must_use]
    pub fn with_window_size(mut self, window_size: u32) -> Self {
        self.window_size = window_size;
        self
    }

    /// Rejects a non-finite sensitivity.
    pub fn validate(&self) -> Result<(), Error> {
        validate_finite("sensitivity", self.sensitivity)
    }
}

/// Binarization by local contrast
///
/// Every interior pixel is classified from the spread of its window:
/// when `(max - min) / 2 <= sensitivity` the neighbourhood is considered flat
/// and the pixel becomes background (0), otherwise foreground (255). Pixels
/// closer than `window_size / 2` to any edge keep their input value.
pub trait LocalContrastBinarize {
    /// Applies the spread test with the given parameters
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - The sensitivity is NaN or infinite
    /// * `Error::ImageBufferCreationFailed` - The result buffer could not be built
    ///
    /// # Examples
    ///
    /// ```
    /// use imageops_binarize::{ContrastParams, Image, LocalContrastBinarize};
    /// use image::Luma;
    ///
    /// # fn example() -> Result<(), imageops_binarize::Error> {
    /// let image: Image<Luma<u8>> = Image::from_pixel(32, 32, Luma([90]));
    /// let binary = image.binarize_local_contrast(&ContrastParams::default())?;
    ///
    /// // Flat interior is background, the border is copied
    /// assert_eq!(binary.get_pixel(16, 16), &Luma([0]));
    /// assert_eq!(binary.get_pixel(0, 0), &Luma([90]));
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    fn binarize_local_contrast(&self, params: &ContrastParams)
        -> Result<Image<Luma<u8>>, Error>;
}

impl LocalContrastBinarize for Image<Luma<u8>> {
    fn binarize_local_contrast(
        &self,
        params: &ContrastParams,
    ) -> Result<Image<Luma<u8>>, Error> {
        params.validate()?;

        let (width, height) = self.dimensions();
        let Some(planes) = MinMaxPlanes::new(self, params.window_size) else {
            debug!(
                "window size {} leaves no interior in {width}x{height}, copying input",
                params.window_size
            );
            return Ok(self.clone());
        };

        let bounds = planes.bounds();
        let columns = bounds.columns.start as usize..bounds.columns.end as usize;
        let rows = bounds.rows.start as usize..bounds.rows.end as usize;
        let sensitivity = params.sensitivity;

        let mut output = self.as_raw().clone();
        for_each_row(&mut output, width as usize, rows, |y, row| {
            for x in columns.clone() {
                row[x] = if planes.get(x as u32, y as u32).half_spread() <= sensitivity {
                    BACKGROUND
                } else {
                    FOREGROUND
                };
            }
        });

        Image::from_raw(width, height, output).ok_or(Error::ImageBufferCreationFailed)
    }
}
