use log::debug;

use crate::error::Error;
use crate::imageops_binarize::window_statistics::MomentTables;
use crate::utils::{for_each_row, validate_finite, BACKGROUND, FOREGROUND};
use crate::Image;
use image::Luma;

/// Parameters of the local statistical test
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatisticalParams {
    /// Window size; the window spans `window_size / 2` pixels on each side
    pub window_size: u32,
    /// Standard deviation weight added to the local mean
    pub k: f64,
}

impl Default for StatisticalParams {
    fn default() -> Self {
        Self {
            window_size: 15,
            k: -0.2,
        }
    }
}

impl StatisticalParams {
    #[must_use]
    pub fn with_window_size(mut self, window_size: u32) -> Self {
        self.window_size = window_size;
        self
    }

    #[must_use]
    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    /// Rejects a non-finite `k`.
    pub fn validate(&self) -> Result<(), Error> {
        validate_finite("k", self.k)
    }
}

/// Binarization by local mean and standard deviation
///
/// Every interior pixel is compared with the cutoff `mean + k * std_dev` of
/// its window (population standard deviation). Pixels at or below the cutoff
/// become background (0), the rest foreground (255). Pixels closer than
/// `window_size / 2` to any edge keep their input value.
pub trait LocalStatisticalBinarize {
    /// Applies the statistical test with the given parameters
    ///
    /// # Errors
    ///
    /// * `Error::InvalidParameter` - `k` is NaN or infinite
    /// * `Error::ImageBufferCreationFailed` - The result buffer could not be built
    ///
    /// # Examples
    ///
    /// ```
    /// use imageops_binarize::{Image, LocalStatisticalBinarize, StatisticalParams};
    /// use image::Luma;
    ///
    /// # fn example() -> Result<(), imageops_binarize::Error> {
    /// let image: Image<Luma<u8>> = Image::from_fn(40, 40, |x, y| Luma([((x * y) % 256) as u8]));
    /// let binary = image.binarize_local_statistical(&StatisticalParams::default())?;
    /// assert_eq!(binary.dimensions(), (40, 40));
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    fn binarize_local_statistical(
        &self,
        params: &StatisticalParams,
    ) -> Result<Image<Luma<u8>>, Error>;
}

impl LocalStatisticalBinarize for Image<Luma<u8>> {
    fn binarize_local_statistical(
        &self,
        params: &StatisticalParams,
    ) -> Result<Image<Luma<u8>>, Error> {
        params.validate()?;

        let (width, height) = self.dimensions();
        let Some(tables) = MomentTables::new(self, params.window_size) else {
            debug!(
                "window size {} leaves no interior in {width}x{height}, copying input",
                params.window_size
            );
            return Ok(self.clone());
        };

        let bounds = tables.bounds();
        let columns = bounds.columns.start as usize..bounds.columns.end as usize;
        let rows = bounds.rows.start as usize..bounds.rows.end as usize;
        let k = params.k;
        let source = self.as_raw();
        let w = width as usize;

        let mut output = source.clone();
        for_each_row(&mut output, w, rows, |y, row| {
            for x in columns.clone() {
                let stats = tables.get(x as u32, y as u32);
                let cutoff = stats.mean + k * stats.std_dev;
                row[x] = if f64::from(source[y * w + x]) <= cutoff {
                    BACKGROUND
                } else {
                    FOREGROUND
                };
            }
        });

        Image::from_raw(width, height, output).ok_or(Error::ImageBufferCreationFailed)
    }
}
