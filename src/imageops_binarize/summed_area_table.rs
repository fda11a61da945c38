use crate::Image;
use image::{Luma, Primitive};

/// Summed-area table over a single-channel image
///
/// Each entry holds the sum of every mapped sample in the rectangle spanned by
/// the origin and that position (inclusive), so any axis-aligned rectangle sum
/// costs four lookups regardless of its size.
pub struct SummedAreaTable<T> {
    data: Vec<T>,
    width: u32,
    height: u32,
}

/// Builds the integral tables the local statistical test needs
///
/// u8 samples are widened to `u64` so that neither the plain sums nor the sums
/// of squares can overflow for any image that fits in memory.
pub trait CreateSummedAreaTable {
    /// Table of plain sample sums
    ///
    /// # Examples
    ///
    /// ```
    /// use imageops_binarize::{CreateSummedAreaTable, Image};
    /// use image::Luma;
    ///
    /// let image: Image<Luma<u8>> = Image::from_raw(2, 2, vec![1, 2, 3, 4]).unwrap();
    /// let sat = image.create_summed_area_table();
    /// assert_eq!(sat.rectangle_sum(0, 0, 1, 1), 10);
    /// ```
    fn create_summed_area_table(&self) -> SummedAreaTable<u64>;

    /// Table of squared sample sums
    fn create_squared_summed_area_table(&self) -> SummedAreaTable<u64>;
}

impl CreateSummedAreaTable for Image<Luma<u8>> {
    fn create_summed_area_table(&self) -> SummedAreaTable<u64> {
        SummedAreaTable::from_image_with(self, u64::from)
    }

    fn create_squared_summed_area_table(&self) -> SummedAreaTable<u64> {
        SummedAreaTable::from_image_with(self, |v| {
            let v = u64::from(v);
            v * v
        })
    }
}

impl<T> SummedAreaTable<T>
where
    T: Primitive,
{
    /// Builds a table from a gray image, mapping every sample through `map`
    /// before accumulation.
    pub fn from_image_with<F>(image: &Image<Luma<u8>>, map: F) -> Self
    where
        F: Fn(u8) -> T,
    {
        let (width, height) = image.dimensions();
        let w = width as usize;
        let mut data = vec![T::zero(); w * height as usize];

        // sat(x, y) = row_sum(0..=x, y) + sat(x, y - 1)
        for (y, row) in image.as_raw().chunks_exact(w.max(1)).enumerate() {
            let mut row_sum = T::zero();
            for (x, &value) in row.iter().enumerate() {
                row_sum = row_sum + map(value);
                let index = y * w + x;
                data[index] = if y > 0 {
                    row_sum + data[index - w]
                } else {
                    row_sum
                };
            }
        }

        Self {
            data,
            width,
            height,
        }
    }

    /// Table value at `(x, y)`; zero for positions outside the image.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> T {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            T::zero()
        } else {
            self.data[y as usize * self.width as usize + x as usize]
        }
    }

    /// Sum over the inclusive rectangle `(x1, y1)..=(x2, y2)`
    ///
    /// The rectangle is clipped to the image. An empty rectangle sums to zero.
    ///
    /// ```text
    /// sum = sat(x2, y2) - sat(x1-1, y2) - sat(x2, y1-1) + sat(x1-1, y1-1)
    /// ```
    #[must_use]
    pub fn rectangle_sum(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> T {
        let x1 = x1.max(0);
        let y1 = y1.max(0);
        let x2 = x2.min(self.width as i32 - 1);
        let y2 = y2.min(self.height as i32 - 1);

        if x1 > x2 || y1 > y2 {
            return T::zero();
        }

        let bottom_right = self.get(x2, y2);
        let top_right = self.get(x2, y1 - 1);
        let bottom_left = self.get(x1 - 1, y2);
        let top_left = self.get(x1 - 1, y1 - 1);

        // Added before subtracting so unsigned tables never underflow.
        bottom_right + top_left - top_right - bottom_left
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }
}
