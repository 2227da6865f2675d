//! Canvas traits and the adapters that feed the encoder.
//!
//! The encoder only ever needs three things from an image: its width, its
//! height and a palette index per pixel. [`IndexedCanvas`] captures that
//! contract. Scalar rasters (intensities, measurements) implement
//! [`ScalarImage`] instead and reach the encoder through [`Rescale`].
//!
//! The x index rasters from left to right and y from top to bottom.

use std::ops::{Index, IndexMut};

use crate::error::GraphicsError;

/// Pixel dimensions shared by every canvas type.
pub trait Dimensions {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
}

/// A 2-D grid of palette indices.
pub trait IndexedCanvas: Dimensions {
    /// Palette index at `(x, y)`, for `x < width()` and `y < height()`.
    fn index_at(&self, x: usize, y: usize) -> usize;
}

/// A 2-D grid of scalar intensities.
pub trait ScalarImage: Dimensions {
    fn value_at(&self, x: usize, y: usize) -> f64;
}

impl<T: Dimensions + ?Sized> Dimensions for &T {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }
}

impl<T: IndexedCanvas + ?Sized> IndexedCanvas for &T {
    fn index_at(&self, x: usize, y: usize) -> usize {
        (**self).index_at(x, y)
    }
}

impl<T: ScalarImage + ?Sized> ScalarImage for &T {
    fn value_at(&self, x: usize, y: usize) -> f64 {
        (**self).value_at(x, y)
    }
}

/// Owned row-major pixel buffer.
///
/// `Image<u8>` doubles as an indexed canvas (values are palette indices)
/// and as a scalar image (values are intensities).
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Clone + Default> Image<T> {
    /// Allocate a `width × height` image filled with `T::default()`.
    ///
    /// # Panics
    ///
    /// Panics if `width × height` overflows `usize`. Use
    /// [`Image::from_vec`] to get an error instead.
    pub fn new(width: usize, height: usize) -> Self {
        let Some(len) = width.checked_mul(height) else {
            panic!("image dimensions {width}x{height} overflow usize");
        };
        Self {
            data: vec![T::default(); len],
            width,
            height,
        }
    }

    /// Reset every pixel to `T::default()`.
    pub fn clear(&mut self) {
        self.fill(T::default());
    }
}

impl<T: Clone> Image<T> {
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Image<T> {
    /// Wrap an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, GraphicsError> {
        let expected = width
            .checked_mul(height)
            .ok_or(GraphicsError::DimensionOverflow { width, height })?;
        if data.len() != expected {
            return Err(GraphicsError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.data.get(x + self.width * y)
        } else {
            None
        }
    }

    /// Store `value` at `(x, y)`; writes outside the image are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        if x < self.width && y < self.height {
            self.data[x + self.width * y] = value;
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> Index<(usize, usize)> for Image<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) out of bounds");
        &self.data[x + self.width * y]
    }
}

impl<T> IndexMut<(usize, usize)> for Image<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        assert!(x < self.width && y < self.height, "pixel ({x},{y}) out of bounds");
        &mut self.data[x + self.width * y]
    }
}

impl<T> Dimensions for Image<T> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }
}

impl<T: Copy + Into<usize>> IndexedCanvas for Image<T> {
    fn index_at(&self, x: usize, y: usize) -> usize {
        self[(x, y)].into()
    }
}

impl<T: Copy + Into<f64>> ScalarImage for Image<T> {
    fn value_at(&self, x: usize, y: usize) -> f64 {
        self[(x, y)].into()
    }
}

/// Maps scalar intensities in `[min, max]` onto palette indices.
///
/// Values at or below `min` land on index 0, values at or above `max` on
/// the last palette entry; everything in between is rounded to the nearest
/// index.
#[derive(Debug, Clone)]
pub struct Rescale<S> {
    image: S,
    min: f64,
    max: f64,
    cmap_size: usize,
}

impl<S: ScalarImage> Rescale<S> {
    pub fn new(image: S, min: f64, max: f64, cmap_size: usize) -> Result<Self, GraphicsError> {
        if cmap_size == 0 {
            return Err(GraphicsError::EmptyColourMap);
        }
        Ok(Self {
            image,
            min,
            max,
            cmap_size,
        })
    }
}

impl<S: Dimensions> Dimensions for Rescale<S> {
    fn width(&self) -> usize {
        self.image.width()
    }

    fn height(&self) -> usize {
        self.image.height()
    }
}

impl<S: ScalarImage> IndexedCanvas for Rescale<S> {
    fn index_at(&self, x: usize, y: usize) -> usize {
        let size = self.cmap_size as f64;
        let rescaled = size * (self.image.value_at(x, y) - self.min) / (self.max - self.min);
        if rescaled.is_nan() {
            return 0;
        }
        rescaled.clamp(0.0, size - 1.0).round() as usize
    }
}

/// Nearest-neighbour magnification by an integer factor.
///
/// Each source pixel becomes a `factor × factor` block.
#[derive(Debug, Clone)]
pub struct Magnify<C> {
    inner: C,
    factor: usize,
}

impl<C: Dimensions> Magnify<C> {
    pub fn new(inner: C, factor: usize) -> Result<Self, GraphicsError> {
        if factor == 0 {
            return Err(GraphicsError::InvalidFactor(factor));
        }
        let (width, height) = (inner.width(), inner.height());
        if width.checked_mul(factor).is_none() || height.checked_mul(factor).is_none() {
            return Err(GraphicsError::DimensionOverflow {
                width: width.saturating_mul(factor),
                height: height.saturating_mul(factor),
            });
        }
        Ok(Self { inner, factor })
    }

    pub fn factor(&self) -> usize {
        self.factor
    }
}

impl<C: Dimensions> Dimensions for Magnify<C> {
    fn width(&self) -> usize {
        self.inner.width() * self.factor
    }

    fn height(&self) -> usize {
        self.inner.height() * self.factor
    }
}

impl<C: IndexedCanvas> IndexedCanvas for Magnify<C> {
    fn index_at(&self, x: usize, y: usize) -> usize {
        self.inner.index_at(x / self.factor, y / self.factor)
    }
}

impl<C: ScalarImage> ScalarImage for Magnify<C> {
    fn value_at(&self, x: usize, y: usize) -> f64 {
        self.inner.value_at(x / self.factor, y / self.factor)
    }
}

/// Swaps the x and y axes of the wrapped canvas.
#[derive(Debug, Clone)]
pub struct Transpose<C> {
    inner: C,
}

impl<C: Dimensions> Transpose<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<C: Dimensions> Dimensions for Transpose<C> {
    fn width(&self) -> usize {
        self.inner.height()
    }

    fn height(&self) -> usize {
        self.inner.width()
    }
}

impl<C: IndexedCanvas> IndexedCanvas for Transpose<C> {
    fn index_at(&self, x: usize, y: usize) -> usize {
        self.inner.index_at(y, x)
    }
}

impl<C: ScalarImage> ScalarImage for Transpose<C> {
    fn value_at(&self, x: usize, y: usize) -> f64 {
        self.inner.value_at(y, x)
    }
}

/// A rectangular window into the wrapped canvas.
#[derive(Debug, Clone)]
pub struct Crop<C> {
    inner: C,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl<C: Dimensions> Crop<C> {
    /// View the `width × height` region whose top-left corner is `(x, y)`.
    pub fn new(
        inner: C,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<Self, GraphicsError> {
        let fits_x = x.checked_add(width).is_some_and(|end| end <= inner.width());
        let fits_y = y.checked_add(height).is_some_and(|end| end <= inner.height());
        if !fits_x || !fits_y {
            return Err(GraphicsError::RegionOutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        Ok(Self {
            inner,
            x,
            y,
            width,
            height,
        })
    }
}

impl<C> Dimensions for Crop<C> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }
}

impl<C: IndexedCanvas> IndexedCanvas for Crop<C> {
    fn index_at(&self, x: usize, y: usize) -> usize {
        self.inner.index_at(self.x + x, self.y + y)
    }
}

impl<C: ScalarImage> ScalarImage for Crop<C> {
    fn value_at(&self, x: usize, y: usize) -> f64 {
        self.inner.value_at(self.x + x, self.y + y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3×2 indexed image with distinct values per pixel.
    fn sample() -> Image<u8> {
        Image::from_vec(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap()
    }

    #[test]
    fn image_is_row_major() {
        let image = sample();
        assert_eq!(image.index_at(0, 0), 0);
        assert_eq!(image.index_at(2, 0), 2);
        assert_eq!(image.index_at(0, 1), 3);
        assert_eq!(image[(1, 1)], 4);
    }

    #[test]
    fn image_set_and_clear() {
        let mut image: Image<u8> = Image::new(2, 2);
        image.set(1, 0, 7);
        image[(0, 1)] = 3;
        image.set(5, 5, 9); // ignored
        assert_eq!(image.as_slice(), &[0, 7, 3, 0]);
        image.clear();
        assert!(image.as_slice().iter().all(|&v| v == 0));
        assert_eq!(image.get(2, 0), None);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = Image::from_vec(2, 2, vec![0u8; 3]).unwrap_err();
        assert!(matches!(
            err,
            GraphicsError::BufferSize {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn from_vec_rejects_overflowing_dimensions() {
        let err = Image::<u8>::from_vec(usize::MAX, 2, vec![]).unwrap_err();
        assert!(matches!(
            err,
            GraphicsError::DimensionOverflow {
                width: usize::MAX,
                height: 2
            }
        ));

        let err = Image::<u8>::from_vec(1 << (usize::BITS - 1), 2, vec![]).unwrap_err();
        assert!(matches!(err, GraphicsError::DimensionOverflow { .. }));
    }

    #[test]
    #[should_panic(expected = "overflow")]
    fn new_panics_on_overflowing_dimensions() {
        let _ = Image::<u8>::new(usize::MAX, 2);
    }

    #[test]
    fn magnify_replicates_blocks() {
        let image = sample();
        let big = Magnify::new(&image, 3).unwrap();
        assert_eq!(big.width(), image.width() * 3);
        assert_eq!(big.height(), image.height() * 3);
        for y in 0..big.height() {
            for x in 0..big.width() {
                assert_eq!(big.index_at(x, y), image.index_at(x / 3, y / 3));
            }
        }
    }

    #[test]
    fn magnify_rejects_zero_factor() {
        let err = Magnify::new(sample(), 0).unwrap_err();
        assert!(matches!(err, GraphicsError::InvalidFactor(0)));
    }

    #[test]
    fn magnify_rejects_overflowing_factor() {
        let image = sample();
        let err = Magnify::new(&image, usize::MAX).unwrap_err();
        assert!(matches!(err, GraphicsError::DimensionOverflow { .. }));
    }

    #[test]
    fn magnify_factor_one_is_identity() {
        let image = sample();
        let same = Magnify::new(&image, 1).unwrap();
        assert_eq!(same.width(), 3);
        assert_eq!(same.index_at(2, 1), 5);
    }

    #[test]
    fn rescale_clamps_at_bounds() {
        let image = Image::from_vec(4, 1, vec![-5.0f32, 0.0, 10.0, 25.0]).unwrap();
        let rescaled = Rescale::new(&image, 0.0, 10.0, 8).unwrap();
        assert_eq!(rescaled.index_at(0, 0), 0);
        assert_eq!(rescaled.index_at(1, 0), 0);
        assert_eq!(rescaled.index_at(2, 0), 7);
        assert_eq!(rescaled.index_at(3, 0), 7);
    }

    #[test]
    fn rescale_is_monotonic() {
        let values: Vec<f64> = (0..=200).map(|v| v as f64 * 0.5 - 10.0).collect();
        let image = Image::from_vec(values.len(), 1, values).unwrap();
        let rescaled = Rescale::new(&image, 0.0, 80.0, 16).unwrap();
        let indices: Vec<usize> = (0..image.width()).map(|x| rescaled.index_at(x, 0)).collect();
        assert!(indices.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(indices.first(), Some(&0));
        assert_eq!(indices.last(), Some(&15));
    }

    #[test]
    fn rescale_with_flat_range_stays_in_palette() {
        let image = Image::from_vec(2, 1, vec![3u8, 4]).unwrap();
        let rescaled = Rescale::new(&image, 3.0, 3.0, 4).unwrap();
        assert_eq!(rescaled.index_at(0, 0), 0);
        assert_eq!(rescaled.index_at(1, 0), 3);
    }

    #[test]
    fn rescale_requires_a_palette() {
        let image = sample();
        assert!(matches!(
            Rescale::new(&image, 0.0, 1.0, 0),
            Err(GraphicsError::EmptyColourMap)
        ));
    }

    #[test]
    fn transpose_swaps_axes() {
        let image = sample();
        let t = Transpose::new(&image);
        assert_eq!((t.width(), t.height()), (2, 3));
        assert_eq!(t.index_at(1, 0), image.index_at(0, 1));
        assert_eq!(t.index_at(0, 2), image.index_at(2, 0));
    }

    #[test]
    fn crop_offsets_into_source() {
        let image = sample();
        let window = Crop::new(&image, 1, 1, 2, 1).unwrap();
        assert_eq!((window.width(), window.height()), (2, 1));
        assert_eq!(window.index_at(0, 0), 4);
        assert_eq!(window.index_at(1, 0), 5);
    }

    #[test]
    fn crop_rejects_region_past_edge() {
        let image = sample();
        assert!(matches!(
            Crop::new(&image, 2, 0, 2, 1),
            Err(GraphicsError::RegionOutOfBounds { .. })
        ));
        assert!(Crop::new(&image, usize::MAX, 0, 2, 1).is_err());
    }

    #[test]
    fn magnified_scalar_image_rescales() {
        let image = Image::from_vec(2, 1, vec![0u8, 255]).unwrap();
        let canvas = Rescale::new(Magnify::new(&image, 2).unwrap(), 0.0, 255.0, 2).unwrap();
        assert_eq!(canvas.width(), 4);
        assert_eq!(canvas.index_at(1, 1), 0);
        assert_eq!(canvas.index_at(2, 0), 1);
    }
}
