//! Main Band type

use crate::band::BandElement;
use crate::error::{Error, Result};
use ndarray::{s, Array2, ArrayView2, ArrayViewMut2};

/// A single-band 2D integer grid.
///
/// `Band<T>` stores the raw pixel values of one raster band in row-major
/// order, together with an optional declared no-data value. It is the input
/// side of the flag renderer: the host's raster engine resolves a pixel
/// window to a `Band` and hands it over for decoding.
///
/// # Type Parameters
///
/// - `T`: The cell value type, must implement [`BandElement`]
///
/// # Example
///
/// ```ignore
/// use flagrast_core::Band;
///
/// // Create a 256x256 band filled with zeros
/// let mut band: Band<u16> = Band::new(256, 256);
///
/// band.set(10, 20, 0b0101)?;
/// let value = band.get(10, 20)?;
/// ```
#[derive(Debug, Clone)]
pub struct Band<T: BandElement> {
    /// Pixel values stored in row-major order (row, col)
    data: Array2<T>,
    /// Declared no-data value, if any
    nodata: Option<T>,
}

impl<T: BandElement> Band<T> {
    /// Create a new band filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
            nodata: None,
        }
    }

    /// Create a new band filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
            nodata: None,
        }
    }

    /// Create a band from existing data in row-major order
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self {
            data: array,
            nodata: None,
        })
    }

    /// Create a band from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self { data, nodata: None }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the band is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Set value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn set_unchecked(&mut self, row: usize, col: usize, value: T) {
        unsafe {
            *self.data.uget_mut((row, col)) = value;
        }
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    /// Get a mutable view of the underlying data
    pub fn view_mut(&mut self) -> ArrayViewMut2<'_, T> {
        self.data.view_mut()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Get a mutable reference to the underlying array
    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    /// Consume the band and return the underlying array
    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    /// Zero-copy view of a rectangular window.
    ///
    /// `(row_offset, col_offset)` is the window's top-left cell; the window
    /// must lie entirely inside the band. This is the tile interface: a host
    /// tiling engine renders one window at a time.
    pub fn window(
        &self,
        row_offset: usize,
        col_offset: usize,
        rows: usize,
        cols: usize,
    ) -> Result<ArrayView2<'_, T>> {
        let (band_rows, band_cols) = self.shape();
        if row_offset + rows > band_rows || col_offset + cols > band_cols {
            return Err(Error::WindowOutOfBounds {
                row_offset,
                col_offset,
                rows,
                cols,
                band_rows,
                band_cols,
            });
        }
        Ok(self
            .data
            .slice(s![row_offset..row_offset + rows, col_offset..col_offset + cols]))
    }

    // No-data

    /// Get the declared no-data value
    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    /// Set the declared no-data value
    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Check if a value is no-data
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }
}
