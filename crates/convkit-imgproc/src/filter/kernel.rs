use serde::{Deserialize, Serialize};

use super::FilterError;

/// Offset of kernel index `k` relative to the output pixel, for a kernel dimension of `len`.
///
/// This is `ceil(k - len / 2)` evaluated on reals. For a 3 tap kernel the offsets are
/// `-1, 0, 1`; for a 4 tap kernel they are `-2, -1, 0, 1`, i.e. even kernels reach one
/// more sample before the center than after it.
///
/// # Examples
///
/// ```
/// use convkit_imgproc::filter::kernel_offset;
///
/// let offsets: Vec<isize> = (0..4).map(|k| kernel_offset(k, 4)).collect();
/// assert_eq!(offsets, vec![-2, -1, 0, 1]);
/// ```
#[inline]
pub const fn kernel_offset(k: usize, len: usize) -> isize {
    k as isize - (len / 2) as isize
}

/// A dense 2D grid of weights, stored row-major.
///
/// Both dimensions are at least one. The kernel is immutable once built; the derived
/// operations return new kernels.
///
/// A kernel serializes as a nested array of rows, e.g. `[[0, 1, 0], [1, -4, 1], [0, 1, 0]]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct Kernel {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl Kernel {
    /// Create a kernel from its dimensions and row-major weights.
    ///
    /// # Errors
    ///
    /// Fails with [`FilterError::InvalidArgument`] if a dimension is zero or the data
    /// length is not `rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, FilterError> {
        if rows == 0 || cols == 0 {
            return Err(FilterError::InvalidArgument(format!(
                "kernel dimensions must be non-zero, got {rows}x{cols}"
            )));
        }
        if data.len() != rows * cols {
            return Err(FilterError::InvalidArgument(format!(
                "kernel data length {} does not match {rows}x{cols}",
                data.len()
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a kernel whose shape the caller already guarantees.
    pub(super) fn from_parts(rows: usize, cols: usize, data: Vec<f32>) -> Self {
        debug_assert!(rows > 0 && cols > 0 && data.len() == rows * cols);
        Self { data, rows, cols }
    }

    /// Create a kernel from a slice of rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use convkit_imgproc::filter::Kernel;
    ///
    /// let kernel = Kernel::from_rows(&[&[1.0, 0.0, -1.0]]).unwrap();
    /// assert_eq!(kernel.rows(), 1);
    /// assert_eq!(kernel.cols(), 3);
    /// assert_eq!(kernel.at(0, 2), -1.0);
    /// ```
    pub fn from_rows(rows: &[&[f32]]) -> Result<Self, FilterError> {
        let cols = rows.first().map_or(0, |row| row.len());
        if let Some(ragged) = rows.iter().position(|row| row.len() != cols) {
            return Err(FilterError::InvalidArgument(format!(
                "kernel row {ragged} has {} weights, expected {cols}",
                rows[ragged].len()
            )));
        }
        Self::new(rows.len(), cols, rows.concat())
    }

    /// Create a kernel filled with a constant weight.
    pub fn from_val(rows: usize, cols: usize, val: f32) -> Result<Self, FilterError> {
        Self::new(rows, cols, vec![val; rows * cols])
    }

    /// Create an all-zero kernel.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, FilterError> {
        Self::from_val(rows, cols, 0.0)
    }

    /// Create a normalized box (mean) kernel.
    pub fn box_kernel(rows: usize, cols: usize) -> Result<Self, FilterError> {
        Self::from_val(rows, cols, 1.0 / (rows * cols).max(1) as f32)
    }

    /// The 1x1 kernel with weight one.
    pub fn identity() -> Self {
        Self::from_parts(1, 1, vec![1.0])
    }

    /// Number of kernel rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of kernel columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The weights in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Weight at row `r` and column `c`.
    ///
    /// PRECONDITION: `r < rows` and `c < cols`.
    #[inline]
    pub fn at(&self, r: usize, c: usize) -> f32 {
        self.data[r * self.cols + c]
    }

    /// The weights of kernel row `r`.
    ///
    /// PRECONDITION: `r < rows`.
    #[inline]
    pub fn row(&self, r: usize) -> &[f32] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Row offset of kernel row `kr`, see [`kernel_offset`].
    #[inline]
    pub fn row_offset(&self, kr: usize) -> isize {
        kernel_offset(kr, self.rows)
    }

    /// Column offset of kernel column `kc`, see [`kernel_offset`].
    #[inline]
    pub fn col_offset(&self, kc: usize) -> isize {
        kernel_offset(kc, self.cols)
    }

    /// Number of rows and columns the taps reach before the center, i.e. `(rows / 2, cols / 2)`.
    pub fn half_size(&self) -> (usize, usize) {
        (self.rows / 2, self.cols / 2)
    }

    /// The transposed kernel, e.g. turns a horizontal derivative into a vertical one.
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.cols {
            for r in 0..self.rows {
                data.push(self.at(r, c));
            }
        }
        Self {
            data,
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// The kernel with every weight multiplied by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            data: self.data.iter().map(|w| w * factor).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Sum of all the weights.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

impl TryFrom<Vec<Vec<f32>>> for Kernel {
    type Error = FilterError;

    fn try_from(rows: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        let rows = rows.iter().map(Vec::as_slice).collect::<Vec<_>>();
        Self::from_rows(&rows)
    }
}

impl From<Kernel> for Vec<Vec<f32>> {
    fn from(kernel: Kernel) -> Self {
        kernel.data.chunks(kernel.cols).map(<[f32]>::to_vec).collect()
    }
}
