use std::str::FromStr;

use convkit_image::Image;

use super::FilterError;

/// Resolves neighborhood reads that fall outside the image.
///
/// The engines call [`BoundaryPolicy::sample`] only for coordinates outside
/// `[0, rows) x [0, cols)`; in-bounds reads go straight to the image. A policy is a pure
/// function of the image and the coordinate and must not keep mutable state.
///
/// Returning `None` means the policy cannot produce a value for the coordinate. The engines
/// report that as [`FilterError::OutOfRange`]; every [`BorderMode`] is total over non-empty
/// images.
///
/// # Examples
///
/// A custom policy that wraps rows upside down and gives up on out-of-bounds columns:
///
/// ```
/// use convkit_image::Image;
/// use convkit_imgproc::filter::BoundaryPolicy;
///
/// struct FlippedRows;
///
/// impl BoundaryPolicy for FlippedRows {
///     fn sample<const C: usize>(
///         &self,
///         src: &Image<f32, C>,
///         row: isize,
///         col: isize,
///     ) -> Option<[f32; C]> {
///         let row = row.rem_euclid(src.rows() as isize) as usize;
///         let col = usize::try_from(col).ok()?;
///         src.get_pixel(src.rows() - 1 - row, col).ok()
///     }
/// }
/// ```
pub trait BoundaryPolicy: Sync {
    /// The sample at `(row, col)`, which lies outside `src`.
    fn sample<const C: usize>(&self, src: &Image<f32, C>, row: isize, col: isize)
        -> Option<[f32; C]>;
}

impl<P: BoundaryPolicy> BoundaryPolicy for &P {
    fn sample<const C: usize>(
        &self,
        src: &Image<f32, C>,
        row: isize,
        col: isize,
    ) -> Option<[f32; C]> {
        (**self).sample(src, row, col)
    }
}

/// The built-in boundary policies.
///
/// Each example shows what a row `a b c d` reads past its right end.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BorderMode {
    /// Out-of-bounds samples are zero.
    ///
    /// Example: `a b c d | 0 0 0`
    Zero,

    /// Out-of-bounds samples take a fixed value.
    ///
    /// Example: `a b c d | v v v`
    Constant(f32),

    /// The nearest edge sample is repeated. Row and column are clamped independently to
    /// `[0, rows - 1]` and `[0, cols - 1]`.
    ///
    /// Example: `a b c d | d d d`
    ///
    /// This is the default policy, as for the default [`Engine::Accelerated`](super::Engine).
    #[default]
    Replicate,

    /// Mirror including the edge sample.
    ///
    /// Example: `a b c d | d c b`
    Reflect,

    /// Mirror excluding the edge sample.
    ///
    /// Example: `a b c d | c b a`
    Reflect101,

    /// Wrap around to the opposite side.
    ///
    /// Example: `a b c d | a b c`
    Wrap,
}

impl BorderMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    /// Maps index `i` to a valid index in `[0, len)`.
    ///
    /// Returns `None` for [`BorderMode::Zero`] and [`BorderMode::Constant`], which do not read
    /// from the image, and for an empty dimension.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        match self {
            BorderMode::Zero | BorderMode::Constant(_) => None,
            BorderMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            BorderMode::Reflect => Some(Self::reflect(i, len)),
            BorderMode::Reflect101 => Some(Self::reflect101(i, len)),
            BorderMode::Wrap => Some(i.rem_euclid(len as isize) as usize),
        }
    }
}

impl BoundaryPolicy for BorderMode {
    fn sample<const C: usize>(
        &self,
        src: &Image<f32, C>,
        row: isize,
        col: isize,
    ) -> Option<[f32; C]> {
        match self {
            BorderMode::Zero => Some([0.0; C]),
            BorderMode::Constant(v) => Some([*v; C]),
            _ => {
                let row = self.map_index(row, src.rows())?;
                let col = self.map_index(col, src.cols())?;
                Some(read_pixel(src, row, col))
            }
        }
    }
}

impl FromStr for BorderMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zero" => Ok(BorderMode::Zero),
            "replicate" => Ok(BorderMode::Replicate),
            "reflect" => Ok(BorderMode::Reflect),
            "reflect101" => Ok(BorderMode::Reflect101),
            "wrap" => Ok(BorderMode::Wrap),
            other => other
                .strip_prefix("constant:")
                .and_then(|v| v.parse::<f32>().ok())
                .map(BorderMode::Constant)
                .ok_or_else(|| {
                    FilterError::InvalidArgument(format!(
                        "unknown boundary {s:?}, expected zero, constant:<v>, replicate, reflect, reflect101 or wrap"
                    ))
                }),
        }
    }
}

/// Copy the in-bounds pixel at `(row, col)` into an array.
///
/// PRECONDITION: `row < rows` and `col < cols`.
#[inline]
pub(crate) fn read_pixel<const C: usize>(src: &Image<f32, C>, row: usize, col: usize) -> [f32; C] {
    let offset = (row * src.cols() + col) * C;
    let mut pixel = [0.0; C];
    pixel.copy_from_slice(&src.as_slice()[offset..offset + C]);
    pixel
}

/// Read the pixel at a possibly out-of-bounds coordinate.
#[inline]
pub(crate) fn sample_at<const C: usize, B: BoundaryPolicy>(
    src: &Image<f32, C>,
    row: isize,
    col: isize,
    boundary: &B,
) -> Result<[f32; C], FilterError> {
    if row >= 0 && col >= 0 && (row as usize) < src.rows() && (col as usize) < src.cols() {
        return Ok(read_pixel(src, row as usize, col as usize));
    }
    boundary
        .sample(src, row, col)
        .ok_or(FilterError::OutOfRange { row, col })
}
