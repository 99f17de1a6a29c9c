use convkit_image::{Image, ImageSize};

use crate::filter::{BoundaryPolicy, FilterError};
use crate::parallel::{self, ExecutionStrategy};

/// Represents 2D padding with top, bottom, left, and right values (in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding2D {
    /// Amount of padding to add on the top side.
    pub top: usize,
    /// Amount of padding to add on the bottom side.
    pub bottom: usize,
    /// Amount of padding to add on the left side.
    pub left: usize,
    /// Amount of padding to add on the right side.
    pub right: usize,
}

impl Padding2D {
    /// The same padding on the top/bottom (`rows`) and left/right (`cols`) sides.
    pub fn symmetric(rows: usize, cols: usize) -> Self {
        Self {
            top: rows,
            bottom: rows,
            left: cols,
            right: cols,
        }
    }

    /// The size of an image of `size` once padded.
    pub fn padded_size(&self, size: ImageSize) -> ImageSize {
        ImageSize {
            width: size.width + self.left + self.right,
            height: size.height + self.top + self.bottom,
        }
    }
}

/// Pad an image, filling the border through a boundary policy.
///
/// The interior of the result is a copy of `src`. Every border cell is produced by exactly one
/// call to `boundary` with the corresponding coordinate in `src` space, so the padded image holds
/// the same values a bounds-checked read through the same policy would see.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `padding` - The padding extents.
/// * `boundary` - The policy producing the border values.
/// * `strategy` - How the rows are spread over threads.
///
/// # Errors
///
/// Fails with [`FilterError::InvalidArgument`] for an empty image and with
/// [`FilterError::OutOfRange`] if the policy leaves a border cell unresolved.
///
/// # Examples
///
/// ```
/// use convkit_image::Image;
/// use convkit_imgproc::filter::BorderMode;
/// use convkit_imgproc::padding::{spatial_padding, Padding2D};
/// use convkit_imgproc::parallel::ExecutionStrategy;
///
/// let image = Image::<f32, 1>::new([2, 1].into(), vec![1.0, 2.0]).unwrap();
/// let padded = spatial_padding(
///     &image,
///     &Padding2D::symmetric(0, 1),
///     &BorderMode::Replicate,
///     ExecutionStrategy::Serial,
/// )
/// .unwrap();
///
/// assert_eq!(padded.as_slice(), &[1.0, 1.0, 2.0, 2.0]);
/// ```
pub fn spatial_padding<const C: usize, B: BoundaryPolicy>(
    src: &Image<f32, C>,
    padding: &Padding2D,
    boundary: &B,
    strategy: ExecutionStrategy,
) -> Result<Image<f32, C>, FilterError> {
    if src.rows() == 0 || src.cols() == 0 {
        return Err(FilterError::InvalidArgument(format!(
            "cannot pad an empty image of size {}",
            src.size()
        )));
    }

    let new_size = padding.padded_size(src.size());
    let row_stride = new_size.width * C;
    let src_stride = src.cols() * C;
    let mut data = vec![0.0f32; new_size.height * row_stride];

    let fill = |y: isize, x: isize, dst_px: &mut [f32]| -> Result<(), FilterError> {
        let px = boundary
            .sample(src, y, x)
            .ok_or(FilterError::OutOfRange { row: y, col: x })?;
        dst_px.copy_from_slice(&px);
        Ok(())
    };

    parallel::par_rows_mut(&mut data, row_stride, strategy, |y, dst_row| -> Result<(), FilterError> {
        let src_y = y as isize - padding.top as isize;

        if src_y < 0 || src_y as usize >= src.rows() {
            for (x, dst_px) in dst_row.chunks_exact_mut(C).enumerate() {
                fill(src_y, x as isize - padding.left as isize, dst_px)?;
            }
            return Ok(());
        }

        // interior
        let src_y = src_y as usize;
        let src_row = &src.as_slice()[src_y * src_stride..(src_y + 1) * src_stride];
        let (left, rest) = dst_row.split_at_mut(padding.left * C);
        let (center, right) = rest.split_at_mut(src_stride);
        center.copy_from_slice(src_row);

        for (x, dst_px) in left.chunks_exact_mut(C).enumerate() {
            fill(src_y as isize, x as isize - padding.left as isize, dst_px)?;
        }
        for (x, dst_px) in right.chunks_exact_mut(C).enumerate() {
            fill(src_y as isize, (src.cols() + x) as isize, dst_px)?;
        }
        Ok(())
    })?;

    log::debug!("padded {} to {} ({:?})", src.size(), new_size, padding);

    Ok(Image::new(new_size, data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::BorderMode;

    fn image_2x2() -> Result<Image<f32, 1>, FilterError> {
        Ok(Image::new([2, 2].into(), vec![1.0, 2.0, 3.0, 4.0])?)
    }

    #[test]
    fn test_padding_zero() -> Result<(), FilterError> {
        let padded = spatial_padding(
            &image_2x2()?,
            &Padding2D::symmetric(1, 1),
            &BorderMode::Zero,
            ExecutionStrategy::Serial,
        )?;
        assert_eq!(padded.size(), ImageSize::from([4, 4]));
        #[rustfmt::skip]
        assert_eq!(
            padded.as_slice(),
            &[
                0.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 2.0, 0.0,
                0.0, 3.0, 4.0, 0.0,
                0.0, 0.0, 0.0, 0.0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_padding_replicate_asymmetric() -> Result<(), FilterError> {
        let padding = Padding2D {
            top: 1,
            bottom: 0,
            left: 0,
            right: 2,
        };
        let padded = spatial_padding(
            &image_2x2()?,
            &padding,
            &BorderMode::Replicate,
            ExecutionStrategy::ParallelRows,
        )?;
        assert_eq!(padded.size(), ImageSize::from([4, 3]));
        #[rustfmt::skip]
        assert_eq!(
            padded.as_slice(),
            &[
                1.0, 2.0, 2.0, 2.0,
                1.0, 2.0, 2.0, 2.0,
                3.0, 4.0, 4.0, 4.0,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_padding_wrap_rgb() -> Result<(), FilterError> {
        let image = Image::<f32, 3>::new([2, 1].into(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])?;
        let padded = spatial_padding(
            &image,
            &Padding2D::symmetric(0, 1),
            &BorderMode::Wrap,
            ExecutionStrategy::Serial,
        )?;
        assert_eq!(
            padded.as_slice(),
            &[4.0, 5.0, 6.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 1.0, 2.0, 3.0]
        );
        Ok(())
    }

    #[test]
    fn test_padding_empty_image() -> Result<(), FilterError> {
        let image = Image::<f32, 1>::new([0, 3].into(), vec![])?;
        let res = spatial_padding(
            &image,
            &Padding2D::symmetric(1, 1),
            &BorderMode::Zero,
            ExecutionStrategy::Serial,
        );
        assert!(matches!(res, Err(FilterError::InvalidArgument(_))));
        Ok(())
    }
}
