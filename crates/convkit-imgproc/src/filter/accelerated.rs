use convkit_image::Image;

use super::{
    border::sample_at,
    ops::{accumulate, pad_for_kernel, reduce_padded_row, validate_images},
    BoundaryPolicy, FilterError, Kernel,
};
use crate::parallel::{par_rows_mut, ExecutionStrategy};

/// Row parallel version of [`convolve_naive`](super::convolve_naive).
///
/// Output rows are distributed according to `strategy`. Pixels whose whole neighborhood lies
/// inside the image read contiguous windows straight from the source buffer; only the pixels
/// near the border go through `boundary`. The products are summed in the same order as the
/// reference engine, so the output is bit identical to it.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The convolution kernel.
/// * `boundary` - The policy for out-of-bounds reads.
/// * `strategy` - How the rows are spread over threads.
///
/// # Errors
///
/// Fails if `src` is empty, `dst` does not have the size of `src`, or the thread pool of
/// [`ExecutionStrategy::Fixed`] cannot be built.
///
/// # Examples
///
/// ```
/// use convkit_image::Image;
/// use convkit_imgproc::filter::{convolve_accelerated, BorderMode, Kernel};
/// use convkit_imgproc::parallel::ExecutionStrategy;
///
/// let src = Image::<f32, 1>::from_size_val([4, 4].into(), 1.0).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
/// let kernel = Kernel::from_val(3, 3, 1.0).unwrap();
///
/// convolve_accelerated(
///     &src,
///     &mut dst,
///     &kernel,
///     &BorderMode::Replicate,
///     ExecutionStrategy::default(),
/// )
/// .unwrap();
///
/// assert!(dst.as_slice().iter().all(|&v| v == 9.0));
/// ```
pub fn convolve_accelerated<const C: usize, B: BoundaryPolicy>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel: &Kernel,
    boundary: &B,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    validate_images(src, dst)?;

    let (rows, cols) = (src.rows(), src.cols());
    let (half_rows, half_cols) = kernel.half_size();
    // taps reach `half` before the center and `len - 1 - half` after it
    let (after_rows, after_cols) = (kernel.rows() - 1 - half_rows, kernel.cols() - 1 - half_cols);
    let row_stride = cols * C;
    let window_len = kernel.cols() * C;

    par_rows_mut(
        dst.as_slice_mut(),
        row_stride,
        strategy,
        |r, dst_row| -> Result<(), FilterError> {
            let row_inside = r >= half_rows && r + after_rows < rows;
            for (c, dst_px) in dst_row.chunks_exact_mut(C).enumerate() {
                let mut acc = [0.0f32; C];
                if row_inside && c >= half_cols && c + after_cols < cols {
                    let (top, left) = (r - half_rows, c - half_cols);
                    for kr in 0..kernel.rows() {
                        let start = (top + kr) * row_stride + left * C;
                        let window = &src.as_slice()[start..start + window_len];
                        accumulate(&mut acc, kernel.row(kr), window);
                    }
                } else {
                    for kr in 0..kernel.rows() {
                        let y = r as isize + kernel.row_offset(kr);
                        for (kc, w) in kernel.row(kr).iter().enumerate() {
                            let x = c as isize + kernel.col_offset(kc);
                            let px = sample_at(src, y, x, boundary)?;
                            acc.iter_mut().zip(px.iter()).for_each(|(a, v)| *a += w * v);
                        }
                    }
                }
                dst_px.copy_from_slice(&acc);
            }
            Ok(())
        },
    )
}

/// Row parallel version of [`convolve_padded`](super::convolve_padded).
///
/// Both the padding and the reduction are distributed according to `strategy`. The output is
/// bit identical to the serial padded engine.
///
/// # Errors
///
/// Fails if `src` is empty, `dst` does not have the size of `src`, or the thread pool of
/// [`ExecutionStrategy::Fixed`] cannot be built.
pub fn convolve_padded_accelerated<const C: usize, B: BoundaryPolicy>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel: &Kernel,
    boundary: &B,
    strategy: ExecutionStrategy,
) -> Result<(), FilterError> {
    validate_images(src, dst)?;

    let padded = pad_for_kernel(src, kernel, boundary, strategy)?;

    par_rows_mut(
        dst.as_slice_mut(),
        src.cols() * C,
        strategy,
        |r, dst_row| -> Result<(), FilterError> {
            reduce_padded_row(&padded, kernel, r, dst_row);
            Ok(())
        },
    )
}
