use convkit_image::{Image, ImageError};

use super::{border::sample_at, BoundaryPolicy, FilterError, Kernel};
use crate::padding::{spatial_padding, Padding2D};
use crate::parallel::ExecutionStrategy;

/// Convolve an image with a kernel, checking bounds on every read.
///
/// Every output sample is the kernel weighted sum of its neighborhood:
///
/// ```text
/// dst[r, c] = sum(kernel[kr, kc] * src[r + row_offset(kr), c + col_offset(kc)])
/// ```
///
/// where the offsets follow [`kernel_offset`](super::kernel_offset). Reads outside the image
/// are resolved by `boundary`. Multi-channel images apply the same kernel to every channel.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The convolution kernel.
/// * `boundary` - The policy for out-of-bounds reads.
///
/// # Errors
///
/// Fails if `src` is empty or `dst` does not have the size of `src`.
///
/// # Examples
///
/// ```
/// use convkit_image::Image;
/// use convkit_imgproc::filter::{convolve_naive, BorderMode, Kernel};
///
/// let src = Image::<f32, 1>::new([3, 1].into(), vec![1.0, 2.0, 3.0]).unwrap();
/// let mut dst = Image::<f32, 1>::from_size_val(src.size(), 0.0).unwrap();
/// let kernel = Kernel::from_rows(&[&[1.0, 0.0, -1.0]]).unwrap();
///
/// convolve_naive(&src, &mut dst, &kernel, &BorderMode::Zero).unwrap();
///
/// assert_eq!(dst.as_slice(), &[-2.0, -2.0, 2.0]);
/// ```
pub fn convolve_naive<const C: usize, B: BoundaryPolicy>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel: &Kernel,
    boundary: &B,
) -> Result<(), FilterError> {
    validate_images(src, dst)?;

    let row_stride = src.cols() * C;
    for (r, dst_row) in dst.as_slice_mut().chunks_exact_mut(row_stride).enumerate() {
        for (c, dst_px) in dst_row.chunks_exact_mut(C).enumerate() {
            let mut acc = [0.0f32; C];
            for kr in 0..kernel.rows() {
                let y = r as isize + kernel.row_offset(kr);
                for (kc, w) in kernel.row(kr).iter().enumerate() {
                    let x = c as isize + kernel.col_offset(kc);
                    let px = sample_at(src, y, x, boundary)?;
                    acc.iter_mut().zip(px.iter()).for_each(|(a, v)| *a += w * v);
                }
            }
            dst_px.copy_from_slice(&acc);
        }
    }

    Ok(())
}

/// Convolve an image with a kernel over a padded copy of the image.
///
/// The image is padded once by exactly the reach of the kernel taps, `kernel.rows() / 2` rows
/// above and `kernel.rows() - 1 - kernel.rows() / 2` below (likewise for the columns), with
/// the border filled through `boundary`. The policy is therefore asked for the same
/// coordinates as in [`convolve_naive`]. Every neighborhood is then a
/// contiguous window of the padded copy, reduced against the kernel without bounds checks on
/// the individual samples.
///
/// The result is identical to [`convolve_naive`] for every boundary policy.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - The convolution kernel.
/// * `boundary` - The policy used to fill the padding.
///
/// # Errors
///
/// Fails if `src` is empty or `dst` does not have the size of `src`.
pub fn convolve_padded<const C: usize, B: BoundaryPolicy>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel: &Kernel,
    boundary: &B,
) -> Result<(), FilterError> {
    validate_images(src, dst)?;

    let padded = pad_for_kernel(src, kernel, boundary, ExecutionStrategy::Serial)?;

    let row_stride = src.cols() * C;
    dst.as_slice_mut()
        .chunks_exact_mut(row_stride)
        .enumerate()
        .for_each(|(r, dst_row)| reduce_padded_row(&padded, kernel, r, dst_row));

    Ok(())
}

/// Check the preconditions shared by all the engines.
pub(crate) fn validate_images<const C: usize>(
    src: &Image<f32, C>,
    dst: &Image<f32, C>,
) -> Result<(), FilterError> {
    if src.rows() == 0 || src.cols() == 0 {
        return Err(FilterError::InvalidArgument(format!(
            "cannot convolve an empty image of size {}",
            src.size()
        )));
    }
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }
    Ok(())
}

/// Pad `src` so that every kernel window of every output pixel lies inside the copy.
///
/// Even kernels reach one sample less after the center than before it, so the padding is
/// uneven.
pub(crate) fn pad_for_kernel<const C: usize, B: BoundaryPolicy>(
    src: &Image<f32, C>,
    kernel: &Kernel,
    boundary: &B,
    strategy: ExecutionStrategy,
) -> Result<Image<f32, C>, FilterError> {
    let (half_rows, half_cols) = kernel.half_size();
    let padding = Padding2D {
        top: half_rows,
        bottom: kernel.rows() - 1 - half_rows,
        left: half_cols,
        right: kernel.cols() - 1 - half_cols,
    };
    log::debug!(
        "padding {} by {:?} for a {}x{} kernel",
        src.size(),
        padding,
        kernel.rows(),
        kernel.cols()
    );
    spatial_padding(src, &padding, boundary, strategy)
}

/// Compute output row `r` from the padded copy.
///
/// With the padding of [`pad_for_kernel`], the window of output pixel `(r, c)` starts at
/// padded pixel `(r, c)`.
pub(crate) fn reduce_padded_row<const C: usize>(
    padded: &Image<f32, C>,
    kernel: &Kernel,
    r: usize,
    dst_row: &mut [f32],
) {
    let padded_stride = padded.cols() * C;
    let window_len = kernel.cols() * C;
    for (c, dst_px) in dst_row.chunks_exact_mut(C).enumerate() {
        let mut acc = [0.0f32; C];
        for kr in 0..kernel.rows() {
            let start = (r + kr) * padded_stride + c * C;
            let window = &padded.as_slice()[start..start + window_len];
            accumulate(&mut acc, kernel.row(kr), window);
        }
        dst_px.copy_from_slice(&acc);
    }
}

/// Add one kernel row times one window row of interleaved pixels into `acc`.
///
/// Keeps the column then channel order of [`convolve_naive`], so the sums are bit identical.
#[inline(always)]
pub(crate) fn accumulate<const C: usize>(acc: &mut [f32; C], weights: &[f32], window: &[f32]) {
    for (w, px) in weights.iter().zip(window.chunks_exact(C)) {
        acc.iter_mut().zip(px.iter()).for_each(|(a, v)| *a += w * v);
    }
}
