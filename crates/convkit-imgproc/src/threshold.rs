use convkit_image::{Image, ImageError};
use num_traits::Zero;

use crate::parallel;

/// Keep the samples above a threshold and zero the rest.
///
/// The formula for the threshold operation is:
///
/// dst(x, y) = src(x, y) if src(x, y) > threshold else 0
///
/// # Arguments
///
/// * `src` - The input image of shape (height, width, channels).
/// * `dst` - The output image of shape (height, width, channels).
/// * `threshold` - The threshold value. Must be the same type as the image.
///
/// # Example
///
/// ```
/// use convkit_image::{Image, ImageSize};
/// use convkit_imgproc::threshold::threshold_to_zero;
///
/// let data = vec![0.1f32, 0.6, 0.3, 0.9];
/// let image = Image::<f32, 1>::new(ImageSize { width: 2, height: 2 }, data).unwrap();
///
/// let mut thresholded = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// threshold_to_zero(&image, &mut thresholded, 0.5).unwrap();
/// assert_eq!(thresholded.as_slice(), &[0.0, 0.6, 0.0, 0.9]);
/// ```
pub fn threshold_to_zero<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    threshold: T,
) -> Result<(), ImageError>
where
    T: Copy + Send + Sync + PartialOrd + Zero,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // run the thresholding operation in parallel
    parallel::par_iter_rows_val(src, dst, |src_pixel, dst_pixel| {
        *dst_pixel = if *src_pixel > threshold {
            *src_pixel
        } else {
            T::zero()
        };
    });

    Ok(())
}
