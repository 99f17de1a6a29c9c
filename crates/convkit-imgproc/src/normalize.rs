//! Min-max normalization, used to bring convolution outputs of arbitrary range into a
//! displayable one.

use num_traits::Float;

use convkit_image::{Image, ImageError};

use crate::parallel;

/// Find the minimum and maximum values in an image.
///
/// # Arguments
///
/// * `image` - The input image of shape (height, width, channels).
///
/// # Returns
///
/// A tuple containing the minimum and maximum values in the image.
///
/// # Errors
///
/// If the image has no samples, an error is returned.
///
/// # Example
///
/// ```
/// use convkit_image::{Image, ImageSize};
/// use convkit_imgproc::normalize::find_min_max;
///
/// let image_data = vec![0u8, 1, 0, 1, 2, 3, 0, 1, 0, 1, 2, 3];
/// let image = Image::<u8, 3>::new(
///   ImageSize {
///     width: 2,
///     height: 2,
///   },
///   image_data,
/// )
/// .unwrap();
///
/// let (min, max) = find_min_max(&image).unwrap();
/// assert_eq!(min, 0);
/// assert_eq!(max, 3);
/// ```
pub fn find_min_max<T, const C: usize>(image: &Image<T, C>) -> Result<(T, T), ImageError>
where
    T: Copy + PartialOrd,
{
    let (&first, rest) = image
        .as_slice()
        .split_first()
        .ok_or(ImageError::EmptyImage)?;

    Ok(rest.iter().fold((first, first), |(min, max), &x| {
        (
            if x < min { x } else { min },
            if x > max { x } else { max },
        )
    }))
}

/// Normalize an image using the minimum and maximum values.
///
/// The formula for normalizing an image is:
///
/// (image - min_val) * (max - min) / (max_val - min_val) + min
///
/// where `min_val` and `max_val` are taken over all the samples of `src`. A flat image maps
/// to `min`.
///
/// # Arguments
///
/// * `src` - The input image of shape (height, width, channels).
/// * `dst` - The output image of shape (height, width, channels).
/// * `min` - The lower end of the output range.
/// * `max` - The upper end of the output range.
///
/// # Example
///
/// ```
/// use convkit_image::{Image, ImageSize};
/// use convkit_imgproc::normalize::normalize_min_max;
///
/// let image = Image::<f32, 1>::new([3, 1].into(), vec![-2.0, 0.0, 2.0]).unwrap();
/// let mut normalized = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// normalize_min_max(&image, &mut normalized, 0.0, 1.0).unwrap();
///
/// assert_eq!(normalized.as_slice(), &[0.0, 0.5, 1.0]);
/// ```
pub fn normalize_min_max<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<T, C>,
    min: T,
    max: T,
) -> Result<(), ImageError>
where
    T: Send + Sync + Float,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let (min_val, max_val) = find_min_max(src)?;
    let range = max_val - min_val;

    parallel::par_iter_rows_val(src, dst, |&src_val, dst_val| {
        *dst_val = if range > T::zero() {
            (src_val - min_val) * (max - min) / range + min
        } else {
            min
        };
    });

    Ok(())
}
