use crate::parallel;
use convkit_image::{Image, ImageError};

/// Luminance weights of the red, green and blue channels.
const RW: f64 = 0.2989;
const GW: f64 = 0.5870;
const BW: f64 = 0.1140;

/// Convert an RGB image to grayscale using the formula:
///
/// Y = 0.2989 * R + 0.5870 * G + 0.1140 * B
///
/// # Arguments
///
/// * `src` - The input RGB image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use convkit_image::{Image, ImageSize};
/// use convkit_imgproc::color::gray_from_rgb;
///
/// let image = Image::<f32, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let mut gray = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
///
/// gray_from_rgb(&image, &mut gray).unwrap();
/// assert_eq!(gray.num_channels(), 1);
/// assert_eq!(gray.size().width, 4);
/// assert_eq!(gray.size().height, 5);
/// ```
pub fn gray_from_rgb<T>(src: &Image<T, 3>, dst: &mut Image<T, 1>) -> Result<(), ImageError>
where
    T: Send + Sync + num_traits::Float,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let cast = |w: f64| T::from(w).ok_or_else(|| ImageError::CastError(format!("{w}")));
    let (rw, gw, bw) = (cast(RW)?, cast(GW)?, cast(BW)?);

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = rw * src_pixel[0] + gw * src_pixel[1] + bw * src_pixel[2];
    });

    Ok(())
}
