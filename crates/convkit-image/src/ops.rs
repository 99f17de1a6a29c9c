use crate::{Image, ImageError};

/// Cast the pixel data of an image to a different type.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
/// * `scale` - The scale to multiply the pixel data with.
///
/// Example:
///
/// ```
/// use convkit_image::{Image, ImageSize};
/// use convkit_image::ops::cast_and_scale;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![0u8, 255],
/// )
/// .unwrap();
///
/// let mut image_f32 = Image::from_size_val(image.size(), 0.0f32).unwrap();
///
/// cast_and_scale(&image, &mut image_f32, 1. / 255.0).unwrap();
///
/// assert_eq!(image_f32.get([0, 0, 0]), Some(&0.0f32));
/// assert_eq!(image_f32.get([0, 1, 0]), Some(&1.0f32));
/// ```
pub fn cast_and_scale<T, U, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<U, C>,
    scale: U,
) -> Result<(), ImageError>
where
    T: Copy + num_traits::NumCast,
    U: Copy + num_traits::NumCast + std::ops::Mul<U, Output = U>,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .try_for_each(|(out, &inp)| {
            let x = U::from(inp)
                .ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().to_string()))?;
            *out = x * scale;
            Ok::<(), ImageError>(())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cast_and_scale_size_mismatch() -> Result<(), ImageError> {
        let src = Image::<u8, 1>::from_size_val([2, 2].into(), 10)?;
        let mut dst = Image::<f32, 1>::from_size_val([3, 2].into(), 0.0)?;
        assert_eq!(
            cast_and_scale(&src, &mut dst, 1.0),
            Err(ImageError::InvalidImageSize(2, 2, 3, 2))
        );
        Ok(())
    }

    #[test]
    fn cast_and_scale_u8_to_f32() -> Result<(), ImageError> {
        let src = Image::<u8, 3>::new([1, 1].into(), vec![0, 51, 255])?;
        let mut dst = Image::<f32, 3>::from_size_val(src.size(), 0.0)?;
        cast_and_scale(&src, &mut dst, 2.0)?;
        assert_eq!(dst.as_slice(), &[0.0, 102.0, 510.0]);
        Ok(())
    }
}
