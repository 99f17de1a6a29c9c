use std::path::Path;

use convkit_image::{ops::cast_and_scale, Image, ImageError, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path as 8-bit RGB.
///
/// The method tries to read from any image format supported by the image crate. Grayscale
/// images are expanded to three equal channels and any alpha channel is dropped.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image containing the image data.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    log::debug!("decoded {} ({:?}) from {}", size, img.color(), file_path.display());

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Reads an image as RGB samples normalized to `[0, 1]`.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image with each 8-bit sample divided by 255.
pub fn read_image_rgb_f32(file_path: impl AsRef<Path>) -> Result<Image<f32, 3>, IoError> {
    let image = read_image_any_rgb8(file_path)?;
    let mut image_f32 = Image::from_size_val(image.size(), 0.0f32)?;
    cast_and_scale(&image, &mut image_f32, 1.0 / 255.0)?;
    Ok(image_f32)
}

/// Writes an 8-bit RGB image to the given file path.
///
/// The format is chosen from the file extension.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The image to write.
pub fn write_image_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let buffer = image::RgbImage::from_raw(
        image.width() as u32,
        image.height() as u32,
        image.as_slice().to_vec(),
    )
    .ok_or(ImageError::InvalidChannelShape(
        image.as_slice().len(),
        image.width() * image.height() * 3,
    ))?;

    buffer
        .save(file_path.as_ref())
        .map_err(IoError::ImageEncodeError)
}

/// Writes an RGB image with samples in `[0, 1]` to the given file path.
///
/// Samples outside `[0, 1]` are clipped before the conversion to 8 bits.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The image to write.
pub fn write_image_rgb_f32(
    file_path: impl AsRef<Path>,
    image: &Image<f32, 3>,
) -> Result<(), IoError> {
    let data = image
        .as_slice()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    write_image_rgb8(file_path, &Image::new(image.size(), data)?)
}

/// Writes a single channel image with samples in `[0, 1]` to the given file path.
///
/// Samples outside `[0, 1]` are clipped before the conversion to 8 bits. Images of arbitrary
/// range are brought into `[0, 1]` first, e.g. with a min-max normalization.
///
/// # Arguments
///
/// * `file_path` - The path to the output image.
/// * `image` - The image to write.
pub fn write_image_gray_f32(
    file_path: impl AsRef<Path>,
    image: &Image<f32, 1>,
) -> Result<(), IoError> {
    let data = image
        .as_slice()
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();

    let buffer = image::GrayImage::from_raw(image.width() as u32, image.height() as u32, data)
        .ok_or(ImageError::InvalidChannelShape(
            image.as_slice().len(),
            image.width() * image.height(),
        ))?;

    buffer
        .save(file_path.as_ref())
        .map_err(IoError::ImageEncodeError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_file() {
        let res = read_image_rgb_f32("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn write_read_rgb_f32() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("rgb.png");

        let image = Image::<f32, 3>::new(
            [2, 1].into(),
            vec![0.0, 0.5, 1.0, -0.25, 1.5, 0.2],
        )?;
        write_image_rgb_f32(&file_path, &image)?;

        let image_read = read_image_any_rgb8(&file_path)?;
        assert_eq!(image_read.size(), image.size());
        assert_eq!(image_read.as_slice(), &[0, 128, 255, 0, 255, 51]);

        let image_f32 = read_image_rgb_f32(&file_path)?;
        let blue = image_f32.get([0, 0, 2]).copied().unwrap_or_default();
        assert!((blue - 1.0).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn write_gray_clips_range() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");

        let image = Image::<f32, 1>::new([3, 1].into(), vec![-4.0, 0.5, 4.0])?;
        write_image_gray_f32(&file_path, &image)?;

        // gray images are read back with three equal channels
        let image_read = read_image_any_rgb8(&file_path)?;
        assert_eq!(
            image_read.as_slice(),
            &[0, 0, 0, 128, 128, 128, 255, 255, 255]
        );
        Ok(())
    }
}
