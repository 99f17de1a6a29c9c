use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of an image in pixels.
///
/// # Examples
///
/// ```
/// use convkit_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// Represents a dense array of samples.
///
/// The data is stored row-major with interleaved channels, i.e. with shape (H, W, C).
/// The shape is fixed once the image is created.
#[derive(Clone, Debug, PartialEq)]
pub struct Image<T, const CHANNELS: usize> {
    size: ImageSize,
    data: Vec<T>,
}

impl<T, const CHANNELS: usize> Image<T, CHANNELS> {
    /// Create a new image from pixel data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the image in pixels.
    /// * `data` - The pixel data of the image.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the image size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use convkit_image::{Image, ImageSize};
    ///
    /// let image = Image::<u8, 3>::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20 * 3],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.size().width, 10);
    /// assert_eq!(image.size().height, 20);
    /// assert_eq!(image.num_channels(), 3);
    /// ```
    pub fn new(size: ImageSize, data: Vec<T>) -> Result<Self, ImageError> {
        let expected = size.width * size.height * CHANNELS;
        if data.len() != expected {
            return Err(ImageError::InvalidChannelShape(data.len(), expected));
        }

        Ok(Self { size, data })
    }

    /// Create a new image with the given size and a constant pixel value.
    ///
    /// # Examples
    ///
    /// ```
    /// use convkit_image::{Image, ImageSize};
    ///
    /// let image = Image::<f32, 1>::from_size_val([4, 2].into(), 0.5).unwrap();
    ///
    /// assert_eq!(image.width(), 4);
    /// assert_eq!(image.height(), 2);
    /// assert_eq!(image.get([1, 3, 0]), Some(&0.5));
    /// ```
    pub fn from_size_val(size: ImageSize, val: T) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        let data = vec![val; size.width * size.height * CHANNELS];
        Image::new(size, data)
    }

    /// Create a new image by copying the pixel data from a slice.
    pub fn from_size_slice(size: ImageSize, data: &[T]) -> Result<Self, ImageError>
    where
        T: Clone,
    {
        Image::new(size, data.to_vec())
    }

    /// Build an image by stacking single channel images.
    ///
    /// This is the inverse of [`Image::split_channels`].
    ///
    /// # Errors
    ///
    /// Fails if the number of planes is not `CHANNELS` or the planes differ in size.
    pub fn from_channels(channels: &[Image<T, 1>]) -> Result<Self, ImageError>
    where
        T: Copy,
    {
        if channels.len() != CHANNELS {
            return Err(ImageError::InvalidChannelShape(channels.len(), CHANNELS));
        }

        let Some(size) = channels.first().map(Image::size) else {
            return Err(ImageError::InvalidChannelShape(0, CHANNELS));
        };
        if let Some(bad) = channels.iter().find(|plane| plane.size() != size) {
            return Err(ImageError::InvalidImageSize(
                bad.width(),
                bad.height(),
                size.width,
                size.height,
            ));
        }

        let mut data = Vec::with_capacity(size.width * size.height * CHANNELS);
        for i in 0..size.width * size.height {
            data.extend(channels.iter().map(|plane| plane.data[i]));
        }

        Image::new(size, data)
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// # Errors
    ///
    /// If a value cannot be represented in the target type, an error is returned.
    pub fn cast<U>(&self) -> Result<Image<U, CHANNELS>, ImageError>
    where
        U: num_traits::NumCast,
        T: num_traits::NumCast + Copy,
    {
        let casted_data = self
            .data
            .iter()
            .map(|&x| {
                U::from(x).ok_or_else(|| ImageError::CastError(std::any::type_name::<U>().into()))
            })
            .collect::<Result<Vec<U>, ImageError>>()?;

        Image::new(self.size, casted_data)
    }

    /// Get a channel of the image.
    ///
    /// # Errors
    ///
    /// If the channel index is out of bounds, an error is returned.
    pub fn channel(&self, channel: usize) -> Result<Image<T, 1>, ImageError>
    where
        T: Copy,
    {
        if channel >= CHANNELS {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, CHANNELS));
        }

        let channel_data = self
            .data
            .iter()
            .skip(channel)
            .step_by(CHANNELS)
            .copied()
            .collect();

        Image::new(self.size, channel_data)
    }

    /// Split the image into its channels.
    ///
    /// # Examples
    ///
    /// ```
    /// use convkit_image::Image;
    ///
    /// let image = Image::<f32, 2>::from_size_val([10, 20].into(), 0.0).unwrap();
    ///
    /// let channels = image.split_channels().unwrap();
    /// assert_eq!(channels.len(), 2);
    /// ```
    pub fn split_channels(&self) -> Result<Vec<Image<T, 1>>, ImageError>
    where
        T: Copy,
    {
        (0..CHANNELS).map(|i| self.channel(i)).collect()
    }

    /// Get the size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the image.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the image.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the image in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the image in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the number of channels in the image.
    pub fn num_channels(&self) -> usize {
        CHANNELS
    }

    /// Get the pixel data as a flat slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the pixel data as a flat mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Get a reference to the sample at `[row, col, ch]`, if in bounds.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [row, col, ch] = index;
        if row >= self.size.height || col >= self.size.width || ch >= CHANNELS {
            return None;
        }
        self.data.get((row * self.size.width + col) * CHANNELS + ch)
    }

    /// Get a reference to the sample at `[row, col, ch]` without bounds checks on the
    /// individual coordinates.
    ///
    /// PRECONDITION: the coordinates are inside the image.
    #[inline]
    pub fn get_unchecked(&self, index: [usize; 3]) -> &T {
        let [row, col, ch] = index;
        &self.data[(row * self.size.width + col) * CHANNELS + ch]
    }

    /// Get the pixel at the given coordinates as an array of channels.
    ///
    /// # Errors
    ///
    /// Fails if the coordinates are out of bounds.
    pub fn get_pixel(&self, row: usize, col: usize) -> Result<[T; CHANNELS], ImageError>
    where
        T: Copy + Default,
    {
        if row >= self.size.height || col >= self.size.width {
            return Err(ImageError::PixelIndexOutOfBounds(
                col,
                row,
                self.size.width,
                self.size.height,
            ));
        }

        let offset = (row * self.size.width + col) * CHANNELS;
        let mut pixel = [T::default(); CHANNELS];
        pixel.copy_from_slice(&self.data[offset..offset + CHANNELS]);
        Ok(pixel)
    }
}
