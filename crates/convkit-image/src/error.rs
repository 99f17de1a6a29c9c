/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image shape.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images were expected to have the same size.
    #[error("Image size ({0}x{1}) does not match the expected size ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel coordinates are out of bounds.
    #[error("Pixel coordinates ({0}, {1}) are out of bounds ({2}, {3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when the channel index is out of bounds.
    #[error("Channel index ({0}) is out of bounds ({1})")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when an operation needs at least one sample.
    #[error("Image has no data")]
    EmptyImage,

    /// Error when a value cannot be represented in the target type.
    #[error("Failed to cast image data to {0}")]
    CastError(String),
}
