/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] convkit_image::ImageError),

    /// Error to decode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// Error to encode the image.
    #[error("Failed to encode the image. {0}")]
    ImageEncodeError(image::ImageError),
}
