use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackerError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Source '{name}' ({width}x{height}) does not fit on a {max}x{max} page")]
    OversizedSource {
        name: String,
        width: u32,
        height: u32,
        max: u32,
    },
}

pub type Result<T> = std::result::Result<T, PackerError>;
