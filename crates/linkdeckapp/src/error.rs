use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum LinkDeckError {
    #[error("Link not found: {0}")]
    RecordNotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Image clipboard is not supported on this system")]
    ClipboardUnsupported,

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, LinkDeckError>;
