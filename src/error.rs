// Error type for the scratch card engine and the demo window.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Fetching or decoding an image (cover or brush) failed.
    #[error("Image load error for '{uri}': {reason}")]
    ImageLoad { uri: String, reason: String },

    /// A config value is out of range (zero size, bad quality, ...).
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed

    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn image_load(uri: &str, reason: impl ToString) -> Self {
        Error::ImageLoad { uri: uri.to_owned(), reason: reason.to_string() }
    }
}
