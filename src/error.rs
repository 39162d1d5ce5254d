// One error type for the whole game.
// Only startup can really fail (bad assets, bad config, no window); once the
// loop runs, the session itself never returns an error.
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Asset file missing, unreadable or undecodable. Fatal at startup.
    #[error("invalid asset {}: {reason}", path.display())]
    InvalidAsset { path: PathBuf, reason: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("window init error: {0}")]
    WindowInit(String),

    #[error("window update error: {0}")]
    WindowUpdate(String),
}

impl Error {
    pub fn invalid_asset(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Error::InvalidAsset {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
