use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Invalid body {name:?}: {reason}")]
    InvalidBody { name: String, reason: String },

    #[error("Invalid color {0:?}, expected six hex digits")]
    InvalidColor(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_body(name: &str, reason: impl Into<String>) -> Self {
        Error::InvalidBody {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
