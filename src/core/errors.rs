use std::path::PathBuf;
use thiserror::Error;

/*-------------------------------------------------------------------------------------------------
  Errors and Results
-------------------------------------------------------------------------------------------------*/

/// Error type used throughout the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The upstream resource could not be retrieved and no usable cached copy exists.
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// A payload was not structured as expected.
    #[error("Failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// An IP prefix in a region feed is not a valid IP network.
    #[error("Invalid IP prefix {prefix:?} in region feed: {reason}")]
    Prefix { prefix: String, reason: String },

    /// The user asked for something the data or the tool does not offer.
    #[error("{0}")]
    Validation(String),

    /// Invalid client configuration (base URL, cache directory, ...).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Writing the output file failed.
    #[error("Failed to write {path:?}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Process exit code for this error; validation failures match clap's usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Validation(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/*--------------------------------------------------------------------------------------
  Log Error Function
--------------------------------------------------------------------------------------*/

#[cfg(test)]
pub(crate) fn log_error(error: &Error) {
    log::error!("{}", error);
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
