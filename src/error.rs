//! Error type shared by the batch, the adapters and startup.

use thiserror::Error;

/// Errors raised while configuring a run or generating a topic image.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The generation API answered with an error or an unusable body.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// An error recorded in a cassette, replayed verbatim.
    #[error("{0}")]
    Replayed(String),

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid run setting (model, aspect ratio, size, topic filter).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A topic list that cannot be processed.
    #[error("Invalid topic list: {0}")]
    InvalidTopic(String),

    /// Decoding or re-encoding the returned image failed.
    #[error("Image conversion error: {0}")]
    ImageConversion(String),

    /// No API key configured for the provider.
    #[error("No API key for {provider}. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The provider name.
        provider: String,
        /// The environment variable name.
        env_var: String,
    },
}
