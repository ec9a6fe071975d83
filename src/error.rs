pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout(
                "The request took too long to complete. The server may be overloaded or your \
                 connection may be unstable."
                    .to_string(),
            )
        } else {
            Error::Network(err)
        }
    }
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// Message suitable for showing to the student. Transport failures get a
    /// connectivity checklist appended; everything else passes through.
    pub fn user_message(&self) -> String {
        match self {
            Error::Network(err) => format!(
                "Unable to reach the server: {}\n\nPlease check:\n\
                 - your internet connection\n\
                 - whether the server is up\n\
                 - reloading and submitting again",
                err
            ),
            other => other.to_string(),
        }
    }
}
