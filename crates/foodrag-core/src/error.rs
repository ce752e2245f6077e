use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("{service} request failed: {message}")]
    Http { service: &'static str, message: String },

    #[error("{service} returned {status}: {message}")]
    Api { service: &'static str, status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn http(service: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Http { service, message: err.to_string() }
    }

    pub fn malformed(what: impl Into<String>) -> Self {
        Self::MalformedResponse(what.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
