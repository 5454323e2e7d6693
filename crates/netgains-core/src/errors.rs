/// Core error type for the Net Gains workspace.
///
/// Adapter crates should map their specific errors into this type so the
/// application core can handle failures consistently (user-facing message
/// vs absorbed-and-logged).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid link: {0}")]
    InvalidLink(String),

    #[error("lookup error: {0}")]
    Lookup(String),

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
