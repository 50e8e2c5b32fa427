use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the layout and decay core.
///
/// Every variant except the configuration ones is a precondition violation by
/// the caller; nothing here is retried or recovered from.
#[derive(Debug, Error)]
pub enum Error {
    /// A nucleus was read, queried or decayed before it was initialized.
    #[error("nucleus used before initialization")]
    Uninitialized,

    /// A nucleus was initialized a second time.
    #[error("nucleus is already initialized")]
    AlreadyInitialized,

    /// A nearest-particle query had nothing to choose from.
    #[error("no particle matches query: {0}")]
    EmptyQuery(String),

    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Malformed scene configuration.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Propagated I/O errors from reading configuration files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
