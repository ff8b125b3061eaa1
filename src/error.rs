use thiserror::Error;

/// Failure to turn an uploaded document into attendance lists.
///
/// This is the only error the extractor reports. No partial result is ever
/// returned alongside it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("document is not valid UTF-8 markup: {0}")]
    Parse(String),
}

/// Reasons a spin request is refused before any animation starts.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum SpinError {
    #[error("no names selected")]
    EmptyCandidates,
    #[error("a spin is already in progress")]
    AlreadySpinning,
    #[error("launch velocity must be a finite positive number")]
    InvalidVelocity,
    #[error("wheel offset must be a finite number")]
    InvalidOffset,
}

/// Errors raised while loading the roster and colour configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("roster contains no names")]
    EmptyRoster,
}
