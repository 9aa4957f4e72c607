use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Invalid UTC offset: {0:?}")]
    InvalidOffset(String),

    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}
