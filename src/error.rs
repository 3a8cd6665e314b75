use thiserror::Error;

/// Errors produced while turning source records into statistics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// A source record lacks a required attribute or carries an unusable date.
    #[error("malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    /// Aggregation was attempted over zero messages.
    #[error("no messages to aggregate")]
    EmptyInput,
}

impl StatsError {
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        StatsError::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;
