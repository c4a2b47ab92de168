use thiserror::Error;

/// Error classes raised during a transformation run.
///
/// `Process` is fatal to the whole run. `Data` is recoverable per field:
/// the mapping engine catches it, counts it, and keeps mapping the rest of
/// the record. `RecordFailed` and `FailedValidation` fail a single record
/// without stopping the run.
#[derive(Debug, Error)]
pub enum TransformationError {
    #[error("configuration error: {message}")]
    Process { message: String },

    #[error("data error for record {index_or_id}: {message}")]
    Data {
        index_or_id: String,
        message: String,
    },

    #[error("record {index_or_id} failed: {message} (value: {value})")]
    RecordFailed {
        index_or_id: String,
        message: String,
        value: String,
    },

    #[error("record {index_or_id} is missing required fields: {}", .fields.join(", "))]
    FailedValidation {
        index_or_id: String,
        fields: Vec<String>,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransformationError {
    pub fn process(message: impl Into<String>) -> Self {
        Self::Process {
            message: message.into(),
        }
    }

    pub fn data(index_or_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Data {
            index_or_id: index_or_id.into(),
            message: message.into(),
        }
    }

    pub fn record_failed(
        index_or_id: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::RecordFailed {
            index_or_id: index_or_id.into(),
            message: message.into(),
            value: value.into(),
        }
    }

    /// True for errors that abort the whole run rather than one record.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Process { .. } | Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, TransformationError>;
