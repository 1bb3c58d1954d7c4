use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapTableError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown share class '{share_class_id}' held by fund '{fund}'")]
    UnknownShareClass { fund: String, share_class_id: String },

    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: String, id: String },

    #[error("Fund '{fund}' holds share class '{share_class_id}' more than once")]
    DuplicateHolding { fund: String, share_class_id: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CapTableError {
    fn from(e: serde_json::Error) -> Self {
        CapTableError::SerializationError(e.to_string())
    }
}
