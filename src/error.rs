//! Error type for storage and browser glue.
//!
//! DESIGN
//! ======
//! Errors exist only below the component boundary. `StoreSync` absorbs every
//! variant: it logs at `warn` and abandons the operation, so nothing reaches
//! the host page.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage read failed for key {key}: {reason}")]
    Read { key: String, reason: String },
    #[error("storage write failed for key {key}: {reason}")]
    Write { key: String, reason: String },
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
