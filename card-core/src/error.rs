//! Error types for card canvas operations.

use thiserror::Error;

/// Result type for card canvas operations.
pub type CardResult<T> = Result<T, CardError>;

/// Errors that can occur while loading or customizing a card.
#[derive(Debug, Error)]
pub enum CardError {
    /// Required structural fields are missing from the design document.
    /// Fatal for the viewing session; the card renders as unavailable.
    #[error("Malformed design document: {0}")]
    MalformedDocument(String),

    /// The referenced zone does not exist on any slide of the document.
    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// A text or style change was refused. Callers treat this as a no-op
    /// rather than surfacing an error dialog.
    #[error("Input rejected for zone {zone}: {reason}")]
    InputRejected {
        /// Zone the write was addressed to.
        zone: String,
        /// Why the write was refused.
        reason: String,
    },

    /// A stored draft failed to parse. Recovered by discarding the draft.
    #[error("Stored draft is corrupt: {0}")]
    DraftCorrupt(String),

    /// An I/O error occurred during draft persistence.
    #[error("Draft IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization error occurred while writing state.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
