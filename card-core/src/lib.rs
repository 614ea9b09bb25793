//! # Card Core
//!
//! Core data layer for the card canvas: the admin-authored design
//! document, the buyer's customization overlay, and the store that
//! validates and persists edits.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 card-core                   │
//! ├─────────────────────┬───────────────────────┤
//! │  Design Document    │  Customization        │
//! │  - CanvasSettings   │  - Overlay (inputs,   │
//! │  - Slides / Zones   │    style overrides)   │
//! │  - Validation       │  - Store + drafts     │
//! └─────────────────────┴───────────────────────┘
//! ```
//!
//! The document is read-only after load; the overlay is the only mutable
//! state and is owned by a single viewing session.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod document;
pub mod error;
pub mod overlay;
pub mod store;

pub use document::{
    CanvasSettings, DesignData, DesignDocument, EmojiAttrs, Slide, SlideKey, Slides, TextAlign,
    TextAttrs, Zone, ZoneId, ZoneKind, DEFAULT_MAX_CHARS,
};
pub use error::{CardError, CardResult};
pub use overlay::{CustomizationOverlay, StyleOverride};
pub use store::{CustomizationStore, DraftStore, FileDraftStore, MemoryDraftStore};

/// Card core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
