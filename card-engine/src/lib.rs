//! # Card Engine
//!
//! Layout engine for the card canvas: auto-fit text sizing, zone
//! compositing, responsive scaling, and the page-flip navigation machine,
//! all driven through one configurable session.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                CardSession                  │
//! ├──────────────────────┬──────────────────────┤
//! │  Zone Compositor     │  Scale Controller    │
//! │  - render lists      │  - uniform factor k  │
//! │  - auto-fit text     │  - per view mode     │
//! ├──────────────────────┼──────────────────────┤
//! │  Page Navigator      │  Font Registry       │
//! │  - 4-slide index     │  - idempotent ensure │
//! │  - flip layout       │  - fallback chain    │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! The session owns the mutable state; composition is pull-based and
//! recomputes layout from scratch each frame, so mutations are always
//! visible before the next paint.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod autofit;
pub mod compositor;
pub mod flip;
pub mod fonts;
pub mod measure;
pub mod scale;
pub mod session;

pub use autofit::{
    fit_text, resolve_style, FitPolicy, FitResult, ResolvedStyle, VerticalAlign, DEFAULT_FONT_SIZE,
    LINE_HEIGHT, MIN_FONT_SIZE, TITLE_MAX_HEIGHT,
};
pub use compositor::{Compositor, RenderItem, ZoneRect, PLACEHOLDER_OPACITY, STATIC_FONT_FACTOR};
pub use flip::{visible_faces, FlipLayout, IllegalTransition, PageNavigator, ViewState};
pub use fonts::{
    normalize_family, stylesheet_url, FontRegistry, FontSource, FontStatus, SystemFontSource,
    FALLBACK_FONT_FAMILY,
};
pub use measure::{AdvanceWidthMeasurer, MeasureRequest, TextExtent, TextMeasurer};
pub use scale::{aspect_ratio, scale_factor, ScaleMode, INNER_SPREAD_FACTOR};
pub use session::{CardSession, FaceFrame, SceneFrame};

use serde::{Deserialize, Serialize};

/// Capability flags of a viewing session.
///
/// One engine serves every surface: the full editor is the default, the
/// read-only preview is [`EngineConfig::preview`], and hosts can mix
/// flags freely instead of forking logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Whether text edits are accepted.
    pub editable: bool,
    /// Whether per-zone user style overrides apply.
    pub style_overrides_enabled: bool,
    /// Whether the overlay hydrates from and persists to a draft store.
    pub draft_persistence_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            editable: true,
            style_overrides_enabled: true,
            draft_persistence_enabled: true,
        }
    }
}

impl EngineConfig {
    /// Read-only preview: the saved draft is shown but nothing is
    /// accepted or written.
    #[must_use]
    pub fn preview() -> Self {
        Self {
            editable: false,
            style_overrides_enabled: true,
            draft_persistence_enabled: true,
        }
    }
}

/// Card engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
