//! Responsive scale controller.
//!
//! All zone geometry, rotation, and font sizing live in design space; the
//! host draws the whole canvas through one uniform factor `k`, never
//! scaling axes independently. `k` is recomputed on container resize and
//! on navigation-mode change.

use card_core::CanvasSettings;
use serde::{Deserialize, Serialize};

use crate::flip::ViewState;

/// Effective content width of the open spread as a multiple of one
/// canvas width: two faces plus a visible page-edge gap.
pub const INNER_SPREAD_FACTOR: f32 = 2.1;

/// How the canvas is being presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// One face fills the container; never upscaled past design
    /// resolution.
    SingleFace,
    /// Both inner faces side by side; the content is wider than one
    /// canvas by [`INNER_SPREAD_FACTOR`].
    Spread,
    /// Listing-grid thumbnail; the frame letterboxes via
    /// [`aspect_ratio`] and the factor is not clamped to 1.
    Thumbnail,
}

impl ScaleMode {
    /// Presentation mode for a navigation state.
    #[must_use]
    pub fn for_view(view: ViewState) -> Self {
        match view {
            ViewState::Inner => Self::Spread,
            ViewState::Front | ViewState::Back => Self::SingleFace,
        }
    }
}

/// Uniform design-to-viewport factor for a container width.
///
/// A transient zero, negative, or non-finite container width (container
/// not laid out yet) yields `1.0` rather than collapsing the canvas.
#[must_use]
pub fn scale_factor(container_width: f32, canvas: &CanvasSettings, mode: ScaleMode) -> f32 {
    if !container_width.is_finite() || container_width <= 0.0 {
        return 1.0;
    }
    let canvas_width = canvas.width_f32();
    match mode {
        ScaleMode::SingleFace => (container_width / canvas_width).min(1.0),
        ScaleMode::Spread => (container_width / (canvas_width * INNER_SPREAD_FACTOR)).min(1.0),
        ScaleMode::Thumbnail => container_width / canvas_width,
    }
}

/// Width-over-height aspect of the design canvas, for letterboxing a
/// fixed-aspect thumbnail frame before any inner transform applies.
#[must_use]
pub fn aspect_ratio(canvas: &CanvasSettings) -> f32 {
    canvas.width_f32() / canvas.height_f32()
}
