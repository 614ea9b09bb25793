//! Auto-fit text sizing - shrink-to-fit inside a zone's rectangle.
//!
//! Given a zone's box, its authored maximum font size, and the current
//! content, the engine finds the largest integer size that keeps the
//! measured extents inside the box, never going below [`MIN_FONT_SIZE`].
//! The descent is linear, one point at a time: font metrics are
//! non-monotonic enough at small deltas that the simple walk is the
//! reproducible choice, and its cost is bounded by `S0 - Smin` passes.

use card_core::{StyleOverride, TextAlign, TextAttrs};
use serde::{Deserialize, Serialize};

use crate::fonts::{FontRegistry, FALLBACK_FONT_FAMILY};
use crate::measure::{MeasureRequest, TextExtent, TextMeasurer};

/// Floor below which text is clipped rather than shrunk further.
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Authored size assumed when a text zone carries none.
pub const DEFAULT_FONT_SIZE: f32 = 32.0;

/// Zone boxes at most this tall use the title policy.
pub const TITLE_MAX_HEIGHT: f32 = 200.0;

/// Inner padding applied to body-policy zones, per side.
pub const BODY_INSET: f32 = 20.0;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.2;

/// Text color used when neither the user nor the admin picked one.
pub const DEFAULT_COLOR: &str = "#000";

/// Font weight used when the admin authored none.
pub const DEFAULT_FONT_WEIGHT: &str = "normal";

/// Vertical anchoring of text inside its zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// Anchored to the top edge.
    Top,
    /// Centered vertically.
    Center,
}

/// Measurement policy, selected by box height rather than an explicit
/// flag: short boxes are single-headline zones, tall boxes are multi-line
/// message bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitPolicy {
    /// Height ≤ 200 design px: centered both ways, no inset.
    Title,
    /// Height > 200 design px: top-anchored, left-aligned, padded inset.
    Body,
}

impl FitPolicy {
    /// Policy for a zone of the given height.
    #[must_use]
    pub fn for_height(height: f32) -> Self {
        if height <= TITLE_MAX_HEIGHT {
            Self::Title
        } else {
            Self::Body
        }
    }

    /// Inner padding per side.
    #[must_use]
    pub fn inset(self) -> f32 {
        match self {
            Self::Title => 0.0,
            Self::Body => BODY_INSET,
        }
    }

    /// Horizontal alignment when the admin authored none.
    #[must_use]
    pub fn default_align(self) -> TextAlign {
        match self {
            Self::Title => TextAlign::Center,
            Self::Body => TextAlign::Left,
        }
    }

    /// Vertical anchoring for this policy.
    #[must_use]
    pub fn vertical_align(self) -> VerticalAlign {
        match self {
            Self::Title => VerticalAlign::Center,
            Self::Body => VerticalAlign::Top,
        }
    }
}

/// The effective style of a dynamic zone after resolution.
///
/// Resolution order for font and color: per-zone user override, then the
/// zone's admin default, then the engine default. The same effective
/// family feeds both measurement and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStyle {
    /// Effective font family, filtered through the registry's fallback
    /// chain so only usable families render.
    pub font_family: String,
    /// Effective text color.
    pub color: String,
    /// Effective font weight.
    pub font_weight: String,
    /// Effective horizontal alignment.
    pub text_align: TextAlign,
    /// Background fill behind the text, if authored.
    pub background_color: Option<String>,
}

/// Resolve the effective style for a dynamic text zone.
#[must_use]
pub fn resolve_style(
    attrs: &TextAttrs,
    user: Option<&StyleOverride>,
    policy: FitPolicy,
    fonts: &FontRegistry,
) -> ResolvedStyle {
    let chain = [
        user.and_then(|style| style.font_family.as_deref()),
        attrs.font_family.as_deref(),
        Some(FALLBACK_FONT_FAMILY),
    ];
    let font_family = fonts.effective_family(chain.into_iter().flatten());

    let color = user
        .and_then(|style| style.color.as_deref())
        .or(attrs.color.as_deref())
        .unwrap_or(DEFAULT_COLOR)
        .to_string();

    ResolvedStyle {
        font_family,
        color,
        font_weight: attrs
            .font_weight
            .clone()
            .unwrap_or_else(|| DEFAULT_FONT_WEIGHT.to_string()),
        text_align: attrs.text_align.unwrap_or_else(|| policy.default_align()),
        background_color: attrs.background_color.clone(),
    }
}

/// Outcome of an auto-fit pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Accepted font size in design pixels.
    pub font_size: f32,
    /// Measured extents at the accepted size.
    pub extent: TextExtent,
    /// True when the box still overflows at [`MIN_FONT_SIZE`]; the host
    /// clips the overflow region rather than shrinking further.
    pub clipped: bool,
}

/// Find the largest integer font size in `[MIN_FONT_SIZE, authored_size]`
/// whose measured extents fit the zone box.
///
/// Shrinking continues while either axis overflows (inclusive OR, no
/// priority between width and height). When the authored size is already
/// below the floor it is accepted as-is.
#[must_use]
pub fn fit_text(
    measurer: &dyn TextMeasurer,
    text: &str,
    zone_width: f32,
    zone_height: f32,
    authored_size: f32,
    font_family: &str,
) -> FitResult {
    let policy = FitPolicy::for_height(zone_height);
    let wrap_width = (zone_width - 2.0 * policy.inset()).max(1.0);
    let mut font_size = authored_size.max(1.0).round();

    loop {
        let extent = measurer.measure(&MeasureRequest {
            text,
            font_size,
            font_family,
            wrap_width: Some(wrap_width),
            line_height: LINE_HEIGHT,
        });
        let overflows = extent.height > zone_height || extent.width > zone_width;
        if !overflows || font_size <= MIN_FONT_SIZE {
            return FitResult {
                font_size,
                extent,
                clipped: overflows,
            };
        }
        font_size -= 1.0;
    }
}
