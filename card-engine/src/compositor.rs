//! Zone compositor - ordered render list for one card face.
//!
//! For a slide the compositor emits background, then static decorations,
//! then dynamic zones, bottom to top. Static zones come straight from
//! admin data with a crude height-derived font size and never participate
//! in auto-fit or interaction; dynamic zones go through style resolution
//! and the auto-fit pass on every composition, so a stale font size can
//! never survive a content or geometry change.

use card_core::{CustomizationOverlay, Slide, Zone, ZoneId, ZoneKind};
use serde::{Deserialize, Serialize};

use crate::autofit::{
    fit_text, resolve_style, FitPolicy, ResolvedStyle, VerticalAlign, DEFAULT_FONT_SIZE,
    LINE_HEIGHT,
};
use crate::fonts::FontRegistry;
use crate::measure::TextMeasurer;
use crate::EngineConfig;

/// Z-order of the background image.
pub const Z_BACKGROUND: i32 = 0;
/// Z-order of static decorations.
pub const Z_STATIC: i32 = 5;
/// Z-order of dynamic zones.
pub const Z_DYNAMIC: i32 = 10;

/// Static zones display at this fraction of their authored size or box
/// height; a crude estimate that stands in for real metrics.
pub const STATIC_FONT_FACTOR: f32 = 0.8;

/// Opacity of placeholder text, keeping empty zones visually distinct
/// from filled ones.
pub const PLACEHOLDER_OPACITY: f32 = 0.4;

/// Placeholder shown when the admin authored no sample text.
pub const PLACEHOLDER_FALLBACK: &str = "Type here";

/// A zone's rectangle in design space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRect {
    /// X position in design pixels.
    pub x: f32,
    /// Y position in design pixels.
    pub y: f32,
    /// Width in design pixels.
    pub width: f32,
    /// Height in design pixels.
    pub height: f32,
    /// Rotation in degrees about the rect's own center.
    pub rotation: f32,
}

impl From<&Zone> for ZoneRect {
    fn from(zone: &Zone) -> Self {
        Self {
            x: zone.x,
            y: zone.y,
            width: zone.width,
            height: zone.height,
            rotation: zone.rotation,
        }
    }
}

/// One entry of a slide's ordered render list, bottom first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum RenderItem {
    /// The face's background image.
    Background {
        /// Image URL.
        url: String,
        /// Stacking order.
        z: i32,
    },
    /// A static decoration: fixed text or an emoji. Never interactive.
    Decoration {
        /// Zone rectangle.
        rect: ZoneRect,
        /// Glyphs to draw.
        content: String,
        /// Display size, `(fontSize ?? height) * 0.8`.
        font_size: f32,
        /// Stacking order.
        z: i32,
    },
    /// An auto-fitted dynamic text zone.
    DynamicText {
        /// Zone identity, for routing edits back.
        zone_id: ZoneId,
        /// Zone rectangle.
        rect: ZoneRect,
        /// Text to draw: the user's value, or the placeholder.
        content: String,
        /// Whether `content` is placeholder text rather than user input.
        is_placeholder: bool,
        /// Draw opacity; reduced for placeholders.
        opacity: f32,
        /// Resolved font size from the auto-fit pass.
        font_size: f32,
        /// True when the zone overflows even at the minimum size and the
        /// host should clip.
        clipped: bool,
        /// Effective style for measurement and drawing.
        style: ResolvedStyle,
        /// Vertical anchoring from the fit policy.
        vertical_align: VerticalAlign,
        /// Inner padding per side from the fit policy.
        inset: f32,
        /// Line height as a multiple of the font size.
        line_height: f32,
        /// Whether the host should accept edits on this zone.
        editable: bool,
        /// Stacking order.
        z: i32,
    },
}

/// Builds render lists for card faces.
#[derive(Clone, Copy)]
pub struct Compositor<'a> {
    /// Extent source for the auto-fit pass.
    pub measurer: &'a dyn TextMeasurer,
    /// Font availability for style resolution.
    pub fonts: &'a FontRegistry,
    /// Capability flags of the hosting session.
    pub config: &'a EngineConfig,
}

impl Compositor<'_> {
    /// Compose the ordered render list for one slide.
    #[must_use]
    pub fn compose_slide(&self, slide: &Slide, overlay: &CustomizationOverlay) -> Vec<RenderItem> {
        let mut items = Vec::new();

        if let Some(url) = &slide.background_url {
            items.push(RenderItem::Background {
                url: url.clone(),
                z: Z_BACKGROUND,
            });
        }

        for zone in &slide.static_zones {
            if let Some(item) = Self::compose_static(zone) {
                items.push(item);
            }
        }

        for zone in &slide.dynamic_zones {
            if let Some(item) = self.compose_dynamic(zone, overlay) {
                items.push(item);
            }
        }

        items
    }

    /// Static decorations bypass measurement entirely.
    fn compose_static(zone: &Zone) -> Option<RenderItem> {
        let (content, authored_size) = match &zone.kind {
            ZoneKind::Emoji(attrs) => (attrs.emoji.clone(), None),
            ZoneKind::Text(attrs) => (
                attrs.text.clone().unwrap_or_default(),
                attrs.font_size,
            ),
            ZoneKind::Image => return None,
        };
        Some(RenderItem::Decoration {
            rect: ZoneRect::from(zone),
            content,
            font_size: authored_size.unwrap_or(zone.height) * STATIC_FONT_FACTOR,
            z: Z_STATIC,
        })
    }

    fn compose_dynamic(&self, zone: &Zone, overlay: &CustomizationOverlay) -> Option<RenderItem> {
        let ZoneKind::Text(attrs) = &zone.kind else {
            tracing::debug!(zone = %zone.id, "skipping non-text dynamic zone");
            return None;
        };

        let user_value = overlay.text(&zone.id).filter(|value| !value.is_empty());
        let (content, is_placeholder) = match user_value {
            Some(value) => (value.to_string(), false),
            None => (
                attrs
                    .placeholder_text()
                    .unwrap_or(PLACEHOLDER_FALLBACK)
                    .to_string(),
                true,
            ),
        };

        let policy = FitPolicy::for_height(zone.height);
        let user_style = if self.config.style_overrides_enabled {
            overlay.style(&zone.id)
        } else {
            None
        };
        let style = resolve_style(attrs, user_style, policy, self.fonts);

        let fit = fit_text(
            self.measurer,
            &content,
            zone.width,
            zone.height,
            attrs.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            &style.font_family,
        );

        Some(RenderItem::DynamicText {
            zone_id: zone.id.clone(),
            rect: ZoneRect::from(zone),
            content,
            is_placeholder,
            opacity: if is_placeholder { PLACEHOLDER_OPACITY } else { 1.0 },
            font_size: fit.font_size,
            clipped: fit.clipped,
            style,
            vertical_align: policy.vertical_align(),
            inset: policy.inset(),
            line_height: LINE_HEIGHT,
            editable: self.config.editable,
            z: Z_DYNAMIC,
        })
    }
}
