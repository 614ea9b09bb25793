//! Design document model - the admin-authored card template.
//!
//! A [`DesignDocument`] is a read-only projection of admin JSON into typed
//! entities. All zone geometry is authored in the fixed design-space
//! coordinate system defined by [`CanvasSettings`], never in viewport
//! pixels. The document is immutable once loaded and is shared across the
//! viewing session as `Arc<DesignDocument>`.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{CardError, CardResult};

/// Character limit applied to a text zone when the admin authored none.
pub const DEFAULT_MAX_CHARS: usize = 200;

/// The fixed design-space coordinate system all zones are authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Design-space width in pixels.
    pub width: u32,
    /// Design-space height in pixels.
    pub height: u32,
}

impl CanvasSettings {
    /// Width as a float for scale arithmetic.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    /// Height as a float for scale arithmetic.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn height_f32(&self) -> f32 {
        self.height as f32
    }
}

/// Identifier of a zone, unique within its slide.
///
/// The wire format carries zone ids as JSON numbers or strings; both
/// deserialize into the canonical string form that keys the
/// customization overlay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ZoneId(String);

impl ZoneId {
    /// Create a zone id from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ZoneId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for ZoneId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ZoneIdVisitor;

        impl Visitor<'_> for ZoneIdVisitor {
            type Value = ZoneId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or numeric zone id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ZoneId, E> {
                Ok(ZoneId::new(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ZoneId, E> {
                Ok(ZoneId::new(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ZoneId, E> {
                Ok(ZoneId::new(v.to_string()))
            }
        }

        deserializer.deserialize_any(ZoneIdVisitor)
    }
}

/// Horizontal text alignment within a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Align to the left edge.
    Left,
    /// Center horizontally.
    Center,
    /// Align to the right edge.
    Right,
}

/// Admin-authored attributes of a text zone.
///
/// Every field is optional on the wire; the engine supplies defaults at
/// style-resolution time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAttrs {
    /// Authored sample text, doubling as the placeholder for empty zones.
    #[serde(default)]
    pub text: Option<String>,
    /// Authored maximum font size in design pixels.
    #[serde(default)]
    pub font_size: Option<f32>,
    /// Authored font family, possibly a raw CSS stack.
    #[serde(default)]
    pub font_family: Option<String>,
    /// Authored font weight.
    #[serde(default)]
    pub font_weight: Option<String>,
    /// Authored text color.
    #[serde(default)]
    pub color: Option<String>,
    /// Authored horizontal alignment.
    #[serde(default)]
    pub text_align: Option<TextAlign>,
    /// Authored background fill behind the text.
    #[serde(default)]
    pub background_color: Option<String>,
    /// Maximum accepted input length in characters.
    #[serde(default)]
    pub max_chars: Option<usize>,
    /// Explicit placeholder, shown instead of `text` when present.
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl TextAttrs {
    /// Placeholder shown while the zone has no user input.
    #[must_use]
    pub fn placeholder_text(&self) -> Option<&str> {
        self.placeholder.as_deref().or(self.text.as_deref())
    }
}

/// Attributes of a static emoji decoration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmojiAttrs {
    /// The emoji glyph(s) to display.
    #[serde(default)]
    pub emoji: String,
}

/// What a zone contains, discriminated by the wire `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ZoneKind {
    /// A text zone. Editable when it appears among a slide's dynamic
    /// zones, fixed decoration when among the static zones.
    Text(TextAttrs),
    /// A fixed emoji decoration.
    Emoji(EmojiAttrs),
    /// Reserved for image zones; not exercised by the layout engine.
    Image,
}

/// An authored rectangle on a slide.
///
/// Rotation is in degrees, applied about the rectangle's own center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Identifier, unique within the slide.
    pub id: ZoneId,
    /// X position in design pixels.
    pub x: f32,
    /// Y position in design pixels.
    pub y: f32,
    /// Width in design pixels.
    pub width: f32,
    /// Height in design pixels.
    pub height: f32,
    /// Rotation in degrees about the zone's own center.
    #[serde(default)]
    pub rotation: f32,
    /// Zone content.
    #[serde(flatten)]
    pub kind: ZoneKind,
}

impl Zone {
    /// Text attributes if this is a text zone.
    #[must_use]
    pub fn text_attrs(&self) -> Option<&TextAttrs> {
        match &self.kind {
            ZoneKind::Text(attrs) => Some(attrs),
            ZoneKind::Emoji(_) | ZoneKind::Image => None,
        }
    }

    /// Character limit for user input into this zone.
    #[must_use]
    pub fn max_chars(&self) -> usize {
        self.text_attrs()
            .and_then(|attrs| attrs.max_chars)
            .unwrap_or(DEFAULT_MAX_CHARS)
    }
}

/// One physical face of the card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Background image for the face, drawn below all zones.
    #[serde(default)]
    pub background_url: Option<String>,
    /// Fixed decorations, rendered from admin data only.
    #[serde(default)]
    pub static_zones: Vec<Zone>,
    /// Editable zones, rendered through the auto-fit engine.
    #[serde(default)]
    pub dynamic_zones: Vec<Zone>,
}

/// Key of one of the four faces composing a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideKey {
    /// The cover.
    Front,
    /// Left face of the open spread.
    LeftInner,
    /// Right face of the open spread.
    RightInner,
    /// The reverse of the card.
    Back,
}

impl SlideKey {
    /// Canonical page order for sequential navigation.
    pub const ORDER: [Self; 4] = [Self::Front, Self::LeftInner, Self::RightInner, Self::Back];
}

impl fmt::Display for SlideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Front => "front",
            Self::LeftInner => "left_inner",
            Self::RightInner => "right_inner",
            Self::Back => "back",
        };
        f.write_str(name)
    }
}

/// The four faces of a card. All are required; a missing face is a
/// malformed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slides {
    /// The cover.
    pub front: Slide,
    /// Left face of the open spread.
    pub left_inner: Slide,
    /// Right face of the open spread.
    pub right_inner: Slide,
    /// The reverse of the card.
    pub back: Slide,
}

impl Slides {
    /// The slide for a face key.
    #[must_use]
    pub fn get(&self, key: SlideKey) -> &Slide {
        match key {
            SlideKey::Front => &self.front,
            SlideKey::LeftInner => &self.left_inner,
            SlideKey::RightInner => &self.right_inner,
            SlideKey::Back => &self.back,
        }
    }

    /// Iterate faces in canonical page order.
    pub fn faces(&self) -> impl Iterator<Item = (SlideKey, &Slide)> {
        SlideKey::ORDER.iter().map(move |&key| (key, self.get(key)))
    }
}

/// Container for the slide set, matching the wire nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignData {
    /// The four card faces.
    pub slides: Slides,
}

/// A complete card template as delivered by the product API.
///
/// Immutable once fetched; owned by the viewing session and never
/// mutated by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    /// Numeric product id.
    pub id: u64,
    /// Template identity; keys the customization draft.
    pub sku: String,
    /// Display title.
    pub title: String,
    /// Design-space coordinate system.
    pub canvas_settings: CanvasSettings,
    /// The authored slide content.
    pub design_data: DesignData,
}

impl DesignDocument {
    /// Parse and validate a design document from admin JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::MalformedDocument`] if `canvas_settings`, any
    /// of the four slides, or a zone's required numeric fields are absent,
    /// or if validation finds non-positive dimensions or duplicate zone
    /// ids. This is fatal for the viewing session; there is no partial
    /// rendering.
    pub fn from_json(json: &str) -> CardResult<Self> {
        let document: Self = serde_json::from_str(json)
            .map_err(|e| CardError::MalformedDocument(e.to_string()))?;
        document.validate()?;
        Ok(document)
    }

    /// Structural validation beyond what deserialization enforces.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::MalformedDocument`] on non-positive canvas or
    /// zone dimensions or on a duplicate zone id within a slide.
    pub fn validate(&self) -> CardResult<()> {
        if self.canvas_settings.width == 0 || self.canvas_settings.height == 0 {
            return Err(CardError::MalformedDocument(
                "canvas_settings dimensions must be positive".into(),
            ));
        }

        for (key, slide) in self.design_data.slides.faces() {
            let mut seen = BTreeSet::new();
            for zone in slide.static_zones.iter().chain(&slide.dynamic_zones) {
                if zone.width <= 0.0 || zone.height <= 0.0 {
                    return Err(CardError::MalformedDocument(format!(
                        "slide {key}: zone {} has non-positive dimensions",
                        zone.id
                    )));
                }
                if !seen.insert(zone.id.clone()) {
                    return Err(CardError::MalformedDocument(format!(
                        "slide {key}: duplicate zone id {}",
                        zone.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// The slide for a face key.
    #[must_use]
    pub fn slide(&self, key: SlideKey) -> &Slide {
        self.design_data.slides.get(key)
    }

    /// Look up a dynamic zone by id across all four slides.
    #[must_use]
    pub fn dynamic_zone(&self, id: &ZoneId) -> Option<&Zone> {
        self.design_data
            .slides
            .faces()
            .flat_map(|(_, slide)| &slide.dynamic_zones)
            .find(|zone| &zone.id == id)
    }

    /// Raw font families referenced by dynamic text zones, deduplicated.
    #[must_use]
    pub fn font_families(&self) -> Vec<String> {
        let families: BTreeSet<String> = self
            .design_data
            .slides
            .faces()
            .flat_map(|(_, slide)| &slide.dynamic_zones)
            .filter_map(Zone::text_attrs)
            .filter_map(|attrs| attrs.font_family.clone())
            .collect();
        families.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> String {
        r##"{
            "id": 7,
            "sku": "PC-001",
            "title": "Birthday Blooms",
            "canvas_settings": { "width": 600, "height": 850 },
            "design_data": {
                "slides": {
                    "front": {
                        "background_url": "https://cdn.example/front.jpg",
                        "static_zones": [
                            { "id": 10, "type": "emoji", "emoji": "🎂",
                              "x": 40, "y": 40, "width": 80, "height": 80, "rotation": 0 }
                        ],
                        "dynamic_zones": [
                            { "id": 1, "type": "text", "text": "Your Name",
                              "x": 100, "y": 600, "width": 400, "height": 120,
                              "rotation": 0, "fontSize": 48, "fontFamily": "Pacifico",
                              "color": "#B03060", "textAlign": "center", "maxChars": 30 }
                        ]
                    },
                    "left_inner": { "background_url": null, "static_zones": [], "dynamic_zones": [] },
                    "right_inner": {
                        "background_url": null,
                        "static_zones": [],
                        "dynamic_zones": [
                            { "id": "msg", "type": "text", "text": "Inside Msg",
                              "x": 60, "y": 100, "width": 480, "height": 600,
                              "rotation": 0, "fontSize": 28, "fontFamily": "'Noto Sans JP', sans-serif" }
                        ]
                    },
                    "back": { "background_url": null, "static_zones": [], "dynamic_zones": [] }
                }
            }
        }"##
        .to_string()
    }

    #[test]
    fn test_parse_full_document() {
        let doc = DesignDocument::from_json(&sample_json()).expect("should parse");
        assert_eq!(doc.sku, "PC-001");
        assert_eq!(doc.canvas_settings.width, 600);
        assert_eq!(doc.slide(SlideKey::Front).dynamic_zones.len(), 1);
        assert_eq!(doc.slide(SlideKey::Front).static_zones.len(), 1);

        let zone = &doc.slide(SlideKey::Front).dynamic_zones[0];
        assert_eq!(zone.id, ZoneId::from("1"));
        let attrs = zone.text_attrs().expect("text zone");
        assert_eq!(attrs.font_size, Some(48.0));
        assert_eq!(attrs.text_align, Some(TextAlign::Center));
        assert_eq!(zone.max_chars(), 30);
    }

    #[test]
    fn test_numeric_and_string_zone_ids() {
        let doc = DesignDocument::from_json(&sample_json()).expect("should parse");
        // Numeric id 1 and string id "msg" both resolve.
        assert!(doc.dynamic_zone(&ZoneId::from("1")).is_some());
        assert!(doc.dynamic_zone(&ZoneId::from("msg")).is_some());
        assert!(doc.dynamic_zone(&ZoneId::from("nope")).is_none());
    }

    #[test]
    fn test_emoji_zone_kind() {
        let doc = DesignDocument::from_json(&sample_json()).expect("should parse");
        let zone = &doc.slide(SlideKey::Front).static_zones[0];
        match &zone.kind {
            ZoneKind::Emoji(attrs) => assert_eq!(attrs.emoji, "🎂"),
            other => panic!("expected emoji zone, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_slide_is_malformed() {
        let json = sample_json().replace("\"back\"", "\"verso\"");
        let err = DesignDocument::from_json(&json).expect_err("should fail");
        assert!(matches!(err, CardError::MalformedDocument(_)));
    }

    #[test]
    fn test_missing_canvas_settings_is_malformed() {
        let json = sample_json().replace("canvas_settings", "canvas");
        let err = DesignDocument::from_json(&json).expect_err("should fail");
        assert!(matches!(err, CardError::MalformedDocument(_)));
    }

    #[test]
    fn test_missing_zone_geometry_is_malformed() {
        let json = sample_json().replace("\"x\": 100,", "");
        let err = DesignDocument::from_json(&json).expect_err("should fail");
        assert!(matches!(err, CardError::MalformedDocument(_)));
    }

    #[test]
    fn test_zero_height_zone_is_malformed() {
        let json = sample_json().replace("\"height\": 120", "\"height\": 0");
        let err = DesignDocument::from_json(&json).expect_err("should fail");
        assert!(matches!(err, CardError::MalformedDocument(_)));
    }

    #[test]
    fn test_duplicate_zone_id_is_malformed() {
        let json = sample_json().replace("\"id\": 10", "\"id\": 1");
        let err = DesignDocument::from_json(&json).expect_err("should fail");
        assert!(matches!(err, CardError::MalformedDocument(_)));
    }

    #[test]
    fn test_default_max_chars() {
        let doc = DesignDocument::from_json(&sample_json()).expect("should parse");
        let zone = doc.dynamic_zone(&ZoneId::from("msg")).expect("zone");
        assert_eq!(zone.max_chars(), DEFAULT_MAX_CHARS);
    }

    #[test]
    fn test_font_families_deduplicated() {
        let doc = DesignDocument::from_json(&sample_json()).expect("should parse");
        let families = doc.font_families();
        assert_eq!(families.len(), 2);
        assert!(families.contains(&"Pacifico".to_string()));
        assert!(families.contains(&"'Noto Sans JP', sans-serif".to_string()));
    }

    #[test]
    fn test_slide_iteration_order() {
        let doc = DesignDocument::from_json(&sample_json()).expect("should parse");
        let keys: Vec<SlideKey> = doc.design_data.slides.faces().map(|(k, _)| k).collect();
        assert_eq!(keys, SlideKey::ORDER.to_vec());
    }
}
