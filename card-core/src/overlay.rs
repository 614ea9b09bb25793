//! Customization overlay - the user's text and style edits.
//!
//! The overlay is distinct from the admin-authored template: it holds only
//! what the buyer typed and picked, keyed by zone id, and serializes as a
//! single `{inputs, styles}` unit so a draft restore is atomic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ZoneId;

/// A per-zone override of the admin-authored text style.
///
/// Absent fields inherit the admin default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOverride {
    /// Replacement font family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Replacement text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl StyleOverride {
    /// Merge another override into this one, field by field.
    ///
    /// Fields set in `other` win; fields absent in `other` keep their
    /// current value. This is never a wholesale replacement.
    pub fn merge(&mut self, other: &Self) {
        if let Some(family) = &other.font_family {
            self.font_family = Some(family.clone());
        }
        if let Some(color) = &other.color {
            self.color = Some(color.clone());
        }
    }

    /// Whether no field is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.font_family.is_none() && self.color.is_none()
    }
}

/// The user's current customization of one card, keyed by zone id.
///
/// Created empty on session start, hydrated from a durable draft when one
/// exists, and never shared across different SKUs. Sorted maps keep the
/// persisted form deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomizationOverlay {
    /// Current text per zone. An entry may be the empty string; the
    /// compositor decides whether that shows a placeholder.
    #[serde(default)]
    pub inputs: BTreeMap<ZoneId, String>,
    /// Style overrides per zone. Absent entries inherit admin defaults.
    #[serde(default)]
    pub styles: BTreeMap<ZoneId, StyleOverride>,
}

impl CustomizationOverlay {
    /// Current text for a zone, if the user has typed anything.
    #[must_use]
    pub fn text(&self, id: &ZoneId) -> Option<&str> {
        self.inputs.get(id).map(String::as_str)
    }

    /// Style override for a zone, if the user picked one.
    #[must_use]
    pub fn style(&self, id: &ZoneId) -> Option<&StyleOverride> {
        self.styles.get(id)
    }

    /// Record the text for a zone. Limit enforcement happens in the
    /// store, before this is called.
    pub fn set_text(&mut self, id: ZoneId, value: impl Into<String>) {
        self.inputs.insert(id, value.into());
    }

    /// Merge a partial style into the zone's existing override.
    pub fn merge_style(&mut self, id: ZoneId, partial: &StyleOverride) {
        self.styles.entry(id).or_default().merge(partial);
    }

    /// Whether the user has made no edits at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut style = StyleOverride {
            font_family: Some("Pacifico".into()),
            color: None,
        };
        style.merge(&StyleOverride {
            font_family: None,
            color: Some("#112233".into()),
        });
        assert_eq!(style.font_family.as_deref(), Some("Pacifico"));
        assert_eq!(style.color.as_deref(), Some("#112233"));
    }

    #[test]
    fn test_merge_overwrites_set_fields() {
        let mut style = StyleOverride {
            font_family: Some("Pacifico".into()),
            color: Some("#000".into()),
        };
        style.merge(&StyleOverride {
            font_family: Some("Caveat".into()),
            color: None,
        });
        assert_eq!(style.font_family.as_deref(), Some("Caveat"));
        assert_eq!(style.color.as_deref(), Some("#000"));
    }

    #[test]
    fn test_overlay_roundtrip_wire_format() {
        let mut overlay = CustomizationOverlay::default();
        overlay.set_text(ZoneId::from("1"), "Happy Birthday");
        overlay.set_text(ZoneId::from("msg"), "");
        overlay.merge_style(
            ZoneId::from("1"),
            &StyleOverride {
                font_family: Some("Caveat".into()),
                color: None,
            },
        );

        let json = serde_json::to_string(&overlay).expect("serialize");
        // The draft wire format is a single {inputs, styles} unit.
        assert!(json.contains("\"inputs\""));
        assert!(json.contains("\"styles\""));

        let restored: CustomizationOverlay = serde_json::from_str(&json).expect("parse");
        assert_eq!(restored, overlay);
        assert_eq!(restored.text(&ZoneId::from("msg")), Some(""));
    }

    #[test]
    fn test_empty_overlay() {
        let overlay = CustomizationOverlay::default();
        assert!(overlay.is_empty());
        assert!(overlay.text(&ZoneId::from("1")).is_none());
    }
}
