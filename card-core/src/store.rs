//! Customization store - owned, validated access to the overlay.
//!
//! The store is the only mutable shared state in a viewing session. It is
//! exclusively owned by that session (a single logical writer), validates
//! every write against the design document, and flushes the overlay to a
//! [`DraftStore`] keyed by SKU on every accepted mutation.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    CardError, CardResult, CustomizationOverlay, DesignDocument, StyleOverride, ZoneId, ZoneKind,
};

/// Durable storage for customization drafts, keyed by SKU.
///
/// Implementations must persist `inputs` and `styles` as one unit: a
/// restored draft never carries text without its matching styles or vice
/// versa.
pub trait DraftStore {
    /// Load the draft for a SKU, if one was saved.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::DraftCorrupt`] if a stored draft fails to
    /// parse, or [`CardError::Io`] on read failure.
    fn load(&self, sku: &str) -> CardResult<Option<CustomizationOverlay>>;

    /// Save the draft for a SKU, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Io`] or [`CardError::Serialization`] on
    /// write failure.
    fn save(&mut self, sku: &str, overlay: &CustomizationOverlay) -> CardResult<()>;
}

/// Filesystem-backed draft storage: one JSON file per SKU in a data
/// directory.
#[derive(Debug)]
pub struct FileDraftStore {
    data_dir: PathBuf,
}

impl FileDraftStore {
    /// Create a store rooted at `data_dir`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::Io`] if the directory cannot be created.
    pub fn new(data_dir: impl Into<PathBuf>) -> CardResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    fn path(&self, sku: &str) -> PathBuf {
        self.data_dir
            .join(format!("draft_{}.json", sanitize_filename(sku)))
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self, sku: &str) -> CardResult<Option<CustomizationOverlay>> {
        let path = self.path(sku);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CardError::Io(e)),
        };
        let overlay = serde_json::from_str(&contents)
            .map_err(|e| CardError::DraftCorrupt(e.to_string()))?;
        Ok(Some(overlay))
    }

    fn save(&mut self, sku: &str, overlay: &CustomizationOverlay) -> CardResult<()> {
        let json = serde_json::to_string_pretty(overlay)?;
        std::fs::write(self.path(sku), json)?;
        Ok(())
    }
}

/// In-memory draft storage for tests and hosts with their own durable
/// layer.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    drafts: HashMap<String, String>,
}

impl MemoryDraftStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self, sku: &str) -> CardResult<Option<CustomizationOverlay>> {
        let Some(json) = self.drafts.get(sku) else {
            return Ok(None);
        };
        let overlay =
            serde_json::from_str(json).map_err(|e| CardError::DraftCorrupt(e.to_string()))?;
        Ok(Some(overlay))
    }

    fn save(&mut self, sku: &str, overlay: &CustomizationOverlay) -> CardResult<()> {
        let json = serde_json::to_string(overlay)?;
        self.drafts.insert(sku.to_string(), json);
        Ok(())
    }
}

/// Validated, auto-persisting access to one card's customization.
pub struct CustomizationStore {
    document: Arc<DesignDocument>,
    overlay: CustomizationOverlay,
    drafts: Box<dyn DraftStore>,
    persistence_enabled: bool,
}

impl std::fmt::Debug for CustomizationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomizationStore")
            .field("sku", &self.document.sku)
            .field("overlay", &self.overlay)
            .field("persistence_enabled", &self.persistence_enabled)
            .finish_non_exhaustive()
    }
}

impl CustomizationStore {
    /// Create a store with an empty overlay for the given document.
    #[must_use]
    pub fn new(
        document: Arc<DesignDocument>,
        drafts: Box<dyn DraftStore>,
        persistence_enabled: bool,
    ) -> Self {
        Self {
            document,
            overlay: CustomizationOverlay::default(),
            drafts,
            persistence_enabled,
        }
    }

    /// Load a previously saved draft for this document's SKU, if present.
    ///
    /// Must complete before the overlay is considered ready so no
    /// keystroke is lost to a late overwrite. A corrupt draft is discarded
    /// and the overlay starts empty; this is never fatal.
    pub fn hydrate(&mut self) {
        if !self.persistence_enabled {
            return;
        }
        match self.drafts.load(&self.document.sku) {
            Ok(Some(overlay)) => {
                tracing::debug!(sku = %self.document.sku, "hydrated draft");
                self.overlay = overlay;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(sku = %self.document.sku, "discarding unreadable draft: {e}");
                self.overlay = CustomizationOverlay::default();
            }
        }
    }

    /// Set the text of a dynamic zone.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::ZoneNotFound`] if no dynamic zone has this id,
    /// or [`CardError::InputRejected`] when the value exceeds the zone's
    /// character limit or the zone is not a text zone. A rejected write
    /// changes nothing.
    pub fn set_text(&mut self, id: &ZoneId, value: &str) -> CardResult<()> {
        let zone = self
            .document
            .dynamic_zone(id)
            .ok_or_else(|| CardError::ZoneNotFound(id.to_string()))?;
        if !matches!(zone.kind, ZoneKind::Text(_)) {
            return Err(CardError::InputRejected {
                zone: id.to_string(),
                reason: "not a text zone".into(),
            });
        }
        let limit = zone.max_chars();
        let len = value.chars().count();
        if len > limit {
            return Err(CardError::InputRejected {
                zone: id.to_string(),
                reason: format!("{len} chars exceeds limit {limit}"),
            });
        }
        self.overlay.set_text(id.clone(), value);
        self.flush();
        Ok(())
    }

    /// Merge a partial style override into a dynamic zone's existing one.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::ZoneNotFound`] if no dynamic zone has this id.
    pub fn set_style(&mut self, id: &ZoneId, partial: &StyleOverride) -> CardResult<()> {
        if self.document.dynamic_zone(id).is_none() {
            return Err(CardError::ZoneNotFound(id.to_string()));
        }
        self.overlay.merge_style(id.clone(), partial);
        self.flush();
        Ok(())
    }

    /// Write the current overlay to durable storage, keyed by SKU.
    ///
    /// # Errors
    ///
    /// Returns the underlying storage error. Automatic flushes after
    /// mutations downgrade the same failure to a warning instead.
    pub fn persist(&mut self) -> CardResult<()> {
        if !self.persistence_enabled {
            return Ok(());
        }
        self.drafts.save(&self.document.sku, &self.overlay)
    }

    /// The current overlay.
    #[must_use]
    pub fn overlay(&self) -> &CustomizationOverlay {
        &self.overlay
    }

    /// The document this store customizes.
    #[must_use]
    pub fn document(&self) -> &Arc<DesignDocument> {
        &self.document
    }

    fn flush(&mut self) {
        if !self.persistence_enabled {
            return;
        }
        if let Err(e) = self.drafts.save(&self.document.sku, &self.overlay) {
            tracing::warn!(sku = %self.document.sku, "failed to persist draft: {e}");
        }
    }
}

/// Sanitize a SKU for use as a filename.
///
/// Replaces any character that is not alphanumeric, `-`, or `_` with `_`.
fn sanitize_filename(sku: &str) -> String {
    sku.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
