//! Font registry - idempotent, injected font acquisition.
//!
//! Font loading is the engine's only network side effect besides the
//! initial document fetch. Rather than reaching for a global loader, the
//! engine is handed a [`FontSource`] capability and tracks per-family
//! status here. Acquisition is fire-and-forget: rendering proceeds with a
//! fallback family and re-fits once a family resolves, and a failed load
//! never blocks text entry.

use std::collections::HashMap;

/// Family used when nothing requested has resolved.
pub const FALLBACK_FONT_FAMILY: &str = "Arial";

/// Lifecycle of one requested family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStatus {
    /// Requested, not yet available for rendering.
    Pending,
    /// Available for measurement and rendering.
    Resolved,
    /// Acquisition failed or timed out; the fallback chain applies.
    Failed,
}

/// Capability that makes a font family available to the host.
///
/// `request` is called at most once per normalized family; the registry
/// handles deduplication. Sources backed by local/system fonts can return
/// [`FontStatus::Resolved`] immediately; web sources return
/// [`FontStatus::Pending`] and the host later reports completion through
/// [`FontRegistry::mark_resolved`] or [`FontRegistry::mark_failed`].
pub trait FontSource {
    /// Kick off acquisition of a family and report its initial status.
    fn request(&mut self, family: &str) -> FontStatus;
}

/// Source for hosts where every family is already installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFontSource;

impl FontSource for SystemFontSource {
    fn request(&mut self, _family: &str) -> FontStatus {
        FontStatus::Resolved
    }
}

/// Tracks which families have been requested and which are usable.
pub struct FontRegistry {
    source: Box<dyn FontSource>,
    statuses: HashMap<String, FontStatus>,
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRegistry")
            .field("statuses", &self.statuses)
            .finish_non_exhaustive()
    }
}

impl FontRegistry {
    /// Create a registry over the given acquisition capability.
    #[must_use]
    pub fn new(source: Box<dyn FontSource>) -> Self {
        Self {
            source,
            statuses: HashMap::new(),
        }
    }

    /// Ensure a family has been requested. Idempotent: repeated calls for
    /// the same family return the recorded status without re-requesting.
    pub fn ensure(&mut self, family: &str) -> FontStatus {
        let family = normalize_family(family);
        if family.is_empty() {
            return FontStatus::Failed;
        }
        if let Some(&status) = self.statuses.get(&family) {
            return status;
        }
        let status = self.source.request(&family);
        tracing::debug!(%family, ?status, "requested font family");
        self.statuses.insert(family, status);
        status
    }

    /// Recorded status of a family, if it was ever requested.
    #[must_use]
    pub fn status(&self, family: &str) -> Option<FontStatus> {
        self.statuses.get(&normalize_family(family)).copied()
    }

    /// Report that an asynchronously requested family became available.
    /// The next frame composition re-fits with it.
    pub fn mark_resolved(&mut self, family: &str) {
        self.statuses
            .insert(normalize_family(family), FontStatus::Resolved);
    }

    /// Report that acquisition of a family failed. Rendering continues on
    /// the fallback chain.
    pub fn mark_failed(&mut self, family: &str) {
        let family = normalize_family(family);
        tracing::warn!(%family, "font acquisition failed, using fallback");
        self.statuses.insert(family, FontStatus::Failed);
    }

    /// Whether a family can be used for rendering right now.
    ///
    /// The engine fallback family is always usable.
    #[must_use]
    pub fn is_usable(&self, family: &str) -> bool {
        let family = normalize_family(family);
        family == FALLBACK_FONT_FAMILY
            || self.statuses.get(&family) == Some(&FontStatus::Resolved)
    }

    /// First usable family in a preference chain, falling back to
    /// [`FALLBACK_FONT_FAMILY`].
    #[must_use]
    pub fn effective_family<'a, I>(&self, chain: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        chain
            .into_iter()
            .map(normalize_family)
            .find(|family| self.is_usable(family))
            .unwrap_or_else(|| FALLBACK_FONT_FAMILY.to_string())
    }
}

/// Normalize a raw authored family to a single requestable name.
///
/// Admin data may carry a full CSS stack such as
/// `"'Noto Sans JP', sans-serif"`; the first entry, unquoted and
/// trimmed, is the requestable family.
#[must_use]
pub fn normalize_family(raw: &str) -> String {
    raw.split(',')
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_string()
}

/// Stylesheet request URL for a family, for web hosts that acquire fonts
/// through a CSS service.
#[must_use]
pub fn stylesheet_url(family: &str) -> String {
    let family = normalize_family(family).replace(' ', "+");
    format!("https://fonts.googleapis.com/css2?family={family}&display=swap")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source that counts requests and answers from a fixed table.
    struct ScriptedSource {
        available: Vec<String>,
        requests: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    }

    impl FontSource for ScriptedSource {
        fn request(&mut self, family: &str) -> FontStatus {
            self.requests.borrow_mut().push(family.to_string());
            if self.available.iter().any(|f| f == family) {
                FontStatus::Resolved
            } else {
                FontStatus::Pending
            }
        }
    }

    fn scripted(available: &[&str]) -> (FontRegistry, std::rc::Rc<std::cell::RefCell<Vec<String>>>) {
        let requests = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let source = ScriptedSource {
            available: available.iter().map(ToString::to_string).collect(),
            requests: std::rc::Rc::clone(&requests),
        };
        (FontRegistry::new(Box::new(source)), requests)
    }

    #[test]
    fn test_normalize_family() {
        assert_eq!(normalize_family("'Noto Sans JP', sans-serif"), "Noto Sans JP");
        assert_eq!(normalize_family("\"Pacifico\""), "Pacifico");
        assert_eq!(normalize_family("  Caveat "), "Caveat");
        assert_eq!(normalize_family("Arial"), "Arial");
    }

    #[test]
    fn test_stylesheet_url_encodes_spaces() {
        assert_eq!(
            stylesheet_url("'Noto Sans JP', sans-serif"),
            "https://fonts.googleapis.com/css2?family=Noto+Sans+JP&display=swap"
        );
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let (mut registry, requests) = scripted(&["Pacifico"]);
        assert_eq!(registry.ensure("Pacifico"), FontStatus::Resolved);
        assert_eq!(registry.ensure("Pacifico"), FontStatus::Resolved);
        // The raw CSS stack normalizes to the same request.
        assert_eq!(registry.ensure("'Pacifico', cursive"), FontStatus::Resolved);
        assert_eq!(requests.borrow().len(), 1);
    }

    #[test]
    fn test_pending_family_not_usable_until_resolved() {
        let (mut registry, _) = scripted(&[]);
        assert_eq!(registry.ensure("Caveat"), FontStatus::Pending);
        assert!(!registry.is_usable("Caveat"));
        registry.mark_resolved("Caveat");
        assert!(registry.is_usable("Caveat"));
    }

    #[test]
    fn test_effective_family_prefers_chain_order() {
        let (mut registry, _) = scripted(&["Caveat"]);
        registry.ensure("Caveat");
        registry.ensure("Unobtainium");
        registry.mark_failed("Unobtainium");
        assert_eq!(
            registry.effective_family(["Unobtainium", "Caveat"]),
            "Caveat"
        );
        assert_eq!(registry.effective_family(["Caveat", "Unobtainium"]), "Caveat");
    }

    #[test]
    fn test_effective_family_falls_back() {
        let (mut registry, _) = scripted(&[]);
        registry.ensure("Ghost");
        registry.mark_failed("Ghost");
        assert_eq!(registry.effective_family(["Ghost"]), FALLBACK_FONT_FAMILY);
        assert_eq!(registry.effective_family([]), FALLBACK_FONT_FAMILY);
    }

    #[test]
    fn test_fallback_always_usable() {
        let (registry, _) = scripted(&[]);
        assert!(registry.is_usable("Arial"));
    }
}
