//! Viewing session - the one configurable engine behind every surface.
//!
//! A [`CardSession`] owns a validated document, the customization store,
//! the page navigator, and the font registry, and produces complete
//! frames on demand. Nothing layout-related is cached between frames:
//! every composition re-resolves styles and re-runs the auto-fit pass, so
//! a content, geometry, or font change is always reflected in the next
//! frame the host paints.
//!
//! The same type serves the editor, the read-only preview, and anything
//! in between; the differences are [`EngineConfig`] capability flags, not
//! forked logic.

use std::sync::Arc;

use card_core::{
    CanvasSettings, CardError, CardResult, CustomizationStore, DesignDocument, DraftStore,
    SlideKey, StyleOverride, ZoneId,
};
use serde::{Deserialize, Serialize};

use crate::compositor::{Compositor, RenderItem};
use crate::flip::{visible_faces, FlipLayout, IllegalTransition, PageNavigator, ViewState};
use crate::fonts::{FontRegistry, FontSource};
use crate::measure::TextMeasurer;
use crate::scale::{aspect_ratio, scale_factor, ScaleMode};
use crate::EngineConfig;

/// The render list of one visible face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceFrame {
    /// Which face this is.
    pub slide: SlideKey,
    /// Ordered render list, bottom first.
    pub items: Vec<RenderItem>,
}

/// A complete, self-consistent description of what to paint.
///
/// Produced synchronously from the current state; the host applies
/// `scale` as the outer uniform transform and `flip` to the two leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    /// Navigation mode the frame was composed for.
    pub view: ViewState,
    /// Uniform design-to-viewport factor.
    pub scale: f32,
    /// The design-space coordinate system of all frame geometry.
    pub canvas: CanvasSettings,
    /// Leaf rotations, shift, and z-order for the flip.
    pub flip: FlipLayout,
    /// Render lists for the faces visible in this view state.
    pub faces: Vec<FaceFrame>,
}

/// An interactive viewing session over one card template.
pub struct CardSession {
    document: Arc<DesignDocument>,
    store: CustomizationStore,
    navigator: PageNavigator,
    fonts: FontRegistry,
    measurer: Box<dyn TextMeasurer>,
    config: EngineConfig,
    container_width: f32,
}

impl std::fmt::Debug for CardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardSession")
            .field("sku", &self.document.sku)
            .field("view", &self.navigator.view_state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CardSession {
    /// Start a session over a validated document.
    ///
    /// Hydrates any saved draft before edits are accepted (no keystroke
    /// can be lost to a late overwrite) and requests every font family
    /// referenced by the document's dynamic zones, fire-and-forget.
    #[must_use]
    pub fn new(
        document: Arc<DesignDocument>,
        drafts: Box<dyn DraftStore>,
        font_source: Box<dyn FontSource>,
        measurer: Box<dyn TextMeasurer>,
        config: EngineConfig,
    ) -> Self {
        let mut store = CustomizationStore::new(
            Arc::clone(&document),
            drafts,
            config.draft_persistence_enabled,
        );
        store.hydrate();

        let mut fonts = FontRegistry::new(font_source);
        for family in document.font_families() {
            fonts.ensure(&family);
        }

        tracing::debug!(sku = %document.sku, "card session started");
        Self {
            document,
            store,
            navigator: PageNavigator::new(),
            fonts,
            measurer,
            config,
            container_width: 0.0,
        }
    }

    /// The document this session views.
    #[must_use]
    pub fn document(&self) -> &Arc<DesignDocument> {
        &self.document
    }

    /// The session's capability flags.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Set the text of a dynamic zone.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::InputRejected`] when the session is not
    /// editable or the value exceeds the zone's character limit, and
    /// [`CardError::ZoneNotFound`] for an unknown zone. Rejected writes
    /// change nothing.
    pub fn set_text(&mut self, id: &ZoneId, value: &str) -> CardResult<()> {
        if !self.config.editable {
            return Err(CardError::InputRejected {
                zone: id.to_string(),
                reason: "session is read-only".into(),
            });
        }
        self.store.set_text(id, value)
    }

    /// Merge a style override into a dynamic zone.
    ///
    /// # Errors
    ///
    /// Returns [`CardError::InputRejected`] when the session is not
    /// editable or style overrides are disabled, and
    /// [`CardError::ZoneNotFound`] for an unknown zone.
    pub fn set_style(&mut self, id: &ZoneId, partial: &StyleOverride) -> CardResult<()> {
        if !self.config.editable || !self.config.style_overrides_enabled {
            return Err(CardError::InputRejected {
                zone: id.to_string(),
                reason: "style overrides are disabled".into(),
            });
        }
        self.store.set_style(id, partial)
    }

    /// The customization store, for read access to the overlay.
    #[must_use]
    pub fn store(&self) -> &CustomizationStore {
        &self.store
    }

    /// Write the overlay to durable storage now.
    ///
    /// Mutations already flush automatically; this exists for hosts that
    /// want an explicit checkpoint with an error they can observe.
    ///
    /// # Errors
    ///
    /// Returns the underlying storage error.
    pub fn persist(&mut self) -> CardResult<()> {
        self.store.persist()
    }

    // -----------------------------------------------------------------------
    // Fonts
    // -----------------------------------------------------------------------

    /// Host callback: an asynchronously requested family became
    /// available. The next composed frame re-fits with it.
    pub fn font_resolved(&mut self, family: &str) {
        self.fonts.mark_resolved(family);
    }

    /// Host callback: acquisition of a family failed. Rendering continues
    /// on the fallback chain; text entry is never blocked.
    pub fn font_failed(&mut self, family: &str) {
        self.fonts.mark_failed(family);
    }

    /// The session's font registry.
    #[must_use]
    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Current navigation mode.
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        self.navigator.view_state()
    }

    /// Slide the sequential navigation is parked on.
    #[must_use]
    pub fn current_slide(&self) -> SlideKey {
        self.navigator.current_slide()
    }

    /// Step forward one page, clamped at the back.
    pub fn advance(&mut self) -> bool {
        self.navigator.advance()
    }

    /// Step back one page, clamped at the front.
    pub fn retreat(&mut self) -> bool {
        self.navigator.retreat()
    }

    /// Move to a view state through a legal edge.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalTransition`] for `front ↔ back`.
    pub fn transition(&mut self, to: ViewState) -> Result<(), IllegalTransition> {
        self.navigator.transition(to)
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// Report the host container's available width in viewport pixels.
    pub fn set_container_width(&mut self, width: f32) {
        self.container_width = width;
    }

    /// Uniform scale for the current view state and container width.
    #[must_use]
    pub fn scale(&self) -> f32 {
        scale_factor(
            self.container_width,
            &self.document.canvas_settings,
            ScaleMode::for_view(self.view_state()),
        )
    }

    /// Unclamped scale for a listing-grid thumbnail of this card.
    #[must_use]
    pub fn thumbnail_scale(&self, container_width: f32) -> f32 {
        scale_factor(
            container_width,
            &self.document.canvas_settings,
            ScaleMode::Thumbnail,
        )
    }

    /// Canvas aspect for letterboxing a fixed-aspect thumbnail frame.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        aspect_ratio(&self.document.canvas_settings)
    }

    // -----------------------------------------------------------------------
    // Composition
    // -----------------------------------------------------------------------

    /// Compose a complete frame for the current state.
    ///
    /// Synchronous with the state it reads: styles are re-resolved and
    /// auto-fit re-runs for every dynamic zone, so no stale font size can
    /// reach the host's paint.
    #[must_use]
    pub fn compose_frame(&self) -> SceneFrame {
        let view = self.view_state();
        let compositor = Compositor {
            measurer: self.measurer.as_ref(),
            fonts: &self.fonts,
            config: &self.config,
        };
        let faces = visible_faces(view)
            .iter()
            .map(|&slide| FaceFrame {
                slide,
                items: compositor.compose_slide(self.document.slide(slide), self.store.overlay()),
            })
            .collect();

        SceneFrame {
            view,
            scale: self.scale(),
            canvas: self.document.canvas_settings,
            flip: FlipLayout::for_state(view),
            faces,
        }
    }

    /// Render list for one face regardless of navigation state, e.g. for
    /// a thumbnail of the front.
    #[must_use]
    pub fn compose_face(&self, slide: SlideKey) -> Vec<RenderItem> {
        let compositor = Compositor {
            measurer: self.measurer.as_ref(),
            fonts: &self.fonts,
            config: &self.config,
        };
        compositor.compose_slide(self.document.slide(slide), self.store.overlay())
    }
}

impl Drop for CardSession {
    /// Final flush on teardown so the draft always reflects the last
    /// accepted edit. Read-only sessions never write.
    fn drop(&mut self) {
        if !self.config.editable {
            return;
        }
        if let Err(e) = self.store.persist() {
            tracing::warn!(sku = %self.document.sku, "final draft flush failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::SystemFontSource;
    use crate::measure::AdvanceWidthMeasurer;
    use card_core::{
        CanvasSettings, DesignData, MemoryDraftStore, Slide, Slides, TextAttrs, Zone, ZoneKind,
    };

    fn document() -> Arc<DesignDocument> {
        let name_zone = Zone {
            id: ZoneId::from("name"),
            x: 100.0,
            y: 600.0,
            width: 400.0,
            height: 120.0,
            rotation: 0.0,
            kind: ZoneKind::Text(TextAttrs {
                text: Some("Your Name".into()),
                font_size: Some(48.0),
                font_family: Some("Pacifico".into()),
                max_chars: Some(30),
                ..TextAttrs::default()
            }),
        };
        let msg_zone = Zone {
            id: ZoneId::from("msg"),
            x: 60.0,
            y: 100.0,
            width: 480.0,
            height: 600.0,
            rotation: 0.0,
            kind: ZoneKind::Text(TextAttrs {
                text: Some("Inside Msg".into()),
                font_size: Some(28.0),
                ..TextAttrs::default()
            }),
        };
        Arc::new(DesignDocument {
            id: 7,
            sku: "PC-001".into(),
            title: "Birthday Blooms".into(),
            canvas_settings: CanvasSettings {
                width: 600,
                height: 850,
            },
            design_data: DesignData {
                slides: Slides {
                    front: Slide {
                        background_url: Some("https://cdn.example/front.jpg".into()),
                        static_zones: Vec::new(),
                        dynamic_zones: vec![name_zone],
                    },
                    left_inner: Slide::default(),
                    right_inner: Slide {
                        background_url: None,
                        static_zones: Vec::new(),
                        dynamic_zones: vec![msg_zone],
                    },
                    back: Slide::default(),
                },
            },
        })
    }

    fn session(config: EngineConfig) -> CardSession {
        CardSession::new(
            document(),
            Box::new(MemoryDraftStore::new()),
            Box::new(SystemFontSource),
            Box::new(AdvanceWidthMeasurer::new()),
            config,
        )
    }

    #[test]
    fn test_session_requests_document_fonts() {
        let session = session(EngineConfig::default());
        assert!(session.fonts().is_usable("Pacifico"));
    }

    #[test]
    fn test_read_only_session_rejects_edits() {
        let mut session = session(EngineConfig::preview());
        let err = session
            .set_text(&ZoneId::from("name"), "Grandma")
            .expect_err("read-only");
        assert!(matches!(err, CardError::InputRejected { .. }));
        let err = session
            .set_style(
                &ZoneId::from("name"),
                &StyleOverride {
                    font_family: Some("Caveat".into()),
                    color: None,
                },
            )
            .expect_err("read-only");
        assert!(matches!(err, CardError::InputRejected { .. }));
    }

    #[test]
    fn test_scale_follows_navigation_mode() {
        let mut session = session(EngineConfig::default());
        session.set_container_width(400.0);
        assert!((session.scale() - 400.0 / 600.0).abs() < 1e-6);

        session.transition(ViewState::Inner).expect("open");
        assert!((session.scale() - 400.0 / 1260.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_before_layout_defaults_to_one() {
        let session = session(EngineConfig::default());
        assert!((session.scale() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_frame_reflects_edit_immediately() {
        let mut session = session(EngineConfig::default());
        session
            .set_text(&ZoneId::from("name"), "Grandma")
            .expect("accepted");
        let frame = session.compose_frame();
        assert_eq!(frame.view, ViewState::Front);
        assert_eq!(frame.faces.len(), 1);
        let RenderItem::DynamicText { content, .. } = frame.faces[0]
            .items
            .last()
            .expect("dynamic zone item")
        else {
            panic!("expected dynamic text");
        };
        assert_eq!(content, "Grandma");
    }

    #[test]
    fn test_inner_frame_shows_both_faces() {
        let mut session = session(EngineConfig::default());
        session.transition(ViewState::Inner).expect("open");
        let frame = session.compose_frame();
        let slides: Vec<SlideKey> = frame.faces.iter().map(|face| face.slide).collect();
        assert_eq!(slides, vec![SlideKey::LeftInner, SlideKey::RightInner]);
    }

    #[test]
    fn test_frame_serializes_for_host_surfaces() {
        let mut session = session(EngineConfig::default());
        session
            .set_text(&ZoneId::from("name"), "Grandma")
            .expect("accepted");
        let frame = session.compose_frame();
        let json = serde_json::to_string(&frame).expect("serialize");
        assert!(json.contains("\"view\":\"front\""));
        let restored: SceneFrame = serde_json::from_str(&json).expect("parse");
        assert_eq!(restored, frame);
    }

    #[test]
    fn test_thumbnail_geometry() {
        let session = session(EngineConfig::default());
        assert!((session.aspect_ratio() - 600.0 / 850.0).abs() < 1e-6);
        assert!((session.thumbnail_scale(1200.0) - 2.0).abs() < f32::EPSILON);
        let front = session.compose_face(SlideKey::Front);
        assert!(!front.is_empty());
    }
}
