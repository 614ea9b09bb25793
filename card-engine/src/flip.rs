//! Page navigation and flip layout.
//!
//! The card is modeled as two physical leaves. The cover leaf carries
//! `front` on its outer face and `left_inner` on its inner face; the base
//! leaf carries `right_inner` outward and `back` on its reverse. The
//! navigation machine is synchronous: a transition takes effect
//! immediately and animation timing is purely a host rendering concern.
//!
//! ```text
//!   front          inner                     back
//!  ┌──────┐      ┌──────┬──────┐           ┌──────┐
//!  │front │  →   │ left │right │     →     │ back │
//!  │      │  ←   │inner │inner │     ←     │      │
//!  └──────┘      └──────┴──────┘           └──────┘
//!   cover on top   cover leaf open          base on top
//! ```

use card_core::SlideKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Z-order of the leaf that currently sits on top.
pub const Z_LEAF_TOP: i32 = 20;
/// Z-order of the base leaf while the cover is on top.
pub const Z_LEAF_MIDDLE: i32 = 10;
/// Z-order of the cover leaf once the card shows its back.
pub const Z_LEAF_BEHIND: i32 = 0;

/// The three navigation modes of the card viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    /// Closed card, cover visible.
    Front,
    /// Open card, both inner faces visible side by side.
    Inner,
    /// Closed card flipped over, reverse visible.
    Back,
}

/// A transition between non-adjacent view states.
///
/// The machine has no direct `front ↔ back` edge; it must pass through
/// `inner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported view transition: {from:?} -> {to:?}")]
pub struct IllegalTransition {
    /// State the machine was in.
    pub from: ViewState,
    /// State that was requested.
    pub to: ViewState,
}

/// Sequential page navigator over the canonical four-slide order.
///
/// The 4-position index is the ground truth; [`ViewState`] is a derived
/// projection of it. While the projection reads `Inner`, both inner faces
/// are visible and tracked; the index merely records which of the pair
/// sequential stepping is parked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageNavigator {
    index: usize,
}

impl PageNavigator {
    /// Start at the front cover.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position in [`SlideKey::ORDER`].
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Slide the sequential navigation is parked on.
    #[must_use]
    pub fn current_slide(&self) -> SlideKey {
        SlideKey::ORDER[self.index]
    }

    /// The derived three-state projection of the current index.
    #[must_use]
    pub fn view_state(&self) -> ViewState {
        match self.index {
            0 => ViewState::Front,
            1 | 2 => ViewState::Inner,
            _ => ViewState::Back,
        }
    }

    /// Step forward one page. Clamped: returns `false` at the last page.
    pub fn advance(&mut self) -> bool {
        if self.index + 1 < SlideKey::ORDER.len() {
            self.index += 1;
            tracing::debug!(slide = %self.current_slide(), "page advanced");
            true
        } else {
            false
        }
    }

    /// Step back one page. Clamped: returns `false` at the first page.
    pub fn retreat(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            tracing::debug!(slide = %self.current_slide(), "page retreated");
            true
        } else {
            false
        }
    }

    /// Move to a view state through a legal edge.
    ///
    /// Legal edges are `front ↔ inner` and `inner ↔ back`; requesting the
    /// current state is a no-op. Entering `inner` parks the index on
    /// `left_inner`; both inner faces render regardless.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalTransition`] for `front ↔ back`, leaving the
    /// state unchanged.
    pub fn transition(&mut self, to: ViewState) -> Result<(), IllegalTransition> {
        let from = self.view_state();
        if from == to {
            return Ok(());
        }
        match (from, to) {
            (ViewState::Front | ViewState::Back, ViewState::Inner) => {
                self.index = 1;
                Ok(())
            }
            (ViewState::Inner, ViewState::Front) => {
                self.index = 0;
                Ok(())
            }
            (ViewState::Inner, ViewState::Back) => {
                self.index = 3;
                Ok(())
            }
            _ => Err(IllegalTransition { from, to }),
        }
    }
}

/// Geometry the host applies to the two leaves for a view state.
///
/// Angles are degrees about the vertical axis; the shift is a fraction of
/// the canvas width. The z-order swap between the leaves is keyed only on
/// the back state, never on the open state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlipLayout {
    /// Rotation of the whole assembly; `-180` when showing the back.
    pub assembly_rotation_y: f32,
    /// Horizontal shift of the whole assembly as a fraction of the
    /// canvas width; `0.5` when the spread is open so both faces fit.
    pub assembly_shift: f32,
    /// Rotation of the cover leaf about its left edge; `-180` when open.
    pub cover_rotation_y: f32,
    /// Z-order of the cover leaf.
    pub cover_z: i32,
    /// Z-order of the base leaf.
    pub base_z: i32,
}

impl FlipLayout {
    /// Layout for a view state.
    #[must_use]
    pub fn for_state(state: ViewState) -> Self {
        let is_inner = state == ViewState::Inner;
        let is_back = state == ViewState::Back;
        Self {
            assembly_rotation_y: if is_back { -180.0 } else { 0.0 },
            assembly_shift: if is_inner { 0.5 } else { 0.0 },
            cover_rotation_y: if is_inner { -180.0 } else { 0.0 },
            cover_z: if is_back { Z_LEAF_BEHIND } else { Z_LEAF_TOP },
            base_z: if is_back { Z_LEAF_TOP } else { Z_LEAF_MIDDLE },
        }
    }
}

/// Faces rendered in a view state, in draw order.
#[must_use]
pub fn visible_faces(state: ViewState) -> &'static [SlideKey] {
    match state {
        ViewState::Front => &[SlideKey::Front],
        ViewState::Inner => &[SlideKey::LeftInner, SlideKey::RightInner],
        ViewState::Back => &[SlideKey::Back],
    }
}
