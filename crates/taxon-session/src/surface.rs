// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Surface ports: how the host talks to whatever actually draws.
//!
//! The embedder implements [`SurfaceProvider`] and [`Surface`]; the host
//! drives them. User interaction flows back as [`SurfaceEvent`]s over the
//! channel handed to `open_surface`, and prompt answers come back over
//! oneshot replies, so the traits stay object-safe and synchronous.

use crate::error::SessionError;
use crate::layout::ResolvedLayout;
use crate::renderer::Scene;
use serde_json::Value;
use std::fmt;
use tokio::sync::{mpsc, oneshot};

/// Mutation applied to the live session state; the host applies it and
/// repaints before consuming the next event (the `patch_state` contract).
pub type StatePatch = Box<dyn FnOnce(&mut Value) + Send>;

/// User-driven events a surface reports to the host.
pub enum SurfaceEvent {
    /// Apply a state patch, then repaint synchronously.
    Patch(StatePatch),
    /// Repaint without touching state.
    Rerender,
    /// Explicit save action.
    Save,
    /// Close/cancel attempt; enters the close-decision state machine.
    CloseRequested,
}

impl fmt::Debug for SurfaceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Patch(_) => "Patch",
            Self::Rerender => "Rerender",
            Self::Save => "Save",
            Self::CloseRequested => "CloseRequested",
        };
        f.write_str(name)
    }
}

/// Button labels shown by the surface.
#[derive(Debug, Clone)]
pub struct PromptLabels {
    /// Affirmative/save label.
    pub save: String,
    /// Dismissive/cancel label.
    pub cancel: String,
}

impl Default for PromptLabels {
    fn default() -> Self {
        Self {
            save: "Save".to_owned(),
            cancel: "Cancel".to_owned(),
        }
    }
}

/// Everything a surface needs to mount: title, final geometry, labels.
#[derive(Debug, Clone)]
pub struct SurfaceFrame {
    /// Session title.
    pub title: String,
    /// Clamped geometry.
    pub layout: ResolvedLayout,
    /// Button labels.
    pub labels: PromptLabels,
}

/// Outcome of the unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    /// Save, then close.
    Save,
    /// Close without saving.
    Discard,
    /// Keep the session open.
    StayOpen,
}

/// One mounted interactive surface, exclusively owned by a session.
pub trait Surface: Send {
    /// Present a freshly rendered scene.
    fn paint(&mut self, scene: &Scene) -> Result<(), SessionError>;

    /// Offer the three-way save / don't-save / cancel prompt. Returns
    /// `false` if the surface has no such primitive, in which case the
    /// host falls back to sequential binary [`Surface::confirm`] dialogs.
    fn prompt_unsaved(&mut self, labels: &PromptLabels, reply: oneshot::Sender<CloseChoice>)
        -> bool;

    /// Ask a yes/no question.
    fn confirm(&mut self, message: &str, reply: oneshot::Sender<bool>);

    /// Tear the surface down. Called exactly once, on every exit path.
    fn close(&mut self);
}

/// Factory for surfaces; the "missing surface implementation" condition
/// lives here as an `Err` from `open_surface`.
pub trait SurfaceProvider: Send + Sync {
    /// Construct and mount a surface for one session. Events flow back
    /// through `events`; dropping the sender ends the session as a cancel.
    fn open_surface(
        &self,
        frame: &SurfaceFrame,
        events: mpsc::Sender<SurfaceEvent>,
    ) -> Result<Box<dyn Surface>, SessionError>;
}
