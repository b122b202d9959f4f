// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The session host: FIFO-queued exclusive ownership of the shared
//! surface, the session event loop, and outcome resolution.

use crate::close::{after_dirty_check, after_prompt, is_dirty, CloseResolution, CloseState};
use crate::error::SessionError;
use crate::layout::LayoutSpec;
use crate::renderer::{RenderArgs, Renderer, RendererRegistry};
use crate::surface::{
    CloseChoice, PromptLabels, Surface, SurfaceEvent, SurfaceFrame, SurfaceProvider,
};
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Arguments for one `open` call.
pub struct OpenRequest {
    /// Registry id of the renderer to drive.
    pub renderer_id: String,
    /// Session title.
    pub title: String,
    /// Starting editable state; owned by the host for the session.
    pub initial_state: Value,
    /// Read-only context passed through to every render.
    pub context: Value,
    /// Renderer to register inline under `renderer_id` before resolving.
    pub renderer: Option<Arc<dyn Renderer>>,
    /// Sizing wishes; defaults apply when omitted.
    pub layout: Option<LayoutSpec>,
    /// Button labels; "Save"/"Cancel" when omitted.
    pub labels: Option<PromptLabels>,
}

impl OpenRequest {
    /// Minimal request: a registered renderer id, a title, and state.
    pub fn new(renderer_id: impl Into<String>, title: impl Into<String>, state: Value) -> Self {
        Self {
            renderer_id: renderer_id.into(),
            title: title.into(),
            initial_state: state,
            context: Value::Null,
            renderer: None,
            layout: None,
            labels: None,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// User saved; `result` is the renderer-serialized latest state.
    Saved {
        /// The serialized session result.
        result: Value,
    },
    /// User chose to close without saving changed state.
    Discarded,
    /// User canceled (or the state was unchanged on close).
    Canceled,
}

impl SessionOutcome {
    /// Whether the session resolved with a save.
    pub fn saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    /// The unsaved reason, if any ("discarded" / "canceled").
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Saved { .. } => None,
            Self::Discarded => Some("discarded"),
            Self::Canceled => Some("canceled"),
        }
    }
}

/// Owns the single shared interactive surface and the renderer registry.
///
/// `open` calls queue on a fair async mutex: each session's entire
/// lifetime (including unbounded user interaction) settles before the
/// next queued session begins construction, so at most one session ever
/// renders against the surface. A failed session releases the slot like
/// any other.
pub struct SessionHost {
    registry: Mutex<RendererRegistry>,
    provider: Box<dyn SurfaceProvider>,
    gate: tokio::sync::Mutex<()>,
}

impl SessionHost {
    /// Create a host over the embedder's surface provider.
    pub fn new(provider: Box<dyn SurfaceProvider>) -> Self {
        Self {
            registry: Mutex::new(RendererRegistry::new()),
            provider,
            gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Register a renderer under `id`, replacing any previous one.
    pub fn register_renderer(&self, id: impl Into<String>, renderer: Arc<dyn Renderer>) {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .register(id, renderer);
    }

    /// Remove a renderer registration; returns whether one existed.
    pub fn unregister_renderer(&self, id: &str) -> bool {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .unregister(id)
    }

    /// Open a session and suspend until the user closes it.
    ///
    /// Calls queue FIFO; this future settles only once the session has
    /// fully resolved and the surface has been released.
    pub async fn open(&self, request: OpenRequest) -> Result<SessionOutcome, SessionError> {
        let _slot = self.gate.lock().await;
        debug!(renderer = %request.renderer_id, title = %request.title, "session slot acquired");
        self.run_session(request).await
    }

    async fn run_session(&self, request: OpenRequest) -> Result<SessionOutcome, SessionError> {
        let OpenRequest {
            renderer_id,
            title,
            initial_state,
            context,
            renderer,
            layout,
            labels,
        } = request;

        if let Some(inline) = renderer {
            self.register_renderer(renderer_id.clone(), inline);
        }
        let renderer = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .resolve(&renderer_id)
            .ok_or_else(|| SessionError::RendererNotFound(renderer_id.clone()))?;

        let state = initial_state;
        let snapshot = serialize_snapshot(renderer.as_ref(), &state);
        if snapshot.is_none() {
            warn!(renderer = %renderer_id, "initial snapshot unavailable; session treated as always dirty");
        }

        let frame = SurfaceFrame {
            title,
            layout: layout.unwrap_or_default().resolve(),
            labels: labels.unwrap_or_default(),
        };
        let (events_tx, events_rx) = mpsc::channel(32);
        let mut surface = self.provider.open_surface(&frame, events_tx)?;

        let outcome = drive_session(
            renderer.as_ref(),
            surface.as_mut(),
            events_rx,
            &frame,
            state,
            &context,
            snapshot,
        )
        .await;
        surface.close();
        match &outcome {
            Ok(resolved) => {
                info!(renderer = %renderer_id, saved = resolved.saved(), reason = ?resolved.reason(), "session resolved");
            }
            Err(err) => warn!(renderer = %renderer_id, %err, "session failed"),
        }
        outcome
    }
}

/// One paint: render the current state, hand the scene to the surface.
fn paint(
    renderer: &dyn Renderer,
    surface: &mut dyn Surface,
    state: &Value,
    context: &Value,
    frame: &SurfaceFrame,
) -> Result<(), SessionError> {
    let scene = renderer.render(RenderArgs {
        state,
        context,
        title: &frame.title,
    });
    surface.paint(&scene)
}

/// The session event loop, from first paint to resolution. The caller
/// closes the surface afterwards regardless of how this returns.
async fn drive_session(
    renderer: &dyn Renderer,
    surface: &mut dyn Surface,
    mut events: mpsc::Receiver<SurfaceEvent>,
    frame: &SurfaceFrame,
    mut state: Value,
    context: &Value,
    snapshot: Option<String>,
) -> Result<SessionOutcome, SessionError> {
    paint(renderer, surface, &state, context, frame)?;

    loop {
        let Some(event) = events.recv().await else {
            // Surface dropped its sender: nothing left to prompt against,
            // and the queue must advance.
            return Ok(SessionOutcome::Canceled);
        };
        match event {
            SurfaceEvent::Patch(patch) => {
                patch(&mut state);
                paint(renderer, surface, &state, context, frame)?;
            }
            SurfaceEvent::Rerender => {
                paint(renderer, surface, &state, context, frame)?;
            }
            SurfaceEvent::Save => return save_outcome(renderer, &state),
            SurfaceEvent::CloseRequested => {
                match resolve_close(renderer, surface, frame, &state, snapshot.as_deref()).await {
                    Some(CloseResolution::Save) => return save_outcome(renderer, &state),
                    Some(CloseResolution::Discard) => return Ok(SessionOutcome::Discarded),
                    Some(CloseResolution::Cancel) => return Ok(SessionOutcome::Canceled),
                    // StayOpen: back to the live session.
                    None => {}
                }
            }
        }
    }
}

/// Run the close-decision machine for one close attempt. `None` means
/// stay open.
async fn resolve_close(
    renderer: &dyn Renderer,
    surface: &mut dyn Surface,
    frame: &SurfaceFrame,
    state: &Value,
    snapshot: Option<&str>,
) -> Option<CloseResolution> {
    let mut machine = CloseState::CheckDirty;
    loop {
        machine = match machine {
            CloseState::CheckDirty => {
                let current = serialize_snapshot(renderer, state);
                after_dirty_check(is_dirty(snapshot, current.as_deref()))
            }
            CloseState::PromptUser => after_prompt(prompt_choice(surface, &frame.labels).await),
            CloseState::Resolved(resolution) => return Some(resolution),
            CloseState::StayOpen => return None,
        };
    }
}

/// Ask the user what to do with unsaved changes, preferring the surface's
/// three-way prompt and falling back to two binary confirms. A dropped
/// reply counts as "stay open" so changes are never lost by accident.
async fn prompt_choice(surface: &mut dyn Surface, labels: &PromptLabels) -> CloseChoice {
    let (reply_tx, reply_rx) = oneshot::channel();
    if surface.prompt_unsaved(labels, reply_tx) {
        return reply_rx.await.unwrap_or(CloseChoice::StayOpen);
    }

    let (reply_tx, reply_rx) = oneshot::channel();
    surface.confirm("Save changes before closing?", reply_tx);
    match reply_rx.await {
        Ok(true) => CloseChoice::Save,
        Ok(false) => {
            let (reply_tx, reply_rx) = oneshot::channel();
            surface.confirm("Discard changes?", reply_tx);
            match reply_rx.await {
                Ok(true) => CloseChoice::Discard,
                Ok(false) | Err(_) => CloseChoice::StayOpen,
            }
        }
        Err(_) => CloseChoice::StayOpen,
    }
}

fn save_outcome(renderer: &dyn Renderer, state: &Value) -> Result<SessionOutcome, SessionError> {
    let result = renderer
        .serialize(state)
        .map_err(|err| SessionError::Serialize(err.to_string()))?;
    Ok(SessionOutcome::Saved { result })
}

/// Canonical snapshot of state through the renderer's serializer; `None`
/// when serialization fails (tolerated, treated as unknown).
fn serialize_snapshot(renderer: &dyn Renderer, state: &Value) -> Option<String> {
    let value = renderer.serialize(state).ok()?;
    serde_json::to_string(&value).ok()
}
