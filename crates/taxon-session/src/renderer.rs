// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Renderer capability set and the process-scoped renderer registry.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Opaque widget-tree payload handed from a renderer to the surface.
/// The host never inspects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene(pub Value);

/// Read-only view of the session handed to `render` on every repaint.
#[derive(Debug, Clone, Copy)]
pub struct RenderArgs<'a> {
    /// The live editable state (exclusively owned by the host).
    pub state: &'a Value,
    /// Caller-supplied context, cloned at session start.
    pub context: &'a Value,
    /// Session title.
    pub title: &'a str,
}

/// Failure to convert state into a result value.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct RenderError(pub String);

/// A registered editor: paints a scene from state and (optionally)
/// converts state into the session's result value.
///
/// `serialize` defaults to a deep clone of the state, matching the
/// registry contract: any implementor of the two-method shape qualifies,
/// no inheritance involved.
pub trait Renderer: Send + Sync {
    /// Paint the surface for the current state. Invoked once per state
    /// transition, never concurrently.
    fn render(&self, args: RenderArgs<'_>) -> Scene;

    /// Convert state to the value that becomes the session result and the
    /// dirty-check snapshot.
    fn serialize(&self, state: &Value) -> Result<Value, RenderError> {
        Ok(state.clone())
    }
}

/// Mapping from renderer id to its callbacks. Explicit process-scoped
/// state owned by the host: created once, clearable, never a global.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Arc<dyn Renderer>>,
}

impl RendererRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `renderer` under `id`, replacing any previous registration.
    pub fn register(&mut self, id: impl Into<String>, renderer: Arc<dyn Renderer>) {
        self.renderers.insert(id.into(), renderer);
    }

    /// Remove the registration for `id`; returns whether one existed.
    pub fn unregister(&mut self, id: &str) -> bool {
        self.renderers.remove(id).is_some()
    }

    /// Look up the renderer for `id`.
    pub fn resolve(&self, id: &str) -> Option<Arc<dyn Renderer>> {
        self.renderers.get(id).cloned()
    }

    /// Drop every registration (test teardown).
    pub fn clear(&mut self) {
        self.renderers.clear();
    }
}
