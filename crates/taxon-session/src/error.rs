// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for session-host operations.

use thiserror::Error;

/// Failures that reject a single `open` call. None of these corrupt the
/// session queue; the next queued session still runs.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No renderer registered under the requested id.
    #[error("renderer '{0}' not found")]
    RendererNotFound(String),
    /// The embedder supplied no usable surface implementation.
    #[error("surface implementation unavailable: {0}")]
    SurfaceUnavailable(String),
    /// The renderer could not serialize state for an explicit save.
    #[error("failed to serialize session state: {0}")]
    Serialize(String),
    /// The surface rejected a paint or mount operation.
    #[error("surface error: {0}")]
    Surface(String),
}
