// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! taxon-session: the modal editor session host.
//!
//! Exactly one session may occupy the shared interactive surface at a
//! time; [`SessionHost::open`] calls queue FIFO and each session's full
//! asynchronous lifetime is awaited before the next begins. The host owns
//! the live editable state for the session's duration, tracks a
//! dirty/clean snapshot, and resolves every close attempt through an
//! explicit close-decision state machine.
//!
//! Widget rendering is out of scope: a [`Renderer`] paints an opaque
//! [`Scene`] and the embedder's [`Surface`] implementation consumes it.

pub mod close;
pub mod error;
pub mod host;
pub mod layout;
pub mod renderer;
pub mod surface;

pub use close::{CloseResolution, CloseState};
pub use error::SessionError;
pub use host::{OpenRequest, SessionHost, SessionOutcome};
pub use layout::{LayoutSpec, ResolvedLayout};
pub use renderer::{RenderArgs, RenderError, Renderer, RendererRegistry, Scene};
pub use surface::{
    CloseChoice, PromptLabels, StatePatch, Surface, SurfaceEvent, SurfaceFrame, SurfaceProvider,
};
