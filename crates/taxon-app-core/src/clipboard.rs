// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port trait for pushing exported text to the system clipboard without
//! depending on a specific windowing or host-app crate.

use crate::config::ConfigError;

/// Minimal clipboard port; implementations are expected to be best-effort
/// and typically forward to the host application's clipboard facility.
pub trait ClipboardPort {
    /// Write plain text to the clipboard.
    fn write_text(&self, text: &str) -> Result<(), ConfigError>;
}
