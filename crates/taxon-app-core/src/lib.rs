// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application ports for Taxon tools (config storage, clipboard).
//! Keeps domain crates and UI adapters thin and framework-agnostic.

pub mod clipboard;
pub mod config;
