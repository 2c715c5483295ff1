// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer.
//!
//! The loader here is the piece that turns a set of prioritized sources into a
//! populated [`SettingsStore`](crate::domain::SettingsStore).

pub mod loader;

pub use loader::{apply_declaration, SettingsLoader, SettingsLoaderBuilder};
