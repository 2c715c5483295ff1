// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! These traits define how declarations reach the loader. They are implemented
//! by adapters in the adapters layer.

pub mod parser;
pub mod source;

// Re-export commonly used types
pub use parser::SettingsParser;
pub use source::{SettingsSource, PRIORITY_ENV, PRIORITY_GLOBALS, PRIORITY_PROFILE, PRIORITY_USER};
