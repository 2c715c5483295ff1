// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the settings resolution engine.
//!
//! Everything here is pure in-memory logic with no I/O: variable
//! classification, incremental merging, substitution and the store that ties
//! them together.

pub mod declaration;
pub mod errors;
pub mod incremental;
pub mod metadata_source;
pub mod settings;
pub mod substitution;
pub mod variable;

// Re-export commonly used types
pub use declaration::Declaration;
pub use errors::{ConfigError, Result};
pub use metadata_source::MetadataSource;
pub use settings::SettingsStore;
pub use variable::{is_incremental, VariableKind, VariableName};
