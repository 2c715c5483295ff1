// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered Portage settings resolution.
//!
//! This crate holds the settings of a Portage-style package manager: the
//! variables declared across `make.globals`, profile `make.defaults`, the
//! user's `make.conf` and the environment, merged the way Portage merges them.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: the [`SettingsStore`](domain::SettingsStore), incremental
//!   merging, `$NAME` substitution and errors
//! - **Ports**: traits that define how declarations reach the loader
//!   (`SettingsSource`, `SettingsParser`)
//! - **Adapters**: make.conf files and the process environment
//! - **Service**: the loader that applies sources in priority order
//!
//! # Incremental variables
//!
//! `USE`, `ACCEPT_KEYWORDS`, `FEATURES` and every variable whose name starts
//! with `CONFIG_PROTECT` accumulate across layers instead of being replaced.
//! A `-token` removes an earlier token and `-*` clears everything so far.
//!
//! # Feature Flags
//!
//! - `make-conf`: make.conf file support (default)
//! - `env`: environment variable support (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use portcfg::prelude::*;
//!
//! let mut settings = SettingsStore::new();
//! settings.set_value("PORTDIR", "/var/db/repos/gentoo");
//! settings.set_value("DISTDIR", "${PORTDIR}/distfiles");
//! settings.add_to_value("USE", "X gtk alsa");
//! settings.add_to_value("USE", "-gtk qt5");
//!
//! assert_eq!(
//!     settings.value("DISTDIR").as_deref(),
//!     Some("/var/db/repos/gentoo/distfiles")
//! );
//! assert_eq!(settings.value("USE").as_deref(), Some("X alsa qt5"));
//! ```
//!
//! Loading from files:
//!
//! ```rust,no_run
//! use portcfg::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let loader = SettingsLoader::builder()
//!     .with_make_conf_file("/usr/share/portage/config/make.globals", PRIORITY_GLOBALS)?
//!     .with_make_conf_file("/etc/portage/make.conf", PRIORITY_USER)?
//!     .with_env_vars()
//!     .build();
//!
//! let settings = loader.load();
//! println!("tree: {}", settings.mainline_tree_directory());
//! println!("overlays: {:?}", settings.overlay_tree_directories());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        is_incremental, ConfigError, Declaration, MetadataSource, Result, SettingsStore,
        VariableName,
    };
    pub use crate::ports::{
        SettingsParser, SettingsSource, PRIORITY_ENV, PRIORITY_GLOBALS, PRIORITY_PROFILE,
        PRIORITY_USER,
    };
    pub use crate::service::{SettingsLoader, SettingsLoaderBuilder};

    // Re-export adapters based on feature flags
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarAdapter;
    #[cfg(feature = "make-conf")]
    pub use crate::adapters::{MakeConfFileAdapter, MakeConfParser};
}
