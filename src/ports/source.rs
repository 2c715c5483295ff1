// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings source trait definition.
//!
//! This module defines the `SettingsSource` trait, the port through which the
//! loader receives declarations from configuration files, the environment, or
//! anything else that can produce ordered `NAME=value` assignments.

use crate::domain::{Declaration, Result};

/// Priority of global defaults (`make.globals`).
pub const PRIORITY_GLOBALS: u8 = 0;

/// Priority of profile defaults (`make.defaults`).
pub const PRIORITY_PROFILE: u8 = 1;

/// Priority of the user's configuration (`make.conf`).
pub const PRIORITY_USER: u8 = 2;

/// Priority of the process environment.
pub const PRIORITY_ENV: u8 = 3;

/// A trait for settings sources.
///
/// # Priority
///
/// Sources are applied in ascending priority, so a source with a higher value
/// is applied later: it overrides plain variables and gets the last word on
/// incremental ones. The standard layers are:
///
/// - **0**: [`PRIORITY_GLOBALS`]
/// - **1**: [`PRIORITY_PROFILE`]
/// - **2**: [`PRIORITY_USER`]
/// - **3**: [`PRIORITY_ENV`]
///
/// # Examples
///
/// ```rust
/// use portcfg::ports::SettingsSource;
/// use portcfg::domain::{Declaration, Result};
///
/// struct Fixed;
///
/// impl SettingsSource for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn priority(&self) -> u8 {
///         1
///     }
///
///     fn declarations(&self) -> Result<Vec<Declaration>> {
///         Ok(vec![Declaration::assign("ARCH", "amd64")])
///     }
///
///     fn reload(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let source = Fixed;
/// assert_eq!(source.declarations().unwrap().len(), 1);
/// ```
pub trait SettingsSource: Send + Sync {
    /// Returns the name of this source, used for logging and error messages.
    fn name(&self) -> &str;

    /// Returns the priority of this source.
    fn priority(&self) -> u8;

    /// Returns this source's declarations in the order they appear.
    ///
    /// The loader applies them in exactly this order.
    fn declarations(&self) -> Result<Vec<Declaration>>;

    /// Re-reads the backing data. Sources that cannot change may return `Ok(())`.
    fn reload(&mut self) -> Result<()>;
}
