// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings parser trait definition.
//!
//! A `SettingsParser` turns the text of a configuration file into an ordered
//! list of declarations. Parsers never interpret values: quoting is removed,
//! but `$NAME` references and incremental tokens are left for the store.

use crate::domain::{Declaration, Result};

/// A trait for parsing configuration file contents.
///
/// # Examples
///
/// ```rust
/// use portcfg::ports::SettingsParser;
/// use portcfg::domain::{Declaration, Result};
///
/// struct LineParser;
///
/// impl SettingsParser for LineParser {
///     fn parse(&self, content: &str) -> Result<Vec<Declaration>> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(name, value)| Declaration::assign(name, value))
///             .collect())
///     }
///
///     fn format_name(&self) -> &str {
///         "lines"
///     }
/// }
///
/// let parsed = LineParser.parse("ARCH=amd64").unwrap();
/// assert_eq!(parsed[0].value, "amd64");
/// ```
pub trait SettingsParser {
    /// Parses configuration content into declarations, in file order.
    fn parse(&self, content: &str) -> Result<Vec<Declaration>>;

    /// Short name of the format, used in log messages.
    fn format_name(&self) -> &str;
}
