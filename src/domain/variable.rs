// SPDX-License-Identifier: MIT OR Apache-2.0

//! Variable names and their incremental/non-incremental classification.
//!
//! Portage accumulates a handful of variables across configuration files
//! instead of overwriting them. Which variables behave that way is a fixed
//! rule over the name alone and never depends on what is stored.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Variables that always accumulate across configuration files.
pub const INCREMENTAL_VARIABLES: [&str; 3] = ["USE", "ACCEPT_KEYWORDS", "FEATURES"];

/// Any variable whose name starts with this prefix is incremental too.
pub const INCREMENTAL_PREFIX: &str = "CONFIG_PROTECT";

/// Returns `true` if `name` is an incremental variable.
///
/// # Examples
///
/// ```
/// use portcfg::domain::variable::is_incremental;
///
/// assert!(is_incremental("USE"));
/// assert!(is_incremental("CONFIG_PROTECT_MASK"));
/// assert!(!is_incremental("PORTDIR"));
/// assert!(!is_incremental("use"));
/// ```
pub fn is_incremental(name: &str) -> bool {
    INCREMENTAL_VARIABLES.contains(&name) || name.starts_with(INCREMENTAL_PREFIX)
}

/// How new declarations of a variable combine with what is already stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    /// Later declarations merge into the accumulated token list.
    Incremental,
    /// Later declarations replace the stored value.
    Plain,
}

impl VariableKind {
    /// Classifies a variable name.
    pub fn of(name: &str) -> Self {
        if is_incremental(name) {
            VariableKind::Incremental
        } else {
            VariableKind::Plain
        }
    }
}

/// A case-sensitive settings variable name such as `USE` or `PORTDIR`.
///
/// # Examples
///
/// ```
/// use portcfg::domain::variable::{VariableKind, VariableName};
///
/// let name = VariableName::from("FEATURES");
/// assert_eq!(name.as_str(), "FEATURES");
/// assert_eq!(name.kind(), VariableKind::Incremental);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariableName(String);

impl VariableName {
    /// Creates a new `VariableName` from a `String`.
    pub fn new(name: String) -> Self {
        VariableName(name)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the name into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` if this variable accumulates across declarations.
    pub fn is_incremental(&self) -> bool {
        is_incremental(&self.0)
    }

    /// Returns the classification of this variable.
    pub fn kind(&self) -> VariableKind {
        VariableKind::of(&self.0)
    }

    /// Returns `true` if the name follows the shell identifier grammar
    /// (ASCII letters, digits and `_`, not starting with a digit).
    pub fn is_shell_identifier(&self) -> bool {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    }
}

impl From<String> for VariableName {
    fn from(s: String) -> Self {
        VariableName(s)
    }
}

impl From<&str> for VariableName {
    fn from(s: &str) -> Self {
        VariableName(s.to_string())
    }
}

impl From<VariableName> for String {
    fn from(name: VariableName) -> Self {
        name.0
    }
}

impl AsRef<str> for VariableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
