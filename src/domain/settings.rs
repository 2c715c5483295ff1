// SPDX-License-Identifier: MIT OR Apache-2.0

//! The settings store.
//!
//! `SettingsStore` maps variable names to raw values in insertion order.
//! Incremental variables are merged through [`SettingsStore::add_to_value`];
//! everything else is replaced through [`SettingsStore::set_value`]. Reads
//! resolve `$NAME` / `${NAME}` references against the store every time.

use crate::domain::incremental::merge_incremental;
use crate::domain::metadata_source::MetadataSource;
use crate::domain::substitution::substitute;
use crate::domain::variable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Primary package tree used when `PORTDIR` is not set.
pub const DEFAULT_PORTDIR: &str = "/usr/portage";

/// Installed-packages database used when none was configured.
pub const DEFAULT_INSTALLED_PACKAGES_DIR: &str = "/var/db/pkg";

/// Metadata cache directory used when none was configured.
pub const DEFAULT_CACHE_DIR: &str = "/var/cache/edb/dep";

/// Prefix of keys the store uses for its own settings.
///
/// The `.` keeps these keys out of reach of `$NAME` references.
pub const INTERNAL_KEY_PREFIX: &str = "portcfg.";

/// Key holding the installed-packages directory.
pub const INSTALLED_PACKAGES_DIR_KEY: &str = "portcfg.installed_packages_dir";

/// Key holding the metadata cache directory.
pub const CACHE_DIR_KEY: &str = "portcfg.cache_dir";

/// Key holding the preferred metadata source token.
pub const METADATA_SOURCE_KEY: &str = "portcfg.metadata_source";

/// Primary package tree directory.
pub const PORTDIR: &str = "PORTDIR";

/// Space-separated overlay tree directories.
pub const PORTDIR_OVERLAY: &str = "PORTDIR_OVERLAY";

/// Accepted keywords, e.g. `x86 ~x86`.
pub const ACCEPT_KEYWORDS: &str = "ACCEPT_KEYWORDS";

/// Machine architecture keyword.
pub const ARCH: &str = "ARCH";

/// Marker prefix of testing keywords.
pub const TESTING_KEYWORD_PREFIX: char = '~';

/// Insertion-ordered Portage settings with incremental merging and lazy substitution.
///
/// # Examples
///
/// ```
/// use portcfg::domain::SettingsStore;
///
/// let mut store = SettingsStore::new();
/// store.add_to_value("USE", "foo bar");
/// store.add_to_value("USE", "-bar baz");
/// assert_eq!(store.value("USE").as_deref(), Some("foo baz"));
///
/// store.set_value("X", "val");
/// store.set_value("Y", "prefix-${X}-suffix");
/// assert_eq!(store.value("Y").as_deref(), Some("prefix-val-suffix"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsStore {
    values: IndexMap<String, String>,
}

impl SettingsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Returns `true` if `name` is an incremental variable.
    pub fn is_incremental(name: &str) -> bool {
        variable::is_incremental(name)
    }

    /// Replaces (or creates) the raw value of `name`. No merging is applied.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        tracing::debug!("set {}='{}'", name, value);
        self.values.insert(name, value);
    }

    /// Merges the tokens of `value` into the accumulated value of `name`.
    ///
    /// `-*` clears everything accumulated so far, `-token` removes `token`, and
    /// any other token is appended unless already present. Tokens are applied
    /// strictly left to right. A name without an entry starts from an empty list.
    pub fn add_to_value(&mut self, name: impl Into<String>, value: &str) {
        let name = name.into();
        let existing = self.values.get(&name).map(String::as_str).unwrap_or("");
        let merged = merge_incremental(existing, value);
        tracing::debug!("merge {} += '{}' -> '{}'", name, value, merged);
        self.values.insert(name, merged);
    }

    /// Removes the entry for `name`, returning its raw value.
    ///
    /// The remaining entries keep their relative order.
    pub fn remove_value(&mut self, name: &str) -> Option<String> {
        let removed = self.values.shift_remove(name);
        if removed.is_some() {
            tracing::debug!("removed {}", name);
        }
        removed
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        tracing::debug!("clearing {} settings", self.values.len());
        self.values.clear();
    }

    /// Returns the substituted value of `name`, or `None` if it was never set.
    ///
    /// An empty string is a valid value and is distinct from `None`.
    pub fn value(&self, name: &str) -> Option<String> {
        let raw = self.values.get(name)?;
        Some(substitute(raw, Some(name), |reference| {
            self.values.get(reference).map(String::as_str)
        }))
    }

    /// Returns the stored value of `name` without substitution.
    pub fn raw_value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns the full name to raw value mapping in insertion order.
    pub fn raw_values(&self) -> &IndexMap<String, String> {
        &self.values
    }

    /// Returns `true` if `name` has an entry.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over the stored names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Primary package tree directory (`PORTDIR`), defaulting to [`DEFAULT_PORTDIR`].
    pub fn mainline_tree_directory(&self) -> String {
        self.value(PORTDIR)
            .unwrap_or_else(|| DEFAULT_PORTDIR.to_string())
    }

    /// Overlay tree directories (`PORTDIR_OVERLAY`) in declaration order.
    pub fn overlay_tree_directories(&self) -> Vec<String> {
        self.value(PORTDIR_OVERLAY)
            .map(|overlays| {
                overlays
                    .split(' ')
                    .filter(|dir| !dir.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The single keyword callers should treat as accepted.
    ///
    /// With several `ACCEPT_KEYWORDS` tokens, the first testing (`~`) keyword
    /// wins, otherwise the first token. `None` when unset or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use portcfg::domain::SettingsStore;
    ///
    /// let mut store = SettingsStore::new();
    /// assert_eq!(store.accepted_keyword(), None);
    ///
    /// store.set_value("ACCEPT_KEYWORDS", "x86 ~x86");
    /// assert_eq!(store.accepted_keyword().as_deref(), Some("~x86"));
    /// ```
    pub fn accepted_keyword(&self) -> Option<String> {
        let keywords = self.value(ACCEPT_KEYWORDS)?;
        let tokens: Vec<&str> = keywords.split(' ').filter(|t| !t.is_empty()).collect();
        let chosen = match tokens.as_slice() {
            [] => return None,
            [only] => *only,
            [first, ..] => tokens
                .iter()
                .copied()
                .find(|t| t.starts_with(TESTING_KEYWORD_PREFIX))
                .unwrap_or(*first),
        };
        Some(chosen.to_string())
    }

    /// Machine architecture (`ARCH`), if set.
    pub fn architecture(&self) -> Option<String> {
        self.value(ARCH)
    }

    /// Installed-packages database directory, defaulting to [`DEFAULT_INSTALLED_PACKAGES_DIR`].
    pub fn installed_packages_directory(&self) -> String {
        self.value(INSTALLED_PACKAGES_DIR_KEY)
            .unwrap_or_else(|| DEFAULT_INSTALLED_PACKAGES_DIR.to_string())
    }

    /// Sets the installed-packages database directory.
    pub fn set_installed_packages_directory(&mut self, dir: impl Into<String>) {
        self.set_value(INSTALLED_PACKAGES_DIR_KEY, dir);
    }

    /// Metadata cache directory, defaulting to [`DEFAULT_CACHE_DIR`].
    pub fn cache_directory(&self) -> String {
        self.value(CACHE_DIR_KEY)
            .unwrap_or_else(|| DEFAULT_CACHE_DIR.to_string())
    }

    /// Sets the metadata cache directory.
    pub fn set_cache_directory(&mut self, dir: impl Into<String>) {
        self.set_value(CACHE_DIR_KEY, dir);
    }

    /// Preferred metadata source; [`MetadataSource::FlatCache`] when unset.
    pub fn preferred_metadata_source(&self) -> MetadataSource {
        MetadataSource::from_token(self.raw_value(METADATA_SOURCE_KEY))
    }

    /// Stores the preferred metadata source, or removes the setting.
    ///
    /// Only [`MetadataSource::TreeScan`] and [`MetadataSource::CompiledCache`]
    /// are stored. `None` and [`MetadataSource::FlatCache`] both remove the
    /// setting, which then reads back as `FlatCache`.
    pub fn set_preferred_metadata_source(&mut self, source: Option<MetadataSource>) {
        match source.and_then(MetadataSource::token) {
            Some(token) => self.set_value(METADATA_SOURCE_KEY, token),
            None => {
                self.remove_value(METADATA_SOURCE_KEY);
            }
        }
    }
}
