// SPDX-License-Identifier: MIT OR Apache-2.0

//! Where package metadata should preferably be read from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored token for [`MetadataSource::TreeScan`].
pub const TREE_SCAN_TOKEN: &str = "scan";

/// Stored token for [`MetadataSource::CompiledCache`].
pub const COMPILED_CACHE_TOKEN: &str = "cache";

/// The preferred package metadata source.
///
/// Only the first two variants have a stored token. `FlatCache` is what an
/// unset (or unrecognized) setting reads back as; writing it removes the
/// setting instead of storing anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataSource {
    /// Scan the package tree directly.
    TreeScan,
    /// Use a compiled metadata cache.
    CompiledCache,
    /// Use the flat per-package cache files.
    FlatCache,
}

impl MetadataSource {
    /// Returns the token stored for this source, if it has one.
    pub fn token(self) -> Option<&'static str> {
        match self {
            MetadataSource::TreeScan => Some(TREE_SCAN_TOKEN),
            MetadataSource::CompiledCache => Some(COMPILED_CACHE_TOKEN),
            MetadataSource::FlatCache => None,
        }
    }

    /// Interprets a stored token; anything unrecognized falls back to `FlatCache`.
    ///
    /// # Examples
    ///
    /// ```
    /// use portcfg::domain::MetadataSource;
    ///
    /// assert_eq!(MetadataSource::from_token(Some("scan")), MetadataSource::TreeScan);
    /// assert_eq!(MetadataSource::from_token(None), MetadataSource::FlatCache);
    /// ```
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(TREE_SCAN_TOKEN) => MetadataSource::TreeScan,
            Some(COMPILED_CACHE_TOKEN) => MetadataSource::CompiledCache,
            _ => MetadataSource::FlatCache,
        }
    }
}

impl fmt::Display for MetadataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MetadataSource::TreeScan => "tree scan",
            MetadataSource::CompiledCache => "compiled cache",
            MetadataSource::FlatCache => "flat cache",
        };
        f.write_str(label)
    }
}
