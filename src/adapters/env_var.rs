// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable settings source adapter.
//!
//! Portage lets the calling environment override what the configuration files
//! say. This adapter reads a fixed set of Portage variables from the process
//! environment and presents them as the highest-priority layer.

use crate::domain::{Declaration, Result};
use crate::ports::{SettingsSource, PRIORITY_ENV};
use std::env;
use std::sync::RwLock;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Portage variables picked up from the environment by default.
pub const PORTAGE_ENV_VARIABLES: &[&str] = &[
    "ACCEPT_KEYWORDS",
    "ARCH",
    "CONFIG_PROTECT",
    "CONFIG_PROTECT_MASK",
    "DISTDIR",
    "FEATURES",
    "PKGDIR",
    "PORTAGE_TMPDIR",
    "PORTDIR",
    "PORTDIR_OVERLAY",
    "ROOT",
    "USE",
];

/// Settings source adapter for environment variables.
///
/// # Examples
///
/// ```rust
/// use portcfg::adapters::EnvVarAdapter;
/// use portcfg::ports::SettingsSource;
///
/// // The standard Portage variables
/// let adapter = EnvVarAdapter::new();
/// assert_eq!(adapter.name(), "env");
///
/// // An explicit list
/// let adapter = EnvVarAdapter::with_variables(["PORTDIR", "USE"]);
/// ```
#[derive(Debug)]
pub struct EnvVarAdapter {
    /// Variables to read, in the order their declarations are emitted
    variables: Vec<String>,
    /// Cached declarations with interior mutability for thread-safe lazy loading
    cache: RwLock<Option<Vec<Declaration>>>,
    /// Whether the cache came from `with_values` and must survive reloads
    fixed: bool,
}

impl EnvVarAdapter {
    /// Creates an adapter reading [`PORTAGE_ENV_VARIABLES`].
    pub fn new() -> Self {
        Self::with_variables(PORTAGE_ENV_VARIABLES.iter().copied())
    }

    /// Creates an adapter reading the given variables.
    pub fn with_variables<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
            cache: RwLock::new(None),
            fixed: false,
        }
    }

    /// Creates an adapter with pre-populated values for testing.
    ///
    /// **Note**: This method is primarily intended for testing; the process
    /// environment is never consulted.
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let declarations: Vec<Declaration> = values
            .into_iter()
            .map(|(k, v)| {
                let name: String = k.into();
                Declaration::assign(name, v)
            })
            .collect();
        Self {
            variables: declarations
                .iter()
                .map(|d| d.name.as_str().to_string())
                .collect(),
            cache: RwLock::new(Some(declarations)),
            fixed: true,
        }
    }

    /// Returns the variables this adapter reads.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Reads the configured variables from the process environment.
    fn load(&self) -> Vec<Declaration> {
        let mut declarations = Vec::new();

        for name in &self.variables {
            let value = match env::var(name) {
                Ok(value) => value,
                Err(_) => continue,
            };

            if value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable {}: value_len={} (max {})",
                    name,
                    value.len(),
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }

            declarations.push(Declaration::assign(name.as_str(), value));
        }

        tracing::debug!(
            "Loaded {} of {} settings variables from the environment",
            declarations.len(),
            self.variables.len()
        );

        declarations
    }
}

impl Default for EnvVarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsSource for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn priority(&self) -> u8 {
        PRIORITY_ENV
    }

    fn declarations(&self) -> Result<Vec<Declaration>> {
        if let Ok(guard) = self.cache.read() {
            if let Some(cached) = guard.as_ref() {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load();
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(loaded.clone());
        }
        Ok(loaded)
    }

    fn reload(&mut self) -> Result<()> {
        if !self.fixed {
            if let Ok(mut guard) = self.cache.write() {
                *guard = None;
            }
        }
        Ok(())
    }
}
