// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered settings loader.
//!
//! `SettingsLoader` owns a set of [`SettingsSource`]s and applies their
//! declarations to a [`SettingsStore`] from the lowest priority to the highest,
//! choosing per variable between replacing and incremental merging.

use crate::domain::{Declaration, Result, SettingsStore, VariableKind};
use crate::ports::SettingsSource;

/// Applies one declaration to `store`.
///
/// Incremental variables are merged; a plain `NAME+=value` appends `value` to
/// the current raw value; anything else replaces.
///
/// # Examples
///
/// ```rust
/// use portcfg::domain::{Declaration, SettingsStore};
/// use portcfg::service::apply_declaration;
///
/// let mut store = SettingsStore::new();
/// apply_declaration(&mut store, &Declaration::assign("USE", "foo bar"));
/// apply_declaration(&mut store, &Declaration::assign("USE", "-bar"));
/// apply_declaration(&mut store, &Declaration::assign("CFLAGS", "-O2"));
/// apply_declaration(&mut store, &Declaration::append("CFLAGS", " -pipe"));
///
/// assert_eq!(store.value("USE").as_deref(), Some("foo"));
/// assert_eq!(store.value("CFLAGS").as_deref(), Some("-O2 -pipe"));
/// ```
pub fn apply_declaration(store: &mut SettingsStore, declaration: &Declaration) {
    let name = declaration.name.as_str();
    match declaration.name.kind() {
        VariableKind::Incremental => store.add_to_value(name, &declaration.value),
        VariableKind::Plain if declaration.append => {
            let mut combined = store.raw_value(name).unwrap_or("").to_string();
            combined.push_str(&declaration.value);
            store.set_value(name, combined);
        }
        VariableKind::Plain => store.set_value(name, declaration.value.as_str()),
    }
}

/// Loads settings from prioritized sources into a store.
///
/// Sources are applied in ascending priority; sources with the same priority
/// keep their registration order.
///
/// # Examples
///
/// ```rust
/// use portcfg::adapters::MakeConfFileAdapter;
/// use portcfg::ports::{PRIORITY_GLOBALS, PRIORITY_USER};
/// use portcfg::service::SettingsLoader;
///
/// # fn main() -> portcfg::domain::Result<()> {
/// let globals = MakeConfFileAdapter::from_content(
///     "make.globals",
///     "PORTDIR=/usr/portage\nFEATURES=\"sandbox distlocks\"\n",
///     PRIORITY_GLOBALS,
/// )?;
/// let user = MakeConfFileAdapter::from_content(
///     "make.conf",
///     "PORTDIR=/var/db/repos/gentoo\nFEATURES=\"-sandbox ccache\"\n",
///     PRIORITY_USER,
/// )?;
///
/// let loader = SettingsLoader::builder()
///     .with_source(Box::new(user))
///     .with_source(Box::new(globals))
///     .build();
/// let store = loader.load();
///
/// assert_eq!(store.mainline_tree_directory(), "/var/db/repos/gentoo");
/// assert_eq!(store.value("FEATURES").as_deref(), Some("distlocks ccache"));
/// # Ok(())
/// # }
/// ```
pub struct SettingsLoader {
    /// Sources in application order (lowest priority first)
    sources: Vec<Box<dyn SettingsSource>>,
}

impl SettingsLoader {
    /// Creates a loader without sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Creates a new loader builder.
    pub fn builder() -> SettingsLoaderBuilder {
        SettingsLoaderBuilder::new()
    }

    /// Adds a source. Sources are kept sorted by priority.
    pub fn add_source(&mut self, source: Box<dyn SettingsSource>) {
        tracing::debug!(
            "Registered settings source '{}' (priority {})",
            source.name(),
            source.priority()
        );
        self.sources.push(source);
        self.sort_sources();
    }

    /// Names of the registered sources in application order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Sorts sources by ascending priority; the sort is stable.
    fn sort_sources(&mut self) {
        self.sources.sort_by_key(|s| s.priority());
    }

    /// Builds a fresh store from all sources.
    pub fn load(&self) -> SettingsStore {
        let mut store = SettingsStore::new();
        self.load_into(&mut store);
        store
    }

    /// Clears `store` and re-applies every source.
    ///
    /// A source that fails to produce declarations is skipped with a warning;
    /// the others still apply.
    pub fn load_into(&self, store: &mut SettingsStore) {
        store.clear();

        for source in &self.sources {
            match source.declarations() {
                Ok(declarations) => {
                    tracing::debug!(
                        "Applying {} declarations from '{}'",
                        declarations.len(),
                        source.name()
                    );
                    for declaration in &declarations {
                        apply_declaration(store, declaration);
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping settings source '{}': {}", source.name(), e);
                }
            }
        }

        tracing::debug!(
            "Loaded {} settings from {} sources",
            store.len(),
            self.sources.len()
        );
    }

    /// Re-reads every source and reloads `store` from them.
    ///
    /// Sources that fail to reload keep their previous data.
    pub fn reload(&mut self, store: &mut SettingsStore) -> Result<()> {
        for source in &mut self.sources {
            if let Err(e) = source.reload() {
                tracing::warn!("Failed to reload source '{}': {}", source.name(), e);
            }
        }

        self.load_into(store);
        Ok(())
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing a `SettingsLoader`.
///
/// # Examples
///
/// ```rust
/// use portcfg::adapters::EnvVarAdapter;
/// use portcfg::service::SettingsLoaderBuilder;
///
/// let loader = SettingsLoaderBuilder::new()
///     .with_source(Box::new(EnvVarAdapter::with_values([("ARCH", "amd64")])))
///     .build();
/// assert_eq!(loader.load().architecture().as_deref(), Some("amd64"));
/// ```
pub struct SettingsLoaderBuilder {
    sources: Vec<Box<dyn SettingsSource>>,
}

impl SettingsLoaderBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a settings source.
    pub fn with_source(mut self, source: Box<dyn SettingsSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds a make.conf-style file with the given priority.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use portcfg::ports::{PRIORITY_GLOBALS, PRIORITY_USER};
    /// use portcfg::service::SettingsLoaderBuilder;
    ///
    /// # fn main() -> portcfg::domain::Result<()> {
    /// let loader = SettingsLoaderBuilder::new()
    ///     .with_make_conf_file("/usr/share/portage/config/make.globals", PRIORITY_GLOBALS)?
    ///     .with_make_conf_file("/etc/portage/make.conf", PRIORITY_USER)?
    ///     .build();
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "make-conf")]
    pub fn with_make_conf_file(
        self,
        path: impl AsRef<std::path::Path>,
        priority: u8,
    ) -> Result<Self> {
        use crate::adapters::MakeConfFileAdapter;
        let adapter = MakeConfFileAdapter::from_file(path, priority)?;
        Ok(self.with_source(Box::new(adapter)))
    }

    /// Adds the Portage variables from the process environment.
    #[cfg(feature = "env")]
    pub fn with_env_vars(self) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(Box::new(EnvVarAdapter::new()))
    }

    /// Builds the loader.
    pub fn build(self) -> SettingsLoader {
        let mut loader = SettingsLoader::new();

        for source in self.sources {
            loader.add_source(source);
        }

        loader
    }
}

impl Default for SettingsLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
