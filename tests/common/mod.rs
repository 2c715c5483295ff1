// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for integration tests.

use portcfg::domain::{ConfigError, Declaration, Result};
use portcfg::ports::SettingsSource;
use std::io::Write;
use tempfile::NamedTempFile;

/// In-memory source with fixed declarations, optionally failing on read.
#[allow(dead_code)]
pub struct MockSettingsSource {
    name: String,
    priority: u8,
    declarations: Vec<Declaration>,
    fail: bool,
}

#[allow(dead_code)]
impl MockSettingsSource {
    pub fn new(name: &str, priority: u8, declarations: Vec<Declaration>) -> Self {
        Self {
            name: name.to_string(),
            priority,
            declarations,
            fail: false,
        }
    }

    pub fn failing(name: &str, priority: u8) -> Self {
        Self {
            name: name.to_string(),
            priority,
            declarations: Vec::new(),
            fail: true,
        }
    }
}

impl SettingsSource for MockSettingsSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn declarations(&self) -> Result<Vec<Declaration>> {
        if self.fail {
            return Err(ConfigError::SourceError {
                source_name: self.name.clone(),
                message: "mock source unavailable".to_string(),
                source: None,
            });
        }
        Ok(self.declarations.clone())
    }

    fn reload(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Writes `content` to a fresh temporary file.
#[allow(dead_code)]
pub fn write_make_conf(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
