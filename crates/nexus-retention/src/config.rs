//! Connection settings with layered precedence
//!
//! Loads settings from the following sources (low to high):
//! 1. Built-in defaults
//! 2. Optional YAML settings file
//! 3. Environment variables (`NEXUS_*`)
//! 4. CLI flags (applied by the caller)

use crate::compaction::DEFAULT_COMPACT_TASK;
use crate::error::{Error, Result};
use crate::untag::DEFAULT_UNTAG_TOOL;
use camino::Utf8Path;
use serde::Deserialize;
use std::fmt;
use std::fs;

pub const DEFAULT_HOST: &str = "http://192.168.113.192:15921";
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin123";

pub const ENV_HOST: &str = "NEXUS_HOST";
pub const ENV_USERNAME: &str = "NEXUS_USERNAME";
pub const ENV_PASSWORD: &str = "NEXUS_PASSWORD";
pub const ENV_TASK: &str = "NEXUS_CLEANUP_TASK";
pub const ENV_UNTAG_TOOL: &str = "NEXUS_UNTAG_TOOL";

/// Where and how to connect, and which helpers to use
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanupSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Compaction task run after docker cleanups
    pub task: String,
    /// External un-tag tool for docker repositories
    pub untag_tool: String,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            task: DEFAULT_COMPACT_TASK.to_string(),
            untag_tool: DEFAULT_UNTAG_TOOL.to_string(),
        }
    }
}

impl fmt::Debug for CleanupSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupSettings")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("task", &self.task)
            .field("untag_tool", &self.untag_tool)
            .finish()
    }
}

impl CleanupSettings {
    /// Load defaults, overlaid with `path` when given
    ///
    /// A path that was asked for but does not exist is an error.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::not_found("Settings file", path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        Self::from_yaml_str(&content)
    }

    /// Parse settings from YAML; absent keys keep their defaults
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document deserialises to unit, not a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Apply `NEXUS_*` environment variables
    pub fn apply_env_overrides(self) -> Self {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 5] = [
            (ENV_HOST, &mut self.host),
            (ENV_USERNAME, &mut self.username),
            (ENV_PASSWORD, &mut self.password),
            (ENV_TASK, &mut self.task),
            (ENV_UNTAG_TOOL, &mut self.untag_tool),
        ];

        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }

        self
    }
}
