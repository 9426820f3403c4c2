use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::typography::Typographer;

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub render: RenderOptions,
    pub typography: TypographyConfig,
}

/// Delimiters written back for emphasis spans
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderOptions {
    pub emphasis_mark: String,
    pub double_emphasis_mark: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            emphasis_mark: "*".to_string(),
            double_emphasis_mark: "**".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TypographyConfig {
    pub enabled: bool,
    #[serde(flatten)]
    pub rules: Typographer,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            rules: Typographer::default(),
        }
    }
}

impl TypographyConfig {
    /// The typographer to run over text runs, or `None` to leave them untouched.
    pub fn typographer(&self) -> Option<Typographer> {
        self.enabled.then_some(self.rules)
    }
}

impl Config {
    /// The defaults embedded in the binary.
    pub fn compiled_default() -> Self {
        // Checked by the build script, so only a key mismatch can fail here.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file. Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
