use crate::{Error, Result};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, str::FromStr};

/// Resolution settings, shared by every attribute an [`Engine`](crate::Engine)
/// resolves.
///
/// ```toml
/// default_batch_size = 10
///
/// [attributes."DocumentView.owner"]
/// batch_size = 5
/// expect_batch_correlation_values = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batch size for attributes that declare none and have no override.
    pub default_batch_size: usize,

    /// Whether batched queries are first built to batch correlation values
    /// rather than parent ids.
    pub expect_batch_correlation_values: bool,

    /// Overrides keyed by attribute path
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, AttributeConfig>,
}

/// Per-attribute overrides.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expect_batch_correlation_values: Option<bool>,
}

impl Config {
    /// Create a new Config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the batch size used when nothing more specific applies
    pub fn default_batch_size(mut self, batch_size: usize) -> Self {
        self.default_batch_size = batch_size;
        self
    }

    pub fn expect_batch_correlation_values(mut self, expect: bool) -> Self {
        self.expect_batch_correlation_values = expect;
        self
    }

    /// Override the batch size of the attribute at `path`
    pub fn batch_size(mut self, path: impl Into<String>, batch_size: usize) -> Self {
        self.attributes.entry(path.into()).or_default().batch_size = Some(batch_size);
        self
    }

    /// Override the expected orientation of the attribute at `path`
    pub fn expect_batch_correlation_values_for(
        mut self,
        path: impl Into<String>,
        expect: bool,
    ) -> Self {
        self.attributes
            .entry(path.into())
            .or_default()
            .expect_batch_correlation_values = Some(expect);
        self
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        contents.parse()
    }

    pub fn from_toml(src: &str) -> Result<Self> {
        src.parse()
    }

    /// Returns the batch size for the attribute at `path`.
    ///
    /// A per-path override wins over the attribute's declared batch size,
    /// which wins over `default_batch_size`.
    pub fn batch_size_for(&self, path: &str, declared: Option<usize>) -> Result<usize> {
        let batch_size = self
            .attributes
            .get(path)
            .and_then(|attr| attr.batch_size)
            .or(declared)
            .unwrap_or(self.default_batch_size);

        if batch_size == 0 {
            return Err(Error::invalid_configuration(format!(
                "batch size of '{path}' must be at least 1"
            )));
        }

        Ok(batch_size)
    }

    /// Checks every configured batch size.
    pub fn validate(&self) -> Result<()> {
        if self.default_batch_size == 0 {
            return Err(Error::invalid_configuration(
                "default batch size must be at least 1",
            ));
        }

        for (path, attr) in &self.attributes {
            if attr.batch_size == Some(0) {
                return Err(Error::invalid_configuration(format!(
                    "batch size of '{path}' must be at least 1"
                )));
            }
        }

        Ok(())
    }

    pub fn expect_batch_correlation_values_for_path(&self, path: &str) -> bool {
        self.attributes
            .get(path)
            .and_then(|attr| attr.expect_batch_correlation_values)
            .unwrap_or(self.expect_batch_correlation_values)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_batch_size: 1,
            expect_batch_correlation_values: true,
            attributes: IndexMap::new(),
        }
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|err| Error::invalid_configuration(err.to_string()))
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let toml_str = toml::to_string_pretty(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", toml_str)
    }
}
