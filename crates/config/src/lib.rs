#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for vigil
//!
//! This crate handles loading the JSON description of what a verification
//! sweep should look at, plus the runtime knobs the CLI sets on top of it.
//! Every top-level key of the config file is optional.

pub mod constants;
pub use constants as fixed_paths;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use vigil_errors::{ConfigError, Error};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Paths that must exist after the deployment
    pub files: Vec<String>,
    /// Database whose schema is inspected; `null` reads as an empty section
    #[serde(deserialize_with = "null_as_default")]
    pub database: DatabaseSpec,
    /// URLs that must answer `200` to a plain GET
    pub apis: Vec<String>,
    /// Paths hashed into the manifest
    pub manifest: Vec<String>,
}

/// Database section of the config file
///
/// A section without `path` still loads; the schema check reports it as a
/// single failed `database` entry instead of aborting the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub tables: TableSpecs,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Required columns for a single table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<String>,
}

/// Table requirements in the order they appear in the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSpecs(Vec<TableSpec>);

impl TableSpecs {
    /// Insert a table, replacing the columns of an earlier entry with the same
    /// name while keeping its position.
    pub fn insert(&mut self, name: impl Into<String>, columns: Vec<String>) {
        let name = name.into();
        match self.0.iter_mut().find(|spec| spec.name == name) {
            Some(existing) => existing.columns = columns,
            None => self.0.push(TableSpec { name, columns }),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableSpec> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a TableSpecs {
    type Item = &'a TableSpec;
    type IntoIter = std::slice::Iter<'a, TableSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<N: Into<String>> FromIterator<(N, Vec<String>)> for TableSpecs {
    fn from_iter<I: IntoIterator<Item = (N, Vec<String>)>>(iter: I) -> Self {
        let mut specs = Self::default();
        for (name, columns) in iter {
            specs.insert(name, columns);
        }
        specs
    }
}

impl Serialize for TableSpecs {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for spec in &self.0 {
            map.serialize_entry(&spec.name, &spec.columns)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TableSpecs {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableSpecsVisitor;

        impl<'de> Visitor<'de> for TableSpecsVisitor {
            type Value = TableSpecs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of table name to required column names")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut specs = TableSpecs::default();
                while let Some((name, columns)) = access.next_entry::<String, Vec<String>>()? {
                    specs.insert(name, columns);
                }
                Ok(specs)
            }
        }

        deserializer.deserialize_map(TableSpecsVisitor)
    }
}

impl Config {
    /// Parse a config document held in memory
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or does not match the
    /// config layout.
    pub fn from_json_str(contents: &str) -> Result<Self, Error> {
        serde_json::from_str(contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or
    /// contains malformed JSON.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::ReadError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let config = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            files = config.files.len(),
            tables = config.database.tables.len(),
            apis = config.apis.len(),
            manifest = config.manifest.len(),
            "Loaded verification config"
        );
        Ok(config)
    }
}

/// Runtime knobs for a sweep, set by the CLI rather than the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub log_file: PathBuf,
    pub manifest_path: PathBuf,
    /// Previous manifest to compare the new one against
    pub baseline: Option<PathBuf>,
    pub http_timeout: Duration,
    /// Maximum endpoint requests in flight; 1 keeps them strictly sequential
    pub endpoint_jobs: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(fixed_paths::LOG_FILE),
            manifest_path: PathBuf::from(fixed_paths::MANIFEST_FILE),
            baseline: None,
            http_timeout: Duration::from_secs(fixed_paths::HTTP_TIMEOUT_SECS),
            endpoint_jobs: 1,
        }
    }
}
