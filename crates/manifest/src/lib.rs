#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Deployment manifest handling for vigil
//!
//! A manifest maps each listed path to the SHA-256 digest of its contents,
//! or to `"MISSING"` when the path did not exist. It is written as a flat,
//! pretty-printed JSON object in the order the paths were listed, so two
//! runs over unchanged files produce byte-identical output.

mod drift;

pub use drift::{Drift, DriftKind};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use vigil_errors::{Error, StorageError};
use vigil_hash::Hash;

/// Value recorded for a path that did not exist
pub const MISSING: &str = "MISSING";

/// What the manifest knows about one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestValue {
    /// Lowercase hex SHA-256 of the file contents
    Digest(Hash),
    /// The path did not exist
    Missing,
    /// The path existed but could not be read
    Unreadable { reason: String },
}

impl ManifestValue {
    #[must_use]
    pub fn digest(&self) -> Option<&Hash> {
        match self {
            Self::Digest(hash) => Some(hash),
            _ => None,
        }
    }

    /// Whether this entry should fail the run.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Unreadable { .. })
    }

    fn parse(raw: &str) -> Self {
        if raw == MISSING {
            return Self::Missing;
        }
        if let Ok(hash) = Hash::from_hex(raw) {
            return Self::Digest(hash);
        }
        let reason = raw
            .strip_prefix("FAIL (")
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(raw);
        Self::Unreadable {
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ManifestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digest(hash) => write!(f, "{hash}"),
            Self::Missing => f.write_str(MISSING),
            Self::Unreadable { reason } => write!(f, "FAIL ({reason})"),
        }
    }
}

/// One path of the manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub path: String,
    pub value: ManifestValue,
}

/// Ordered path → digest mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a path, replacing an earlier value for the same path in place.
    pub fn insert(&mut self, path: impl Into<String>, value: ManifestValue) {
        let path = path.into();
        match self.entries.iter_mut().find(|entry| entry.path == path) {
            Some(entry) => entry.value = value,
            None => self.entries.push(ManifestEntry { path, value }),
        }
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ManifestValue> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| &entry.value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as pretty JSON with four-space indentation
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        out.push(b'\n');
        String::from_utf8(out).map_err(|e| Error::internal(e.to_string()))
    }

    /// Parse a manifest document
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object of strings.
    pub fn from_json_str(contents: &str) -> Result<Self, Error> {
        serde_json::from_str(contents).map_err(|e| {
            StorageError::CorruptedData {
                message: format!("invalid manifest: {e}"),
            }
            .into()
        })
    }

    /// Load a manifest written by a previous run
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid manifest.
    pub async fn from_file(path: &Path) -> Result<Self, Error> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StorageError::from_io_with_path(&e, path))?;
        Self::from_json_str(&content)
    }

    /// Write the manifest, replacing any existing file at `path`.
    ///
    /// The document is written next to the target and renamed over it, so a
    /// reader never sees a half-written manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn write_to_file(&self, path: &Path) -> Result<(), Error> {
        let content = self.to_json_pretty()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_with_path(&e, parent))?;
        }

        let mut staging = path.as_os_str().to_owned();
        staging.push(".tmp");
        let staging = std::path::PathBuf::from(staging);

        tokio::fs::write(&staging, content)
            .await
            .map_err(|e| Error::io_with_path(&e, &staging))?;
        tokio::fs::rename(&staging, path)
            .await
            .map_err(|e| Error::io_with_path(&e, path))
    }

    /// Compare against an earlier manifest.
    #[must_use]
    pub fn drift(&self, baseline: &Manifest) -> Vec<Drift> {
        drift::compare(baseline, self)
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for Manifest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.path, &entry.value.to_string())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ManifestVisitor;

        impl<'de> Visitor<'de> for ManifestVisitor {
            type Value = Manifest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of path to digest")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut manifest = Manifest::new();
                while let Some((path, raw)) = access.next_entry::<String, String>()? {
                    manifest.insert(path, ManifestValue::parse(&raw));
                }
                Ok(manifest)
            }
        }

        deserializer.deserialize_map(ManifestVisitor)
    }
}
