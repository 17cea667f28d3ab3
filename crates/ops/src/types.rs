//! Result types shared by every checker

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use vigil_errors::{ConfigError, NetworkError, StateError, StorageError};
use vigil_manifest::{Drift, Manifest};

/// Why a check failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Target does not exist; rendered without a reason
    NotFound,
    /// Required columns absent from the table, in required order
    MissingColumns(Vec<String>),
    /// Section of the config file too incomplete to run the check
    Config(ConfigError),
    State(StateError),
    Network(NetworkError),
    Storage(StorageError),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => Ok(()),
            Self::MissingColumns(columns) => {
                write!(f, "missing columns: {}", columns.join(", "))
            }
            Self::Config(e) => write!(f, "{e}"),
            Self::State(e) => write!(f, "{e}"),
            Self::Network(e) => write!(f, "{e}"),
            Self::Storage(e) => write!(f, "{e}"),
        }
    }
}

/// Outcome of a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail(Failure),
}

impl CheckStatus {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Renders `PASS`, `FAIL`, or `FAIL (<reason>)`.
impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => f.write_str("PASS"),
            Self::Fail(Failure::NotFound) => f.write_str("FAIL"),
            Self::Fail(failure) => write!(f, "FAIL ({failure})"),
        }
    }
}

impl Serialize for CheckStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Per-target outcomes of one checker, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResults {
    entries: Vec<(String, CheckStatus)>,
}

impl CheckResults {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome; a repeated key keeps its first position.
    pub fn insert(&mut self, key: impl Into<String>, status: CheckStatus) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = status,
            None => self.entries.push((key, status)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CheckStatus> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, status)| status)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CheckStatus)> {
        self.entries.iter().map(|(k, status)| (k.as_str(), status))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|(_, s)| !s.is_pass()).count()
    }
}

impl Serialize for CheckResults {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, status) in &self.entries {
            map.serialize_entry(key, status)?;
        }
        map.end()
    }
}

/// Overall outcome of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Files, tables, endpoints, and manifest paths examined
    pub checked: usize,
    /// Failed checks plus unreadable manifest paths
    pub failed: usize,
    /// Manifest paths that differ from the baseline
    pub drifted: usize,
}

impl Verdict {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failed == 0 && self.drifted == 0
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            return write!(f, "Verification passed ({} items checked)", self.checked);
        }
        write!(
            f,
            "Verification failed: {} of {} items failed",
            self.failed, self.checked
        )?;
        if self.drifted > 0 {
            write!(f, ", {} drifted from baseline", self.drifted)?;
        }
        Ok(())
    }
}

/// Everything a sweep produced
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub files: CheckResults,
    pub database: CheckResults,
    pub endpoints: CheckResults,
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
    /// Empty unless a baseline manifest was compared
    pub drift: Vec<Drift>,
}

impl VerificationReport {
    /// Fold every status into a single verdict.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        let manifest_failed = self.manifest.iter().filter(|e| e.value.is_failure()).count();
        Verdict {
            checked: self.files.len()
                + self.database.len()
                + self.endpoints.len()
                + self.manifest.len(),
            failed: self.files.failed()
                + self.database.failed()
                + self.endpoints.failed()
                + manifest_failed,
            drifted: self.drift.len(),
        }
    }

    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, vigil_errors::Error> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }
}

impl Serialize for VerificationReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        struct DriftList<'a>(&'a [Drift]);

        impl Serialize for DriftList<'_> {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for drift in self.0 {
                    map.serialize_entry(&drift.path, &drift.kind.to_string())?;
                }
                map.end()
            }
        }

        let verdict = self.verdict();
        let mut report = serializer.serialize_struct("VerificationReport", 8)?;
        report.serialize_field("files", &self.files)?;
        report.serialize_field("database", &self.database)?;
        report.serialize_field("apis", &self.endpoints)?;
        report.serialize_field("manifest", &self.manifest)?;
        report.serialize_field("manifest_path", &self.manifest_path.display().to_string())?;
        report.serialize_field("drift", &DriftList(&self.drift))?;
        report.serialize_field("verdict", &verdict)?;
        report.serialize_field("passed", &verdict.passed())?;
        report.end()
    }
}
