//! Differences between two manifests

use std::fmt;

use crate::{Manifest, ManifestValue};

/// How a path changed since the baseline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriftKind {
    /// Content digest differs
    Changed { before: String, after: String },
    /// Path was hashed before and is gone now
    NowMissing,
    /// Path was missing or unreadable before and has a digest now
    Appeared,
    /// Path is new to the manifest list
    Added,
    /// Path was dropped from the manifest list
    Removed,
}

/// One drifted path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub path: String,
    pub kind: DriftKind,
}

impl fmt::Display for DriftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Changed { before, after } => write!(f, "changed ({before} -> {after})"),
            Self::NowMissing => f.write_str("now missing"),
            Self::Appeared => f.write_str("appeared"),
            Self::Added => f.write_str("added"),
            Self::Removed => f.write_str("removed"),
        }
    }
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.kind)
    }
}

pub(crate) fn compare(baseline: &Manifest, current: &Manifest) -> Vec<Drift> {
    let mut drift = Vec::new();

    for entry in current {
        let before = baseline.get(&entry.path).map(ManifestValue::digest);
        let kind = match (before, entry.value.digest()) {
            (None, _) => Some(DriftKind::Added),
            (Some(Some(before)), Some(after)) => {
                (before != after).then(|| DriftKind::Changed {
                    before: before.to_hex(),
                    after: after.to_hex(),
                })
            }
            (Some(Some(_)), None) => Some(DriftKind::NowMissing),
            (Some(None), Some(_)) => Some(DriftKind::Appeared),
            (Some(None), None) => None,
        };
        if let Some(kind) = kind {
            drift.push(Drift {
                path: entry.path.clone(),
                kind,
            });
        }
    }

    for entry in baseline {
        if current.get(&entry.path).is_none() {
            drift.push(Drift {
                path: entry.path.clone(),
                kind: DriftKind::Removed,
            });
        }
    }

    drift
}
