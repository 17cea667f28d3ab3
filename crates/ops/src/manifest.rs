//! Manifest generation

use std::path::Path;

use vigil_errors::{Error, StorageError};
use vigil_events::AuditSink;
use vigil_hash::Hash;
use vigil_manifest::{Manifest, ManifestValue};

/// Hash every listed path and write the manifest to `output`.
///
/// Paths that do not exist are recorded as `MISSING`; paths that exist but
/// cannot be read are recorded as `FAIL (<reason>)`.
///
/// # Errors
///
/// Returns an error only if the manifest file cannot be written.
pub async fn build_manifest(
    paths: &[String],
    output: &Path,
    log: &dyn AuditSink,
) -> Result<Manifest, Error> {
    let mut manifest = Manifest::new();

    for path in paths {
        let value = digest_path(Path::new(path)).await;
        match &value {
            ManifestValue::Digest(_) => log.info(&format!("Manifest hash generated for {path}")),
            ManifestValue::Missing => log.error(&format!("Manifest file missing: {path}")),
            ManifestValue::Unreadable { reason } => {
                log.error(&format!("Manifest hash failed for {path}: {reason}"));
            }
        }
        manifest.insert(path.clone(), value);
    }

    manifest.write_to_file(output).await?;
    tracing::debug!(path = %output.display(), entries = manifest.len(), "Wrote manifest");
    Ok(manifest)
}

async fn digest_path(path: &Path) -> ManifestValue {
    match tokio::fs::try_exists(path).await {
        Ok(false) => return ManifestValue::Missing,
        Ok(true) => {}
        Err(e) => {
            return ManifestValue::Unreadable {
                reason: StorageError::from_io_with_path(&e, path).to_string(),
            }
        }
    }

    match Hash::hash_file(path).await {
        Ok(hash) => ManifestValue::Digest(hash),
        // Removed between the existence check and the open.
        Err(Error::Storage(StorageError::PathNotFound { .. })) => ManifestValue::Missing,
        Err(Error::Storage(e)) => ManifestValue::Unreadable {
            reason: e.to_string(),
        },
        Err(e) => ManifestValue::Unreadable {
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vigil_events::{MemorySink, Severity};

    const HI_SHA256: &str = "8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4";

    #[tokio::test]
    async fn digests_known_content_and_marks_missing() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("a.txt");
        std::fs::write(&present, b"hi").unwrap();
        let absent = temp.path().join("gone.txt");
        let output = temp.path().join("manifest.json");

        let paths = vec![
            present.display().to_string(),
            absent.display().to_string(),
        ];
        let log = MemorySink::new();

        let manifest = build_manifest(&paths, &output, &log).await.unwrap();
        assert_eq!(manifest.get(&paths[0]).unwrap().to_string(), HI_SHA256);
        assert_eq!(manifest.get(&paths[1]), Some(&ManifestValue::Missing));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written[&paths[0]], HI_SHA256);
        assert_eq!(written[&paths[1]], "MISSING");

        assert_eq!(log.messages(Severity::Info).len(), 1);
        assert_eq!(
            log.messages(Severity::Error),
            vec![format!("Manifest file missing: {}", paths[1])]
        );
    }

    #[tokio::test]
    async fn rebuild_is_byte_identical() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.txt");
        let b = temp.path().join("b.txt");
        std::fs::write(&a, b"alpha").unwrap();
        std::fs::write(&b, b"beta").unwrap();
        let output = temp.path().join("manifest.json");
        let paths = vec![b.display().to_string(), a.display().to_string()];
        let log = MemorySink::new();

        build_manifest(&paths, &output, &log).await.unwrap();
        let first = std::fs::read(&output).unwrap();
        build_manifest(&paths, &output, &log).await.unwrap();
        let second = std::fs::read(&output).unwrap();

        assert_eq!(first, second);
        let text = String::from_utf8(first).unwrap();
        assert!(text.find("b.txt").unwrap() < text.find("a.txt").unwrap());
    }

    #[tokio::test]
    async fn directory_is_unreadable_not_missing() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("manifest.json");
        let paths = vec![temp.path().display().to_string()];
        let log = MemorySink::new();

        let manifest = build_manifest(&paths, &output, &log).await.unwrap();
        let value = manifest.get(&paths[0]).unwrap();
        assert!(value.is_failure());
        assert!(value.to_string().starts_with("FAIL ("));
        assert_eq!(log.messages(Severity::Error).len(), 1);
    }
}
