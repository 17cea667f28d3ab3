//! File existence checks

use std::path::Path;

use vigil_errors::StorageError;
use vigil_events::AuditSink;

use crate::{CheckResults, CheckStatus, Failure};

/// Report `PASS` for every path that exists, `FAIL` otherwise.
pub async fn check_files(paths: &[String], log: &dyn AuditSink) -> CheckResults {
    let mut results = CheckResults::new();

    for path in paths {
        let status = match tokio::fs::try_exists(path).await {
            Ok(true) => CheckStatus::Pass,
            Ok(false) => CheckStatus::Fail(Failure::NotFound),
            Err(e) => CheckStatus::Fail(Failure::Storage(StorageError::from_io_with_path(
                &e,
                Path::new(path),
            ))),
        };

        if status.is_pass() {
            log.info(&format!("File check passed for {path}"));
        } else {
            log.error(&format!("File check failed for {path}"));
        }
        results.insert(path.clone(), status);
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vigil_events::{MemorySink, Severity};

    #[tokio::test]
    async fn pass_iff_path_exists() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("present.txt");
        std::fs::write(&present, b"x").unwrap();
        let subdir = temp.path().join("dir");
        std::fs::create_dir(&subdir).unwrap();
        let absent = temp.path().join("absent.txt");

        let paths: Vec<String> = [&present, &absent, &subdir]
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        let log = MemorySink::new();

        let results = check_files(&paths, &log).await;

        assert_eq!(results.len(), 3);
        assert_eq!(results.get(&paths[0]), Some(&CheckStatus::Pass));
        assert_eq!(results.get(&paths[1]).unwrap().to_string(), "FAIL");
        assert_eq!(results.get(&paths[2]), Some(&CheckStatus::Pass));

        let keys: Vec<_> = results.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, paths);

        assert_eq!(log.messages(Severity::Info).len(), 2);
        assert_eq!(
            log.messages(Severity::Error),
            vec![format!("File check failed for {}", paths[1])]
        );
    }

    #[tokio::test]
    async fn empty_input_yields_no_results() {
        let log = MemorySink::new();
        assert!(check_files(&[], &log).await.is_empty());
        assert!(log.records().is_empty());
    }
}
