//! Integration tests for ops crate

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};
    use vigil_config::{Config, DatabaseSpec, RunOptions};
    use vigil_errors::NetworkError;
    use vigil_events::{Logger, MemorySink, Severity};
    use vigil_manifest::{DriftKind, ManifestValue};
    use vigil_net::NetClient;
    use vigil_ops::*;

    const HI_SHA256: &str = "8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4";

    fn closed_port_url(path: &str) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{port}{path}")
    }

    fn options_in(dir: &Path) -> RunOptions {
        RunOptions {
            log_file: dir.join("logs").join("verify.log"),
            manifest_path: dir.join("manifest.json"),
            ..RunOptions::default()
        }
    }

    fn path_str(path: &Path) -> String {
        path.display().to_string()
    }

    async fn seeded_database(dir: &Path) -> DatabaseSpec {
        let db = dir.join("dummy.db");
        vigil_state::seed_sample_database(&db).await.unwrap();
        DatabaseSpec {
            path: Some(db),
            tables: [("users", vec!["id".to_string(), "email".to_string()])]
                .into_iter()
                .collect(),
        }
    }

    async fn scenario() -> (TempDir, Config) {
        let temp = tempdir().unwrap();
        let a_txt = temp.path().join("a.txt");
        std::fs::write(&a_txt, b"hi").unwrap();
        let db = temp.path().join("dummy.db");
        vigil_state::seed_sample_database(&db).await.unwrap();

        let config = Config::from_json_str(&format!(
            r#"{{
                "files": ["{a}"],
                "database": {{"path": "{db}", "tables": {{"users": ["id", "name", "email"]}}}},
                "apis": ["{api}"],
                "manifest": ["{a}"]
            }}"#,
            a = path_str(&a_txt),
            db = path_str(&db),
            api = closed_port_url("/health"),
        ))
        .unwrap();
        (temp, config)
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let (temp, config) = scenario().await;
        let a_txt = path_str(&temp.path().join("a.txt"));
        let api = config.apis[0].clone();
        let options = options_in(temp.path());
        let log = Arc::new(
            Logger::open(&options.log_file)
                .unwrap()
                .with_echo(false),
        );

        let ctx = VerifyContextBuilder::new()
            .with_config(config)
            .with_options(options.clone())
            .with_log(log)
            .build()
            .unwrap();
        let report = run(&ctx).await.unwrap();

        assert_eq!(report.files.get(&a_txt), Some(&CheckStatus::Pass));
        assert_eq!(report.database.get("users"), Some(&CheckStatus::Pass));
        let api_status = report.endpoints.get(&api).unwrap();
        assert!(matches!(
            api_status,
            CheckStatus::Fail(Failure::Network(NetworkError::ConnectionRefused(_)))
        ));
        assert!(api_status.to_string().starts_with("FAIL (connection refused"));

        let written = std::fs::read_to_string(&options.manifest_path).unwrap();
        assert_eq!(
            written,
            format!("{{\n    \"{a_txt}\": \"{HI_SHA256}\"\n}}\n")
        );

        let verdict = report.verdict();
        assert_eq!(verdict.checked, 4);
        assert_eq!(verdict.failed, 1);
        assert!(!verdict.passed());

        let log_text = std::fs::read_to_string(&options.log_file).unwrap();
        let lines: Vec<_> = log_text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with(&format!("- INFO - File check passed for {a_txt}")));
        assert!(lines[1].ends_with("- INFO - Database check passed for table users"));
        assert!(lines[2].contains(&format!("- ERROR - API error for {api}")));
        assert!(lines[3].ends_with(&format!("- INFO - Manifest hash generated for {a_txt}")));
    }

    #[tokio::test]
    async fn test_empty_config_fails_database_but_still_writes_manifest() {
        let temp = tempdir().unwrap();
        let options = options_in(temp.path());
        let log = Arc::new(MemorySink::new());
        let ctx = VerifyContextBuilder::new()
            .with_config(Config::default())
            .with_options(options.clone())
            .with_log(log.clone())
            .build()
            .unwrap();

        let report = run(&ctx).await.unwrap();
        assert_eq!(report.database.len(), 1);
        assert!(matches!(
            report.database.get(DATABASE_KEY),
            Some(CheckStatus::Fail(Failure::Config(_)))
        ));
        let verdict = report.verdict();
        assert_eq!((verdict.checked, verdict.failed), (1, 1));
        assert_eq!(
            std::fs::read_to_string(&options.manifest_path).unwrap(),
            "{}\n"
        );
        assert_eq!(log.messages(Severity::Error).len(), 1);
    }

    #[tokio::test]
    async fn test_database_section_without_path_does_not_abort() {
        let temp = tempdir().unwrap();
        let a_txt = temp.path().join("a.txt");
        std::fs::write(&a_txt, b"hi").unwrap();
        let config = Config::from_json_str(&format!(
            r#"{{"database": {{"tables": {{"users": ["id"]}}}}, "manifest": ["{}"]}}"#,
            path_str(&a_txt)
        ))
        .unwrap();
        let options = options_in(temp.path());
        let ctx = VerifyContextBuilder::new()
            .with_config(config)
            .with_options(options.clone())
            .with_log(Arc::new(MemorySink::new()))
            .build()
            .unwrap();

        let report = run(&ctx).await.unwrap();
        let keys: Vec<_> = report.database.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec![DATABASE_KEY]);
        assert_eq!(
            report.manifest.get(&path_str(&a_txt)).unwrap().to_string(),
            HI_SHA256
        );
        assert!(options.manifest_path.exists());
        assert!(!report.verdict().passed());
    }

    #[tokio::test]
    async fn test_endpoint_statuses_are_distinguishable() {
        let server = MockServer::start_async().await;
        for (path, code) in [("/ok", 200), ("/missing", 404), ("/broken", 500), ("/created", 201)] {
            server
                .mock_async(move |when, then| {
                    when.method(GET).path(path);
                    then.status(code);
                })
                .await;
        }

        let urls = vec![
            server.url("/ok"),
            server.url("/missing"),
            server.url("/broken"),
            server.url("/created"),
            closed_port_url("/health"),
            closed_port_url("/ssl-status"),
        ];
        let client = NetClient::with_defaults().unwrap();
        let log = MemorySink::new();

        let results = check_endpoints(&client, &urls, 1, &log).await;
        let statuses: Vec<_> = results.iter().map(|(_, s)| s.to_string()).collect();
        assert_eq!(statuses[0], "PASS");
        assert_eq!(statuses[1], "FAIL (status 404)");
        assert_eq!(statuses[2], "FAIL (status 500)");
        assert_eq!(statuses[3], "FAIL (status 201)");
        assert!(statuses[4].starts_with("FAIL (connection refused"));
        assert!(statuses[5].starts_with("FAIL (connection refused"), "{}", statuses[5]);

        assert_eq!(log.messages(Severity::Info), vec![format!("API check passed for {}", urls[0])]);
        assert_eq!(log.messages(Severity::Error).len(), 5);
    }

    #[tokio::test]
    async fn test_concurrent_requests_keep_input_order() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/slow");
                then.status(200).delay(Duration::from_millis(300));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/fast");
                then.status(503);
            })
            .await;

        let urls = vec![server.url("/slow"), server.url("/fast"), server.url("/slow")];
        let client = NetClient::with_defaults().unwrap();
        let log = MemorySink::new();

        let results = check_endpoints(&client, &urls, 4, &log).await;
        // Duplicate URLs collapse into one entry at the first position.
        let keys: Vec<_> = results.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec![urls[0].clone(), urls[1].clone()]);
        assert_eq!(results.get(&urls[0]), Some(&CheckStatus::Pass));

        let messages: Vec<_> = log.records().into_iter().map(|r| r.message).collect();
        assert_eq!(
            messages,
            vec![
                format!("API check passed for {}", urls[0]),
                format!("API check failed for {}: status 503", urls[1]),
                format!("API check passed for {}", urls[0]),
            ]
        );
    }

    #[tokio::test]
    async fn test_baseline_drift_fails_verdict() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("app.bin");
        std::fs::write(&file, b"v1").unwrap();
        let options = RunOptions {
            baseline: Some(temp.path().join("manifest.json")),
            ..options_in(temp.path())
        };
        let config = Config {
            database: seeded_database(temp.path()).await,
            manifest: vec![path_str(&file)],
            ..Config::default()
        };

        let first = VerifyContextBuilder::new()
            .with_config(config.clone())
            .with_options(options.clone())
            .with_log(Arc::new(MemorySink::new()))
            .build()
            .unwrap();
        let report = run(&first).await.unwrap();
        assert!(report.drift.is_empty());
        assert!(report.verdict().passed());

        let unchanged = run(&first).await.unwrap();
        assert!(unchanged.drift.is_empty());

        std::fs::write(&file, b"v2").unwrap();
        let log = Arc::new(MemorySink::new());
        let second = VerifyContextBuilder::new()
            .with_config(config)
            .with_options(options)
            .with_log(log.clone())
            .build()
            .unwrap();
        let report = run(&second).await.unwrap();
        assert_eq!(report.drift.len(), 1);
        assert!(matches!(report.drift[0].kind, DriftKind::Changed { .. }));
        assert!(!report.verdict().passed());
        assert!(matches!(
            report.manifest.get(&path_str(&file)),
            Some(ManifestValue::Digest(_))
        ));
        assert!(log
            .messages(Severity::Error)
            .iter()
            .any(|m| m.starts_with("Manifest drift for")));
    }

    #[tokio::test]
    async fn test_builder_requires_log() {
        let err = VerifyContextBuilder::new()
            .with_config(Config::default())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("audit sink"));
    }
}
