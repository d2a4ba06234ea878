//! # Integration Tests
//!
//! End-to-end flows across crates.
//!
//! Covers:
//! - Result contract snapshot
//! - Config -> generator -> controller with stub transports
//! - Manual batches parsed from JSON
//! - A real HTTP round trip against a local stub server

#[cfg(test)]
mod contract_tests {
    use std::time::Duration;

    use contracts::RunResult;

    #[test]
    fn test_run_result_json_shape() {
        let result = RunResult::new(4, vec!["x".to_string()], Duration::from_millis(500));
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["total"], 4);
        assert_eq!(value["failed"], serde_json::json!(["x"]));
        assert_eq!(value["duration_ns"], 500_000_000_u64);
        assert_eq!(value["throughput"], 8.0);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use bytes::Bytes;
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{RecordKind, Transport, TransportError};
    use dispatcher::{ControllerConfig, LogTransport, RunController, RunError};
    use synth::{ManualBatch, RecordGenerator};

    /// Captures every call; fails ids listed in `fail_ids`
    #[derive(Default)]
    struct RecordingTransport {
        fail_ids: HashSet<String>,
        calls: Mutex<Vec<(String, serde_json::Value)>>,
    }

    impl RecordingTransport {
        fn failing(ids: impl IntoIterator<Item = String>) -> Self {
            Self {
                fail_ids: ids.into_iter().collect(),
                ..Self::default()
            }
        }
    }

    impl Transport for RecordingTransport {
        fn name(&self) -> &str {
            "recording"
        }

        async fn dispatch_one(&self, url: &str, payload: &Bytes) -> Result<(), TransportError> {
            let body: serde_json::Value = serde_json::from_slice(payload)
                .map_err(|e| TransportError::request(e.to_string()))?;
            let id = body
                .get("application_id")
                .or_else(|| body.get("id"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            self.calls.lock().unwrap().push((url.to_string(), body));

            if self.fail_ids.contains(&id) {
                Err(TransportError::Status { status: 503 })
            } else {
                Ok(())
            }
        }
    }

    const CONFIG: &str = r#"
[manual]
url = "http://gateway.test/api/gtwsvc/async/credit-application"
workers = 3

[load]
workers = 6
record_kind = "credit_application"

[targets]
credit_application = "http://gateway.test/ca"
transaction = "http://gateway.test/txn"

[generator]
seed = 99
"#;

    /// End-to-end: TOML config -> seeded generator -> controller -> transport
    #[tokio::test]
    async fn test_e2e_config_to_load_run() {
        let config = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap();
        let transport = Arc::new(RecordingTransport::default());
        let source = RecordGenerator::from_seed(config.load.record_kind, config.generator.seed);
        let mut controller = RunController::new(
            ControllerConfig::from_config(&config),
            Arc::clone(&transport),
            source,
        );

        let result = controller.run_load(50).await.unwrap();

        assert_eq!(result.total, 50);
        assert!(result.failed.is_empty());

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 50);
        assert!(calls.iter().all(|(url, _)| url == "http://gateway.test/ca"));

        let ids: HashSet<_> = calls
            .iter()
            .map(|(_, body)| body["application_id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids.len(), 50);
        assert!(calls.iter().all(|(_, body)| body["applicant"].is_object()));
    }

    /// End-to-end: JSON batch -> ManualBatch -> run_manual with partial failure
    #[tokio::test]
    async fn test_e2e_manual_batch_partial_failure() {
        let mut generator = RecordGenerator::with_seed(RecordKind::Transaction, 5);
        let records: Vec<_> = (0..6).map(|_| generator.transaction()).collect();
        let body = serde_json::to_vec(&records).unwrap();

        let items = ManualBatch::from_json(RecordKind::Transaction, &body).unwrap();
        assert_eq!(items.len(), 6);

        let failing = vec![records[1].id.clone(), records[4].id.clone()];
        let transport = Arc::new(RecordingTransport::failing(failing.clone()));
        let controller = RunController::manual(
            ControllerConfig {
                manual_url: "http://gateway.test/manual".to_string(),
                manual_workers: 2,
                ..ControllerConfig::default()
            },
            Arc::clone(&transport),
        );

        let err = controller.run_manual(items).await.unwrap_err();

        match err {
            RunError::PartialFailure { mut failed_ids, total } => {
                failed_ids.sort();
                let mut expected = failing;
                expected.sort();
                assert_eq!(failed_ids, expected);
                assert_eq!(total, 6);
            }
            other => panic!("unexpected error: {other}"),
        }
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 6);
        assert!(calls.iter().all(|(url, _)| url == "http://gateway.test/manual"));
    }

    /// Malformed batch is rejected before any dispatch
    #[test]
    fn test_e2e_manual_batch_rejects_bad_json() {
        let err = ManualBatch::from_json(RecordKind::CreditApplication, b"{not json").unwrap_err();
        assert!(err.to_string().contains("credit_application"));
    }

    /// Duration-bounded dry run against the log transport
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_e2e_duration_run_dry() {
        let mut controller = RunController::new(
            ControllerConfig {
                load_workers: 4,
                chunk_size: 32,
                ..ControllerConfig::default()
            },
            Arc::new(LogTransport::default()),
            RecordGenerator::with_seed(RecordKind::Transaction, 3),
        );

        let result = controller
            .run_load_for(Duration::from_millis(150))
            .await
            .unwrap();

        assert!(result.total > 0);
        assert!(result.failed.is_empty());
        assert!(result.throughput > 0.0);
        assert!(result.duration < Duration::from_secs(2));
    }
}

#[cfg(test)]
mod http_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use config_loader::{ConfigFormat, ConfigLoader};
    use dispatcher::RunController;
    use synth::RecordGenerator;
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    /// Answers 200 to every request, counting them
    async fn spawn_gateway() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let server_hits = Arc::clone(&hits);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let hits = Arc::clone(&server_hits);
                tokio::spawn(async move {
                    let (read, mut write) = stream.into_split();
                    let mut reader = BufReader::new(read);
                    let mut line = String::new();
                    loop {
                        line.clear();
                        if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                            return;
                        }
                        let mut content_length = 0;
                        loop {
                            line.clear();
                            if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                                return;
                            }
                            let header = line.trim_end();
                            if header.is_empty() {
                                break;
                            }
                            if let Some((name, value)) = header.split_once(':') {
                                if name.eq_ignore_ascii_case("content-length") {
                                    content_length = value.trim().parse().unwrap_or(0);
                                }
                            }
                        }
                        let mut body = vec![0; content_length];
                        if reader.read_exact(&mut body).await.is_err() {
                            return;
                        }
                        hits.fetch_add(1, Ordering::SeqCst);
                        let response = "HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n";
                        if write.write_all(response.as_bytes()).await.is_err() {
                            return;
                        }
                    }
                });
            }
        });

        (format!("http://{addr}"), hits)
    }

    /// Real reqwest client against a local gateway stub
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_e2e_http_load_run() {
        let (base, hits) = spawn_gateway().await;
        let toml = format!(
            "[load]\nworkers = 4\nrecord_kind = \"transaction\"\n\n\
             [targets]\ntransaction = \"{base}/api/gtwsvc/async/transaction\"\n\n\
             [transport]\ntimeout_ms = 2000\n"
        );
        let config = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();

        let source = RecordGenerator::from_seed(config.load.record_kind, Some(11));
        let mut controller = RunController::from_config(&config, source).unwrap();

        let result = controller.run_load(20).await.unwrap();

        assert_eq!(result.total, 20);
        assert!(result.failed.is_empty(), "failed: {:?}", result.failed);
        assert_eq!(hits.load(Ordering::SeqCst), 20);
    }
}
