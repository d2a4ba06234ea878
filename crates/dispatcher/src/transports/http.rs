//! HttpTransport - one JSON POST per item over a pooled client

use bytes::Bytes;
use contracts::{Transport, TransportConfig, TransportError};
use reqwest::header::CONTENT_TYPE;
use tracing::{instrument, trace};
use uuid::Uuid;

/// Header carrying a fresh UUID per call
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Transport that POSTs each payload as `application/json`
///
/// A non-2xx status counts as a failure. Nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    name: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with a client tuned from `config`
    pub fn from_config(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout())
            .build()
            .map_err(|e| TransportError::Build {
                message: e.to_string(),
            })?;

        Ok(Self::with_client("http", client))
    }

    /// Wrap an existing client
    pub fn with_client(name: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "http_transport_dispatch",
        skip(self, payload),
        fields(transport = %self.name, bytes = payload.len())
    )]
    async fn dispatch_one(&self, url: &str, payload: &Bytes) -> Result<(), TransportError> {
        let request_id = Uuid::new_v4();

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .body(payload.clone())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        // Read the body so the connection goes back to the pool
        response.bytes().await.map_err(classify)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        trace!(%request_id, status = status.as_u16(), "Dispatched");
        Ok(())
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            message: e.to_string(),
        }
    } else {
        TransportError::request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::{TcpListener, TcpStream};

    #[derive(Debug, Default)]
    struct Captured {
        content_type: Option<String>,
        request_ids: Vec<String>,
        bodies: Vec<Vec<u8>>,
    }

    /// Minimal HTTP/1.1 server answering every request with `status_line`
    async fn spawn_stub(status_line: &'static str) -> (SocketAddr, Arc<Mutex<Captured>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let captured = Arc::new(Mutex::new(Captured::default()));

        let server_captured = Arc::clone(&captured);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, status_line, Arc::clone(&server_captured)));
            }
        });

        (addr, captured)
    }

    async fn serve(stream: TcpStream, status_line: &'static str, captured: Arc<Mutex<Captured>>) {
        let (read, mut write) = stream.into_split();
        let mut reader = BufReader::new(read);

        loop {
            let mut line = String::new();
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
                    let value = value.trim().to_string();
                    let mut captured = captured.lock().unwrap();
                    match name.to_ascii_lowercase().as_str() {
                        "content-length" => content_length = value.parse().unwrap_or(0),
                        "content-type" => captured.content_type = Some(value),
                        "x-request-id" => captured.request_ids.push(value),
                        _ => {}
                    }
                }
            }

            let mut body = vec![0; content_length];
            if reader.read_exact(&mut body).await.is_err() {
                return;
            }
            captured.lock().unwrap().bodies.push(body);

            let response = format!("HTTP/1.1 {status_line}\r\ncontent-length: 0\r\n\r\n");
            if write.write_all(response.as_bytes()).await.is_err() {
                return;
            }
        }
    }

    fn transport(timeout_ms: u64) -> HttpTransport {
        let config = TransportConfig {
            timeout_ms,
            ..TransportConfig::default()
        };
        HttpTransport::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_post_success() {
        let (addr, captured) = spawn_stub("200 OK").await;
        let transport = transport(2_000);
        let url = format!("http://{addr}/api/v1/credit-application");

        let payload = Bytes::from_static(br#"{"application_id":"a-1"}"#);
        transport.dispatch_one(&url, &payload).await.unwrap();
        transport.dispatch_one(&url, &payload).await.unwrap();

        let captured = captured.lock().unwrap();
        assert_eq!(captured.content_type.as_deref(), Some("application/json"));
        assert_eq!(captured.bodies.len(), 2);
        assert_eq!(captured.bodies[0], payload.to_vec());
        // Fresh request id per call
        assert_eq!(captured.request_ids.len(), 2);
        assert_ne!(captured.request_ids[0], captured.request_ids[1]);
        assert!(Uuid::parse_str(&captured.request_ids[0]).is_ok());
    }

    #[tokio::test]
    async fn test_non_2xx_is_failure() {
        let (addr, _) = spawn_stub("500 Internal Server Error").await;
        let transport = transport(2_000);

        let err = transport
            .dispatch_one(&format!("http://{addr}/"), &Bytes::from_static(b"{}"))
            .await
            .unwrap_err();
        assert_eq!(err, TransportError::Status { status: 500 });
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = transport(2_000)
            .dispatch_one(&format!("http://{addr}/"), &Bytes::from_static(b"{}"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Request { .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        // Accepts but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let err = transport(100)
            .dispatch_one(&format!("http://{addr}/"), &Bytes::from_static(b"{}"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Timeout { .. }));
    }
}
