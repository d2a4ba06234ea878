//! LogTransport - logs each call via tracing instead of sending it

use bytes::Bytes;
use contracts::{Transport, TransportError};
use tracing::{debug, instrument};

/// Transport that never touches the network (dry runs)
pub struct LogTransport {
    name: String,
}

impl LogTransport {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for LogTransport {
    fn default() -> Self {
        Self::new("log")
    }
}

impl Transport for LogTransport {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_transport_dispatch",
        skip(self, payload),
        fields(transport = %self.name)
    )]
    async fn dispatch_one(&self, url: &str, payload: &Bytes) -> Result<(), TransportError> {
        debug!(url, bytes = payload.len(), "Dry-run dispatch");
        Ok(())
    }
}
