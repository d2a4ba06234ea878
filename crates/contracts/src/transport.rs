//! Transport trait - Dispatcher output interface
//!
//! Defines the abstract interface for one outbound call.

use bytes::Bytes;

use crate::TransportError;

/// Outbound call trait
///
/// Implementations are shared by every worker of a run, so calls take `&self`
/// and must not share mutable state beyond connection pooling internals.
#[trait_variant::make(Transport: Send)]
pub trait LocalTransport {
    /// Transport name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Perform exactly one call carrying `payload` to `url`
    ///
    /// # Errors
    /// Returns the per-item failure; never retried by the caller
    async fn dispatch_one(&self, url: &str, payload: &Bytes) -> Result<(), TransportError>;
}
