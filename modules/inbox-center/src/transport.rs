use async_trait::async_trait;
use inbox_common::{NotificationId, TransportConfig, TransportError};
use rand::Rng;
use tracing::debug;

/// Remote side of a read-status change.
#[async_trait]
pub trait ReadStatusTransport: Send + Sync {
    /// Ask the remote to set `is_read` on `id`. Resolves exactly once.
    async fn set_read(&self, id: &NotificationId, is_read: bool) -> Result<(), TransportError>;
}

/// Stand-in for a real request: fixed latency, then a coin flip weighted by
/// `failure_rate`.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    config: TransportConfig,
}

impl SimulatedTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ReadStatusTransport for SimulatedTransport {
    async fn set_read(&self, id: &NotificationId, is_read: bool) -> Result<(), TransportError> {
        tokio::time::sleep(self.config.latency).await;

        let rate = self.config.failure_rate.clamp(0.0, 1.0);
        let rejected = rand::rng().random_bool(rate);
        debug!(%id, is_read, rejected, "Simulated read-status round trip");

        if rejected {
            Err(TransportError::Rejected { id: id.to_string() })
        } else {
            Ok(())
        }
    }
}
