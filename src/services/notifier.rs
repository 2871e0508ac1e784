//! Outbound message boundary towards the chat transport.

use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;
use tracing::info;

use crate::state::GroupId;

/// Result alias for delivery operations.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Error raised when a single outbound message could not be delivered.
///
/// Delivery failures are reported per target and never abort the loop that
/// triggered the broadcast.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The HTTP client could not be constructed.
    #[error("failed to build notifier client: {source}")]
    ClientBuilder {
        /// Underlying builder error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The transport failed before a response was received.
    #[error("delivery to group {group} failed: {source}")]
    Transport {
        /// Target group.
        group: GroupId,
        /// Underlying transport error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The chat API answered with a non-success status.
    #[error("chat API rejected message to group {group} with status {status}")]
    Rejected {
        /// Target group.
        group: GroupId,
        /// HTTP status returned by the API.
        status: u16,
    },
}

impl DeliveryError {
    /// Wrap any transport failure for the given group.
    pub fn transport(group: GroupId, source: impl Error + Send + Sync + 'static) -> Self {
        DeliveryError::Transport {
            group,
            source: Box::new(source),
        }
    }
}

/// Fire-and-forget message sink towards the chat transport.
pub trait Notifier: Send + Sync {
    /// Send one message to one group.
    fn send_message(&self, group: GroupId, text: &str) -> BoxFuture<'static, DeliveryResult<()>>;
}

/// Sink that only logs outbound messages; used when no chat transport is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceNotifier;

impl Notifier for TraceNotifier {
    fn send_message(&self, group: GroupId, text: &str) -> BoxFuture<'static, DeliveryResult<()>> {
        let text = text.to_owned();
        Box::pin(async move {
            info!(%group, %text, "outbound message (log-only sink)");
            Ok(())
        })
    }
}
