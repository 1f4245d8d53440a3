//! The operations the callback handler needs from the messaging platform.

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::line::events::{Event, MessageQuota, SendMessage};

/// Errors from parsing callbacks or calling the LINE API.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("reading callback body failed: {0}")]
    Body(String),
    #[error("invalid callback body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("line request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("line api error: {0}")]
    Api(String),
}

/// Messaging platform the callback handler talks to. Implemented by [`crate::line::LineClient`];
/// tests substitute their own.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Verify the request signature and decode the events, in the order LINE sent them.
    fn parse_request(&self, headers: &HeaderMap, body: &[u8]) -> Result<Vec<Event>, LineError>;

    /// Remaining message quota for this month.
    async fn message_quota(&self) -> Result<MessageQuota, LineError>;

    /// Send messages addressed by a reply token.
    async fn reply_message(&self, reply_token: &str, messages: Vec<SendMessage>)
        -> Result<(), LineError>;
}
