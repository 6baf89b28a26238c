//! # Message Transport
//!
//! The composer never sends anything itself. When the user confirms a send
//! the host hands the [`OutgoingMessage`] to a [`Transport`], which either
//! accepts it (assigning a [`MessageId`]) or fails.

use std::fmt;

use compose_core::OutgoingMessage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Unique identifier of a delivered message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random message ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg:{}", self.0)
    }
}

/// A message the transport accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: MessageId,
    pub body: String,
}

/// Transport errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Message rejected: {0}")]
    Rejected(String),

    #[error("Transport unavailable")]
    Unavailable,
}

/// Delivers outgoing messages
pub trait Transport {
    /// Attempts delivery, returning the ID assigned to the message
    fn send(&mut self, message: &OutgoingMessage) -> Result<MessageId, TransportError>;
}

/// Transport that accepts every message without leaving the process
///
/// Can be told to fail a number of upcoming sends.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    accepted: usize,
    failures_left: usize,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next `count` sends with [`TransportError::Unavailable`]
    pub fn failing(count: usize) -> Self {
        Self {
            accepted: 0,
            failures_left: count,
        }
    }

    /// Number of messages accepted so far
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}

impl Transport for LoopbackTransport {
    fn send(&mut self, message: &OutgoingMessage) -> Result<MessageId, TransportError> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(TransportError::Unavailable);
        }
        if message.body.is_empty() {
            return Err(TransportError::Rejected("empty body".to_string()));
        }

        let id = MessageId::new();
        self.accepted += 1;
        debug!(%id, len = message.body.len(), "loopback accepted message");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: &str) -> OutgoingMessage {
        OutgoingMessage { body: body.into() }
    }

    #[test]
    fn test_message_id_unique() {
        assert_ne!(MessageId::new(), MessageId::new());
    }

    #[test]
    fn test_message_id_display() {
        let id = MessageId::new();
        assert_eq!(id.to_string(), format!("msg:{}", id.as_uuid()));
    }

    #[test]
    fn test_loopback_accepts() {
        let mut transport = LoopbackTransport::new();
        assert!(transport.send(&message("hi")).is_ok());
        assert!(transport.send(&message("there")).is_ok());
        assert_eq!(transport.accepted(), 2);
    }

    #[test]
    fn test_loopback_rejects_empty_body() {
        let mut transport = LoopbackTransport::new();
        assert!(matches!(
            transport.send(&message("")),
            Err(TransportError::Rejected(_))
        ));
    }

    #[test]
    fn test_loopback_failures_run_out() {
        let mut transport = LoopbackTransport::failing(1);
        assert_eq!(
            transport.send(&message("hi")),
            Err(TransportError::Unavailable)
        );
        assert!(transport.send(&message("hi")).is_ok());
        assert_eq!(transport.accepted(), 1);
    }

    #[test]
    fn test_sent_message_serde() {
        let sent = SentMessage {
            id: MessageId::new(),
            body: "hello".into(),
        };
        let json = serde_json::to_string(&sent).unwrap();
        let back: SentMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sent);
    }
}
