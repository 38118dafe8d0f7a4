//! Wire envelopes exchanged with the client wrapper.
//!
//! Four shapes cover the whole contract:
//!
//! - [`SyncRequest`] — inbound `{ action, data, options }`, tagged by the
//!   transport with a bucket name and a client handle.
//! - [`SyncReply`] — success response `{ result }` to the requester.
//! - [`SyncFault`] — error response `{ error }` to the requester.
//! - [`SyncNotice`] — pushed notification `{ bucket, action, result }` to
//!   subscribers.
//!
//! With the `serde` feature these derive `Serialize`/`Deserialize` so a JSON
//! (or similar) transport can move them directly on and off the wire.

use crate::payload::Payload;
use std::collections::HashMap;

/// An inbound sync message: the verb plus its bucket-defined payload.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncRequest<P: Payload> {
    /// The action verb (`create`, `read`, `update`, `delete` or custom).
    pub action: String,

    /// The payload; shape is owned by the bucket's middleware.
    #[cfg_attr(feature = "serde", serde(default))]
    pub data: Option<P>,

    /// Free-form per-request options (query constraints, auth tokens, ...).
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: HashMap<String, P>,
}

impl<P: Payload> SyncRequest<P> {
    /// Build a request with no data and no options.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            data: None,
            options: HashMap::new(),
        }
    }

    /// Build a request carrying `data`.
    pub fn with_data(action: impl Into<String>, data: P) -> Self {
        Self {
            action: action.into(),
            data: Some(data),
            options: HashMap::new(),
        }
    }

    /// Attach one option.
    pub fn option(mut self, key: impl Into<String>, value: P) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// The success response returned to the requesting client.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncReply<P: Payload> {
    /// The result produced by whichever layer answered the request.
    pub result: P,
}

/// The error response returned to the requesting client.
///
/// Faults are never broadcast; only the originating client sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncFault {
    /// Human-readable error message.
    pub error: String,
}

impl SyncFault {
    /// Build a fault from anything displayable.
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

/// A pushed notification delivered to subscribers after a completed sync.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncNotice<P: Payload> {
    /// The bucket the sync happened in.
    pub bucket: String,

    /// The action that completed.
    pub action: String,

    /// The result that was sent back to the requester.
    pub result: P,
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn request_defaults_missing_fields() {
        let req: SyncRequest<Value> = serde_json::from_value(json!({
            "action": "read"
        }))
        .unwrap();

        assert_eq!(req.action, "read");
        assert!(req.data.is_none());
        assert!(req.options.is_empty());
    }

    #[test]
    fn notice_round_trips() {
        let notice = SyncNotice {
            bucket: "messages".to_string(),
            action: "create".to_string(),
            result: json!({ "id": 1, "text": "hi" }),
        };

        let wire = serde_json::to_value(&notice).unwrap();
        assert_eq!(wire["bucket"], "messages");
        assert_eq!(wire["result"]["text"], "hi");
    }

    #[test]
    fn fault_carries_display_output() {
        let fault = SyncFault::new(std::io::Error::other("Unauthorized"));
        assert_eq!(fault.error, "Unauthorized");
    }
}
