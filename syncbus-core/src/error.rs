//! Error types for syncbus.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`DispatchError`] - Protocol and configuration faults around a dispatch
//! - [`ResponseError`] - Misuse of the single-use response sink
//!
//! Middleware errors are deliberately *not* wrapped in a variant here: a
//! layer that aborts the chain produces a plain [`BoxError`], and the fault
//! string delivered to the client is exactly that error's `Display` output
//! (an auth layer failing with `"Unauthorized"` yields
//! `{ error: "Unauthorized" }` on the wire).

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Protocol and configuration faults detected by the dispatcher.
///
/// Each variant is answered to the originating client as a [`SyncFault`] and
/// never broadcast. All variants are per-request: one failing dispatch never
/// affects other in-flight chains.
///
/// [`SyncFault`]: crate::SyncFault
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The inbound message carried no action; the chain never starts.
    #[error("sync message is missing an action")]
    MissingAction,

    /// A strict registry was asked for a bucket that was never registered.
    #[error("unknown bucket: {0}")]
    UnknownBucket(String),

    /// Every matching layer proceeded and none produced a response.
    ///
    /// This is a configuration fault (no layer ultimately answered the
    /// request) and is surfaced to the client rather than left pending.
    #[error("no middleware produced a response")]
    ChainExhausted,
}

/// Misuse of the single-use response sink.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseError {
    /// `send` or `error` was called after the response already settled.
    ///
    /// This is a programming fault in user middleware. The chain driver
    /// detects it, logs loudly and keeps the first outcome; the request is
    /// never answered twice.
    #[error("response already completed")]
    AlreadyCompleted,
}
