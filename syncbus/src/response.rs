//! The single-use response sink.

use std::sync::Mutex;
use syncbus_core::{BoxError, Payload, ResponseError};

/// How one chain execution ended.
#[derive(Debug)]
pub enum Outcome<P> {
    /// A layer answered the request with a result.
    Sent(P),

    /// A layer aborted the chain, or no layer answered it.
    Failed(BoxError),
}

enum Slot<P> {
    Pending,
    Done(Outcome<P>),
    Taken,
}

/// The single-use terminal sink handed to every layer of a chain execution.
///
/// A responder transitions exactly once from pending to settled, via
/// [`send`](Responder::send) or [`error`](Responder::error). Either call ends
/// the chain's progression; a second terminal call is a programming fault and
/// returns [`ResponseError::AlreadyCompleted`] without touching the first
/// outcome.
pub struct Responder<P: Payload> {
    slot: Mutex<Slot<P>>,
}

impl<P: Payload> Responder<P> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Pending),
        }
    }

    /// Answer the request with a result. Terminal.
    pub fn send(&self, result: P) -> Result<(), ResponseError> {
        self.settle(Outcome::Sent(result))
    }

    /// Answer the request with an error. Terminal.
    ///
    /// The error's `Display` output becomes the fault message the client
    /// receives; nothing is broadcast.
    pub fn error(&self, err: impl Into<BoxError>) -> Result<(), ResponseError> {
        self.settle(Outcome::Failed(err.into()))
    }

    /// Whether a terminal call already happened.
    pub fn is_settled(&self) -> bool {
        !matches!(*self.slot.lock().unwrap(), Slot::Pending)
    }

    fn settle(&self, outcome: Outcome<P>) -> Result<(), ResponseError> {
        let mut slot = self.slot.lock().unwrap();
        if matches!(*slot, Slot::Pending) {
            *slot = Slot::Done(outcome);
            Ok(())
        } else {
            Err(ResponseError::AlreadyCompleted)
        }
    }

    /// Extract the outcome, if settled and not yet taken.
    pub(crate) fn take(&self) -> Option<Outcome<P>> {
        let mut slot = self.slot.lock().unwrap();
        if !matches!(*slot, Slot::Done(_)) {
            return None;
        }
        match std::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Done(outcome) => Some(outcome),
            _ => unreachable!(),
        }
    }
}
