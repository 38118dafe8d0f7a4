//! The sync record and its notification controls.

use std::sync::Mutex;
use syncbus_core::{ClientHandle, Payload, Recipient};

/// The record of one completed, successfully answered request.
///
/// Created after the chain settles with a result, passed by reference to the
/// bucket's sync listeners in registration order, then consumed to drive the
/// broadcast — it is never persisted. `stop` and `notify` are only meaningful
/// while listeners run; once emission finishes the dispatcher consumes the
/// event and no further targets can be added (the listener only ever holds a
/// borrow, so this cannot be violated from safe code).
pub struct SyncEvent<P: Payload, C: ClientHandle> {
    client: C,
    bucket: String,
    action: String,
    result: P,
    control: Mutex<NotifyControl<C>>,
}

struct NotifyControl<C> {
    stopped: bool,
    targets: Option<Vec<Recipient<C>>>,
}

impl<P: Payload, C: ClientHandle> SyncEvent<P, C> {
    pub(crate) fn new(client: C, bucket: String, action: String, result: P) -> Self {
        Self {
            client,
            bucket,
            action,
            result,
            control: Mutex::new(NotifyControl {
                stopped: false,
                targets: None,
            }),
        }
    }

    /// The client whose request produced this sync.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// The bucket the sync happened in.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The completed action.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The result that was sent back to the requester.
    pub fn result(&self) -> &P {
        &self.result
    }

    /// Suppress all broadcast for this sync. Idempotent; wins over
    /// [`notify`](Self::notify) regardless of call order.
    pub fn stop(&self) {
        self.control.lock().unwrap().stopped = true;
    }

    /// Replace the broadcast target set.
    ///
    /// The default ("all current subscribers of this bucket") is discarded,
    /// not extended. Calling again replaces the set again — last call wins.
    pub fn notify<I>(&self, targets: I)
    where
        I: IntoIterator<Item = Recipient<C>>,
    {
        self.control.lock().unwrap().targets = Some(targets.into_iter().collect());
    }

    /// Consume the event into its effective broadcast targets.
    ///
    /// `None` when stopped; otherwise the redirected set, or the whole bucket
    /// when no listener redirected.
    pub(crate) fn into_targets(self) -> Option<Vec<Recipient<C>>> {
        let control = self.control.into_inner().unwrap();
        if control.stopped {
            return None;
        }
        Some(
            control
                .targets
                .unwrap_or_else(|| vec![Recipient::Bucket(self.bucket)]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> SyncEvent<String, u64> {
        SyncEvent::new(7, "messages".to_string(), "create".to_string(), "hi".to_string())
    }

    #[test]
    fn default_target_is_the_bucket() {
        let targets = event().into_targets().unwrap();
        assert_eq!(targets, vec![Recipient::Bucket("messages".to_string())]);
    }

    #[test]
    fn stop_suppresses_everything() {
        let sync = event();
        sync.stop();
        sync.stop(); // idempotent
        assert!(sync.into_targets().is_none());
    }

    #[test]
    fn notify_replaces_and_last_call_wins() {
        let sync = event();
        sync.notify([Recipient::channel("audit")]);
        sync.notify([Recipient::Client(1), Recipient::channel("ops")]);

        let targets = sync.into_targets().unwrap();
        assert_eq!(
            targets,
            vec![Recipient::Client(1), Recipient::channel("ops")]
        );
    }

    #[test]
    fn stop_wins_over_notify() {
        let sync = event();
        sync.notify([Recipient::Client(1)]);
        sync.stop();
        assert!(sync.into_targets().is_none());
    }

    #[test]
    fn empty_notify_means_broadcast_nowhere() {
        let sync = event();
        sync.notify(Vec::new());
        assert_eq!(sync.into_targets().unwrap(), Vec::new());
    }
}
