//! The post-response notification protocol: default fan-out, stop, redirect.

use syncbus::{
    Recipient, SyncRequest,
    testing::{
        FailingMiddleware, FailingSyncListener, RecordingSyncListener,
        RedirectingSyncListener, StaticMiddleware, StoppingSyncListener,
    },
};

mod common;
use common::string_setup;

#[tokio::test]
async fn default_broadcast_reaches_every_subscriber_including_initiator() {
    let (registry, transport, dispatcher) = string_setup();
    registry
        .bucket("messages")
        .layer(StaticMiddleware::new("hello".to_string()));

    transport.subscribe("messages", 1);
    transport.subscribe("messages", 2);
    transport.subscribe("messages", 3);

    dispatcher
        .dispatch("messages", SyncRequest::new("create"), 1)
        .await;

    for client in [1, 2, 3] {
        let notices = transport.notices_for(client);
        assert_eq!(notices.len(), 1, "client {client} missed the broadcast");
        assert_eq!(notices[0].bucket, "messages");
        assert_eq!(notices[0].action, "create");
        assert_eq!(notices[0].result, "hello");
    }

    // The initiator additionally got the direct reply.
    assert_eq!(transport.replies_for(1).len(), 1);
    assert!(transport.replies_for(2).is_empty());
}

#[tokio::test]
async fn stop_suppresses_the_default_broadcast() {
    let (registry, transport, dispatcher) = string_setup();
    let recorder = RecordingSyncListener::new();
    registry
        .bucket("messages")
        .layer(StaticMiddleware::new("quiet".to_string()))
        .on_sync(StoppingSyncListener)
        .on_sync(recorder.clone());

    transport.subscribe("messages", 1);
    transport.subscribe("messages", 2);

    dispatcher
        .dispatch("messages", SyncRequest::new("create"), 1)
        .await;

    // The requester still gets its reply and every listener still runs.
    assert_eq!(transport.replies_for(1).len(), 1);
    assert_eq!(recorder.count(), 1);

    assert!(transport.notices_for(1).is_empty());
    assert!(transport.notices_for(2).is_empty());
}

#[tokio::test]
async fn notify_redirects_to_exactly_the_given_targets() {
    let (registry, transport, dispatcher) = string_setup();
    registry
        .bucket("messages")
        .layer(StaticMiddleware::new("secret".to_string()))
        .on_sync(RedirectingSyncListener::new(vec![
            Recipient::channel("auditors"),
            Recipient::Client(5),
        ]));

    transport.subscribe("messages", 1);
    transport.subscribe("messages", 2);
    transport.join("auditors", 8);
    transport.join("auditors", 9);

    dispatcher
        .dispatch("messages", SyncRequest::new("create"), 1)
        .await;

    // No stop() was called, yet the default set is replaced, not extended.
    assert!(transport.notices_for(1).is_empty());
    assert!(transport.notices_for(2).is_empty());

    for client in [8, 9, 5] {
        let notices = transport.notices_for(client);
        assert_eq!(notices.len(), 1, "redirect target {client} missed out");
        assert_eq!(notices[0].result, "secret");
    }
}

#[tokio::test]
async fn stop_wins_even_after_notify() {
    let (registry, transport, dispatcher) = string_setup();
    registry
        .bucket("messages")
        .layer(StaticMiddleware::new("nothing".to_string()))
        .on_sync(RedirectingSyncListener::new(vec![Recipient::Client(5)]))
        .on_sync(StoppingSyncListener);

    dispatcher
        .dispatch("messages", SyncRequest::new("create"), 1)
        .await;

    assert!(transport.notices_for(5).is_empty());
}

#[tokio::test]
async fn later_notify_replaces_earlier_notify() {
    let (registry, transport, dispatcher) = string_setup();
    registry
        .bucket("messages")
        .layer(StaticMiddleware::new("v2".to_string()))
        .on_sync(RedirectingSyncListener::new(vec![Recipient::Client(5)]))
        .on_sync(RedirectingSyncListener::new(vec![Recipient::Client(6)]));

    dispatcher
        .dispatch("messages", SyncRequest::new("create"), 1)
        .await;

    assert!(transport.notices_for(5).is_empty(), "last notify call wins");
    assert_eq!(transport.notices_for(6).len(), 1);
}

#[tokio::test]
async fn error_outcomes_never_emit_sync_or_broadcast() {
    let (registry, transport, dispatcher) = string_setup();
    let recorder = RecordingSyncListener::new();
    registry
        .bucket("messages")
        .layer(FailingMiddleware::new("Unauthorized"))
        .on_sync(recorder.clone());

    transport.subscribe("messages", 1);
    transport.subscribe("messages", 2);

    dispatcher
        .dispatch("messages", SyncRequest::new("create"), 1)
        .await;

    // Documented policy: sync emission is success-only.
    assert_eq!(recorder.count(), 0);
    assert_eq!(transport.faults_for(1).len(), 1);
    assert!(transport.notices_for(1).is_empty());
    assert!(transport.notices_for(2).is_empty());
}

#[tokio::test]
async fn failing_listener_is_isolated() {
    let (registry, transport, dispatcher) = string_setup();
    let recorder = RecordingSyncListener::new();
    registry
        .bucket("messages")
        .layer(StaticMiddleware::new("ok".to_string()))
        .on_sync(FailingSyncListener)
        .on_sync(recorder.clone());

    transport.subscribe("messages", 2);

    dispatcher
        .dispatch("messages", SyncRequest::new("create"), 1)
        .await;

    // The explosion neither stops later listeners nor the broadcast.
    assert_eq!(recorder.count(), 1);
    assert_eq!(transport.notices_for(2).len(), 1);
}

#[tokio::test]
async fn listeners_run_in_registration_order_with_the_sync_record() {
    let (registry, _transport, dispatcher) = string_setup();
    let first = RecordingSyncListener::new();
    let second = RecordingSyncListener::new();
    registry
        .bucket("messages")
        .layer(StaticMiddleware::new("payload".to_string()))
        .on_sync(first.clone())
        .on_sync(second.clone());

    dispatcher
        .dispatch("messages", SyncRequest::new("update"), 42)
        .await;

    for recorder in [&first, &second] {
        let records = recorder.records();
        assert_eq!(records.len(), 1);
        let (client, bucket, action, result) = &records[0];
        assert_eq!(*client, 42);
        assert_eq!(bucket, "messages");
        assert_eq!(action, "update");
        assert_eq!(result, "payload");
    }
}
