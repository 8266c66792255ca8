// End-to-end pipeline test: store → scheduler → queue → consumer → sink,
// all in-process over the in-memory backends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use calendar_core::{
    EventDraft, EventStore, InMemoryEventStore, InMemoryQueue, Notification, Sink,
};
use calendar_scheduler::{Notifier, NotifierConfig, Scheduler, SchedulerConfig};
use calendar_sender::Consumer;
use chrono::Utc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

struct RecordingSink {
    tx: mpsc::UnboundedSender<Notification>,
}

#[async_trait]
impl Sink for RecordingSink {
    async fn deliver(&self, notification: &Notification) -> calendar_core::Result<()> {
        self.tx
            .send(notification.clone())
            .map_err(|_| calendar_core::CalendarError::sink("recorder gone"))
    }
}

fn draft(title: &str, offset_secs: i64, notify_time: i64) -> EventDraft {
    EventDraft {
        title: title.to_string(),
        description: String::new(),
        start_time: Utc::now() + chrono::Duration::seconds(offset_secs),
        duration: 3600,
        owner: 12,
        notify_time,
    }
}

#[tokio::test]
async fn due_event_flows_from_store_to_sink() {
    let store = Arc::new(InMemoryEventStore::new());
    let queue = Arc::new(InMemoryQueue::new());
    let (tx, mut sink_rx) = mpsc::unbounded_channel();

    // one event inside its lead window, one that must stay silent
    let due_id = store.create_event(draft("due", 50, 100)).await.unwrap();
    let due_event = store.get_event(due_id).await.unwrap();
    let silent_id = store.create_event(draft("silent", 10, 0)).await.unwrap();

    let scheduler_token = CancellationToken::new();
    let consumer_token = CancellationToken::new();

    let scheduler = Scheduler::new(
        store.clone(),
        Notifier::new(queue.clone(), NotifierConfig::default()),
        SchedulerConfig {
            period: Duration::from_millis(10),
            suppress_duplicates: false,
        },
        scheduler_token.clone(),
    );
    let consumer = Consumer::new(
        queue.clone(),
        Arc::new(RecordingSink { tx }),
        consumer_token.clone(),
    );

    let scheduler_handle = tokio::spawn(scheduler.run());
    let consumer_handle = tokio::spawn(consumer.run());

    // the due event reaches the sink with the content captured at enqueue
    let delivered = tokio::time::timeout(Duration::from_secs(2), sink_rx.recv())
        .await
        .expect("notification within a few ticks")
        .expect("sink channel open");
    assert_eq!(delivered.id, due_id);
    assert_eq!(delivered.title, "due");
    assert_eq!(delivered.owner, 12);
    assert_eq!(delivered.event_time, due_event.start_time);

    // stop the producer first, then the consumer
    scheduler_token.cancel();
    scheduler_handle.await.unwrap();
    consumer_token.cancel();
    consumer_handle.await.unwrap().unwrap();

    // nothing for the notify_time == 0 event, ever
    let mut remaining = Vec::new();
    while let Ok(n) = sink_rx.try_recv() {
        remaining.push(n);
    }
    assert!(
        remaining.iter().all(|n| n.id != silent_id),
        "silent event must never reach the sink"
    );
}

#[tokio::test]
async fn deleted_event_still_delivers_the_enqueued_notification() {
    let store = Arc::new(InMemoryEventStore::new());
    let queue = Arc::new(InMemoryQueue::new());
    let (tx, mut sink_rx) = mpsc::unbounded_channel();

    let id = store.create_event(draft("doomed", 50, 100)).await.unwrap();

    // enqueue one batch by hand, then delete the event before consuming —
    // the consumer still delivers the content captured at enqueue time
    let notifier = Notifier::new(queue.clone(), NotifierConfig::default());
    let due = store.list_events_to_notify().await.unwrap();
    notifier.notify(&due).await;
    store.delete_event(id).await.unwrap();

    let consumer_token = CancellationToken::new();
    let consumer_handle = tokio::spawn(
        Consumer::new(
            queue.clone(),
            Arc::new(RecordingSink { tx }),
            consumer_token.clone(),
        )
        .run(),
    );

    let delivered = tokio::time::timeout(Duration::from_secs(2), sink_rx.recv())
        .await
        .expect("stale notification delivered")
        .expect("sink channel open");
    assert_eq!(delivered.id, id);
    assert_eq!(delivered.title, "doomed");

    consumer_token.cancel();
    consumer_handle.await.unwrap().unwrap();
}
