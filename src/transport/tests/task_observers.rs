//! Tests for the task outcome observers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::span;
use transport::{ChannelObserver, LogForward, RunObserver, TaskOutcome, TaskStatus};

#[derive(Default)]
struct Counts {
    info: AtomicUsize,
    warn: AtomicUsize,
    other: AtomicUsize,
}

/// Minimal subscriber counting events by level.
#[derive(Clone, Default)]
struct CountingSubscriber(Arc<Counts>);

impl tracing::Subscriber for CountingSubscriber {
    fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &span::Attributes<'_>) -> span::Id {
        span::Id::from_u64(1)
    }

    fn record(&self, _span: &span::Id, _values: &span::Record<'_>) {}

    fn record_follows_from(&self, _span: &span::Id, _follows: &span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        let level = *event.metadata().level();
        if level == tracing::Level::INFO {
            self.0.info.fetch_add(1, Ordering::SeqCst);
        } else if level == tracing::Level::WARN {
            self.0.warn.fetch_add(1, Ordering::SeqCst);
        } else {
            self.0.other.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _span: &span::Id) {}

    fn exit(&self, _span: &span::Id) {}
}

fn outcome(status: TaskStatus) -> TaskOutcome {
    TaskOutcome {
        host: "127.0.0.1".to_string(),
        task: "install docker".to_string(),
        status,
        detail: Some("error".to_string()),
    }
}

#[test]
fn test_ok_event_logs_info_once() {
    let subscriber = CountingSubscriber::default();
    let counts = subscriber.clone();

    tracing::subscriber::with_default(subscriber, || {
        LogForward.on_task_outcome(&outcome(TaskStatus::Ok));
    });

    assert_eq!(counts.0.info.load(Ordering::SeqCst), 1);
    assert_eq!(counts.0.warn.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failure_statuses_log_warning_once() {
    for status in [TaskStatus::Failed, TaskStatus::Skipped, TaskStatus::Unreachable] {
        let subscriber = CountingSubscriber::default();
        let counts = subscriber.clone();

        tracing::subscriber::with_default(subscriber, || {
            LogForward.on_task_outcome(&outcome(status));
        });

        assert_eq!(counts.0.info.load(Ordering::SeqCst), 0, "{:?}", status);
        assert_eq!(counts.0.warn.load(Ordering::SeqCst), 1, "{:?}", status);
    }
}

#[test]
fn test_no_events_means_no_log_calls() {
    let subscriber = CountingSubscriber::default();
    let counts = subscriber.clone();

    tracing::subscriber::with_default(subscriber, || {
        let _observer = LogForward;
    });

    assert_eq!(counts.0.info.load(Ordering::SeqCst), 0);
    assert_eq!(counts.0.warn.load(Ordering::SeqCst), 0);
    assert_eq!(counts.0.other.load(Ordering::SeqCst), 0);
}

#[test]
fn test_channel_observer_forwards_outcomes() {
    let (sender, mut receiver) = tokio::sync::mpsc::channel(4);
    let observer = ChannelObserver::new(sender);

    observer.on_task_outcome(&outcome(TaskStatus::Ok));
    observer.on_task_outcome(&outcome(TaskStatus::Failed));

    let first = receiver.try_recv().unwrap();
    let second = receiver.try_recv().unwrap();
    assert_eq!(first.status, TaskStatus::Ok);
    assert_eq!(second.status, TaskStatus::Failed);
    assert!(receiver.try_recv().is_err());
}

#[test]
fn test_channel_observer_never_blocks_on_full_channel() {
    let (sender, mut receiver) = tokio::sync::mpsc::channel(1);
    let observer = ChannelObserver::new(sender);

    observer.on_task_outcome(&outcome(TaskStatus::Ok));
    // Channel is full now; the overflow event is dropped, not awaited.
    observer.on_task_outcome(&outcome(TaskStatus::Failed));

    assert_eq!(receiver.try_recv().unwrap().status, TaskStatus::Ok);
    assert!(receiver.try_recv().is_err());
}
