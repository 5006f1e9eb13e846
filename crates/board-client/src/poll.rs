//! Topic watches - polling-as-pseudo-subscription.
//!
//! There is no push transport; a watch re-fetches the authoritative
//! snapshot for its topic on a fixed cadence and hands it to a callback
//! until cooperatively cancelled. Swapping in a real push transport
//! later only has to preserve this interface.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;

use board_core::domain::{BoardItem, Topic};
use board_core::ports::ItemSource;

/// Poll cadence configuration.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between the end of one fetch cycle and the start of the next.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(5000),
        }
    }
}

impl PollConfig {
    pub fn from_env() -> Self {
        Self {
            interval: Duration::from_millis(
                std::env::var("BOARD_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            ),
        }
    }
}

/// Handle to a running topic watch.
///
/// Cancellation is cooperative: [`stop`](Self::stop) clears the active
/// flag; a fetch already in flight completes but its result is
/// discarded, and no further cycle is scheduled. There is no hard abort.
pub struct TopicWatch {
    active: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl TopicWatch {
    /// Stop the watch. Idempotent.
    pub fn stop(&self) {
        self.active.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Stop the watch and wait for its poll loop to wind down.
    pub async fn join(self) {
        self.stop();
        let _ = self.handle.await;
    }
}

/// Start watching a topic: an immediate first fetch, then one fetch per
/// interval until the returned handle is stopped.
///
/// Cycle N+1 is never issued before cycle N's fetch has settled, so at
/// most one request per watch is in flight and snapshots arrive in
/// fetch-issue order. A failed fetch is logged and swallowed; the
/// callback is not invoked for that cycle and the cadence continues.
pub fn start_topic_watch<T, S, F>(
    source: Arc<S>,
    topic: Topic,
    config: PollConfig,
    mut on_snapshot: F,
) -> TopicWatch
where
    T: BoardItem,
    S: ItemSource<T> + ?Sized + 'static,
    F: FnMut(Vec<T>) + Send + 'static,
{
    let active = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&active);
    let handle = tokio::spawn(async move {
        loop {
            if !flag.load(Ordering::Acquire) {
                break;
            }
            match source.fetch_items(topic).await {
                Ok(snapshot) => {
                    // Cancelled while the fetch was in flight: discard.
                    if !flag.load(Ordering::Acquire) {
                        break;
                    }
                    on_snapshot(snapshot);
                }
                Err(err) => {
                    tracing::warn!(
                        topic = %topic,
                        error = %err,
                        "poll cycle failed; keeping previous snapshot"
                    );
                }
            }
            if !flag.load(Ordering::Acquire) {
                break;
            }
            tokio::time::sleep(config.interval).await;
        }
        tracing::debug!(topic = %topic, "topic watch stopped");
    });
    TopicWatch { active, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use tokio::sync::Notify;
    use uuid::Uuid;

    use board_core::domain::{Message, MessageDraft, Tab};
    use board_core::error::SourceError;

    /// Scripted source: counts fetches, optionally failing some cycles
    /// or holding each fetch until released.
    struct ScriptedSource {
        fetches: AtomicUsize,
        fail_on: Option<usize>,
        hold: Option<Arc<Notify>>,
    }

    impl ScriptedSource {
        fn new() -> Self {
            Self {
                fetches: AtomicUsize::new(0),
                fail_on: None,
                hold: None,
            }
        }

        fn failing_on(cycle: usize) -> Self {
            Self {
                fail_on: Some(cycle),
                ..Self::new()
            }
        }

        fn held_by(notify: Arc<Notify>) -> Self {
            Self {
                hold: Some(notify),
                ..Self::new()
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ItemSource<Message> for ScriptedSource {
        async fn fetch_items(&self, _topic: Topic) -> Result<Vec<Message>, SourceError> {
            let cycle = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(hold) = &self.hold {
                hold.notified().await;
            }
            if self.fail_on == Some(cycle) {
                return Err(SourceError::Backend("scripted failure".into()));
            }
            Ok(vec![Message::new(MessageDraft::chat("poller", "hi"))])
        }

        async fn submit_item(&self, draft: MessageDraft) -> Result<Message, SourceError> {
            Ok(Message::new(draft))
        }

        async fn delete_item(&self, _id: Uuid) -> Result<(), SourceError> {
            Ok(())
        }
    }

    fn chat_topic() -> Topic {
        Topic::Tab(Tab::Chat)
    }

    #[tokio::test(start_paused = true)]
    async fn first_fetch_is_immediate() {
        let source = Arc::new(ScriptedSource::new());
        let delivered = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&delivered);
        let watch = start_topic_watch(
            Arc::clone(&source),
            chat_topic(),
            PollConfig::default(),
            move |snapshot: Vec<Message>| {
                assert_eq!(snapshot.len(), 1);
                seen.fetch_add(1, Ordering::SeqCst);
            },
        );
        // No interval has elapsed yet; the first cycle still runs.
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
        watch.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn polls_on_a_fixed_cadence() {
        let source = Arc::new(ScriptedSource::new());
        let delivered = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&delivered);
        let watch = start_topic_watch(
            Arc::clone(&source),
            chat_topic(),
            PollConfig::default(),
            move |_: Vec<Message>| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
        );
        tokio::time::sleep(Duration::from_millis(15_100)).await;
        // Initial cycle plus one per 5s interval.
        assert_eq!(delivered.load(Ordering::SeqCst), 4);
        assert_eq!(source.fetch_count(), 4);
        watch.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_cycle_is_swallowed_and_cadence_continues() {
        let source = Arc::new(ScriptedSource::failing_on(2));
        let delivered = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&delivered);
        let watch = start_topic_watch(
            Arc::clone(&source),
            chat_topic(),
            PollConfig::default(),
            move |_: Vec<Message>| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
        );
        tokio::time::sleep(Duration::from_millis(15_100)).await;
        assert_eq!(source.fetch_count(), 4);
        // Cycle 2 failed: delivered once less, loop kept going.
        assert_eq!(delivered.load(Ordering::SeqCst), 3);
        watch.join().await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_discards_in_flight_result() {
        let release = Arc::new(Notify::new());
        let source = Arc::new(ScriptedSource::held_by(Arc::clone(&release)));
        let delivered = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&delivered);
        let watch = start_topic_watch(
            Arc::clone(&source),
            chat_topic(),
            PollConfig::default(),
            move |_: Vec<Message>| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
        );
        // Let the first fetch start and park on the hold.
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(source.fetch_count(), 1);

        watch.stop();
        release.notify_one();
        watch.join().await;

        // The in-flight fetch completed, but its result was discarded
        // and no further cycle was scheduled.
        assert_eq!(delivered.load(Ordering::SeqCst), 0);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_cycles_after_stop() {
        let source = Arc::new(ScriptedSource::new());
        let delivered = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&delivered);
        let watch = start_topic_watch(
            Arc::clone(&source),
            chat_topic(),
            PollConfig::default(),
            move |_: Vec<Message>| {
                seen.fetch_add(1, Ordering::SeqCst);
            },
        );
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), 1);

        watch.join().await;
        tokio::time::sleep(Duration::from_millis(30_000)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn independent_watches_on_the_same_topic() {
        let source = Arc::new(ScriptedSource::new());
        let delivered = Arc::new(AtomicUsize::new(0));
        let seen_a = Arc::clone(&delivered);
        let seen_b = Arc::clone(&delivered);
        let a = start_topic_watch(
            Arc::clone(&source),
            chat_topic(),
            PollConfig::default(),
            move |_: Vec<Message>| {
                seen_a.fetch_add(1, Ordering::SeqCst);
            },
        );
        let b = start_topic_watch(
            Arc::clone(&source),
            chat_topic(),
            PollConfig::default(),
            move |_: Vec<Message>| {
                seen_b.fetch_add(1, Ordering::SeqCst);
            },
        );
        tokio::time::sleep(Duration::from_millis(5100)).await;
        // Two cycles each, no de-duplication of requests.
        assert_eq!(delivered.load(Ordering::SeqCst), 4);
        assert_eq!(source.fetch_count(), 4);
        a.join().await;
        b.join().await;
    }
}
