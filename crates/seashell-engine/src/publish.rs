//! Snapshot fan-out to observers.
//!
//! Every committed mutation publishes exactly one [`GameSnapshot`]: it
//! becomes the [`latest`](Publisher::latest) for polling readers and is
//! sent to each subscriber channel. Sends never block the publisher; a
//! subscriber whose channel is full misses that snapshot and can catch up
//! from `latest`.
//!
//! The latest snapshot and the subscriber list share one lock, so a
//! subscriber registered concurrently with a publish either receives that
//! snapshot as its initial one or through its channel, never neither.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use seashell_core::GameSnapshot;

#[derive(Default)]
struct Fanout {
    latest: Option<Arc<GameSnapshot>>,
    subscribers: Vec<Sender<Arc<GameSnapshot>>>,
    closed: bool,
}

/// Latest snapshot plus subscriber list.
pub struct Publisher {
    fanout: Mutex<Fanout>,
    channel_capacity: usize,
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Publisher>();
};

impl Publisher {
    /// A publisher whose subscriber channels hold up to `capacity`
    /// undelivered snapshots. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            fanout: Mutex::new(Fanout::default()),
            channel_capacity: capacity.max(1),
        }
    }

    /// Store `snapshot` and deliver it to every live subscriber.
    pub fn publish(&self, snapshot: GameSnapshot) {
        let snapshot = Arc::new(snapshot);
        let mut fanout = self.lock();
        fanout.latest = Some(Arc::clone(&snapshot));
        fanout.subscribers.retain(|tx| match tx.try_send(Arc::clone(&snapshot)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::trace!(sequence = snapshot.sequence, "subscriber lagging, snapshot skipped");
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// The most recent snapshot, if any was published.
    pub fn latest(&self) -> Option<Arc<GameSnapshot>> {
        self.lock().latest.clone()
    }

    /// A new observer channel. Receives every snapshot published from now
    /// on, starting with the current one when it exists.
    ///
    /// After [`close`](Self::close) the returned receiver is already
    /// disconnected (but still yields the final snapshot).
    pub fn subscribe(&self) -> Receiver<Arc<GameSnapshot>> {
        let (tx, rx) = crossbeam_channel::bounded(self.channel_capacity);
        let mut fanout = self.lock();
        if let Some(current) = &fanout.latest {
            // A fresh channel has room for one.
            let _ = tx.try_send(Arc::clone(current));
        }
        if !fanout.closed {
            fanout.subscribers.push(tx);
        }
        rx
    }

    /// Disconnect every subscriber. Polling through
    /// [`latest`](Self::latest) keeps working.
    pub fn close(&self) {
        let mut fanout = self.lock();
        fanout.closed = true;
        fanout.subscribers.clear();
    }

    /// Live subscriber count.
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, Fanout> {
        self.fanout.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seashell_core::{Catalog, GameState};
    use std::thread;
    use std::time::Duration;

    fn snap(sequence: u64) -> GameSnapshot {
        GameSnapshot {
            sequence,
            generation: 0,
            elapsed: Duration::ZERO,
            state: GameState::initial(&Catalog::standard()),
        }
    }

    #[test]
    fn latest_follows_publishes() {
        let p = Publisher::new(4);
        assert!(p.latest().is_none());
        p.publish(snap(1));
        p.publish(snap(2));
        assert_eq!(p.latest().unwrap().sequence, 2);
    }

    #[test]
    fn subscriber_sees_current_then_new() {
        let p = Publisher::new(4);
        p.publish(snap(1));
        let rx = p.subscribe();
        p.publish(snap(2));
        assert_eq!(rx.try_recv().unwrap().sequence, 1);
        assert_eq!(rx.try_recv().unwrap().sequence, 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_subscriber_is_pruned() {
        let p = Publisher::new(4);
        let rx = p.subscribe();
        assert_eq!(p.subscriber_count(), 1);
        drop(rx);
        p.publish(snap(1));
        assert_eq!(p.subscriber_count(), 0);
    }

    #[test]
    fn lagging_subscriber_keeps_channel() {
        let p = Publisher::new(2);
        let rx = p.subscribe();
        for seq in 1..=5 {
            p.publish(snap(seq));
        }
        assert_eq!(p.subscriber_count(), 1);
        let got: Vec<u64> = rx.try_iter().map(|s| s.sequence).collect();
        assert_eq!(got, vec![1, 2]);
        assert_eq!(p.latest().unwrap().sequence, 5);
    }

    #[test]
    fn close_disconnects_subscribers() {
        let p = Publisher::new(4);
        let rx = p.subscribe();
        p.publish(snap(1));
        p.close();
        assert_eq!(rx.recv().unwrap().sequence, 1);
        assert!(rx.recv().is_err());
        let late = p.subscribe();
        assert_eq!(late.recv().unwrap().sequence, 1);
        assert!(late.recv().is_err());
    }

    #[test]
    fn concurrent_subscribers_see_no_gaps() {
        const LAST: u64 = 20_000;
        let p = Arc::new(Publisher::new(32_768));
        let state = GameState::initial(&Catalog::standard());
        let writer = {
            let p = Arc::clone(&p);
            thread::spawn(move || {
                for sequence in 1..=LAST {
                    p.publish(GameSnapshot {
                        sequence,
                        generation: 0,
                        elapsed: Duration::ZERO,
                        state: state.clone(),
                    });
                }
            })
        };
        let mut receivers = Vec::new();
        while receivers.len() < 32 && !writer.is_finished() {
            receivers.push(p.subscribe());
            thread::sleep(Duration::from_micros(50));
        }
        writer.join().unwrap();

        for rx in receivers {
            let seqs: Vec<u64> = rx.try_iter().map(|s| s.sequence).collect();
            for pair in seqs.windows(2) {
                assert_eq!(pair[0] + 1, pair[1], "gap or duplicate in {pair:?}");
            }
            if let Some(&last) = seqs.last() {
                assert_eq!(last, LAST);
            }
        }
    }
}
