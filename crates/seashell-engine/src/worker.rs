//! Worker thread loop for [`RealtimeGame`](crate::RealtimeGame).
//!
//! One thread per purchased job. Each iteration:
//!
//! 1. Wait on the cancel channel until the cycle's due instant.
//! 2. A timeout means the cycle is due; a message or a disconnected
//!    sender means the worker was cancelled and the thread exits.
//! 3. Lock the game, complete the cycle, publish, unlock.
//! 4. A stale completion (older generation) ends the thread.
//!
//! The game lock is never held across the wait.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use seashell_core::JobId;

use crate::game::Game;
use crate::production::CycleTicket;
use crate::publish::Publisher;

/// State shared between the façade and its worker threads.
pub(crate) struct Shared {
    game: Mutex<Game>,
    publisher: Publisher,
    epoch: Instant,
}

impl Shared {
    pub(crate) fn new(game: Game, publisher: Publisher) -> Self {
        Self {
            game: Mutex::new(game),
            publisher,
            epoch: Instant::now(),
        }
    }

    /// Lock the game. A worker that panicked mid-mutation leaves the
    /// game in a consistent state because every mutation validates first.
    pub(crate) fn lock_game(&self) -> MutexGuard<'_, Game> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Engine clock.
    pub(crate) fn elapsed(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Publish the current state of `game`. Call with the lock held.
    pub(crate) fn publish(&self, game: &mut Game, now: Duration) {
        self.publisher.publish(game.next_snapshot(now));
    }

    pub(crate) fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    fn deadline(&self, ticket: &CycleTicket) -> Instant {
        self.epoch + ticket.ends_at
    }
}

/// Handle to one running worker thread.
pub(crate) struct WorkerTask {
    pub(crate) job: JobId,
    pub(crate) cancel: Sender<()>,
    pub(crate) handle: JoinHandle<()>,
}

/// Spawn the thread that runs `ticket` and every cycle after it.
pub(crate) fn spawn(shared: &Arc<Shared>, ticket: CycleTicket) -> io::Result<WorkerTask> {
    let (cancel, cancel_rx) = crossbeam_channel::bounded(1);
    let worker_shared = Arc::clone(shared);
    let handle = thread::Builder::new()
        .name(format!("seashell-worker-{}", ticket.job.get()))
        .spawn(move || run(&worker_shared, ticket, &cancel_rx))?;
    Ok(WorkerTask {
        job: ticket.job,
        cancel,
        handle,
    })
}

fn run(shared: &Shared, mut ticket: CycleTicket, cancel: &Receiver<()>) {
    loop {
        match cancel.recv_deadline(shared.deadline(&ticket)) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                tracing::trace!(job = ticket.job.get(), "worker cancelled");
                return;
            }
        }

        let mut game = shared.lock_game();
        let now = shared.elapsed();
        match game.complete_cycle(ticket.job, ticket.generation, now) {
            Some(done) => {
                shared.publish(&mut game, now);
                ticket = done.next;
            }
            None => {
                tracing::trace!(job = ticket.job.get(), "worker retired");
                return;
            }
        }
    }
}
