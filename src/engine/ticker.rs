//! Drives a [`TimerState`] from a background one-second ticker.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info};

use crate::models::{TimerDurations, TimerState};
use crate::notify::Notifier;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

struct Shared {
    state: TimerState,
    durations: TimerDurations,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Ticker {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(shared: Arc<Mutex<Shared>>, notifier: Arc<dyn Notifier>, interval: Duration) -> Self {
        let (stop, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }

            let (completion, running) = {
                let mut guard = lock(&shared);
                let Shared { state, durations } = &mut *guard;
                (state.tick(durations), state.is_running)
            };

            if let Some(completion) = completion {
                notifier.notify(completion.message());
            }
            if !running {
                break;
            }
        });
        Self { stop, handle }
    }

    /// Stop the thread and wait for it. Consumes the ticker, so each one is
    /// cancelled at most once.
    fn cancel(self) {
        let _ = self.stop.send(());
        let _ = self.handle.join();
    }

    fn is_alive(&self) -> bool {
        !self.handle.is_finished()
    }
}

/// Owns one timer and at most one ticker thread for it.
pub struct TimerController {
    shared: Arc<Mutex<Shared>>,
    notifier: Arc<dyn Notifier>,
    tick_interval: Duration,
    ticker: Option<Ticker>,
}

impl TimerController {
    pub fn new(durations: TimerDurations, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_tick_interval(durations, notifier, TICK_INTERVAL)
    }

    pub fn with_tick_interval(
        durations: TimerDurations,
        notifier: Arc<dyn Notifier>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                state: TimerState::new(&durations),
                durations,
            })),
            notifier,
            tick_interval,
            ticker: None,
        }
    }

    pub fn state(&self) -> TimerState {
        lock(&self.shared).state.clone()
    }

    pub fn durations(&self) -> TimerDurations {
        lock(&self.shared).durations
    }

    /// New durations apply from the next reset or completion onward.
    pub fn set_durations(&self, durations: TimerDurations) {
        lock(&self.shared).durations = durations;
    }

    /// Start counting down. Returns `false` if the timer was already running.
    pub fn start(&mut self) -> bool {
        if !lock(&self.shared).state.start() {
            return false;
        }
        // A previous ticker can only still exist if it ended on its own after
        // a completion; reap it before spawning the next one.
        if let Some(old) = self.ticker.take() {
            old.cancel();
        }
        self.ticker = Some(Ticker::spawn(
            Arc::clone(&self.shared),
            Arc::clone(&self.notifier),
            self.tick_interval,
        ));
        info!("timer started");
        true
    }

    pub fn pause(&mut self) {
        lock(&self.shared).state.pause();
        self.stop_ticker();
        debug!("timer paused");
    }

    pub fn reset(&mut self) {
        {
            let mut guard = lock(&self.shared);
            let Shared { state, durations } = &mut *guard;
            state.reset(durations);
        }
        self.stop_ticker();
        debug!("timer reset");
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_alive)
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
