use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::graph::Weight;
use crate::runner::StepRunner;

/// Timing of a [`Player`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Delay between two automatic steps
    pub interval: Duration,
}

impl PlaybackConfig {
    pub const MIN_INTERVAL: Duration = Duration::from_millis(50);
    pub const MAX_INTERVAL: Duration = Duration::from_secs(5);

    pub fn with_interval(interval: Duration) -> Self {
        PlaybackConfig {
            interval: interval.clamp(Self::MIN_INTERVAL, Self::MAX_INTERVAL),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            interval: Duration::from_millis(500),
        }
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives a shared [`StepRunner`] forward on a timer.
///
/// Every tick performs at most one `step_forward`; playback stops by itself
/// once the sequence is exhausted. Pausing only stops future ticks, a step
/// already being produced always completes. Must be used inside a tokio runtime.
pub struct Player<W: Weight> {
    runner: Arc<Mutex<StepRunner<W>>>,
    config: PlaybackConfig,
    task: Option<JoinHandle<()>>,
}

impl<W: Weight> Player<W> {
    pub fn new(runner: StepRunner<W>, config: PlaybackConfig) -> Self {
        Player {
            runner: Arc::new(Mutex::new(runner)),
            config,
            task: None,
        }
    }

    /// Shared handle to the runner, for reading steps or stepping manually
    pub fn runner(&self) -> Arc<Mutex<StepRunner<W>>> {
        Arc::clone(&self.runner)
    }

    pub fn config(&self) -> PlaybackConfig {
        self.config
    }

    pub fn is_playing(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Starts the timed loop; the first step comes one interval from now
    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }

        let runner = Arc::clone(&self.runner);
        let period = self.config.interval.max(PlaybackConfig::MIN_INTERVAL);
        debug!("Starting playback every {:?}", period);

        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let advanced = lock(&runner).step_forward();
                if !advanced {
                    debug!("Playback reached the end of the sequence");
                    break;
                }
            }
        }));
    }

    /// Stops issuing steps
    pub fn pause(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Changes the pace, restarting the loop if it is running
    pub fn set_interval(&mut self, interval: Duration) {
        self.config = PlaybackConfig::with_interval(interval);
        if self.is_playing() {
            self.pause();
            self.play();
        }
    }
}

impl<W: Weight> Drop for Player<W> {
    fn drop(&mut self) {
        self.pause();
    }
}
