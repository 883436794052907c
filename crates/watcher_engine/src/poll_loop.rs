use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use watcher_core::{update, Effect, Msg, PollCursor, WatcherState};
use watcher_logging::{set_cycle, watch_info, watch_warn};

use crate::{Notifier, StatusApi};

/// Wall clock in Unix seconds; injectable so tests control cursor values.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().timestamp())
}

#[derive(Clone)]
pub struct LoopSettings {
    pub interval: Duration,
    pub announce_unknown_status: bool,
    pub clock: Clock,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(600),
            announce_unknown_status: false,
            clock: system_clock(),
        }
    }
}

/// Drives fetch → update → notify → sleep, one cycle at a time.
pub struct PollLoop {
    api: Arc<dyn StatusApi>,
    notifier: Notifier,
    settings: LoopSettings,
    state: WatcherState,
    cycles: u64,
}

impl PollLoop {
    pub fn new(api: Arc<dyn StatusApi>, notifier: Notifier, settings: LoopSettings) -> Self {
        let cursor = PollCursor::initial((settings.clock)(), settings.interval);
        let state =
            WatcherState::new(cursor).with_unknown_status_alerts(settings.announce_unknown_status);
        Self {
            api,
            notifier,
            settings,
            state,
            cycles: 0,
        }
    }

    pub fn state(&self) -> &WatcherState {
        &self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Runs one cycle. Every fault is absorbed into the state machine.
    pub async fn run_cycle(&mut self) {
        self.cycles += 1;
        set_cycle(self.cycles);

        let since = self.state.cursor();
        watch_info!("polling for status changes since {}", since);
        let msg = match self.api.fetch(since).await {
            Ok(doc) => Msg::ResponseReceived {
                doc,
                polled_at: PollCursor::from_unix_seconds((self.settings.clock)()),
            },
            Err(err) => Msg::FetchFailed(err),
        };

        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        for effect in effects {
            match effect {
                Effect::Notify { text } => self.notifier.notify(&text).await,
            }
        }
    }

    /// Polls until `shutdown` resolves. Cycles never overlap: the next one
    /// starts only after the previous cycle and its sleep have finished.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        watch_info!(
            "watching review status every {}s",
            self.settings.interval.as_secs()
        );

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = self.run_cycle() => {}
            }
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = tokio::time::sleep(self.settings.interval) => {}
            }
        }

        watch_warn!("shutdown requested after {} cycles", self.cycles);
    }
}
