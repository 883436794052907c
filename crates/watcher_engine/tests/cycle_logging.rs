use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{LevelFilter, Log, Metadata, Record};
use serde_json::{json, Value};
use watcher_core::{ApiError, PollCursor};
use watcher_engine::{LoopSettings, MessageSender, Notifier, PollLoop, SendError, StatusApi};

/// Keeps every formatted line; installed once for this test binary.
struct CapturingLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for CapturingLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger {
    lines: Mutex::new(Vec::new()),
};

/// A collaborator with no logging of its own.
struct SilentApi;

#[async_trait::async_trait]
impl StatusApi for SilentApi {
    async fn fetch(&self, _since: PollCursor) -> Result<Value, ApiError> {
        Ok(json!({ "homeworks": [{ "homework_name": "hw1", "status": "reviewing" }] }))
    }
}

struct NullSender;

#[async_trait::async_trait]
impl MessageSender for NullSender {
    async fn send(&self, _text: &str) -> Result<(), SendError> {
        Ok(())
    }
}

#[tokio::test]
async fn driver_logs_each_poll_with_cycle_and_cursor() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let settings = LoopSettings {
        interval: Duration::from_secs(600),
        announce_unknown_status: false,
        clock: Arc::new(|| 1_700_000_000),
    };
    let mut watcher = PollLoop::new(Arc::new(SilentApi), Notifier::new(Arc::new(NullSender)), settings);

    watcher.run_cycle().await;
    watcher.run_cycle().await;

    let lines = LOGGER.lines.lock().unwrap().clone();
    let polls: Vec<&String> = lines
        .iter()
        .filter(|line| line.contains("polling for status changes"))
        .collect();
    assert_eq!(polls.len(), 2, "log lines: {lines:#?}");
    assert!(polls[0].starts_with("INFO [cycle 1]"));
    assert!(polls[0].ends_with("since 1699999400"));
    assert!(polls[1].starts_with("INFO [cycle 2]"));
    assert!(polls[1].ends_with("since 1700000000"));
}
