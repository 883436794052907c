//! Watcher engine: HTTP collaborators and the poll loop driver.
mod api;
mod notify;
mod poll_loop;

pub use api::{ApiSettings, ReqwestStatusApi, StatusApi, DEFAULT_ENDPOINT};
pub use notify::{
    MessageSender, Notifier, SendError, TelegramSender, TelegramSettings, DEFAULT_TELEGRAM_API,
};
pub use poll_loop::{system_clock, Clock, LoopSettings, PollLoop};
