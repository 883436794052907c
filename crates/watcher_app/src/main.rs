mod config;
mod logging;
mod shutdown;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use watcher_engine::{Notifier, PollLoop, ReqwestStatusApi, TelegramSender};
use watcher_logging::{watch_critical, watch_info};

use config::Config;

fn main() -> ExitCode {
    // A missing .env is normal in production.
    let _ = dotenvy::dotenv();
    let lookup = |name: &str| std::env::var(name).ok();

    logging::initialize(&logging::LogSettings::from_lookup(lookup));

    let config = match Config::from_lookup(lookup) {
        Ok(config) => config,
        Err(err) => {
            watch_critical!("{}. Shutting down.", err);
            return ExitCode::from(1);
        }
    };
    watch_info!("starting with {:?}", config);

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            watch_critical!("{:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(config: Config) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(async {
        let api = ReqwestStatusApi::new(config.api_settings())
            .context("failed to build status API client")?;
        let sender = TelegramSender::new(config.telegram_settings())
            .context("failed to build Telegram client")?;

        let mut watcher = PollLoop::new(
            Arc::new(api),
            Notifier::new(Arc::new(sender)),
            config.loop_settings(),
        );
        watcher.run(shutdown::wait_for_signal()).await;
        Ok(())
    })
}
