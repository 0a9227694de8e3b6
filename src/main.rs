//! homework-bot CLI entry point

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use homework_bot::api::PracticumClient;
use homework_bot::config::{self, Config};
use homework_bot::notifier::TelegramNotifier;
use homework_bot::poller::{CycleOutcome, PollLoop};
use homework_bot::ui;

#[derive(Parser)]
#[command(name = "homework-bot")]
#[command(about = "Watches homework review status and reports changes to Telegram")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start polling the homework status API
    Run {
        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,

        #[command(flatten)]
        settings: Settings,
    },

    /// Show the resolved configuration without contacting any service
    Config {
        #[command(flatten)]
        settings: Settings,
    },
}

#[derive(Args)]
struct Settings {
    /// Seconds to wait between two polling cycles
    #[arg(long, default_value_t = config::DEFAULT_RETRY_TIME.as_secs())]
    retry_time: u64,

    /// Timeout in seconds for a single HTTP request
    #[arg(long, default_value_t = config::DEFAULT_REQUEST_TIMEOUT.as_secs())]
    timeout: u64,

    /// Homework status endpoint
    #[arg(long, default_value = config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Settings {
    fn apply(self, config: Config) -> homework_bot::Result<Config> {
        Ok(config
            .with_endpoint(&self.endpoint)?
            .with_retry_time(Duration::from_secs(self.retry_time))?
            .with_request_timeout(Duration::from_secs(self.timeout))?
            .with_log_file(self.log_file))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { once, settings } => {
            homework_bot::logging::init(settings.log_file.as_deref())?;

            let config = Config::from_env().and_then(|c| settings.apply(c));
            let poller = match PollLoop::start(config, |config| {
                Ok((
                    PracticumClient::from_config(config)?,
                    TelegramNotifier::from_config(config)?,
                ))
            }) {
                Ok(poller) => poller,
                Err(e) => {
                    tracing::error!("{}. Stopping.", e);
                    std::process::exit(1);
                }
            };

            run(poller, once).await?;
        }

        Commands::Config { settings } => {
            show_config(settings)?;
        }
    }

    Ok(())
}

async fn run(
    mut poller: PollLoop<PracticumClient, TelegramNotifier>,
    once: bool,
) -> Result<()> {
    if once {
        let outcome = poller.tick().await;
        tracing::info!("Single cycle finished: {:?}", outcome);
        if let CycleOutcome::Failed(reason) = outcome {
            anyhow::bail!("cycle failed: {reason}");
        }
        return Ok(());
    }

    poller.run().await;
    Ok(())
}

fn show_config(settings: Settings) -> Result<()> {
    ui::print_header("homework-bot");

    dotenvy::dotenv().ok();
    let required = [
        config::PRACTICUM_TOKEN,
        config::TELEGRAM_TOKEN,
        config::TELEGRAM_CHAT_ID,
    ];
    let mut complete = true;
    for name in required {
        let is_set = std::env::var(name).is_ok_and(|v| !v.trim().is_empty());
        ui::print_credential(name, is_set);
        complete &= is_set;
    }
    if !complete {
        std::process::exit(1);
    }

    let config = settings.apply(Config::from_env()?)?;
    let credentials = &config.credentials;
    ui::print_setting("practicum token", &config::mask(&credentials.practicum_token));
    ui::print_setting("telegram token", &config::mask(&credentials.telegram_token));
    ui::print_setting("chat", &credentials.telegram_chat_id);
    ui::print_setting("endpoint", config.endpoint.as_str());
    ui::print_setting("retry time", &format!("{}s", config.retry_time.as_secs()));
    ui::print_setting("timeout", &format!("{}s", config.request_timeout.as_secs()));
    if let Some(path) = &config.log_file {
        ui::print_setting("log file", &path.display().to_string());
    }
    Ok(())
}
