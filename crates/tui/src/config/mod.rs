use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/transaction_form.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Length of the simulated submit, in milliseconds.
    pub submit_delay_ms: u64,
    /// How often the event loop polls for input, in milliseconds.
    pub tick_rate_ms: u64,
    pub log_level: String,
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 3000,
            tick_rate_ms: 200,
            log_level: "info".to_string(),
            log_file: "transaction_form.log".to_string(),
        }
    }
}

impl AppConfig {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }
}

#[derive(Debug, Parser)]
#[command(name = "transaction_form", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the simulated submit delay (milliseconds).
    #[arg(long)]
    submit_delay_ms: Option<u64>,
    /// Override the input poll interval (milliseconds).
    #[arg(long)]
    tick_rate_ms: Option<u64>,
    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Override the log file path. Logs never go to the terminal.
    #[arg(long)]
    log_file: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TRANSACTION_FORM"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(submit_delay_ms) = args.submit_delay_ms {
        settings.submit_delay_ms = submit_delay_ms;
    }
    if let Some(tick_rate_ms) = args.tick_rate_ms {
        settings.tick_rate_ms = tick_rate_ms;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }

    Ok(settings)
}
