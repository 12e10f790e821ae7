pub mod api;
pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use coupon_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "coupon",
    about = "Coupon admin operator CLI",
    long_about = "Create coupons against the admin API, preview normalization, inspect config.",
    after_help = "Examples:\n  coupon create --dry-run --name WELCOME10 --discount-rate 10 ...\n  coupon normalize maxDiscount 1234567\n  coupon --config staging.toml config"
)]
pub struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
    #[command(subcommand)]
    command: Command,
}

/// Flags layered over file and env configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    #[arg(long, global = true, value_name = "PATH", help = "Config file to load (must exist)")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, value_name = "URL", help = "Override api.base_url")]
    pub api_base_url: Option<String>,
    #[arg(long, global = true, value_name = "SECS", help = "Override api.timeout_secs")]
    pub api_timeout_secs: Option<u64>,
    #[arg(long, global = true, value_name = "LEVEL", help = "Override logging.level")]
    pub log_level: Option<String>,
    #[arg(long, global = true, value_name = "FORMAT", help = "compact|pretty|json")]
    pub log_format: Option<LogFormat>,
}

impl ConfigArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                api_base_url: self.api_base_url.clone(),
                api_timeout_secs: self.api_timeout_secs,
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Validate a coupon draft and submit it to the admin API")]
    Create(commands::create::CreateArgs),
    #[command(about = "Show how a raw field value is stored in the draft")]
    Normalize {
        #[arg(help = "Field name: name|discountRate|maxDiscount|totalQuantity")]
        field: String,
        #[arg(help = "Raw input as typed by the operator", allow_hyphen_values = true)]
        value: String,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.config.load_options();

    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Create(args) => commands::create::run(args, &options),
        Command::Normalize { field, value } => commands::normalize::run(&field, &value),
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    // stdout carries the JSON command result
    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
