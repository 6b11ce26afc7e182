//! discussion-slack binary, meant to run as a GitHub Actions step.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use discussion_slack::error::StageContext;
use discussion_slack::{NotifierConfig, Stage, pipeline};

/// Post a GitHub Discussion comment to Slack
#[derive(Parser)]
#[command(name = "discussion-slack")]
#[command(about = "Relay a GitHub Discussion comment event to a Slack channel")]
#[command(version)]
struct Args {
    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    json_logs: bool,
}

/// Logs go to stderr; stdout carries only the outcome line.
fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    setup_logging(&args.log_level, args.json_logs);

    let config = match NotifierConfig::from_env().stage(Stage::Configuration) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            println!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match pipeline::run(&config).await {
        Ok(_) => {
            println!("Message sent successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(stage = %e.stage, "{}", e);
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}
