#![forbid(unsafe_code)]

use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use sos_os::config::SosConfig;
use sos_tools::cli::Cli;
use sos_tools::sos_cli::execute_command;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let mut config = SosConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(path) = &cli.state {
        config.state_path = path.clone();
    }
    let output = execute_command(&cli.command, &config, cli.json, now_unix_ms())?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

fn now_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1)
        .max(1)
}
