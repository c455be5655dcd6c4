// main.rs
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};

use dream_interpreter::cli::{self, Args, Commands};
use dream_interpreter::config::{Config, LOG_ENV};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Installed before the config loads so its warnings are visible
    let initial = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter, filter_handle) = reload::Layer::new(initial);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).compact())
        .init();

    let config = Config::new(args.data_dir.clone())?;
    if let Ok(level) = EnvFilter::try_new(&config.server.log_level) {
        let _ = filter_handle.reload(level);
    }

    match args.command {
        Commands::Serve { host, port } => cli::handle_serve(config, host, port).await,
        Commands::Analyze { text, json } => cli::handle_analyze(&config, &text, json),
        Commands::Symbol { file, output } => cli::handle_symbol(&config, &file, &output),
        Commands::Config => cli::handle_config(&config),
    }
}
