use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use pricewatch::app;
use pricewatch::config;

#[derive(Parser, Debug)]
#[command(version, about = "Retail price tracking bot with per-retailer history stores")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// Directory holding the per-retailer store files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Seconds between polling cycles
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Seconds to wait after a failed cycle before retrying
    #[arg(long)]
    error_backoff_secs: Option<u64>,

    /// Run a single polling cycle per site and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    // Load base configuration from file if provided
    let base_config = if let Some(config_path) = &args.config {
        Some(config::Config::from_file(config_path)?)
    } else {
        None
    };

    // CLI args > config file > defaults
    let mut app_cfg = match base_config {
        Some(cfg) => app::AppCfg::from_config(cfg, args.once),
        None => app::AppCfg::from_defaults(args.once),
    };

    if let Some(data_dir) = args.data_dir {
        app_cfg.data_dir = data_dir;
    }
    if let Some(interval_secs) = args.interval_secs {
        app_cfg.interval_secs = interval_secs;
    }
    if let Some(error_backoff_secs) = args.error_backoff_secs {
        app_cfg.error_backoff_secs = error_backoff_secs;
    }

    app::run(app_cfg).await
}
