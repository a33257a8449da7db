use anyhow::{Context, Result};
use clap::Parser;
use smartmon::metrics::write_exposition;
use smartmon::*;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "smartmon")]
#[command(about = "Export smartctl S.M.A.R.T. data in the Prometheus text format")]
#[command(version = "1.0.0")]
struct Cli {
    /// Wake up disks in standby to collect their metrics
    #[arg(short = 's', long)]
    wakeup_disks: bool,

    /// Settings file (TOML); defaults to the per-user config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// smartctl binary to run; overrides SMARTMON_SMARTCTL_PATH and the settings file
    #[arg(long)]
    smartctl: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

/// Logs go to stderr; stdout carries only the exposition
fn init_logging(debug: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { "smartmon=debug" } else { "smartmon=warn" })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug, cli.log_json);

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(smartctl) = cli.smartctl {
        settings.smartctl_path = smartctl;
    }
    if cli.wakeup_disks {
        settings.wakeup_disks = true;
    }
    settings.validate()?;

    tracing::debug!(settings = ?settings, "Loaded settings");

    let runner = SystemSmartctl::new(settings.smartctl_path.as_str());
    let collector = Collector::new(runner, settings.wakeup_disks)
        .with_scan_args(settings.scan_args.clone());

    let version = collector
        .version_metric()
        .with_context(|| format!("Failed to query {} -V", collector.runner().binary()))?;
    let metrics = collector.collect().context("Failed to collect SMART metrics")?;

    let stdout = io::stdout();
    write_exposition(
        BufWriter::new(stdout.lock()),
        &settings.metric_prefix,
        &version,
        &metrics,
    )
    .context("Failed to write metrics")?;

    Ok(())
}
