//! Vitals replay CLI
//!
//! Feeds captured performance entries through a monitor, printing periodic
//! reports while it runs and a final report plus export bundle at the end.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vitals_monitor::timeline::{replay_lines, ManualTimeline};
use vitals_monitor::{Config, OutputFormat, Reporter, VitalsMonitor};

#[derive(Parser, Debug)]
#[command(name = "vitals-cli")]
#[command(version, about = "Replay captured performance entries and report Core Web Vitals")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Write the export bundle to this file instead of stdout
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Do not print the export bundle to stdout
    #[arg(long)]
    quiet_export: bool,

    /// Newline-delimited entry batches; reads stdin when omitted or "-"
    input: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Console,
    Json,
    JsonPretty,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Console => OutputFormat::Console,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout carries reports and exports only
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(format) = args.format {
        config.monitor.report_format = format.into();
    }
    let reporter = Reporter::new(config.monitor.report_format);

    let timeline = ManualTimeline::new();
    let mut monitor = VitalsMonitor::from_config(timeline.clone(), &config);
    monitor.init()?;

    let reader = open_input(args.input.as_ref()).await?;
    tokio::select! {
        stats = replay_lines(reader, &timeline) => {
            let stats = stats?;
            tracing::info!(delivered = stats.delivered, skipped = stats.skipped, "replay finished");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, exporting collected vitals");
        }
    }

    monitor.flush().await?;
    monitor.report()?;

    let bundle = monitor.export_vitals();
    match &args.export {
        Some(path) => {
            reporter.write_export(&bundle, path)?;
            tracing::info!("export written to {}", path.display());
        }
        None if !args.quiet_export => println!("{}", reporter.format_export(&bundle)?),
        None => {}
    }

    monitor.destroy();
    Ok(())
}

async fn open_input(
    path: Option<&PathBuf>,
) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .await
                .with_context(|| format!("Failed to open input: {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(BufReader::new(tokio::io::stdin()))),
    }
}
