//! CLI entry point for the rail delay map tool.
//!
//! Provides subcommands for computing and publishing the render state,
//! logging the network summary, listing stations, and refreshing
//! periodically into a last-known-good store.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rail_delay_map::analyzers::analyzer::{PublishTarget, load_routes, publish, refresh};
use rail_delay_map::infra::open_source;
use rail_delay_map::output::{print_json, print_pretty};
use rail_delay_map::services::dataset_source::DatasetSource;
use rail_delay_map::store::RenderStore;
use rail_delay_map::topology::unique_stations;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "rail_delay_map")]
#[command(about = "Join rail delay snapshots with route topology into a colored map", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DatasetArgs {
    /// Route documents: s3://bucket/prefix/, an http(s) URL, or a local path
    #[arg(long, value_name = "SRC")]
    routes: String,

    /// Delay snapshots: s3://bucket/prefix/, an http(s) URL, or a local path
    #[arg(long, value_name = "SRC")]
    delays: String,

    /// Read delay snapshots from the YYYY-MM-DD sub-directory of the source
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Earlier days to try when the dated sub-directory is empty
    #[arg(long, default_value_t = 8)]
    max_days_back: u32,
}

#[derive(Args)]
struct PublishArgs {
    /// Local file to write the render document to
    #[arg(short, long, default_value = "render_state.json")]
    output: String,

    /// Optional: CSV file to append one summary row to
    #[arg(long)]
    history: Option<String>,

    /// Optional: S3 bucket name to upload the render document to
    #[arg(long)]
    s3_bucket: Option<String>,

    /// Object key for the uploaded render document
    #[arg(long, default_value = "render_state.json")]
    s3_key: String,

    /// Gzip the uploaded render document
    #[arg(long, default_value_t = false)]
    gzip: bool,
}

impl From<PublishArgs> for PublishTarget {
    fn from(args: PublishArgs) -> Self {
        Self {
            output: Some(args.output),
            history: args.history,
            s3_bucket: args.s3_bucket,
            s3_key: args.s3_key,
            gzip: args.gzip,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the render state once and publish it
    Render {
        #[command(flatten)]
        datasets: DatasetArgs,

        #[command(flatten)]
        publish: PublishArgs,
    },
    /// Compute the render state and log the network summary
    Summary {
        #[command(flatten)]
        datasets: DatasetArgs,
    },
    /// List the unique stations found in the route documents
    Stations {
        /// Route documents: s3://bucket/prefix/, an http(s) URL, or a local path
        #[arg(long, value_name = "SRC")]
        routes: String,
    },
    /// Refresh the render state periodically, keeping the last good one
    Watch {
        #[command(flatten)]
        datasets: DatasetArgs,

        #[command(flatten)]
        publish: PublishArgs,

        /// Seconds between refreshes
        #[arg(short, long, default_value_t = 300)]
        interval: u64,

        /// Number of refreshes to run (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 0)]
        num_refreshes: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/rail_delay_map.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("rail_delay_map.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { datasets, publish: target } => {
            let (routes, delays) = open_datasets(&datasets).await?;
            let state = refresh(routes.as_ref(), delays.as_ref()).await?;

            print_pretty(&state.summary);
            publish(&state, &target.into()).await?;
        }
        Commands::Summary { datasets } => {
            let (routes, delays) = open_datasets(&datasets).await?;
            let state = refresh(routes.as_ref(), delays.as_ref()).await?;

            print_json(&state.summary)?;
        }
        Commands::Stations { routes } => {
            let source = open_source(&routes, None, 1).await?;
            let routes = load_routes(source.as_ref()).await?;
            let stations = unique_stations(&routes);

            for stop in &stations {
                info!(
                    code = %stop.code,
                    name = %stop.name,
                    lat = stop.lat,
                    lon = stop.lon,
                    "Station"
                );
            }

            info!(routes = routes.len(), stations = stations.len(), "Station list summary");
        }
        Commands::Watch {
            datasets,
            publish: target,
            interval,
            num_refreshes,
        } => {
            watch(&datasets, target.into(), interval, num_refreshes).await?;
        }
    }

    Ok(())
}

/// Opens the route and delay sources. The target date only applies to
/// delay snapshots.
async fn open_datasets(
    args: &DatasetArgs,
) -> Result<(Box<dyn DatasetSource>, Box<dyn DatasetSource>)> {
    let routes = open_source(&args.routes, None, 1)
        .await
        .with_context(|| format!("cannot open route source {}", args.routes))?;
    let delays = open_source(&args.delays, args.date, args.max_days_back)
        .await
        .with_context(|| format!("cannot open delay source {}", args.delays))?;

    Ok((routes, delays))
}

/// Refreshes into a [`RenderStore`] every `interval` seconds and publishes
/// each new state. Failed refreshes are logged and the previous state is
/// kept.
#[tracing::instrument(skip(args, target))]
async fn watch(
    args: &DatasetArgs,
    target: PublishTarget,
    interval: u64,
    num_refreshes: usize,
) -> Result<()> {
    let store = RenderStore::new();
    let mut refresh_count = 0;

    if num_refreshes == 0 {
        info!(interval, "Refreshing indefinitely. Press Ctrl+C to stop.");
    }

    loop {
        if num_refreshes > 0 && refresh_count >= num_refreshes {
            break;
        }
        refresh_count += 1;

        match open_datasets(args).await {
            Ok((routes, delays)) => match store.refresh(routes.as_ref(), delays.as_ref()).await {
                Ok(state) => {
                    if let Err(e) = publish(&state, &target).await {
                        error!(error = %e, "Publish failed");
                    }
                }
                Err(e) => error!(error = %e, refresh = refresh_count, "Refresh failed"),
            },
            Err(e) => error!(error = %e, "Failed to open dataset sources"),
        }

        if let Some(state) = store.current().await {
            print_pretty(&state.summary);
        }

        if num_refreshes == 0 || refresh_count < num_refreshes {
            info!(interval, "Waiting before next refresh");
            tokio::time::sleep(tokio::time::Duration::from_secs(interval)).await;
        }
    }

    info!(refreshes = refresh_count, "Finished refreshing");
    Ok(())
}
