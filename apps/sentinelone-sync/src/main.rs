//! sentinelone-sync - run the SentinelOne connector from the command line
//!
//! - `validate` probes every API endpoint with the configured token
//! - `sync` walks accounts, users, service users, roles and sites and
//!   writes the resulting resource, entitlement and grant graph as JSON

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use xavyo_connector::syncer::{SyncReport, Syncer};
use xavyo_connector::traits::Connector;
use xavyo_connector_sentinelone::{SentinelOneConfig, SentinelOneConnector};

/// Sync SentinelOne identities into xavyo
#[derive(Parser)]
#[command(name = "sentinelone-sync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// SentinelOne API token
    #[arg(long, env = "SENTINELONE_API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// Management console URL, e.g. https://usea1.sentinelone.net
    #[arg(long, env = "SENTINELONE_MANAGEMENT_CONSOLE_URL")]
    management_console_url: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check credentials against every endpoint the connector reads
    Validate,

    /// Run a full sync and write the report as JSON
    Sync {
        /// Write the report to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,xavyo_connector_sentinelone=debug"));

    // Logs go to stderr so a report on stdout stays parseable.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn write_report(report: &SyncReport, output: Option<&PathBuf>) -> io::Result<()> {
    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()
}

#[tokio::main]
async fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = SentinelOneConfig::builder()
        .api_token(cli.api_token)
        .management_console_url(cli.management_console_url)
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        });

    let connector = SentinelOneConnector::new(config).unwrap_or_else(|e| {
        eprintln!("Connector error: {e}");
        std::process::exit(1);
    });

    match cli.command {
        Commands::Validate => {
            if let Err(e) = connector.validate().await {
                eprintln!("Validation failed: {e}");
                std::process::exit(1);
            }
            tracing::info!("credentials are valid for all endpoints");
        }
        Commands::Sync { output } => {
            let report = Syncer::new(Arc::new(connector))
                .run()
                .await
                .unwrap_or_else(|e| {
                    eprintln!("Sync failed: {e}");
                    std::process::exit(1);
                });

            tracing::info!(
                sync_id = %report.sync_id,
                resources = report.resources.len(),
                entitlements = report.entitlements.len(),
                grants = report.grants.len(),
                "sync complete"
            );

            if let Err(e) = write_report(&report, output.as_ref()) {
                eprintln!("Failed to write report: {e}");
                std::process::exit(1);
            }
        }
    }
}
