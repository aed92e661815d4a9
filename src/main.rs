use clap::{ArgAction, Parser, Subcommand};
use mokuro_config::Config;
use mokuro_library::host::RecordingNotifier;
use mokuro_library::{Context, IngestReport, Settings, ingest_paths};
use mokuro_model::CatalogEntry;
use mokuro_storage::MemoryStore;
use serde_json::json;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing::subscriber::set_global_default;
use tracing_subscriber::EnvFilter;

/// Ingest mokuro-processed manga volumes into a catalog.
#[derive(Debug, Parser)]
#[command(name = "mokuro", version)]
struct Opts {
    /// More logging (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Less logging (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    quiet: u8,
    /// Configuration file layered over the platform defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ingest directories, archives and files into a fresh in-memory catalog
    /// and print the result.
    Ingest {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print the catalog as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration.
    Config,
}

const LEVELS: [Level; 5] = [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG, Level::TRACE];

fn init_tracing(default: Level, verbose: u8, quiet: u8) {
    let base = LEVELS.iter().position(|level| *level == default).unwrap_or(2);
    let index = (base + usize::from(verbose)).saturating_sub(usize::from(quiet)).min(LEVELS.len() - 1);
    let env_filter = EnvFilter::from_default_env().add_directive(LEVELS[index].into());
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();
    // Only fails if a subscriber is already installed.
    let _ = set_global_default(subscriber);
}

fn report(e: impl Debug) -> miette::Report {
    miette::miette!("{e:?}")
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let opts = Opts::parse();
    let config = Config::load(opts.config.as_deref()).map_err(report)?;
    init_tracing(config.log.level().map_err(report)?, opts.verbose, opts.quiet);

    match opts.command {
        Command::Ingest { paths, json } => ingest(&config, paths, json).await,
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config).map_err(report)?);
            Ok(())
        },
    }
}

async fn ingest(config: &Config, paths: Vec<PathBuf>, json: bool) -> miette::Result<()> {
    let store = Arc::new(MemoryStore::default().with_name("cli"));
    let notifier = Arc::new(RecordingNotifier::default());
    let settings = Settings {
        classifier: config.ingest.classifier.clone(),
        batch_size: config.ingest.batch_size,
        request_persistent: config.ingest.request_persistent,
    };
    let ctx = Context::new(store.clone()).with_notifier(notifier.clone()).with_settings(settings);

    let result = ingest_paths(&ctx, &paths).await;
    let catalog = store.snapshot().await;
    let notification = notifier.last().unwrap_or_default();
    if json {
        let summary = json_summary(&catalog, &notification, result.as_ref().ok());
        println!("{}", serde_json::to_string_pretty(&summary).map_err(report)?);
    } else {
        print_summary(&catalog, &notification, result.as_ref().ok());
    }
    result.map(|_| ()).map_err(report)
}

fn json_summary(catalog: &[CatalogEntry], notification: &str, outcome: Option<&IngestReport>) -> serde_json::Value {
    let titles: Vec<_> = catalog
        .iter()
        .map(|entry| {
            let volumes: Vec<_> = entry
                .volumes
                .iter()
                .map(|volume| {
                    json!({
                        "volume_uuid": volume.volume_uuid(),
                        "volume_name": volume.volume_name,
                        "pages": volume.files.keys().collect::<Vec<_>>(),
                    })
                })
                .collect();
            json!({ "title_uuid": entry.id, "volumes": volumes })
        })
        .collect();
    json!({
        "notification": notification,
        "added": outcome.map_or(0, |outcome| outcome.merged.added()),
        "skipped": outcome.map_or(0, |outcome| outcome.merged.skipped()),
        "failed_archives": outcome.map(|outcome| outcome.failed_archives.clone()).unwrap_or_default(),
        "titles": titles,
    })
}

fn print_summary(catalog: &[CatalogEntry], notification: &str, outcome: Option<&IngestReport>) {
    for entry in catalog {
        println!("{}", entry.id);
        for volume in &entry.volumes {
            println!("  {} ({}): {} pages", volume.volume_name, volume.volume_uuid(), volume.page_count());
        }
    }
    if let Some(outcome) = outcome {
        for archive in &outcome.failed_archives {
            println!("skipped unreadable archive: {archive}");
        }
    }
    println!("{notification}");
}
