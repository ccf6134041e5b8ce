//! Pixbatch CLI: optimize local images and upload them to an S3-compatible store.
//!
//! Storage settings come from the environment (or `.env`): STORAGE_BACKEND,
//! ACCOUNT_ID, ACCESS_KEY, SECRET_KEY, BUCKET, S3_ENDPOINT, S3_REGION,
//! LOCAL_STORAGE_PATH, BATCH_CONCURRENCY and FORMAT_POLICY.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pixbatch_cli::{init_tracing, logical_name, render_listing, render_summary};
use pixbatch_core::{Config, Directive, SourceRef, UploadItem};
use pixbatch_processing::{BatchPipeline, FileSource, ImageTransformer, Uploader};
use pixbatch_storage::{create_storage, month_partition, Storage};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pixbatch", about = "Batch image optimizer and uploader")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform and upload image files, then list the partition
    Upload {
        /// Image files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output format: webp, jpeg (jpg), png or avif
        #[arg(long, default_value = "webp")]
        format: String,
        /// Encoder quality, 1-100
        #[arg(long, default_value = "85")]
        quality: u8,
        /// Maximum output width in pixels
        #[arg(long)]
        width: Option<u32>,
        /// Maximum output height in pixels
        #[arg(long)]
        height: Option<u32>,
        /// Key partition (defaults to the current month, e.g. 6-2025)
        #[arg(long)]
        partition: Option<String>,
        /// Item pipelines in flight (overrides BATCH_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<usize>,
        /// Print the summary and listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// List stored objects under a prefix
    List {
        /// Key prefix (defaults to the current month partition)
        #[arg(long)]
        prefix: Option<String>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

fn current_partition() -> String {
    month_partition(&chrono::Utc::now())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the subscriber so RUST_LOG can come from it
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration. Check your .env file")?;
    let storage = create_storage(&config.storage)
        .await
        .context("Failed to create storage backend")?;

    match cli.command {
        Commands::Upload {
            files,
            format,
            quality,
            width,
            height,
            partition,
            concurrency,
            json,
        } => {
            let directive = Directive::new(format.as_str(), quality)
                .and_then(|d| d.with_size(width, height))
                .context("Invalid transform options")?;

            let items = files
                .iter()
                .map(|path| {
                    let name = logical_name(path, &format).with_context(|| {
                        format!("Cannot derive a file name from {}", path.display())
                    })?;
                    let source = SourceRef::new(path.to_string_lossy());
                    UploadItem::new(name, source, directive.clone())
                        .with_context(|| format!("Invalid upload item {}", path.display()))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            let partition = partition.unwrap_or_else(current_partition);
            let concurrency = concurrency.unwrap_or(config.concurrency);

            tracing::info!(
                files = items.len(),
                partition = %partition,
                concurrency = concurrency,
                backend = %storage.backend_type(),
                "Starting batch upload"
            );

            let pipeline = BatchPipeline::new(
                Arc::new(FileSource::new()),
                ImageTransformer::new(config.format_policy),
                Uploader::new(storage.clone()),
            );
            let summary = pipeline
                .run(&items, &partition, concurrency)
                .await
                .context("Batch upload aborted")?;

            let prefix = format!("{}/", partition);
            let objects = match storage.list(&prefix).await {
                Ok(objects) => Some(objects),
                Err(e) => {
                    tracing::error!(prefix = %prefix, error = %e, "Failed to list objects");
                    None
                }
            };

            if json {
                print_json(&serde_json::json!({
                    "summary": summary,
                    "objects": objects,
                }))?;
            } else {
                print!("{}", render_summary(&summary));
                if let Some(objects) = objects {
                    println!("\nListing objects under {}\n", prefix);
                    print!("{}", render_listing(&objects));
                }
            }
        }
        Commands::List { prefix, json } => {
            let prefix = prefix.unwrap_or_else(|| format!("{}/", current_partition()));
            let objects = list_objects(storage.as_ref(), &prefix).await?;

            if json {
                print_json(&objects)?;
            } else {
                print!("{}", render_listing(&objects));
            }
        }
    }

    Ok(())
}

async fn list_objects(
    storage: &dyn Storage,
    prefix: &str,
) -> anyhow::Result<Vec<pixbatch_storage::ObjectSummary>> {
    storage
        .list(prefix)
        .await
        .with_context(|| format!("Failed to list objects under {:?}", prefix))
}
