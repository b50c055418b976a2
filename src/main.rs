//! # BenchBox CLI
//!
//! Command-line access to the BenchBox link core.
//!
//! ## Subcommands
//!
//! - `classify`: platform / content type / subtype of one or more URLs
//! - `validate`: exit non-zero unless the argument is an absolute URL
//! - `resolve`: fetch preview metadata for a URL
//! - `enrich`: build the storable channel/video record for a URL
//! - `batch`: enrich every URL listed in a file, concurrently
//!
//! Resolver settings come from `BENCHBOX_*` environment variables (see
//! `ResolverConfig::from_env`), logging from `RUST_LOG`.

mod telemetry;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use benchbox::{
    classify, enrich, is_valid_url, EntryRecord, MetadataResolver, Placement, Platform,
};
use clap::{Args, Parser, Subcommand};
use futures::future;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, instrument, warn};

#[derive(Parser)]
#[command(author, version, about = "Classify short-form video links and fetch their previews", long_about = None)]
struct Cli {
    /// Write logs to this directory instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify URLs by platform and content type
    Classify(ClassifyArgs),

    /// Check that a string is an absolute URL
    Validate(ValidateArgs),

    /// Fetch preview metadata for a URL
    Resolve(ResolveArgs),

    /// Build the record that would be saved for a URL
    Enrich(EnrichArgs),

    /// Enrich every URL in a file
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// URLs to classify
    #[arg(required = true)]
    urls: Vec<String>,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// String to check
    #[arg(required = true)]
    url: String,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    /// URL to resolve
    #[arg(required = true)]
    url: String,

    /// Platform hint (youtube|tiktok|instagram|xiaohongshu|other); detected when omitted
    #[arg(short, long)]
    platform: Option<String>,

    /// Report failures instead of returning the fallback result
    #[arg(long)]
    strict: bool,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct PlacementArgs {
    /// File the entry in this folder
    #[arg(long, conflicts_with = "channel")]
    folder: Option<i64>,

    /// File the video under this channel
    #[arg(long)]
    channel: Option<i64>,
}

impl PlacementArgs {
    fn placement(&self) -> Placement {
        match (self.folder, self.channel) {
            (Some(folder), _) => Placement::Folder(folder),
            (None, Some(channel)) => Placement::Channel(channel),
            (None, None) => Placement::Unfiled,
        }
    }
}

#[derive(Args, Debug)]
struct EnrichArgs {
    /// URL to enrich
    #[arg(required = true)]
    url: String,

    #[command(flatten)]
    placement: PlacementArgs,

    /// Memo to attach
    #[arg(short, long)]
    memo: Option<String>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// File with one URL per line; blank lines and `#` comments are skipped
    #[arg(required = true)]
    input: PathBuf,

    /// Number of concurrent resolutions
    #[arg(short, long, default_value = "4")]
    concurrency: usize,

    #[command(flatten)]
    placement: PlacementArgs,

    /// Save the records to this file instead of printing them
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _otel = telemetry::init_tracing_subscriber(cli.log_file.as_deref())?;

    match cli.command {
        Some(Commands::Classify(args)) => classify_command(args)?,
        Some(Commands::Validate(args)) => validate_command(args)?,
        Some(Commands::Resolve(args)) => resolve_command(args).await?,
        Some(Commands::Enrich(args)) => enrich_command(args).await?,
        Some(Commands::Batch(args)) => batch_command(args).await?,
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["benchbox", "--help"]);
        }
    }

    Ok(())
}

fn classify_command(args: ClassifyArgs) -> anyhow::Result<()> {
    let results: Vec<_> = args.urls.iter().map(|url| classify(url)).collect();

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&results)?),
        _ => {
            for result in results {
                println!(
                    "{}\t{}\t{:?}\t{:?}",
                    result.normalized_url,
                    result.platform,
                    result.content_type,
                    result.video_subtype
                );
            }
        }
    }

    Ok(())
}

fn validate_command(args: ValidateArgs) -> anyhow::Result<()> {
    if is_valid_url(&args.url) {
        println!("valid");
        Ok(())
    } else {
        Err(anyhow!("not an absolute URL: {}", args.url))
    }
}

#[instrument]
async fn resolve_command(args: ResolveArgs) -> anyhow::Result<()> {
    let resolver = MetadataResolver::from_env()?;
    let platform = match &args.platform {
        Some(hint) => Platform::from_hint(hint),
        None => classify(&args.url).platform,
    };

    let metadata = if args.strict {
        resolver.try_resolve(&args.url, platform).await?
    } else {
        resolver.resolve(&args.url, platform).await
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&metadata)?),
        _ => {
            println!("Title: {}", metadata.title);
            println!("Description: {}", metadata.description);
            println!("Thumbnail: {}", metadata.thumbnail);
            println!("Site: {}", metadata.site_name);
        }
    }

    Ok(())
}

#[instrument]
async fn enrich_command(args: EnrichArgs) -> anyhow::Result<()> {
    let resolver = MetadataResolver::from_env()?;
    let mut record = enrich(&resolver, &args.url, args.placement.placement()).await?;
    if let Some(memo) = args.memo {
        record = record.with_memo(memo);
    }

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

#[instrument]
async fn batch_command(args: BatchArgs) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&args.input).await?;
    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect();

    if args.concurrency == 0 {
        return Err(anyhow!("concurrency must be at least 1"));
    }

    let resolver = MetadataResolver::from_env()?;
    let placement = args.placement.placement();

    let progress_bar = ProgressBar::new(urls.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")?
            .progress_chars("##-"),
    );
    progress_bar.set_message("Resolving links...");

    // Progress updates are funnelled through a channel so workers never touch the bar
    let (progress_sender, mut progress_receiver) = mpsc::channel::<String>(100);
    let progress_handle = tokio::spawn({
        let progress_bar = progress_bar.clone();
        async move {
            while let Some(url) = progress_receiver.recv().await {
                progress_bar.inc(1);
                progress_bar.set_message(url);
            }
            progress_bar.finish_with_message("Done");
        }
    });

    let semaphore = Arc::new(Semaphore::new(args.concurrency));
    let tasks = urls
        .into_iter()
        .map(|url| {
            let permit = semaphore.clone().acquire_owned();
            let resolver = resolver.clone();
            let progress_sender = progress_sender.clone();

            tokio::spawn(async move {
                let _permit = permit.await?;
                debug!("Enriching {}", url);
                let result = enrich(&resolver, &url, placement).await;
                let _ = progress_sender.send(url.clone()).await;
                Ok::<_, anyhow::Error>((url, result))
            })
        })
        .collect::<Vec<_>>();
    drop(progress_sender);

    let mut records: Vec<EntryRecord> = Vec::new();
    let mut skipped = 0;
    for joined in future::join_all(tasks).await {
        match joined?? {
            (_, Ok(record)) => records.push(record),
            (url, Err(e)) => {
                warn!("Skipping {}: {}", url, e);
                skipped += 1;
            }
        }
    }
    let _ = progress_handle.await;

    let json = serde_json::to_string_pretty(&records)?;
    match args.output {
        Some(output) => {
            tokio::fs::write(&output, json).await?;
            println!(
                "Saved {} records to {} ({} skipped)",
                records.len(),
                output.display(),
                skipped
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
