//! Sentiscope CLI
//!
//! Sentiment analysis of free text, CSV columns and YouTube comments.
//!
//! # Commands
//!
//! - `analyze`: clean and score a single text
//! - `clean`: show the normalized form of a text
//! - `csv`: analyse one column of a CSV file and export the results
//! - `youtube`: fetch a video's comments, analyse and export them

mod display;

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sentiscope_ai::classifier::{DEFAULT_NEGATIVE_THRESHOLD, DEFAULT_POSITIVE_THRESHOLD};
use sentiscope_ai::{BatchAnalysis, Classifier, LexiconPolarity, SentimentPipeline, Thresholds};
use sentiscope_core::{Normalizer, NormalizerConfig};
use sentiscope_sync::{CommentClient, parse_video_id};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Sentiscope - sentiment analysis for text, CSV files and YouTube comments
#[derive(Parser)]
#[command(name = "sentiscope", version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    model: ModelArgs,

    #[command(subcommand)]
    command: Commands,
}

/// How text is cleaned and scored.
#[derive(Args, Debug)]
struct ModelArgs {
    /// Stopword list, one word per line (`#` starts a comment)
    #[arg(long, global = true, value_name = "FILE")]
    stopwords: Option<PathBuf>,

    /// JSON lexicon: {"word": {"polarity": p, "subjectivity": s}, ...}
    #[arg(long, global = true, value_name = "FILE")]
    lexicon: Option<PathBuf>,

    /// ONNX sentiment model directory (model.onnx + tokenizer.json)
    #[arg(long, global = true, value_name = "DIR", conflicts_with = "lexicon")]
    model: Option<PathBuf>,

    /// Scores at or above this are Positive
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_POSITIVE_THRESHOLD,
        allow_negative_numbers = true
    )]
    positive_threshold: f64,

    /// Scores at or below this are Negative
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_NEGATIVE_THRESHOLD,
        allow_negative_numbers = true
    )]
    negative_threshold: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean and score a single text
    Analyze {
        /// Text to analyse
        text: String,
    },
    /// Show the cleaned form of a text
    Clean {
        /// Text to clean
        text: String,
    },
    /// Analyse a text column of a CSV file
    Csv {
        /// CSV file with a header row
        file: PathBuf,

        /// Column to analyse (defaults to the first column)
        #[arg(short, long)]
        column: Option<String>,

        /// Where to write the results
        #[arg(short, long, default_value = "analyzed_data.csv")]
        output: PathBuf,
    },
    /// Fetch and analyse the comments of a YouTube video
    Youtube {
        /// Video URL or 11-character id
        video: String,

        /// YouTube Data API v3 key
        #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Stop after this many comments (at least 1)
        #[arg(short, long)]
        limit: Option<NonZeroUsize>,

        /// Where to write the results
        #[arg(short, long, default_value = "analyzed_comments.csv")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing so `YOUTUBE_API_KEY` can come from `.env`.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("sentiscope v{}", env!("CARGO_PKG_VERSION"));

    let pipeline = build_pipeline(&cli.model)?;

    match cli.command {
        Commands::Analyze { text } => cmd_analyze(&pipeline, &text),
        Commands::Clean { text } => cmd_clean(&pipeline, &text),
        Commands::Csv {
            file,
            column,
            output,
        } => cmd_csv(&pipeline, &file, column.as_deref(), &output),
        Commands::Youtube {
            video,
            api_key,
            limit,
            output,
        } => cmd_youtube(&pipeline, &video, api_key, limit, &output).await,
    }
}

fn build_pipeline(args: &ModelArgs) -> anyhow::Result<SentimentPipeline> {
    let normalizer = match &args.stopwords {
        Some(path) => Normalizer::new(
            NormalizerConfig::from_stopword_file(path).context("loading stopword list")?,
        ),
        None => Normalizer::default(),
    };

    let thresholds = Thresholds::new(args.positive_threshold, args.negative_threshold)?;

    let classifier = match (&args.model, &args.lexicon) {
        (Some(dir), _) => load_onnx(dir)?,
        (None, Some(path)) => Classifier::new(
            LexiconPolarity::from_json_file(path).context("loading lexicon")?,
        ),
        (None, None) => Classifier::new(LexiconPolarity::new()),
    }
    .with_thresholds(thresholds);

    info!(
        model = classifier.model_name(),
        positive = thresholds.positive(),
        negative = thresholds.negative(),
        "pipeline ready"
    );
    Ok(SentimentPipeline::new(normalizer, classifier))
}

#[cfg(feature = "onnx")]
fn load_onnx(dir: &Path) -> anyhow::Result<Classifier> {
    let model = sentiscope_ai::OnnxPolarity::load(dir)
        .with_context(|| format!("loading ONNX model from {}", dir.display()))?;
    Ok(Classifier::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(dir: &Path) -> anyhow::Result<Classifier> {
    anyhow::bail!(
        "--model {} requires sentiscope built with the `onnx` feature",
        dir.display()
    )
}

// ── Commands ──

fn cmd_analyze(pipeline: &SentimentPipeline, text: &str) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        eprintln!("Warning: nothing to analyse, the text is empty.");
        return Ok(());
    }
    let cleaned = pipeline.normalize(text);
    let sentiment = pipeline.classifier().analyze(&cleaned)?;
    display::print_sentiment(&cleaned, &sentiment);
    Ok(())
}

fn cmd_clean(pipeline: &SentimentPipeline, text: &str) -> anyhow::Result<()> {
    println!("{}", pipeline.normalize(text));
    Ok(())
}

fn cmd_csv(
    pipeline: &SentimentPipeline,
    file: &Path,
    column: Option<&str>,
    output: &Path,
) -> anyhow::Result<()> {
    let Some(texts) = load_csv_texts(file, column)? else {
        eprintln!("Warning: {} has no data rows.", file.display());
        return Ok(());
    };
    eprintln!("  Read {} rows from {}", texts.len(), file.display());

    let analysis = pipeline.analyze_batch(&texts);
    report_failures(&analysis);

    println!("Sentiment distribution");
    display::print_label_counts(&analysis.summary());
    println!();

    export(&analysis, output)
}

/// Texts of the chosen column, or `None` when the file has no rows.
fn load_csv_texts(file: &Path, column: Option<&str>) -> anyhow::Result<Option<Vec<String>>> {
    let table = sentiscope_store::read_csv(file)
        .with_context(|| format!("reading {}", file.display()))?;
    if table.is_empty() {
        return Ok(None);
    }

    let names = table.column_names();
    let column = match column {
        Some(c) => c.to_string(),
        None => names
            .first()
            .cloned()
            .context("CSV file has no columns")?,
    };
    info!(column = %column, rows = table.num_rows(), "analysing csv column");
    Ok(Some(table.text_column(&column)?))
}

async fn cmd_youtube(
    pipeline: &SentimentPipeline,
    video: &str,
    api_key: Option<String>,
    limit: Option<NonZeroUsize>,
    output: &Path,
) -> anyhow::Result<()> {
    let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) else {
        eprintln!(
            "Warning: no YouTube API key. Pass --api-key or set YOUTUBE_API_KEY (a .env file works)."
        );
        return Ok(());
    };

    let video_id = parse_video_id(video)?;
    let mut client = CommentClient::new(api_key);
    if let Some(limit) = limit {
        client = client.with_max_comments(limit.get());
    }

    let comments = client
        .fetch_comments(&video_id)
        .await
        .with_context(|| format!("fetching comments for video {video_id}"))?;
    if comments.is_empty() {
        eprintln!("Warning: video {video_id} has no comments to analyse.");
        return Ok(());
    }
    eprintln!("  Fetched {} comments for {video_id}", comments.len());

    let analysis = pipeline.analyze_batch(&comments);
    report_failures(&analysis);

    println!("Sentiment summary");
    display::print_percentages(&analysis.summary());
    println!();

    export(&analysis, output)
}

// ── Helpers ──

fn report_failures(analysis: &BatchAnalysis) {
    for (row, err) in analysis.failures() {
        warn!(row, error = %err, "row left unscored");
    }
    let failed = analysis.failures().count();
    if failed > 0 {
        eprintln!("Warning: {failed} of {} rows could not be scored.", analysis.len());
    }
}

/// Print the results table and write the BOM-prefixed CSV export.
fn export(analysis: &BatchAnalysis, output: &Path) -> anyhow::Result<()> {
    let batch = analysis.to_record_batch()?;
    display::print_table(&batch)?;
    sentiscope_store::write_csv_with_bom(output, &batch)
        .with_context(|| format!("writing {}", output.display()))?;
    eprintln!("  Wrote {} rows to {}", batch.num_rows(), output.display());
    Ok(())
}
