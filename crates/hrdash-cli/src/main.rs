//! hrdash CLI - Command-line interface
//!
//! Usage:
//!   hrdash extract <ref>
//!   hrdash classify <ref> [--explain]
//!   hrdash entities <ref>
//!   hrdash score <ref> (--job-file <ref> | --description <text>)
//!   hrdash warm
//!   hrdash parse-jobs <docx> [--output <path>]
//!
//! A `<ref>` is a local path (searched in the data directory, then the
//! fallback directories) or an http(s) URL.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{ArgGroup, Parser, Subcommand};
use hrdash_core::{logging::init_tracing, AppConfig};
use hrdash_extractor::{RelevanceScorer, ResumeAnalyzer};
use hrdash_parser::{parse_job_document, DocumentReference, TextExtractor, DEFAULT_KNOWN_TITLES};
use hrdash_pipeline::{JobStore, RecruitingPipeline};

#[derive(Parser)]
#[command(name = "hrdash")]
#[command(about = "Recruiting dashboard resume tools")]
#[command(version)]
struct Cli {
    /// TOML configuration file (defaults to HRDASH_CONFIG, then environment)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the plain text of a document
    Extract {
        /// Document path or URL
        reference: String,
    },
    /// Assign a role to a resume
    Classify {
        /// Document path or URL
        reference: String,
        /// Show the score of every role
        #[arg(long)]
        explain: bool,
    },
    /// List skill, location and language tags found in a resume
    Entities {
        /// Document path or URL
        reference: String,
    },
    /// Score a resume against a job description
    #[command(group(ArgGroup::new("job").required(true).args(["job_file", "description"])))]
    Score {
        /// Resume path or URL
        reference: String,
        /// Document holding the job description
        #[arg(long)]
        job_file: Option<String>,
        /// Job description text
        #[arg(long)]
        description: Option<String>,
    },
    /// Extract and classify every candidate, filling the metadata cache
    Warm,
    /// Split a job description document into jobs
    ParseJobs {
        /// DOCX file
        path: PathBuf,
        /// Write the jobs to this JSON file instead of printing them
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::load()?,
    };
    Ok(config)
}

async fn extract(extractor: &TextExtractor, raw: &str) -> anyhow::Result<String> {
    let reference =
        DocumentReference::parse(raw).ok_or_else(|| anyhow!("Empty document reference"))?;
    extractor
        .try_extract(&reference)
        .await
        .with_context(|| format!("Could not extract text from {reference}"))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config)?;
    init_tracing(&config.logging, "hrdash=info");

    match cli.command {
        Commands::Extract { reference } => {
            let extractor = TextExtractor::from_config(&config.storage, &config.fetch)?;
            print!("{}", extract(&extractor, &reference).await?);
        }
        Commands::Classify { reference, explain } => {
            let extractor = TextExtractor::from_config(&config.storage, &config.fetch)?;
            let analyzer = ResumeAnalyzer::from_config(&config.classifier)?;
            let text = extract(&extractor, &reference).await?;

            println!("{}", analyzer.classifier.classify(&text));
            if explain {
                for score in analyzer.classifier.explain(&text) {
                    println!(
                        "  {:>3}  {}  (bonus {}; {})",
                        score.score,
                        score.label,
                        score.bonus,
                        score.matched_keywords.join(", ")
                    );
                }
            }
        }
        Commands::Entities { reference } => {
            let extractor = TextExtractor::from_config(&config.storage, &config.fetch)?;
            let analyzer = ResumeAnalyzer::from_config(&config.classifier)?;
            let text = extract(&extractor, &reference).await?;

            print_json(&analyzer.entities.extract(&text))?;
        }
        Commands::Score {
            reference,
            job_file,
            description,
        } => {
            let extractor = TextExtractor::from_config(&config.storage, &config.fetch)?;
            let resume = extract(&extractor, &reference).await?;
            let job = match (job_file, description) {
                (Some(file), _) => extract(&extractor, &file).await?,
                (None, Some(text)) => text,
                (None, None) => bail!("Either --job-file or --description is required"),
            };

            print_json(&RelevanceScorer::new().score(&resume, &job))?;
        }
        Commands::Warm => {
            let pipeline = RecruitingPipeline::from_config(&config).await?;
            let candidates = pipeline.load_candidates().await?;
            let extracted = candidates.iter().filter(|c| !c.resume_text.is_empty()).count();

            println!(
                "{} candidates, {} with resume text, {} unclassified",
                candidates.len(),
                extracted,
                candidates.iter().filter(|c| c.role.is_unclassified()).count()
            );
            print_json(&pipeline.cache().stats().report())?;
        }
        Commands::ParseJobs { path, output } => {
            let jobs = parse_job_document(&path, DEFAULT_KNOWN_TITLES)
                .with_context(|| format!("Failed to parse {}", path.display()))?;

            match output {
                Some(output) => {
                    let count = jobs.len();
                    JobStore::open(&output).await.replace_all(jobs).await?;
                    println!("Wrote {count} jobs to {}", output.display());
                }
                None => print_json(&jobs)?,
            }
        }
    }

    Ok(())
}
