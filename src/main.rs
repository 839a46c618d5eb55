use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::warn;

use questionnaire_parser::{
    explain_document, parse_document_with, Document, ParseOutcome, ParseSummary, ParserConfig,
};

#[derive(Parser)]
#[command(name = "questionnaire_parser", about = "Turn extracted document text into questionnaire JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Extracted plain text of the document
    file: PathBuf,
    /// Rendered HTML of the same document, used for bold/heading hints
    #[arg(long)]
    markup: Option<PathBuf>,
    /// JSON file overriding parser thresholds
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one document and print its sections as JSON
    Parse {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        pretty: bool,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show how each question was classified
    Explain {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Section, question and type counts for one document
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Parse every *.txt in a directory, writing <stem>.json next to it
    Batch {
        dir: PathBuf,
        /// Max documents to parse (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Where to write JSON (default: DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, pretty, output } => {
            let config = load_config(input.config.as_deref())?;
            let doc = load_document(&input.file, input.markup.as_deref())?;
            let outcome = parse_document_with(&doc, &config)?;
            for d in &outcome.diagnostics {
                warn!(?d, "diagnostic");
            }

            let json = if pretty {
                serde_json::to_string_pretty(&outcome.sections)?
            } else {
                serde_json::to_string(&outcome.sections)?
            };
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{json}"),
            }
            Ok(())
        }
        Commands::Explain { input } => {
            let config = load_config(input.config.as_deref())?;
            let doc = load_document(&input.file, input.markup.as_deref())?;
            let traces = explain_document(&doc, &config)?;
            if traces.is_empty() {
                println!("No questions detected.");
                return Ok(());
            }

            println!(
                "{:>4} | {:>4} | {:<9} | {:>4} | {:<40} | {}",
                "Line", "No.", "Type", "Conf", "Question", "Rules"
            );
            println!("{}", "-".repeat(100));
            for t in &traces {
                let number = t.number.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
                println!(
                    "{:>4} | {:>4} | {:<9} | {:>4.2} | {:<40} | {}",
                    t.line + 1,
                    number,
                    t.classification.kind.as_str(),
                    t.classification.confidence,
                    truncate(&t.text, 40),
                    t.classification.fired.join(","),
                );
            }
            println!("\n{} questions", traces.len());
            Ok(())
        }
        Commands::Stats { input } => {
            let config = load_config(input.config.as_deref())?;
            let doc = load_document(&input.file, input.markup.as_deref())?;
            let outcome = parse_document_with(&doc, &config)?;
            print!("{}", render_summary(&outcome.summary()));
            if let Some(tier) = outcome.fallback_tier() {
                println!("Fallback:   tier {tier}");
            }
            Ok(())
        }
        Commands::Batch { dir, limit, out_dir, config } => {
            let config = load_config(config.as_deref())?;
            let mut files = text_files(&dir)?;
            if let Some(n) = limit {
                files.truncate(n);
            }
            if files.is_empty() {
                println!("No .txt documents in {}.", dir.display());
                return Ok(());
            }

            let out_dir = out_dir.unwrap_or_else(|| dir.clone());
            fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;

            println!("Parsing {} documents...", files.len());
            let counts = parse_batch(&files, &out_dir, &config)?;
            counts.print();
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ParserConfig> {
    Ok(ParserConfig::load_or_default(path)?)
}

fn load_document(file: &Path, markup: Option<&Path>) -> anyhow::Result<Document> {
    let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let mut doc = Document::from_text(text);
    if let Some(path) = markup {
        let html = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        doc = doc.with_markup(html);
    }
    if let Some(name) = file.file_name() {
        doc.metadata
            .insert("filename".into(), name.to_string_lossy().into_owned().into());
    }
    Ok(doc)
}

/// `*.txt` files directly inside `dir`, sorted by name.
fn text_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[derive(Default)]
struct BatchCounts {
    documents: usize,
    sections: usize,
    questions: usize,
    fallbacks: usize,
    empty: usize,
    errors: usize,
    confidence_total: f64,
}

impl BatchCounts {
    fn add(&mut self, outcome: &ParseOutcome, summary: &ParseSummary) {
        self.documents += 1;
        self.sections += summary.sections;
        self.questions += summary.questions;
        self.confidence_total += summary.average_confidence * summary.questions as f64;
        if outcome.fallback_tier().is_some() {
            self.fallbacks += 1;
        }
        if summary.questions == 0 {
            self.empty += 1;
        }
    }

    fn print(&self) {
        let avg = if self.questions == 0 {
            0.0
        } else {
            self.confidence_total / self.questions as f64
        };
        println!(
            "Parsed {} documents: {} sections, {} questions (avg confidence {:.2}).",
            self.documents, self.sections, self.questions, avg,
        );
        println!(
            "{} used a fallback, {} had no questions, {} failed.",
            self.fallbacks, self.empty, self.errors,
        );
    }
}

fn render_summary(summary: &ParseSummary) -> String {
    let mut out = format!(
        "Sections:   {}\nQuestions:  {}\nConfidence: {:.2}\n",
        summary.sections, summary.questions, summary.average_confidence
    );
    for (kind, count) in &summary.question_types {
        out.push_str(&format!("  {:<10} {}\n", kind.as_str(), count));
    }
    out
}

fn parse_batch(files: &[PathBuf], out_dir: &Path, config: &ParserConfig) -> anyhow::Result<BatchCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let mut counts = BatchCounts::default();

    let results: Vec<_> = files
        .par_iter()
        .map(|file| {
            let markup = file.with_extension("html");
            let markup = markup.is_file().then_some(markup);
            let outcome = load_document(file, markup.as_deref())
                .and_then(|doc| Ok(parse_document_with(&doc, config)?));
            pb.inc(1);
            (file, outcome)
        })
        .collect();

    for (file, outcome) in results {
        match outcome {
            Ok(outcome) => {
                let stem = file.file_stem().unwrap_or_default().to_string_lossy();
                let target = out_dir.join(format!("{stem}.json"));
                let json = serde_json::to_string_pretty(&outcome.sections)?;
                fs::write(&target, json)
                    .with_context(|| format!("writing {}", target.display()))?;
                counts.add(&outcome, &outcome.summary());
            }
            Err(e) => {
                warn!(file = %file.display(), "skipped: {e:#}");
                counts.errors += 1;
            }
        }
    }

    pb.finish_and_clear();
    Ok(counts)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
