//! lexchunk CLI - chunking for layout-analyzed legal documents

mod vision;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use lexchunk::export::to_jsonl;
use lexchunk::structure::Structurer;
use lexchunk::{
    detect_strategy, load_document, ChunkOptions, ErrorMode, Pipeline, ProcessedDocument,
    RemovalReason, SourceInfo, VisionModel,
};

use vision::{AnthropicVision, DEFAULT_MODEL};

#[derive(Parser)]
#[command(name = "lexchunk")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Chunk layout-analyzed statutes, codes and manuals for retrieval", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk one layout document (JSON) into JSONL records
    Chunk {
        /// Layout document (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document key (defaults to the input name with a .pdf extension)
        #[arg(long)]
        key: Option<String>,

        /// Public URL of the source document
        #[arg(long)]
        url: Option<String>,

        /// Identifier passed through to every record
        #[arg(long)]
        source_id: Option<String>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Chunk many layout documents in parallel
    Batch {
        /// Layout documents (JSON)
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory for `<name>.jsonl` files
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Show strategy and chunk statistics for a layout document
    Inspect {
        /// Layout document (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Document key (defaults to the input name with a .pdf extension)
        #[arg(long)]
        key: Option<String>,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct PipelineArgs {
    /// Skip the flowchart pass
    #[arg(long)]
    no_figures: bool,

    /// Skip figures with unusable vision replies instead of failing
    #[arg(long)]
    lenient_figures: bool,

    /// Word count that forces a chunk boundary
    #[arg(long, default_value = "1200")]
    max_words: usize,

    /// Directory for raw / removed / final chunk logs
    #[arg(long, env = "LEXCHUNK_LOG_DIR", value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// API key for the vision model
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Vision model name
    #[arg(long, env = "LEXCHUNK_VISION_MODEL", default_value = DEFAULT_MODEL)]
    vision_model: String,
}

impl PipelineArgs {
    fn build(&self) -> Result<Pipeline, Box<dyn std::error::Error>> {
        let mut options = ChunkOptions::new()
            .with_max_words(self.max_words)
            .with_figures(!self.no_figures);
        if self.lenient_figures {
            options = options.with_figure_error_mode(ErrorMode::Lenient);
        }

        let mut pipeline = Pipeline::new().with_options(options);

        match (&self.api_key, self.no_figures) {
            (Some(key), false) => {
                let model: Arc<dyn VisionModel> =
                    Arc::new(AnthropicVision::new(key.as_str(), self.vision_model.as_str())?);
                pipeline = pipeline.with_vision(model);
            }
            (None, false) => {
                log::warn!("ANTHROPIC_API_KEY not set, flowchart extraction disabled");
            }
            _ => {}
        }

        if let Some(dir) = &self.log_dir {
            pipeline = pipeline.with_chunk_log(dir);
        }

        Ok(pipeline)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Chunk {
            input,
            output,
            key,
            url,
            source_id,
            pipeline,
        } => cmd_chunk(
            &input,
            output.as_deref(),
            source_for(&input, key, url, source_id),
            &pipeline,
        ),
        Commands::Batch {
            inputs,
            output,
            pipeline,
        } => cmd_batch(&inputs, &output, &pipeline),
        Commands::Inspect { input, key } => cmd_inspect(&input, source_for(&input, key, None, None)),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Source info for an input file; the key defaults to `<stem>.pdf`.
fn source_for(
    input: &Path,
    key: Option<String>,
    url: Option<String>,
    source_id: Option<String>,
) -> SourceInfo {
    let key = key.unwrap_or_else(|| {
        input
            .with_extension("pdf")
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    });
    let mut source = SourceInfo::new(key);
    if let Some(url) = url {
        source = source.with_url(url);
    }
    if let Some(id) = source_id {
        source = source.with_source_id(id);
    }
    source
}

fn cmd_chunk(
    input: &Path,
    output: Option<&Path>,
    source: SourceInfo,
    args: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = args.build()?;
    let doc = load_document(input)?;
    let processed = pipeline.process(&doc, &source)?;
    let jsonl = to_jsonl(&processed.records)?;

    if let Some(path) = output {
        fs::write(path, &jsonl)?;
        println!(
            "{} {} records to {}",
            "Saved".green(),
            processed.records.len(),
            path.display()
        );
    } else {
        print!("{}", jsonl);
    }

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output: &Path,
    args: &PipelineArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output)?;
    let pipeline = args.build()?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let failures: Vec<(PathBuf, String)> = inputs
        .par_iter()
        .filter_map(|input| {
            let result = process_one(&pipeline, input, output);
            pb.inc(1);
            result.err().map(|e| (input.clone(), e.to_string()))
        })
        .collect();

    pb.finish_with_message("Done!");

    let succeeded = inputs.len() - failures.len();
    println!(
        "\n{} {} of {} documents",
        "Chunked".green().bold(),
        succeeded,
        inputs.len()
    );
    for (path, err) in &failures {
        eprintln!("  {} {}: {}", "✗".red(), path.display(), err);
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} documents failed", failures.len()).into())
    }
}

fn process_one(pipeline: &Pipeline, input: &Path, output_dir: &Path) -> lexchunk::Result<()> {
    let source = source_for(input, None, None, None);
    let doc = load_document(input)?;
    let processed = pipeline.process(&doc, &source)?;

    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let path = output_dir.join(format!("{}.jsonl", stem));
    fs::write(path, to_jsonl(&processed.records)?)?;
    Ok(())
}

fn cmd_inspect(input: &Path, source: SourceInfo) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_document(input)?;
    let options = ChunkOptions::new().with_figures(false);
    let doc_id = source.doc_id();
    let strategy = detect_strategy(&doc_id, &options);
    let structured = Structurer::new(strategy.is_statute()).structure(&doc);
    let processed = Pipeline::new().with_options(options).process(&doc, &source)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Document ID".bold(), doc_id);
    println!("{}: {}", "Strategy".bold(), strategy);
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Figures".bold(), doc.figure_count());
    println!("{}: {}", "Lines".bold(), structured.lines.len());
    println!("{}: {}", "Title blocks".bold(), structured.header_split.len());

    println!();
    println!("{}", "Chunk Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    print_chunk_stats(&processed);

    Ok(())
}

fn print_chunk_stats(processed: &ProcessedDocument) {
    println!("{}: {}", "Raw chunks".bold(), processed.raw_chunks.len());
    println!("{}: {}", "Kept".bold(), processed.text_count());
    println!("{}: {}", "Removed".bold(), processed.removed.len());

    let mut reasons: BTreeMap<&str, usize> = BTreeMap::new();
    for removed in &processed.removed {
        let label = match removed.reason {
            RemovalReason::Empty => "empty",
            RemovalReason::IndexOrTitle => "index/title",
            RemovalReason::TooShort { .. } => "too short",
        };
        *reasons.entry(label).or_default() += 1;
    }
    let last = reasons.len().saturating_sub(1);
    for (i, (label, count)) in reasons.iter().enumerate() {
        let branch = if i == last { "└─" } else { "├─" };
        println!("  {} {}: {}", branch.dimmed(), label, count);
    }

    if let (Some(first), Some(last)) = (processed.raw_chunks.first(), processed.raw_chunks.last()) {
        println!(
            "{}: {} .. {}",
            "Page span".bold(),
            first.metadata.pages,
            last.metadata.pages
        );
    }
}

fn cmd_version() {
    println!("{} {}", "lexchunk".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Chunking for legal and administrative documents");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/lexchunk".dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_source_for_defaults_key() {
        let source = source_for(Path::new("out/wi-admin-tax-16.json"), None, None, None);
        assert_eq!(source.key, "wi-admin-tax-16.pdf");
        assert!(source.url.is_none());

        let source = source_for(
            Path::new("x.json"),
            Some("pubs/guide.pdf".into()),
            Some("https://example.org/guide.pdf".into()),
            Some("7".into()),
        );
        assert_eq!(source.doc_id(), "guide.pdf");
        assert_eq!(source.source_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_batch_writes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("guide.json");
        fs::write(
            &input,
            r#"{"pages": [{"number": 1, "blocks": [
                {"kind": "text", "text": "I. Overview"},
                {"kind": "text", "text": "All taxable property is assessed at full value."}
            ]}]}"#,
        )
        .unwrap();

        let out = dir.path().join("out");
        let cli = Cli::try_parse_from([
            "lexchunk",
            "batch",
            input.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
            "--no-figures",
        ])
        .unwrap();
        let Commands::Batch {
            inputs,
            output,
            pipeline,
        } = cli.command
        else {
            panic!("expected batch command");
        };

        cmd_batch(&inputs, &output, &pipeline).unwrap();
        let jsonl = fs::read_to_string(out.join("guide.jsonl")).unwrap();
        assert!(jsonl.contains("\"chunk_id\":\"guide.pdf_final_0\""));
    }
}
