use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use fgpath::output::write_report;
use fgpath::{AnalysisConfig, Analyzer, CorpusReader, DependencyType, ResultWriter};
use tracing::info;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(author, version, about = "Extracts filler-gap paths from an LFG treebank")]
struct Cli {
    /// TIGER-XML corpus (optionally gzipped)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Result table; defaults to the input path with `xml` replaced by `csv`
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Dependency edge label: TOPIC-REL (relatives) or FOCUS-INT (questions)
    #[arg(short, long, default_value = "TOPIC-REL")]
    dependency_type: DependencyType,

    /// Comma-separated PRED values that can head a dependency
    #[arg(long, value_delimiter = ',')]
    pred_values: Option<Vec<String>>,

    /// Maximum ascent steps from the gap to the root
    #[arg(long)]
    max_depth: Option<usize>,

    /// Directory for worked_ids.txt and failing_labels.txt
    #[arg(long, value_name = "DIR")]
    report: Option<PathBuf>,

    /// Log every analysis step
    #[arg(short, long)]
    verbose: bool,
}

/// Input path with its `.xml` (or `.xml.gz`) extension replaced by `.csv`
fn default_output(input: &Path) -> PathBuf {
    let plain = if input.extension().is_some_and(|ext| ext == "gz") {
        input.with_extension("")
    } else {
        input.to_path_buf()
    };
    plain.with_extension("csv")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = AnalysisConfig::default().with_dependency_type(cli.dependency_type);
    if let Some(values) = cli.pred_values {
        config = config.with_eligible_values(values);
    }
    if let Some(max_depth) = cli.max_depth {
        config = config.with_max_depth(max_depth);
    }

    let output = cli.output.unwrap_or_else(|| default_output(&cli.input));
    anyhow::ensure!(output != cli.input, "output path would overwrite the input corpus");

    info!(input = %cli.input.display(), dependency_type = %config.dependency_type, "reading corpus");
    let reader = CorpusReader::from_file(&cli.input)
        .with_context(|| format!("cannot open {}", cli.input.display()))?;

    let analysis = Analyzer::new(config)
        .analyze_corpus(reader)
        .with_context(|| format!("malformed corpus {}", cli.input.display()))?;

    let file = File::create(&output).with_context(|| format!("cannot create {}", output.display()))?;
    let mut writer = ResultWriter::new(BufWriter::new(file))?;
    for row in &analysis.rows {
        writer.write_row(row)?;
    }
    writer.finish()?;
    info!(output = %output.display(), rows = analysis.rows.len(), "results written");

    if let Some(dir) = &cli.report {
        write_report(dir, &analysis.diagnostics)
            .with_context(|| format!("cannot write report to {}", dir.display()))?;
    }

    analysis.summary.log();
    Ok(())
}
