use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use htm2md::batch::{BatchOptions, run_batch};
use htm2md::converter::{ConversionOptions, LinkTargets, MarkdownConverter};
use htm2md::dom::DEFAULT_MAX_NESTING_DEPTH;

/// Convert HTML documents to Markdown
#[derive(Debug, Parser)]
#[command(name = "htm2md", version, about)]
struct Cli {
    /// What link targets contain
    #[arg(long, value_enum, default_value_t = LinkMode::TitleOnly, global = true)]
    links: LinkMode,

    /// Element nesting kept before deeper content is flattened to text
    #[arg(long, default_value_t = DEFAULT_MAX_NESTING_DEPTH, global = true)]
    max_depth: usize,

    /// Input charset label, overriding BOM and meta tag detection
    #[arg(long, global = true)]
    encoding: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a single HTML document
    Convert {
        /// HTML file, or `-` for stdin
        input: PathBuf,
        /// Markdown file to write; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert every .htm/.html file under a directory
    Batch {
        /// Directory searched recursively for HTML files
        input_dir: PathBuf,
        /// Directory receiving the .md files
        output_dir: PathBuf,
        /// Maximum number of files to convert; negative or omitted means all
        #[arg(allow_negative_numbers = true)]
        count: Option<i64>,
        /// Worker threads (defaults to the number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LinkMode {
    /// `[text]( "title")`, the href is left out
    TitleOnly,
    /// `[text](href "title")`
    Href,
}

impl From<LinkMode> for LinkTargets {
    fn from(mode: LinkMode) -> Self {
        match mode {
            LinkMode::TitleOnly => LinkTargets::TitleOnly,
            LinkMode::Href => LinkTargets::Href,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let converter = MarkdownConverter::with_options(ConversionOptions {
        link_targets: cli.links.into(),
        max_depth: cli.max_depth,
        charset: cli.encoding,
    });

    match cli.command {
        Command::Convert { input, output } => convert(&converter, &input, output.as_deref()),
        Command::Batch {
            input_dir,
            output_dir,
            count,
            jobs,
        } => {
            let options = BatchOptions {
                limit: count.and_then(|count| usize::try_from(count).ok()),
                jobs,
                ..BatchOptions::new(input_dir, output_dir)
            };
            batch(&converter, &options)
        }
    }
}

fn convert(converter: &MarkdownConverter, input: &Path, output: Option<&Path>) -> Result<()> {
    let html = if input == Path::new("-") {
        let mut html = Vec::new();
        io::stdin()
            .read_to_end(&mut html)
            .context("failed to read stdin")?;
        html
    } else {
        fs::read(input).with_context(|| format!("failed to read {}", input.display()))?
    };

    let markdown = converter
        .convert_html(&html)
        .with_context(|| format!("failed to convert {}", input.display()))?;

    match output {
        Some(path) => {
            fs::write(path, markdown)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Saved {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", markdown).context("failed to write stdout")?;
        }
    }
    Ok(())
}

fn batch(converter: &MarkdownConverter, options: &BatchOptions) -> Result<()> {
    let report = run_batch(converter, options).with_context(|| {
        format!(
            "batch conversion of {} failed",
            options.input_dir.display()
        )
    })?;

    println!(
        "{} converted, {} failed, {} skipped",
        report.converted.len(),
        report.failed.len(),
        report.skipped.len()
    );
    for (path, error) in &report.failed {
        eprintln!("failed: {}: {}", path.display(), error);
    }

    if !report.is_success() {
        bail!("{} of {} file(s) failed to convert", report.failed.len(), report.total());
    }
    Ok(())
}
