//! Directory batch conversion
//!
//! Walks an input directory for `.htm`/`.html` files, converts each one
//! independently, and writes `<stem>.md` into a flat output directory.
//!
//! Documents share no state, so conversion runs on a rayon pool. A file that
//! fails to read, decode or write is recorded in the [`BatchReport`] and the
//! rest of the batch carries on.
//!
//! # Examples
//!
//! ```rust,no_run
//! use htm2md::batch::{run_batch, BatchOptions};
//! use htm2md::MarkdownConverter;
//!
//! let options = BatchOptions {
//!     limit: Some(10),
//!     ..BatchOptions::new("site/", "markdown/")
//! };
//! let report = run_batch(&MarkdownConverter::new(), &options).expect("batch failed");
//! println!("{} converted, {} failed", report.converted.len(), report.failed.len());
//! ```

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::converter::MarkdownConverter;
use crate::error::ConversionError;

/// File extensions picked up by discovery, compared case-insensitively
const HTML_EXTENSIONS: &[&str] = &["htm", "html"];

/// Batch run configuration
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory searched recursively for HTML files
    pub input_dir: PathBuf,
    /// Directory receiving the `.md` files, created if missing
    pub output_dir: PathBuf,
    /// Maximum number of HTML files to convert; `None` converts all of them
    pub limit: Option<usize>,
    /// Worker threads; `None` lets rayon pick
    pub jobs: Option<usize>,
}

impl BatchOptions {
    /// Unlimited batch from `input_dir` to `output_dir`
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            limit: None,
            jobs: None,
        }
    }
}

/// Outcome of a batch run, in discovery order
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Written output files
    pub converted: Vec<PathBuf>,
    /// Input files that failed, with the reason
    pub failed: Vec<(PathBuf, ConversionError)>,
    /// Input files left out because an earlier file already claimed their
    /// output name
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    /// Number of input files considered
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len() + self.skipped.len()
    }

    /// Whether every considered file was converted
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Recursively list the HTML files under `dir`, sorted by path
///
/// Entries that cannot be read are logged and skipped.
pub fn discover_html_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_html_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    debug!("Discovered {} HTML file(s) under {}", files.len(), dir.display());
    files
}

/// Whether the path has an `htm`/`html` extension, in any case
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            HTML_EXTENSIONS
                .iter()
                .any(|html| ext.eq_ignore_ascii_case(html))
        })
}

/// Output location for an input file: `<output_dir>/<stem>.md`
///
/// ```rust
/// use std::path::Path;
/// use htm2md::batch::output_path_for;
///
/// let output = output_path_for(Path::new("site/docs/v1.2.HTML"), Path::new("out"));
/// assert_eq!(output, Path::new("out/v1.2.md"));
/// ```
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push(".md");
    output_dir.join(name)
}

/// Convert one file and write the Markdown next to `output`
pub fn convert_file(
    converter: &MarkdownConverter,
    input: &Path,
    output: &Path,
) -> Result<(), ConversionError> {
    let html = fs::read(input).map_err(|e| ConversionError::io(input, e))?;
    let markdown = converter.convert_html(&html)?;
    fs::write(output, markdown).map_err(|e| ConversionError::io(output, e))
}

/// Convert every HTML file under the input directory
///
/// # Errors
///
/// Fails up front when the input directory does not exist, the output
/// directory cannot be created, or the worker pool cannot start. Failures of
/// single files never fail the batch; they are listed in the report.
pub fn run_batch(
    converter: &MarkdownConverter,
    options: &BatchOptions,
) -> Result<BatchReport, ConversionError> {
    if !options.input_dir.is_dir() {
        return Err(ConversionError::InvalidInput(format!(
            "{} is not a directory",
            options.input_dir.display()
        )));
    }
    fs::create_dir_all(&options.output_dir)
        .map_err(|e| ConversionError::io(&options.output_dir, e))?;

    let mut inputs = discover_html_files(&options.input_dir);
    if let Some(limit) = options.limit
        && inputs.len() > limit
    {
        info!("Limiting batch to {} of {} file(s)", limit, inputs.len());
        inputs.truncate(limit);
    }

    let mut report = BatchReport::default();
    let mut claimed = HashSet::new();
    let mut planned = Vec::with_capacity(inputs.len());
    for input in inputs {
        let output = output_path_for(&input, &options.output_dir);
        if claimed.insert(output.clone()) {
            planned.push((input, output));
        } else {
            warn!(
                "Skipping {}: {} is already produced by another file",
                input.display(),
                output.display()
            );
            report.skipped.push(input);
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs.unwrap_or(0))
        .thread_name(|index| format!("htm2md-worker-{}", index))
        .build()
        .map_err(|e| ConversionError::InternalError(format!("worker pool: {}", e)))?;

    let results: Vec<_> = pool.install(|| {
        planned
            .into_par_iter()
            .map(|(input, output)| {
                info!("Converting {}", input.display());
                let result = convert_file(converter, &input, &output);
                if result.is_ok() {
                    info!("Saved {}", output.display());
                }
                (input, output, result)
            })
            .collect()
    });

    for (input, output, result) in results {
        match result {
            Ok(()) => report.converted.push(output),
            Err(e) => {
                warn!("Failed to convert {}: {}", input.display(), e);
                report.failed.push((input, e));
            }
        }
    }

    info!(
        "Batch finished: {} converted, {} failed, {} skipped",
        report.converted.len(),
        report.failed.len(),
        report.skipped.len()
    );
    Ok(report)
}
