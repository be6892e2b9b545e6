//! The rename orchestrator: list a folder's PDFs, extract a title for each,
//! resolve naming collisions, rename, and report.
//!
//! Files are processed strictly one after another; a parse or rename failure
//! is scoped to its file and never aborts the batch. Only configuration
//! errors (missing folder, untouched placeholder) stop the run before any
//! file is touched.

use std::path::{Path, PathBuf};

use colored::Colorize;

use retitle_core::filename::is_already_descriptive;
use retitle_core::report::{tally, FileOutcome, RunSummary};
use retitle_core::title::{select_title, TitleConfig};

use crate::prelude::{println, *};

/// Sentinel the folder argument ships with. Running without overriding it
/// is a configuration error, mirroring a config file that was never edited.
pub const FOLDER_PLACEHOLDER: &str = "path/to/your/pdf/folder";

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Folder containing the PDF files to rename
    #[arg(value_name = "FOLDER", env = "RETITLE_FOLDER", default_value = FOLDER_PLACEHOLDER)]
    pub folder: String,

    /// Minimum character count for an extracted title
    #[arg(long, default_value_t = 15)]
    pub min_title_length: usize,

    /// Maximum character count of a renamed file's stem
    #[arg(long, default_value_t = 120)]
    pub max_filename_length: usize,

    /// Output the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(options: Options, global: crate::Global) -> Result<()> {
    let cfg = TitleConfig {
        min_title_length: options.min_title_length,
        max_filename_length: options.max_filename_length,
    };
    let narrate = !options.json;

    if global.verbose && narrate {
        println!("Folder: {}", options.folder);
        println!(
            "Thresholds: title > {} chars, filename <= {} chars",
            cfg.min_title_length, cfg.max_filename_length
        );
        println!();
    }

    let files = match collect_pdfs(&options.folder) {
        Ok(files) => files,
        Err(Error::EmptyInput(message)) => {
            // Nothing to do is not an error: report zero counters and stop.
            if narrate {
                println!("{}", message);
            }
            output_summary(&RunSummary::default(), &options)?;
            return Ok(());
        }
        Err(err) => return Err(eyre!(err)),
    };

    if narrate {
        println!("Found {} PDF files", files.len());
        println!("{}", "-".repeat(50));
    }

    let mut outcomes = Vec::with_capacity(files.len());
    for file in &files {
        if narrate {
            println!(
                "\nProcessing: {}",
                file.file_name().unwrap_or_default().to_string_lossy()
            );
        }
        let outcome = process_file(file, &cfg);
        if narrate {
            narrate_outcome(&outcome);
        }
        outcomes.push(outcome);
    }

    output_summary(&tally(&outcomes), &options)
}

/// List the folder's PDF files in lexicographic name order.
///
/// The placeholder sentinel and a missing folder are configuration errors;
/// an existing folder without PDFs is an [`Error::EmptyInput`].
fn collect_pdfs(folder: &str) -> Result<Vec<PathBuf>, Error> {
    if folder == FOLDER_PLACEHOLDER {
        return Err(Error::Configuration(format!(
            "the folder path is still the placeholder '{}'; pass a real folder or set RETITLE_FOLDER",
            FOLDER_PLACEHOLDER
        )));
    }

    let dir = Path::new(folder);
    if !dir.is_dir() {
        return Err(Error::Configuration(format!(
            "folder '{}' doesn't exist",
            folder
        )));
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| Error::Configuration(format!("cannot list '{}': {}", folder, e)))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        return Err(Error::EmptyInput(format!(
            "No PDF files found in '{}'",
            folder
        )));
    }

    // read_dir order is platform-dependent; sort for deterministic runs.
    files.sort_by_key(|path| path.file_name().map(|n| n.to_os_string()));

    Ok(files)
}

/// Decide and apply the outcome for one file. Never fails the batch: every
/// error path is converted into a [`FileOutcome`].
fn process_file(path: &Path, cfg: &TitleConfig) -> FileOutcome {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    // Rule 1: presumed human-chosen names are skipped without opening the
    // document at all.
    if is_already_descriptive(&stem) {
        return FileOutcome::SkippedDescriptive;
    }

    // Rule 2: extraction. Parse failures were already logged; the file is
    // left untouched either way.
    let Some(title) = extract_title(path, cfg) else {
        return FileOutcome::ExtractionFailed;
    };

    // Rule 3: renaming to the same name is pointless.
    if title.to_lowercase() == stem.to_lowercase() {
        return FileOutcome::SkippedUnchanged;
    }

    // Rules 4 and 5: collision resolution, then the rename itself.
    let target = resolve_target(path, &title);
    match std::fs::rename(path, &target) {
        Ok(()) => FileOutcome::Renamed(
            target
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned(),
        ),
        Err(e) => {
            log::warn!("renaming {} failed: {}", path.display(), e);
            FileOutcome::RenameFailed(e.to_string())
        }
    }
}

/// Open the document and run the title heuristic over its metadata and
/// first-page lines.
///
/// Any internal failure (unreadable file, malformed PDF, missing page 0) is
/// logged with its cause and converted to `None`; this never raises to the
/// orchestrator loop. The document handle is dropped before returning.
fn extract_title(path: &Path, cfg: &TitleConfig) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("cannot read {}: {}", path.display(), e);
            return None;
        }
    };

    let doc = match pdf::ParsedDocument::from_bytes(&bytes) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("cannot parse {}: {}", path.display(), e);
            return None;
        }
    };

    let metadata = doc.metadata();

    // A page-text failure still leaves the metadata strategy in play.
    let lines = match doc.page_lines(0) {
        Ok(lines) => lines,
        Err(e) => {
            log::warn!("cannot extract first page of {}: {}", path.display(), e);
            Vec::new()
        }
    };

    select_title(metadata.title.as_deref(), &lines, cfg)
}

/// Pick a free target path `{title}.pdf` next to the source, appending
/// `_1`, `_2`, ... while the name is taken by some other file.
fn resolve_target(source: &Path, title: &str) -> PathBuf {
    let dir = source.parent().unwrap_or_else(|| Path::new("."));
    let mut target = dir.join(format!("{title}.pdf"));

    let mut counter = 1;
    while target.exists() && target != source {
        target = dir.join(format!("{title}_{counter}.pdf"));
        counter += 1;
    }

    target
}

fn narrate_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Renamed(new_name) => {
            println!("  {} Renamed to: {}", "\u{2713}".green(), new_name)
        }
        FileOutcome::SkippedDescriptive => {
            println!("  \u{2192} Skipping (already has descriptive name)")
        }
        FileOutcome::SkippedUnchanged => {
            println!("  \u{2192} Title same as current filename, skipping")
        }
        FileOutcome::ExtractionFailed => {
            println!("  {} Could not extract title", "\u{2717}".red())
        }
        FileOutcome::RenameFailed(cause) => {
            println!("  {} Error renaming: {}", "\u{2717}".red(), cause)
        }
    }
}

fn output_summary(summary: &RunSummary, options: &Options) -> Result<()> {
    if options.json {
        println!("{}", serde_json::to_string_pretty(summary)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(50).bright_cyan());
    println!("{}", "SUMMARY:".bold());
    println!("  Renamed: {} files", summary.renamed);
    println!("  Skipped: {} files", summary.skipped);
    println!("  Failed:  {} files", summary.failed);
    println!("  Total processed: {} files", summary.total);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
