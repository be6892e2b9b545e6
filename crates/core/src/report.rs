//! Per-file outcomes and run-summary aggregation.

use serde::{Deserialize, Serialize};

/// What happened to a single file during a rename run.
///
/// Exactly one outcome is produced per file; the orchestrator pattern-matches
/// on it for narration and the summary tally. Extraction and rename failures
/// are scoped to their file and never abort the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was renamed to the contained new file name.
    Renamed(String),
    /// The stem was classified as already descriptive; the document was
    /// never opened.
    SkippedDescriptive,
    /// The extracted title matches the current stem (case-insensitive).
    SkippedUnchanged,
    /// Parsing failed or every extraction strategy missed.
    ExtractionFailed,
    /// The filesystem rejected the rename; the rendered cause is contained.
    RenameFailed(String),
}

/// Aggregate counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub renamed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

/// Tally per-file outcomes into a [`RunSummary`].
///
/// Both failure kinds land in `failed`; both skip kinds land in `skipped`.
pub fn tally(outcomes: &[FileOutcome]) -> RunSummary {
    let mut summary = RunSummary {
        total: outcomes.len(),
        ..Default::default()
    };

    for outcome in outcomes {
        match outcome {
            FileOutcome::Renamed(_) => summary.renamed += 1,
            FileOutcome::SkippedDescriptive | FileOutcome::SkippedUnchanged => {
                summary.skipped += 1
            }
            FileOutcome::ExtractionFailed | FileOutcome::RenameFailed(_) => summary.failed += 1,
        }
    }

    summary
}
