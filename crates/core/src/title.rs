//! The layered title-selection heuristic.
//!
//! Given a document's optional metadata title and the plain-text lines of
//! its first page, choose the string most likely to be the paper's title.
//! Three strategies run in strict order, first success wins:
//!
//! 1. **Metadata**: trust the metadata title when it is substantial.
//! 2. **Scored lines**: among the first lines of page one, prefer the
//!    longest line that is neither a page number nor an ALL-CAPS section
//!    header, biased toward subtitle-bearing (colon) or long lines.
//! 3. **Fallback**: the first line of plausible title length, all other
//!    filters relaxed.
//!
//! Everything here is pure: the imperative shell extracts the lines and
//! handles parse failures before calling in.

use crate::filename::clean_filename;

/// How many leading page-one lines the scored strategy inspects.
const SCAN_LINES: usize = 15;

/// How many leading lines the fallback strategy inspects.
const FALLBACK_SCAN_LINES: usize = 10;

/// Lines longer than this qualify as candidates even without a colon.
const LONG_LINE_LEN: usize = 30;

/// Upper length bound for the fallback strategy (anything longer is
/// running text, not a title).
const FALLBACK_MAX_LEN: usize = 200;

/// Thresholds for title selection and filename cleaning, constructed once
/// at startup and passed by reference into the heuristic and orchestrator.
#[derive(Debug, Clone)]
pub struct TitleConfig {
    /// Minimum character count for a string to be considered a title.
    pub min_title_length: usize,
    /// Maximum character count of a cleaned filename stem.
    pub max_filename_length: usize,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            min_title_length: 15,
            max_filename_length: 120,
        }
    }
}

/// Returns `true` if the line is nothing but ASCII digits (a lone page
/// number).
pub fn is_digits_only(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
}

/// Returns `true` if the line is an all-uppercase-and-whitespace run of
/// length >= 3 -- a section header such as "ABSTRACT" or "I. INTRODUCTION"
/// without the numeral.
pub fn is_caps_header(line: &str) -> bool {
    line.chars().count() >= 3
        && line
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_whitespace())
}

/// Select the most likely title for a document.
///
/// `lines` must be the non-empty, trimmed lines of the first page in top-down
/// order. Returns `None` when every strategy misses or the winning text
/// cleans down to the empty string.
pub fn select_title(
    metadata_title: Option<&str>,
    lines: &[String],
    cfg: &TitleConfig,
) -> Option<String> {
    // Strategy 1: document metadata, when substantial.
    if let Some(raw) = metadata_title {
        let trimmed = raw.trim();
        if trimmed.chars().count() > cfg.min_title_length {
            return non_empty(clean_filename(trimmed, cfg.max_filename_length));
        }
    }

    // Strategy 2: scored first-page lines.
    if let Some(best) = best_candidate(lines, cfg) {
        return non_empty(clean_filename(best, cfg.max_filename_length));
    }

    // Strategy 3: first substantial line, filters relaxed to length bounds.
    for line in lines.iter().take(FALLBACK_SCAN_LINES) {
        let len = line.chars().count();
        if (cfg.min_title_length..=FALLBACK_MAX_LEN).contains(&len) {
            return non_empty(clean_filename(line, cfg.max_filename_length));
        }
    }

    None
}

/// Apply the candidate filters to the first [`SCAN_LINES`] lines and rank
/// survivors by descending length, then ascending position.
fn best_candidate<'a>(lines: &'a [String], cfg: &TitleConfig) -> Option<&'a str> {
    let mut candidates: Vec<(usize, usize, &str)> = lines
        .iter()
        .take(SCAN_LINES)
        .enumerate()
        .filter_map(|(pos, line)| {
            let len = line.chars().count();
            let qualifies = len > cfg.min_title_length
                && !is_digits_only(line)
                && !is_caps_header(line)
                && (line.contains(':') || len > LONG_LINE_LEN);
            qualifies.then_some((len, pos, line.as_str()))
        })
        .collect();

    candidates.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    candidates.first().map(|&(_, _, text)| text)
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
