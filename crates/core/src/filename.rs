//! Filename cleaning and classification.
//!
//! Pure string predicates and transformations used when turning an extracted
//! title into a safe filename and when deciding whether a file already
//! carries a human-chosen name. Each classification rule is a small
//! independently testable function; the shell composes them.

/// Characters that are invalid in filenames on at least one mainstream
/// filesystem. Stripped (not replaced) during cleaning.
const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Stems longer than this are presumed human-chosen, unless they look like
/// random identifiers.
const DESCRIPTIVE_STEM_LEN: usize = 50;

/// Clean a title string for safe use as a filename.
///
/// Removes characters from the forbidden set, collapses internal whitespace
/// runs to single spaces, trims the ends, and truncates to `max_len`
/// characters. A truncated result never ends in whitespace.
pub fn clean_filename(text: &str, max_len: usize) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !FORBIDDEN_CHARS.contains(c))
        .collect();

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed
        .chars()
        .take(max_len)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Returns `true` if the stem looks like a machine-generated identifier:
/// nothing but lowercase hex digits, hyphens, and underscores
/// (e.g. a UUID or a content hash).
pub fn is_hex_like_stem(stem: &str) -> bool {
    !stem.is_empty()
        && stem
            .to_lowercase()
            .chars()
            .all(|c| c.is_ascii_hexdigit() || c == '-' || c == '_')
}

/// Returns `true` if the stem is a generic download name: `document`,
/// `paper`, or `file`, optionally followed by digits (case-insensitive,
/// whole-stem match).
pub fn is_generic_stem(stem: &str) -> bool {
    let lower = stem.to_lowercase();
    for prefix in ["document", "paper", "file"] {
        if let Some(rest) = lower.strip_prefix(prefix) {
            if rest.chars().all(|c| c.is_ascii_digit()) {
                return true;
            }
        }
    }
    false
}

/// Returns `true` if the filename stem is presumed to already be a
/// descriptive, human-chosen name and should be skipped without opening
/// the document: longer than 50 characters, not hex-like, and not a
/// generic download name.
pub fn is_already_descriptive(stem: &str) -> bool {
    stem.chars().count() > DESCRIPTIVE_STEM_LEN && !is_hex_like_stem(stem) && !is_generic_stem(stem)
}
