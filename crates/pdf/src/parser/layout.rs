//! Text extraction and line assembly.
//!
//! This module walks a page's content stream with a simplified PDF
//! text-rendering state machine, collects positioned [`TextSpan`]s, and
//! groups them into reading-order lines of plain text.  Side effects (I/O)
//! live behind the [`PdfBackend`] trait provided by the caller, so the whole
//! pipeline is testable against mock backends.
//!
//! # Pipeline
//!
//! ```text
//! content ops  ->  TextSpan[]       ->  String[] (one per visual line)
//!   (per page)     extract_page_spans    group_spans_into_lines
//! ```

use super::backend::{get_number_from_value, PageId, PdfBackend, PdfValue};
use crate::text::normalize_extracted;
use crate::PdfError;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A single run of text at a specific position on the page.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Two spans whose Y coordinates differ by less than this are treated as
/// belonging to the same line.
const Y_TOLERANCE: f32 = 1.0;

/// Approximate character width as a fraction of font size when no better
/// metric is available.  0.5 is a reasonable default for proportional fonts.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// The identity 2x3 text matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

// ---------------------------------------------------------------------------
// CJK / spaceless-script helper
// ---------------------------------------------------------------------------

/// Returns `true` if `c` belongs to a script that does not use inter-word
/// spaces (CJK Unified Ideographs, Hiragana, Katakana, Hangul, Thai, etc.).
pub fn is_spaceless_script_char(c: char) -> bool {
    let cp = c as u32;
    matches!(
        cp,
        // CJK Unified Ideographs
        0x4E00..=0x9FFF
        // CJK Unified Ideographs Extension A
        | 0x3400..=0x4DBF
        // CJK Compatibility Ideographs
        | 0xF900..=0xFAFF
        // Hiragana
        | 0x3040..=0x309F
        // Katakana
        | 0x30A0..=0x30FF
        // Hangul Syllables
        | 0xAC00..=0xD7AF
        // CJK Symbols and Punctuation
        | 0x3000..=0x303F
        // Fullwidth Forms
        | 0xFF00..=0xFFEF
        // Thai
        | 0x0E00..=0x0E7F
    )
}

// ---------------------------------------------------------------------------
// Internal: PDF text-state machine
// ---------------------------------------------------------------------------

/// Mutable state tracked while walking a page's content stream.
#[derive(Debug, Clone)]
struct TextState {
    /// Current font resource name (the `/F1`-style key, not the full name).
    font_key: Vec<u8>,
    /// Current font size in text-space units.
    font_size: f32,
    /// Elements [a, b, c, d, tx, ty] of the current text matrix.
    text_matrix: [f32; 6],
    /// Text line matrix -- set by BT and updated by Td/TD/T*/Tm.
    line_matrix: [f32; 6],
    /// Horizontal scaling factor (percent / 100).  Default 1.0.
    horiz_scale: f32,
    /// Character spacing (Tc).
    char_spacing: f32,
    /// Word spacing (Tw).
    word_spacing: f32,
    /// Text rise (Ts).
    text_rise: f32,
    /// Leading (TL).
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Current X position derived from the text matrix.
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    /// Current Y position derived from the text matrix.
    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    /// Advance the text matrix horizontally by `dx` text-space units.
    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Multiply the text line matrix by a translation (used by Td / TD).
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }
}

/// Advance the text matrix after rendering `text`.
///
/// Without access to the actual glyph widths we approximate: each character
/// contributes `font_size * APPROX_CHAR_WIDTH_RATIO * horiz_scale`.
fn advance_after_show(text: &str, state: &mut TextState) {
    let mut total_dx: f32 = 0.0;
    for ch in text.chars() {
        let char_w = state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale;
        total_dx += char_w + state.char_spacing;
        if ch == ' ' {
            total_dx += state.word_spacing;
        }
    }
    state.advance_x(total_dx);
}

/// Decode a single [`PdfValue::Str`] operand into a `String`, using the
/// backend's font-aware decoder.
fn decode_string(
    val: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    font_key: &[u8],
) -> String {
    match val {
        PdfValue::Str(bytes) => {
            let decoded = backend.decode_text(page_id, font_key, bytes);
            if decoded.is_empty() {
                super::backend::decode_text_simple(bytes)
            } else {
                decoded
            }
        }
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Public API: span extraction
// ---------------------------------------------------------------------------

/// Walk a single page's content stream and produce a flat list of
/// [`TextSpan`]s.
///
/// Implements a simplified PDF text-rendering state machine handling the
/// operators `BT`, `ET`, `Tf`, `Tm`, `Td`, `TD`, `T*`, `TL`, `Tc`, `Tw`,
/// `Tz`, `Ts`, `Tj`, `TJ`, `'`, and `"`.
pub fn extract_page_spans(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<TextSpan>, PdfError> {
    // Get raw content bytes and decode into operations.
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;

    let mut state = TextState::default();
    let mut spans: Vec<TextSpan> = Vec::new();

    for op in &ops {
        match op.operator.as_str() {
            // -- Text object delimiters --------------------------------
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "ET" => {
                // Nothing to reset -- we keep font state across text objects
                // because some PDFs reuse the font set earlier.
            }

            // -- Font ---------------------------------------------------
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let PdfValue::Name(key) | PdfValue::Str(key) = &op.operands[0] {
                        state.font_key = key.clone();
                    }
                    state.font_size = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                }
            }

            // -- Text matrix / position ---------------------------------
            "Tm" => {
                handle_tm(&op.operands, &mut state);
            }
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                // TD is equivalent to: -ty TL ; tx ty Td
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => {
                // Move to start of next line: equivalent to 0 -TL Td
                state.translate_line(0.0, -state.leading);
            }
            "TL" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.leading = v;
                }
            }

            // -- Spacing / scaling --------------------------------------
            "Tc" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.text_rise = v;
                }
            }

            // -- Show text ----------------------------------------------
            "Tj" => {
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut spans);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    handle_tj_array(arr, backend, page_id, &mut state, &mut spans);
                }
            }

            // -- Convenience show operators -----------------------------
            "'" => {
                // Move to next line, then show string.
                state.translate_line(0.0, -state.leading);
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut spans);
                }
            }
            "\"" => {
                // " aw ac string  =>  set Tw, Tc, T*, Tj
                if op.operands.len() >= 3 {
                    if let Some(aw) = get_number_from_value(&op.operands[0]) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = get_number_from_value(&op.operands[1]) {
                        state.char_spacing = ac;
                    }
                    state.translate_line(0.0, -state.leading);
                    emit_show_string(&op.operands[2], backend, page_id, &mut state, &mut spans);
                }
            }

            _ => { /* Ignore non-text operators */ }
        }
    }

    Ok(spans)
}

/// Handle the `Tm` (set text matrix) operator.
fn handle_tm(operands: &[PdfValue], state: &mut TextState) {
    if operands.len() < 6 {
        return;
    }
    let vals: Vec<f32> = operands
        .iter()
        .take(6)
        .filter_map(get_number_from_value)
        .collect();
    if vals.len() == 6 {
        state.text_matrix = [vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]];
        state.line_matrix = state.text_matrix;
    }
}

/// Decode an operand as a string, create a [`TextSpan`], and advance the
/// text position.  Shared by `Tj`, `'`, and `"` operators.
fn emit_show_string(
    operand: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    let text = decode_string(operand, backend, page_id, &state.font_key);
    if text.is_empty() {
        return;
    }
    let x = state.x();
    let y = state.y() + state.text_rise;
    spans.push(TextSpan {
        text: text.clone(),
        x,
        y,
    });
    advance_after_show(&text, state);
}

/// Process a `TJ` array: elements are either strings to render or numeric
/// kerning adjustments (in thousandths of a unit of text space).
fn handle_tj_array(
    arr: &[PdfValue],
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    spans: &mut Vec<TextSpan>,
) {
    // Accumulate text fragments into a single span, inserting spaces where a
    // kerning adjustment is large enough to look like a word gap.
    let mut buf = String::new();
    let mut span_x = state.x();
    let span_y = state.y() + state.text_rise;

    for elem in arr {
        match elem {
            PdfValue::Str(_) => {
                let fragment = decode_string(elem, backend, page_id, &state.font_key);
                if buf.is_empty() {
                    span_x = state.x();
                }
                buf.push_str(&fragment);
                advance_after_show(&fragment, state);
            }
            val => {
                // Numeric kerning: negative value = move right, positive =
                // move left (in thousandths of a text-space unit).
                if let Some(adj) = get_number_from_value(val) {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;

                    let gap_threshold =
                        state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;

                    if dx > gap_threshold && !buf.is_empty() {
                        buf.push(' ');
                    }

                    state.advance_x(dx);
                }
            }
        }
    }

    let trimmed = buf.trim_end();
    if !trimmed.is_empty() {
        spans.push(TextSpan {
            text: trimmed.to_string(),
            x: span_x,
            y: span_y,
        });
    }
}

// ---------------------------------------------------------------------------
// Public API: line assembly
// ---------------------------------------------------------------------------

/// Group positioned spans into plain-text lines in reading order (top of the
/// page first).
///
/// Spans whose Y coordinates fall within [`Y_TOLERANCE`] of each other are
/// joined on one line, ordered left to right.  Adjacent spans are separated
/// by a single space unless both boundary characters belong to a spaceless
/// script.  Lines are trimmed and Unicode-normalized; empty lines are
/// dropped.
pub fn group_spans_into_lines(mut spans: Vec<TextSpan>) -> Vec<String> {
    spans.retain(|s| !s.text.trim().is_empty());
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Cluster by Y, walking top-down.
    let mut groups: Vec<Vec<TextSpan>> = Vec::new();
    for span in spans {
        let same_line = groups
            .last()
            .and_then(|group| group.last())
            .is_some_and(|prev| (prev.y - span.y).abs() <= Y_TOLERANCE);
        if same_line {
            if let Some(group) = groups.last_mut() {
                group.push(span);
            }
        } else {
            groups.push(vec![span]);
        }
    }

    groups
        .into_iter()
        .filter_map(|mut group| {
            group.sort_by(|a, b| {
                a.x.partial_cmp(&b.x)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let line = normalize_extracted(&join_spans(&group));
            let line = line.trim();
            if line.is_empty() {
                None
            } else {
                Some(line.to_string())
            }
        })
        .collect()
}

/// Extract a page's text as trimmed, non-empty lines in reading order.
pub fn extract_page_lines(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<String>, PdfError> {
    let spans = extract_page_spans(backend, page_id)?;
    Ok(group_spans_into_lines(spans))
}

/// Join a left-to-right run of spans into one string.
fn join_spans(group: &[TextSpan]) -> String {
    let mut line = String::new();
    for span in group {
        if !line.is_empty() {
            let prev = line.chars().last();
            let next = span.text.chars().next();
            let spaceless = matches!(
                (prev, next),
                (Some(p), Some(n)) if is_spaceless_script_char(p) && is_spaceless_script_char(n)
            );
            if !spaceless && !line.ends_with(' ') {
                line.push(' ');
            }
        }
        line.push_str(&span.text);
    }
    line
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::super::backend::{decode_text_simple, ContentOp};
    use super::*;

    /// Mock backend that replays canned content ops; `page_content` returns
    /// an empty buffer that `decode_content` ignores.
    struct MockBackend {
        ops: Vec<ContentOp>,
    }

    impl PdfBackend for MockBackend {
        fn pages(&self) -> BTreeMap<u32, PageId> {
            let mut map = BTreeMap::new();
            map.insert(1, (1, 0));
            map
        }

        fn page_content(&self, _page: PageId) -> Result<Vec<u8>, PdfError> {
            Ok(Vec::new())
        }

        fn decode_content(&self, _data: &[u8]) -> Result<Vec<ContentOp>, PdfError> {
            Ok(self.ops.clone())
        }

        fn decode_text(&self, _page: PageId, _font: &[u8], bytes: &[u8]) -> String {
            decode_text_simple(bytes)
        }
    }

    fn op(operator: &str, operands: Vec<PdfValue>) -> ContentOp {
        ContentOp {
            operator: operator.to_string(),
            operands,
        }
    }

    fn tj(text: &str) -> ContentOp {
        op("Tj", vec![PdfValue::Str(text.as_bytes().to_vec())])
    }

    fn td(x: i64, y: i64) -> ContentOp {
        op("Td", vec![PdfValue::Integer(x), PdfValue::Integer(y)])
    }

    const PAGE: PageId = (1, 0);

    #[test]
    fn lines_come_out_top_down() {
        // Three Td-positioned lines emitted bottom-up; output must be
        // top-down (descending Y).
        let backend = MockBackend {
            ops: vec![
                op("BT", vec![]),
                td(72, 500),
                tj("bottom line"),
                op("BT", vec![]),
                td(72, 700),
                tj("top line"),
                op("BT", vec![]),
                td(72, 600),
                tj("middle line"),
            ],
        };
        let lines = extract_page_lines(&backend, PAGE).unwrap();
        assert_eq!(lines, vec!["top line", "middle line", "bottom line"]);
    }

    #[test]
    fn spans_on_the_same_line_join_left_to_right() {
        let backend = MockBackend {
            ops: vec![
                op("BT", vec![]),
                op(
                    "Tm",
                    vec![
                        PdfValue::Integer(1),
                        PdfValue::Integer(0),
                        PdfValue::Integer(0),
                        PdfValue::Integer(1),
                        PdfValue::Integer(300),
                        PdfValue::Integer(700),
                    ],
                ),
                tj("World"),
                op(
                    "Tm",
                    vec![
                        PdfValue::Integer(1),
                        PdfValue::Integer(0),
                        PdfValue::Integer(0),
                        PdfValue::Integer(1),
                        PdfValue::Integer(72),
                        PdfValue::Integer(700),
                    ],
                ),
                tj("Hello"),
            ],
        };
        let lines = extract_page_lines(&backend, PAGE).unwrap();
        assert_eq!(lines, vec!["Hello World"]);
    }

    #[test]
    fn td_moves_relative_to_the_line_matrix() {
        // 0 -14 Td from (72, 700) lands the second line at y=686.
        let backend = MockBackend {
            ops: vec![
                op("BT", vec![]),
                td(72, 700),
                tj("first"),
                td(0, -14),
                tj("second"),
            ],
        };
        let lines = extract_page_lines(&backend, PAGE).unwrap();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn t_star_advances_by_leading() {
        let backend = MockBackend {
            ops: vec![
                op("BT", vec![]),
                op("TL", vec![PdfValue::Integer(14)]),
                td(72, 700),
                tj("first"),
                op("T*", vec![]),
                tj("second"),
            ],
        };
        let lines = extract_page_lines(&backend, PAGE).unwrap();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn tj_array_inserts_word_gaps() {
        // -400/1000 * 12pt = 4.8pt gap, above the word-gap threshold for a
        // 12pt font.
        let backend = MockBackend {
            ops: vec![
                op("BT", vec![]),
                op(
                    "Tf",
                    vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(12)],
                ),
                td(72, 700),
                op(
                    "TJ",
                    vec![PdfValue::Array(vec![
                        PdfValue::Str(b"A".to_vec()),
                        PdfValue::Integer(-400),
                        PdfValue::Str(b"Study".to_vec()),
                    ])],
                ),
            ],
        };
        let lines = extract_page_lines(&backend, PAGE).unwrap();
        assert_eq!(lines, vec!["A Study"]);
    }

    #[test]
    fn tj_array_small_kerning_keeps_word_together() {
        let backend = MockBackend {
            ops: vec![
                op("BT", vec![]),
                op(
                    "Tf",
                    vec![PdfValue::Name(b"F1".to_vec()), PdfValue::Integer(12)],
                ),
                td(72, 700),
                op(
                    "TJ",
                    vec![PdfValue::Array(vec![
                        PdfValue::Str(b"Ti".to_vec()),
                        PdfValue::Integer(-20),
                        PdfValue::Str(b"tle".to_vec()),
                    ])],
                ),
            ],
        };
        let lines = extract_page_lines(&backend, PAGE).unwrap();
        assert_eq!(lines, vec!["Title"]);
    }

    #[test]
    fn apostrophe_operator_starts_a_new_line() {
        let backend = MockBackend {
            ops: vec![
                op("BT", vec![]),
                op("TL", vec![PdfValue::Integer(14)]),
                td(72, 700),
                tj("first"),
                op("'", vec![PdfValue::Str(b"second".to_vec())]),
            ],
        };
        let lines = extract_page_lines(&backend, PAGE).unwrap();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn empty_content_produces_no_lines() {
        let backend = MockBackend { ops: vec![] };
        assert!(extract_page_lines(&backend, PAGE).unwrap().is_empty());
    }

    #[test]
    fn whitespace_only_spans_are_dropped() {
        let backend = MockBackend {
            ops: vec![op("BT", vec![]), td(72, 700), tj("   ")],
        };
        assert!(extract_page_lines(&backend, PAGE).unwrap().is_empty());
    }

    #[test]
    fn cjk_spans_join_without_spaces() {
        let backend = MockBackend {
            ops: vec![
                op("BT", vec![]),
                op(
                    "Tm",
                    vec![
                        PdfValue::Integer(1),
                        PdfValue::Integer(0),
                        PdfValue::Integer(0),
                        PdfValue::Integer(1),
                        PdfValue::Integer(72),
                        PdfValue::Integer(700),
                    ],
                ),
                tj("\u{6DF1}\u{5C64}"),
                op(
                    "Tm",
                    vec![
                        PdfValue::Integer(1),
                        PdfValue::Integer(0),
                        PdfValue::Integer(0),
                        PdfValue::Integer(1),
                        PdfValue::Integer(100),
                        PdfValue::Integer(700),
                    ],
                ),
                tj("\u{5B66}\u{7FD2}"),
            ],
        };
        let lines = extract_page_lines(&backend, PAGE).unwrap();
        assert_eq!(lines, vec!["\u{6DF1}\u{5C64}\u{5B66}\u{7FD2}"]);
    }

    #[test]
    fn is_spaceless_script_char_ranges() {
        assert!(is_spaceless_script_char('\u{6F22}'));
        assert!(is_spaceless_script_char('\u{3042}'));
        assert!(!is_spaceless_script_char('a'));
        assert!(!is_spaceless_script_char(' '));
    }
}
