//! Post-extraction text repair.

use unicode_normalization::UnicodeNormalization;

/// Typographic ligatures that PDF fonts commonly encode as single glyphs.
const LIGATURES: &[(char, &str)] = &[
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Clean up a run of extracted PDF text.
///
/// Applies Unicode NFC normalization, expands ligature glyphs, and drops
/// replacement characters left behind by undecodable byte sequences.
pub fn normalize_extracted(text: &str) -> String {
    let mut result: String = text.nfc().collect();

    for (lig, replacement) in LIGATURES {
        if result.contains(*lig) {
            result = result.replace(*lig, replacement);
        }
    }

    result.replace('\u{FFFD}', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ascii_is_untouched() {
        assert_eq!(normalize_extracted("Plain Title"), "Plain Title");
    }

    #[test]
    fn ligatures_are_expanded() {
        assert_eq!(
            normalize_extracted("E\u{FB03}cient Classi\u{FB01}cation"),
            "Efficient Classification"
        );
    }

    #[test]
    fn replacement_characters_are_dropped() {
        assert_eq!(normalize_extracted("Ti\u{FFFD}tle"), "Title");
    }

    #[test]
    fn combining_sequences_compose() {
        // 'e' + COMBINING ACUTE ACCENT composes to U+00E9.
        assert_eq!(normalize_extracted("Cafe\u{0301}"), "Caf\u{00E9}");
    }
}
