//! Token text normalization.

use unicode_normalization::UnicodeNormalization;

/// Normalizes raw token text for matching.
///
/// Applies compatibility decomposition, lowercases, and drops combining diacritics. Marks that
/// combine with symbols (the keycap in `1️⃣`) and variation selectors are kept, so emoji
/// synonyms in the category dictionary still match.
pub fn normalize(text: &str) -> String {
    let lowered: String = text.nfkd().flat_map(char::to_lowercase).collect();
    lowered.nfkd().filter(|c| !is_diacritic(*c)).collect()
}

/// Returns true for combining marks that decorate letters.
fn is_diacritic(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036f}'
            | '\u{1ab0}'..='\u{1aff}'
            | '\u{1dc0}'..='\u{1dff}'
            | '\u{fe20}'..='\u{fe2f}'
    )
}
