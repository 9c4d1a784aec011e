//! Delimiter sets used to split queries into tokens.

/// Punctuation that separates tokens in every locale, in addition to whitespace.
pub const DEFAULT_DELIMITERS: &[char] = &[
    '.', ',', ':', ';', '+', '*', '(', ')', '[', ']', '{', '}', '<', '>', '"', '\'', '`', '~',
    '!', '@', '#', '$', '%', '^', '&', '=', '?', '/', '\\', '|', '-', '_', '\u{2013}', '\u{2014}',
    '\u{00a1}', '\u{00bf}', '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}', '\u{201e}', '\u{2026}',
];

/// Characters that glue multi-codepoint symbols together and must never split a token.
const JOINERS: &[char] = &['\u{200c}', '\u{200d}'];

/// A set of characters that separate tokens.
///
/// Whitespace and [`DEFAULT_DELIMITERS`] are always delimiters. Locales whose scripts use other
/// separators (ideographic comma, middle dot, ...) add them with [`Delimiters::with_extra`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delimiters {
    /// Additional delimiters beyond whitespace and the default set, sorted and deduplicated.
    extra: Vec<char>,
}

impl Delimiters {
    /// Returns a copy of this set extended with the characters of `extra`.
    ///
    /// Joiners and variation selectors are ignored: splitting on them would break emoji
    /// sequences apart.
    pub fn with_extra(mut self, extra: &str) -> Self {
        self.extra.extend(
            extra
                .chars()
                .filter(|c| !JOINERS.contains(c) && !is_variation_selector(*c)),
        );
        self.extra.sort_unstable();
        self.extra.dedup();
        self
    }

    /// Returns true if `c` separates tokens.
    pub fn is_delimiter(&self, c: char) -> bool {
        c.is_whitespace() || DEFAULT_DELIMITERS.contains(&c) || self.extra.binary_search(&c).is_ok()
    }

    /// The extra delimiters configured on top of the defaults.
    pub fn extra(&self) -> &[char] {
        &self.extra
    }
}

/// Returns true for the variation selector blocks used by emoji presentation sequences.
fn is_variation_selector(c: char) -> bool {
    matches!(c, '\u{fe00}'..='\u{fe0f}' | '\u{e0100}'..='\u{e01ef}')
}
