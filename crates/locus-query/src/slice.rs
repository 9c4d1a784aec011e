//! Splits queries into normalized tokens.

use std::{ops::Range, slice::Iter};

use crate::{delimiters::Delimiters, normalize::normalize};

/// A normalized query token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Normalized text of the token.
    text: String,
    /// Byte range of the raw token in the source query.
    range: Range<usize>,
}

impl Token {
    /// Creates a token from already-normalized text.
    pub fn new(text: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            text: text.into(),
            range,
        }
    }

    /// The normalized text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte range of the raw token in the source query.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Number of code points in the normalized text.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns true if the token has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// The ordered tokens of one query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSlice {
    /// Tokens in query order.
    tokens: Vec<Token>,
    /// Whether the query ended inside the last token.
    last_is_prefix: bool,
}

impl TokenSlice {
    /// Returns the token at `index`.
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the query produced no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates over tokens in query order.
    pub fn iter(&self) -> Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Returns true if the query did not end with a delimiter.
    ///
    /// An interactive search treats such a last token as possibly incomplete.
    pub fn last_is_prefix(&self) -> bool {
        self.last_is_prefix
    }

    /// Normalized token texts in order.
    pub fn texts(&self) -> Vec<&str> {
        self.tokens.iter().map(Token::text).collect()
    }
}

impl<'a> IntoIterator for &'a TokenSlice {
    type Item = &'a Token;
    type IntoIter = Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Splits `query` into normalized tokens.
///
/// Consecutive delimiters collapse, so no token is ever empty. A raw token whose
/// normalized form contains delimiters (`…` decomposes to `...`) is split again; the
/// pieces share the raw token's byte range.
pub fn slice(query: &str, delimiters: &Delimiters) -> TokenSlice {
    let mut tokens = Vec::new();
    let mut start = None;

    for (position, ch) in query.char_indices() {
        if delimiters.is_delimiter(ch) {
            if let Some(begin) = start.take() {
                push_normalized(
                    &mut tokens,
                    &query[begin..position],
                    begin..position,
                    delimiters,
                );
            }
        } else if start.is_none() {
            start = Some(position);
        }
    }

    let last_is_prefix = match start {
        Some(begin) => push_normalized(&mut tokens, &query[begin..], begin..query.len(), delimiters),
        None => false,
    };

    TokenSlice {
        tokens,
        last_is_prefix,
    }
}

/// Normalizes one raw token and appends the resulting pieces.
///
/// Returns true if at least one piece was appended.
fn push_normalized(
    tokens: &mut Vec<Token>,
    raw: &str,
    range: Range<usize>,
    delimiters: &Delimiters,
) -> bool {
    let before = tokens.len();
    let normalized = normalize(raw);
    tokens.extend(
        normalized
            .split(|c| delimiters.is_delimiter(c))
            .filter(|piece| !piece.is_empty())
            .map(|piece| Token::new(piece, range.clone())),
    );
    tokens.len() > before
}
