//! Levenshtein automata with an exact-prefix region.
//!
//! The first `prefix_chars_to_keep` characters of a token must be reproduced exactly; the rest
//! of the token is matched by a `levenshtein_automata` DFA that tolerates a bounded number of
//! edits. Distances are counted in characters, not bytes.

use std::{array, sync::OnceLock};

use levenshtein_automata::{DFA, Distance, LevenshteinAutomatonBuilder, SINK_STATE};
use locus_config::{ErrorBudget, MAX_SUPPORTED_ERRORS, MatchingSettings};

/// Builds [`Automaton`]s from a length-to-budget policy.
///
/// Parametric builders are expensive to construct, so one is created lazily per edit distance
/// and reused for every token.
pub struct AutomatonBuilder {
    /// Token length to edit distance policy.
    budget: ErrorBudget,
    /// Leading characters that must match exactly.
    prefix_chars_to_keep: usize,
    /// Whether an adjacent transposition counts as one edit.
    transpositions: bool,
    /// Parametric builders indexed by edit distance.
    builders: [OnceLock<LevenshteinAutomatonBuilder>; MAX_SUPPORTED_ERRORS as usize + 1],
}

impl AutomatonBuilder {
    /// Creates a builder with an explicit policy.
    pub fn new(budget: ErrorBudget, prefix_chars_to_keep: usize, transpositions: bool) -> Self {
        Self {
            budget,
            prefix_chars_to_keep,
            transpositions,
            builders: array::from_fn(|_| OnceLock::new()),
        }
    }

    /// Creates a builder from the `[matching]` settings.
    pub fn from_settings(settings: &MatchingSettings) -> Self {
        Self::new(
            settings.error_budget.clone(),
            settings.prefix_chars_to_keep,
            settings.transpositions,
        )
    }

    /// The length to edit distance policy in use.
    pub fn budget(&self) -> &ErrorBudget {
        &self.budget
    }

    /// Builds an automaton for `token` using the configured prefix length and budget.
    pub fn build(&self, token: &str) -> Automaton {
        let max_errors = self.budget.errors_for(token.chars().count());
        self.build_with(token, self.prefix_chars_to_keep, max_errors)
    }

    /// Builds an automaton accepting strings that start with the first `prefix_chars_to_keep`
    /// characters of `token` and are within `max_errors` edits of it after that prefix.
    ///
    /// Budgets above [`MAX_SUPPORTED_ERRORS`] are clamped. An empty token yields an automaton
    /// that rejects everything.
    pub fn build_with(&self, token: &str, prefix_chars_to_keep: usize, max_errors: u8) -> Automaton {
        let chars: Vec<char> = token.chars().collect();
        if chars.is_empty() {
            return Automaton::degenerate();
        }

        let max_errors = max_errors.min(MAX_SUPPORTED_ERRORS);
        let split = prefix_chars_to_keep.min(chars.len());
        let suffix: String = chars[split..].iter().collect();
        let dfa = self.parametric(max_errors).build_dfa(&suffix);

        Automaton {
            prefix: chars[..split].to_vec(),
            dfa: Some(dfa),
            max_errors,
        }
    }

    /// Returns the parametric builder for `distance`, constructing it on first use.
    fn parametric(&self, distance: u8) -> &LevenshteinAutomatonBuilder {
        self.builders[usize::from(distance)]
            .get_or_init(|| LevenshteinAutomatonBuilder::new(distance, self.transpositions))
    }
}

/// A deterministic acceptor for strings near a token.
pub struct Automaton {
    /// Characters that must be reproduced exactly before edits are allowed.
    prefix: Vec<char>,
    /// DFA for the remainder of the token; `None` for a degenerate automaton.
    dfa: Option<DFA>,
    /// Edit budget the DFA was built with.
    max_errors: u8,
}

impl Automaton {
    /// An automaton whose initial cursor already rejects.
    fn degenerate() -> Self {
        Self {
            prefix: Vec::new(),
            dfa: None,
            max_errors: 0,
        }
    }

    /// Returns the initial traversal cursor.
    pub fn begin(&self) -> Cursor {
        match &self.dfa {
            None => Cursor(Position::Dead),
            Some(_) if !self.prefix.is_empty() => Cursor(Position::Prefix(0)),
            Some(dfa) => Cursor::in_dfa(dfa.initial_state()),
        }
    }

    /// Whether `cursor` has consumed a string this automaton accepts.
    pub fn accepts(&self, cursor: Cursor) -> bool {
        match (cursor.0, &self.dfa) {
            (Position::Dfa(state), Some(dfa)) => matches!(dfa.distance(state), Distance::Exact(_)),
            _ => false,
        }
    }

    /// Feeds one character, returning the next cursor.
    pub fn advance(&self, cursor: Cursor, c: char) -> Cursor {
        let Some(dfa) = &self.dfa else {
            return Cursor(Position::Dead);
        };

        match cursor.0 {
            Position::Dead => cursor,
            Position::Prefix(i) => {
                if self.prefix.get(i) != Some(&c) {
                    Cursor(Position::Dead)
                } else if i + 1 == self.prefix.len() {
                    Cursor::in_dfa(dfa.initial_state())
                } else {
                    Cursor(Position::Prefix(i + 1))
                }
            }
            Position::Dfa(mut state) => {
                let mut buf = [0u8; 4];
                for &byte in c.encode_utf8(&mut buf).as_bytes() {
                    state = dfa.transition(state, byte);
                    if state == SINK_STATE {
                        return Cursor(Position::Dead);
                    }
                }
                Cursor(Position::Dfa(state))
            }
        }
    }

    /// Edit budget of this automaton.
    pub fn max_errors(&self) -> u8 {
        self.max_errors
    }

    /// Whether this automaton can never accept anything.
    pub fn is_degenerate(&self) -> bool {
        self.dfa.is_none()
    }
}

/// A position inside an [`Automaton`].
///
/// Cursors are plain values; advancing never mutates the automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(Position);

impl Cursor {
    /// A cursor at `state` in the suffix DFA.
    fn in_dfa(state: u32) -> Self {
        if state == SINK_STATE {
            Self(Position::Dead)
        } else {
            Self(Position::Dfa(state))
        }
    }

    /// Whether no continuation from here can be accepted.
    pub fn rejects(self) -> bool {
        self.0 == Position::Dead
    }
}

/// Where a cursor is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// Inside the exact prefix, having matched this many characters.
    Prefix(usize),
    /// Past the prefix, at a DFA state.
    Dfa(u32),
    /// No accepting continuation exists.
    Dead,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> AutomatonBuilder {
        AutomatonBuilder::new(ErrorBudget::default(), 1, false)
    }

    fn run(automaton: &Automaton, word: &str) -> Cursor {
        word.chars()
            .fold(automaton.begin(), |cursor, c| automaton.advance(cursor, c))
    }

    fn accepts(automaton: &Automaton, word: &str) -> bool {
        automaton.accepts(run(automaton, word))
    }

    #[test]
    fn exact_token_is_accepted() {
        let automaton = builder().build_with("cafe", 1, 0);
        assert!(accepts(&automaton, "cafe"));
        assert!(!accepts(&automaton, "caff"));
        assert!(!accepts(&automaton, "caf"));
    }

    #[test]
    fn one_edit_after_prefix() {
        let automaton = builder().build_with("cafee", 1, 1);
        assert!(accepts(&automaton, "cafe"));
        assert!(accepts(&automaton, "cafeee"));
        assert!(accepts(&automaton, "cbfee"));
        assert!(!accepts(&automaton, "cfe"));
    }

    #[test]
    fn edits_in_prefix_are_rejected() {
        let automaton = builder().build_with("cafe", 1, 2);
        assert!(!accepts(&automaton, "bafe"));
        assert!(run(&automaton, "b").rejects());
        assert!(!accepts(&automaton, "afe"));
    }

    #[test]
    fn zero_prefix_allows_leading_edit() {
        let automaton = builder().build_with("cafe", 0, 1);
        assert!(accepts(&automaton, "bafe"));
        assert!(accepts(&automaton, "afe"));
    }

    #[test]
    fn prefix_longer_than_token_is_exact_then_budget() {
        let automaton = builder().build_with("ab", 5, 1);
        assert!(accepts(&automaton, "ab"));
        assert!(accepts(&automaton, "abc"));
        assert!(!accepts(&automaton, "a"));
        assert!(!accepts(&automaton, "ba"));
    }

    #[test]
    fn empty_token_is_degenerate() {
        let automaton = builder().build("");
        assert!(automaton.is_degenerate());
        assert!(automaton.begin().rejects());
        assert!(!automaton.accepts(automaton.begin()));
    }

    #[test]
    fn distance_counts_characters_not_bytes() {
        let automaton = builder().build_with("кафе", 1, 1);
        assert!(accepts(&automaton, "кафэ"));
        assert!(accepts(&automaton, "каф"));
        assert!(!accepts(&automaton, "кофэ"));
    }

    #[test]
    fn budget_follows_token_length() {
        let builder = builder();
        assert_eq!(builder.build("abc").max_errors(), 0);
        assert_eq!(builder.build("abcd").max_errors(), 1);
        assert_eq!(builder.build("abcdefg").max_errors(), 2);
    }

    #[test]
    fn transpositions_cost_one_when_enabled() {
        let plain = AutomatonBuilder::new(ErrorBudget::default(), 1, false);
        let swapped = AutomatonBuilder::new(ErrorBudget::default(), 1, true);
        assert!(!accepts(&plain.build_with("cafe", 1, 1), "caef"));
        assert!(accepts(&swapped.build_with("cafe", 1, 1), "caef"));
    }

    #[test]
    fn rejecting_cursor_stays_rejecting() {
        let automaton = builder().build_with("cafe", 1, 0);
        let dead = run(&automaton, "x");
        assert!(dead.rejects());
        assert!(automaton.advance(dead, 'c').rejects());
    }
}
