//! Category resolution over tokenized queries.

use std::collections::{BTreeSet, VecDeque};

use locus_config::MatchingSettings;
use locus_query::TokenSlice;
use serde::Serialize;
use tracing::trace;

use crate::{Automaton, AutomatonBuilder, CategoryDictionary, Locale, TrieIter, TypeId};

/// How a category was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The whole token is a dictionary entry.
    Exact,
    /// The token's first character alone is an entry in the default locale.
    FirstChar,
    /// The token is within the error budget of an entry.
    Fuzzy,
}

/// One `(token, category)` pair produced while resolving a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CategoryMatch {
    /// Index of the token in the query.
    pub token_index: usize,
    /// Matched category.
    pub type_id: TypeId,
    /// Rule that produced the match.
    pub kind: MatchKind,
}

/// Walks `trie` and `automaton` in lock step, calling `f` with every type id stored at a node
/// whose path the automaton accepts.
///
/// Returns `false` without visiting anything if the automaton rejects from the start.
///
/// The walk is breadth-first over `(node, cursor)` pairs. A trie node has a single path from the
/// root and the automaton is deterministic, so each node is paired with at most one cursor and
/// the walk visits every node at most once.
pub fn match_in_trie(trie: TrieIter<'_>, automaton: &Automaton, mut f: impl FnMut(TypeId)) -> bool {
    let start = automaton.begin();
    if start.rejects() {
        return false;
    }

    let mut queue = VecDeque::from([(trie, start)]);
    while let Some((node, cursor)) = queue.pop_front() {
        if automaton.accepts(cursor) {
            node.values().iter().copied().for_each(&mut f);
        }

        for (c, child) in node.children() {
            let next = automaton.advance(cursor, c);
            if !next.rejects() {
                queue.push_back((child, next));
            }
        }
    }

    true
}

/// Resolves query tokens to category type ids.
///
/// Holds a read-only dictionary and automaton builder, so one matcher can be shared between
/// threads.
pub struct CategoryMatcher {
    /// Per-locale tries.
    dictionary: CategoryDictionary,
    /// Builds automata from the configured error budget.
    builder: AutomatonBuilder,
    /// Locale consulted by the first-character rule.
    default_locale: Locale,
}

impl CategoryMatcher {
    /// Creates a matcher over `dictionary` using the `[matching]` settings.
    pub fn new(dictionary: CategoryDictionary, settings: &MatchingSettings) -> Self {
        Self {
            dictionary,
            builder: AutomatonBuilder::from_settings(settings),
            default_locale: Locale::new(&settings.default_locale),
        }
    }

    /// The underlying dictionary.
    pub fn dictionary(&self) -> &CategoryDictionary {
        &self.dictionary
    }

    /// The automaton builder used for fuzzy lookups.
    pub fn builder(&self) -> &AutomatonBuilder {
        &self.builder
    }

    /// The locale consulted by the first-character rule.
    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Type ids whose names contain exactly `token` in `locale`.
    pub fn lookup_exact(&self, token: &str, locale: &Locale) -> BTreeSet<TypeId> {
        self.dictionary
            .trie(locale)
            .map(|trie| trie.get(token).iter().copied().collect())
            .unwrap_or_default()
    }

    /// Type ids whose names `automaton` accepts in `locale`.
    pub fn lookup_fuzzy(&self, locale: &Locale, automaton: &Automaton) -> BTreeSet<TypeId> {
        let mut found = BTreeSet::new();
        if let Some(trie) = self.dictionary.trie(locale) {
            match_in_trie(trie.root(), automaton, |id| {
                found.insert(id);
            });
        }
        found
    }

    /// Calls `f(token_index, type_id)` for every category matched by every token in every
    /// locale.
    ///
    /// Per token: exact matches in each locale, then the first-character rule in the default
    /// locale for tokens longer than one character, then fuzzy matches in each locale unless
    /// `exact_only`. The same pair may be reported more than once.
    pub fn for_each_category_type(
        &self,
        tokens: &TokenSlice,
        locales: &[Locale],
        exact_only: bool,
        mut f: impl FnMut(usize, TypeId),
    ) {
        self.visit(tokens, locales, exact_only, |m| f(m.token_index, m.type_id));
    }

    /// Collects every match of [`Self::for_each_category_type`], tagged with the rule that
    /// produced it.
    pub fn category_matches(
        &self,
        tokens: &TokenSlice,
        locales: &[Locale],
        exact_only: bool,
    ) -> Vec<CategoryMatch> {
        let mut matches = Vec::new();
        self.visit(tokens, locales, exact_only, |m| matches.push(m));
        matches
    }

    /// Type ids a single normalized token resolves to across `locales`, all rules combined.
    ///
    /// This is the refinement filter handed to the retrieval layer.
    pub fn resolve_category_token(&self, token: &str, locales: &[Locale]) -> BTreeSet<TypeId> {
        let mut found = BTreeSet::new();
        self.visit_token(0, token, locales, false, &mut |m| {
            found.insert(m.type_id);
        });
        found
    }

    /// Runs every rule over every token.
    fn visit(
        &self,
        tokens: &TokenSlice,
        locales: &[Locale],
        exact_only: bool,
        mut f: impl FnMut(CategoryMatch),
    ) {
        for (index, token) in tokens.iter().enumerate() {
            self.visit_token(index, token.text(), locales, exact_only, &mut f);
        }
    }

    /// Runs every rule over one token.
    fn visit_token(
        &self,
        index: usize,
        token: &str,
        locales: &[Locale],
        exact_only: bool,
        f: &mut dyn FnMut(CategoryMatch),
    ) {
        let mut emit = |type_id, kind| {
            f(CategoryMatch {
                token_index: index,
                type_id,
                kind,
            });
        };

        for locale in locales {
            if let Some(trie) = self.dictionary.trie(locale) {
                for &id in trie.get(token) {
                    emit(id, MatchKind::Exact);
                }
            }
        }

        let mut chars = token.chars();
        if let (Some(first), Some(_)) = (chars.next(), chars.next())
            && let Some(trie) = self.dictionary.trie(&self.default_locale)
        {
            let mut buf = [0u8; 4];
            for &id in trie.get(first.encode_utf8(&mut buf)) {
                emit(id, MatchKind::FirstChar);
            }
        }

        if exact_only {
            return;
        }

        let automaton = self.builder.build(token);
        for locale in locales {
            if let Some(trie) = self.dictionary.trie(locale) {
                let mut expanded = 0usize;
                match_in_trie(trie.root(), &automaton, |id| {
                    expanded += 1;
                    emit(id, MatchKind::Fuzzy);
                });
                trace!(token, %locale, expanded, "fuzzy category lookup");
            }
        }
    }
}
