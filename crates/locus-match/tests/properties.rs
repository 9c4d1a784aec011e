//! Property tests comparing fuzzy category lookup with a brute-force edit distance.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::collections::BTreeSet;

use locus_config::ErrorBudget;
use locus_match::{AutomatonBuilder, CategoryTrie, TypeId, match_in_trie};
use proptest::prelude::*;

/// Classic dynamic-programming Levenshtein distance over characters.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            row[j + 1] = substitution.min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }
    prev[b.len()]
}

/// Whether `word` keeps the first `prefix` characters of `token` and is within `errors` edits
/// of it after them.
fn within_budget(word: &str, token: &str, prefix: usize, errors: u8) -> bool {
    let word: Vec<char> = word.chars().collect();
    let token: Vec<char> = token.chars().collect();
    let keep = prefix.min(token.len());
    word.len() >= keep
        && word[..keep] == token[..keep]
        && levenshtein(&word[keep..], &token[keep..]) <= usize::from(errors)
}

fn build_trie(words: &[String]) -> CategoryTrie {
    let mut trie = CategoryTrie::new();
    for (i, word) in words.iter().enumerate() {
        trie.insert(word, TypeId(u32::try_from(i).unwrap()));
    }
    trie
}

fn fuzzy(
    trie: &CategoryTrie,
    builder: &AutomatonBuilder,
    token: &str,
    prefix: usize,
    errors: u8,
) -> BTreeSet<TypeId> {
    let automaton = builder.build_with(token, prefix, errors);
    let mut found = BTreeSet::new();
    match_in_trie(trie.root(), &automaton, |id| {
        found.insert(id);
    });
    found
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn fuzzy_lookup_matches_edit_distance(
        words in prop::collection::vec("[abc]{1,6}", 1..24),
        token in "[abc]{1,6}",
        prefix in 0usize..3,
        errors in 0u8..3,
    ) {
        let builder = AutomatonBuilder::new(ErrorBudget::default(), prefix, false);
        let trie = build_trie(&words);

        let expected: BTreeSet<TypeId> = words
            .iter()
            .enumerate()
            .filter(|(_, word)| within_budget(word, &token, prefix, errors))
            .map(|(i, _)| TypeId(u32::try_from(i).unwrap()))
            .collect();

        prop_assert_eq!(fuzzy(&trie, &builder, &token, prefix, errors), expected);
    }

    #[test]
    fn exact_hits_are_fuzzy_hits(
        words in prop::collection::vec("[a-d]{1,5}", 1..16),
        pick in any::<prop::sample::Index>(),
        prefix in 0usize..3,
        errors in 0u8..3,
    ) {
        let builder = AutomatonBuilder::new(ErrorBudget::default(), prefix, false);
        let trie = build_trie(&words);
        let token = pick.get(&words);

        let exact: BTreeSet<TypeId> = trie.get(token).iter().copied().collect();
        prop_assert!(!exact.is_empty());
        prop_assert!(exact.is_subset(&fuzzy(&trie, &builder, token, prefix, errors)));
    }
}

#[test]
fn typo_example() {
    let trie = build_trie(&["cafe".to_string()]);
    let builder = AutomatonBuilder::new(ErrorBudget::default(), 1, false);
    assert_eq!(fuzzy(&trie, &builder, "cafee", 1, 1), BTreeSet::from([TypeId(0)]));
    assert!(fuzzy(&trie, &builder, "hotel", 1, 1).is_empty());
}
