//! Edit-distance word matching.

/// Words shorter than this never take part in fuzzy matching.
pub const MIN_FUZZY_WORD_CHARS: usize = 3;

/// Levenshtein distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `(longer - distance) / longer`, in `0.0..=1.0`. Two empty strings are
/// identical.
///
/// ```rust
/// use lore_core::search::similarity;
///
/// assert_eq!(similarity("signal", "signal"), 1.0);
/// assert!(similarity("signal", "signa") > 0.8);
/// assert!(similarity("angular", "xyz123") < 0.7);
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn similarity(a: &str, b: &str) -> f64 {
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return 1.0;
    }
    let distance = levenshtein(a, b);
    (longer - distance) as f64 / longer as f64
}

/// Word tokens of `text` eligible for fuzzy comparison.
pub fn candidate_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.chars().count() >= MIN_FUZZY_WORD_CHARS)
}

/// First word of `text` whose similarity to `term` is above `threshold`.
pub fn fuzzy_find<'t>(text: &'t str, term: &str, threshold: f64) -> Option<&'t str> {
    if term.chars().count() < MIN_FUZZY_WORD_CHARS {
        return None;
    }
    candidate_words(text).find(|word| similarity(word, term) > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_levenshtein_known_values() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("größe", "grösse"), 2);
    }

    #[test]
    fn test_similarity_bounds() {
        assert!((similarity("", "") - 1.0).abs() < f64::EPSILON);
        assert!(similarity("abc", "").abs() < f64::EPSILON);
        assert!(similarity("angular", "xyz123") < 0.7);
    }

    #[test]
    fn test_fuzzy_find_tolerates_typos() {
        let text = "const count = signal(0); computed(() => count() * 2)";
        assert_eq!(fuzzy_find(text, "signl", 0.7), Some("signal"));
        assert_eq!(fuzzy_find(text, "compted", 0.7), Some("computed"));
        assert_eq!(fuzzy_find(text, "router", 0.7), None);
    }

    #[test]
    fn test_short_words_are_ignored() {
        assert_eq!(fuzzy_find("a an of", "an", 0.0), None);
        assert_eq!(candidate_words("a an the signal").collect::<Vec<_>>(), ["the", "signal"]);
    }

    proptest! {
        #[test]
        fn prop_self_similarity_is_one(s in "\\PC{0,24}") {
            prop_assert!((similarity(&s, &s) - 1.0).abs() < f64::EPSILON);
        }

        #[test]
        fn prop_similarity_is_symmetric_and_bounded(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
            let ab = similarity(&a, &b);
            prop_assert!((ab - similarity(&b, &a)).abs() < f64::EPSILON);
            prop_assert!((0.0..=1.0).contains(&ab));
        }
    }
}
