//! Seed keyword term derivation.
//!
//! A pure, local computation over the input summary. Failure-tolerant by
//! construction: there is nothing to fail — an empty or junk summary just
//! yields an empty seed set, and the keyword analytics service carries on
//! with that.

use briefwise_core::defaults;

/// Common English words that never make useful seed terms.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "are", "was", "were", "has", "have",
    "had", "not", "but", "can", "will", "would", "could", "should", "their", "them", "they",
    "its", "into", "also", "than", "then", "when", "what", "which", "who", "how", "all", "any",
    "each", "more", "most", "other", "some", "such", "only", "own", "same", "about", "app",
    "apps", "use", "uses", "using", "user", "users", "get", "like", "make", "way", "new",
];

/// Derive seed keyword terms from a free-text summary.
///
/// Tokens are lowercased, split on non-alphanumeric boundaries, filtered to
/// a minimum length and against a stopword list, and deduplicated in order
/// of first appearance. The first few adjacent-token bigrams are appended
/// after the unigrams; the whole set is capped.
pub fn derive_seed_terms(summary: &str) -> Vec<String> {
    let tokens: Vec<String> = summary
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= defaults::SEED_TOKEN_MIN_LEN)
        .filter(|t| !STOPWORDS.contains(t))
        .map(|t| t.to_string())
        .collect();

    let mut seeds: Vec<String> = Vec::new();
    for token in &tokens {
        if !seeds.contains(token) {
            seeds.push(token.clone());
        }
    }

    let mut bigrams = 0;
    for pair in tokens.windows(2) {
        if bigrams >= defaults::SEED_BIGRAMS_MAX {
            break;
        }
        let bigram = format!("{} {}", pair[0], pair[1]);
        if !seeds.contains(&bigram) {
            seeds.push(bigram);
            bigrams += 1;
        }
    }

    seeds.truncate(defaults::SEED_TERMS_MAX);
    seeds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_derivation() {
        let seeds = derive_seed_terms("AI note-taking app for busy students");
        assert!(seeds.contains(&"note".to_string()));
        assert!(seeds.contains(&"taking".to_string()));
        assert!(seeds.contains(&"students".to_string()));
        // "app" and "for" are stopwords, "ai" is too short
        assert!(!seeds.contains(&"app".to_string()));
        assert!(!seeds.contains(&"for".to_string()));
        assert!(!seeds.contains(&"ai".to_string()));
    }

    #[test]
    fn test_bigrams_follow_unigrams() {
        let seeds = derive_seed_terms("meal planning service");
        assert_eq!(
            seeds,
            vec![
                "meal".to_string(),
                "planning".to_string(),
                "service".to_string(),
                "meal planning".to_string(),
                "planning service".to_string(),
            ]
        );
    }

    #[test]
    fn test_dedupe_preserves_first_occurrence_order() {
        let seeds = derive_seed_terms("budget budget travel budget travel");
        assert_eq!(seeds[0], "budget");
        assert_eq!(seeds[1], "travel");
        let unigrams: Vec<_> = seeds.iter().filter(|s| !s.contains(' ')).collect();
        assert_eq!(unigrams.len(), 2);
    }

    #[test]
    fn test_empty_and_junk_input() {
        assert!(derive_seed_terms("").is_empty());
        assert!(derive_seed_terms("   \t\n  ").is_empty());
        assert!(derive_seed_terms("a an it 12 !!").is_empty());
    }

    #[test]
    fn test_capped_at_maximum() {
        let long = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima \
                    mike november oscar papa quebec romeo sierra tango";
        let seeds = derive_seed_terms(long);
        assert_eq!(seeds.len(), defaults::SEED_TERMS_MAX);
    }
}
