/// Pluggable similarity scoring for name matching.
///
/// Scores are in `[0, 1]`, higher is closer. Exact scoring internals are
/// deliberately not part of the index's observable contract — any scorer
/// that gives 1.0 to equal strings and low scores to unrelated ones works.
pub trait SimilarityScorer {
    fn score(&self, query: &str, candidate: &str) -> f64;
}

/// Default scorer: case-insensitive, substring containment counts as an
/// exact hit, otherwise Jaro-Winkler similarity.
///
/// The substring rule keeps short prefix queries ("Ali" for "Alice")
/// behaving like the substring-biased matching users expect from a
/// fuzzy name search.
#[derive(Clone, Copy, Debug, Default)]
pub struct JaroWinklerScorer;

impl SimilarityScorer for JaroWinklerScorer {
    fn score(&self, query: &str, candidate: &str) -> f64 {
        let query = query.to_lowercase();
        let candidate = candidate.to_lowercase();
        if !query.is_empty() && candidate.contains(&query) {
            return 1.0;
        }
        strsim::jaro_winkler(&query, &candidate)
    }
}
