//! Relevance scoring for place candidates.
//!
//! A pure keyword-tier classifier: strong cultural/cuisine terms found in
//! the place's own text score highest, the same terms found only in the
//! query that matched it score a little lower, and broader regional terms
//! add a small bonus. The reason list is the audit trail for every point
//! awarded, in evaluation order, so content evidence always appears before
//! type-based evidence.

/// Terms that identify a place as Habesha on their own.
pub const STRONG_KEYWORDS: [&str; 12] = [
    "ethiopian",
    "eritrean",
    "habesha",
    "injera",
    "teff",
    "berbere",
    "amharic",
    "tigrinya",
    "tewahedo",
    "abyssinian",
    "addis",
    "asmara",
];

/// Broader regional terms that only suggest relevance.
pub const MEDIUM_KEYWORDS: [&str; 4] = ["east african", "horn of africa", "bunna", "coffee ceremony"];

/// Place types that earn a flat bonus when present.
const TYPE_WHITELIST: [&str; 5] = [
    "restaurant",
    "cafe",
    "church",
    "place_of_worship",
    "grocery_or_supermarket",
];

/// Scores below this are flagged for human review.
pub const REVIEW_THRESHOLD: u32 = 60;

const MAX_REASONS: usize = 10;

/// Output of [`score_place`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored {
    /// Relevance score, clamped to `[0, 100]`.
    pub score: u32,
    /// True iff `score < 60`.
    pub needs_review: bool,
    /// Reason tags in evaluation order, truncated to the first 10.
    pub reasons: Vec<String>,
}

/// Score one candidate for Habesha relevance.
///
/// Two lowercase blobs are examined independently: the place's own text
/// (name + address + types) and the query terms that surfaced it. A strong
/// keyword present in both blobs earns both the content bonus (+15,
/// `kw:<k>`) and the query bonus (+10, `q:<k>`). Medium keywords earn +5
/// and one reason regardless of which blob they appear in. A whitelisted
/// place type earns a flat +5 with a single `type` reason.
///
/// Empty or missing inputs simply contribute nothing; there are no error
/// conditions.
pub fn score_place(name: &str, address: &str, types: &[String], matched_terms: &[String]) -> Scored {
    let text = format!("{} {} {}", name, address, types.join(" ")).to_lowercase();
    let terms_text = matched_terms.join(" ").to_lowercase();

    let mut score: u32 = 0;
    let mut reasons = Vec::new();

    for kw in STRONG_KEYWORDS {
        if text.contains(kw) {
            score += 15;
            reasons.push(format!("kw:{kw}"));
        }
    }
    for kw in STRONG_KEYWORDS {
        if terms_text.contains(kw) {
            score += 10;
            reasons.push(format!("q:{kw}"));
        }
    }
    for kw in MEDIUM_KEYWORDS {
        if text.contains(kw) || terms_text.contains(kw) {
            score += 5;
            reasons.push(format!("kw:{kw}"));
        }
    }

    if types.iter().any(|t| TYPE_WHITELIST.contains(&t.as_str())) {
        score += 5;
        reasons.push("type".to_string());
    }

    let score = score.min(100);
    reasons.truncate(MAX_REASONS);

    Scored {
        score,
        needs_review: score < REVIEW_THRESHOLD,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_inputs_score_zero() {
        let scored = score_place("", "", &[], &[]);
        assert_eq!(scored.score, 0);
        assert!(scored.needs_review);
        assert!(scored.reasons.is_empty());
    }

    #[test]
    fn keyword_in_both_blobs_earns_both_bonuses() {
        let scored = score_place(
            "Habesha Restaurant",
            "12 High St",
            &[],
            &strings(&["habesha food"]),
        );
        // 15 for content, 10 for query term.
        assert_eq!(scored.score, 25);
        assert_eq!(scored.reasons, vec!["kw:habesha", "q:habesha"]);
    }

    #[test]
    fn content_reasons_precede_query_then_medium_then_type() {
        let scored = score_place(
            "Addis Injera",
            "",
            &strings(&["restaurant"]),
            &strings(&["eritrean bunna"]),
        );
        // Strong in content: injera, addis (keyword order). Strong in query:
        // eritrean. Medium: bunna. Then the type bonus.
        assert_eq!(
            scored.reasons,
            vec!["kw:injera", "kw:addis", "q:eritrean", "kw:bunna", "type"]
        );
        assert_eq!(scored.score, 15 + 15 + 10 + 5 + 5);
        assert!(scored.needs_review);
    }

    #[test]
    fn score_is_clamped_to_100() {
        let name = STRONG_KEYWORDS.join(" ");
        let scored = score_place(&name, "", &[], &strings(&[&name]));
        assert_eq!(scored.score, 100);
        assert!(!scored.needs_review);
    }

    #[test]
    fn reasons_are_capped_at_ten() {
        let name = STRONG_KEYWORDS.join(" ");
        let scored = score_place(&name, "", &[], &[]);
        assert_eq!(scored.reasons.len(), 10);
        // The cap drops the lowest-priority reasons, never the leading ones.
        assert_eq!(scored.reasons[0], "kw:ethiopian");
    }

    #[test]
    fn review_flag_tracks_threshold() {
        for (name, terms) in [
            ("Habesha Market", vec!["habesha grocery"]),
            ("Addis Asmara Injera House", vec![]),
            ("Corner Deli", vec!["sandwiches"]),
        ] {
            let scored = score_place(name, "", &[], &strings(&terms));
            assert!(scored.score <= 100);
            assert_eq!(scored.needs_review, scored.score < 60);
        }
    }

    #[test]
    fn whitelisted_type_earns_flat_bonus_once() {
        let types = strings(&["restaurant", "cafe", "food"]);
        let scored = score_place("Somewhere", "", &types, &[]);
        assert_eq!(scored.score, 5);
        assert_eq!(scored.reasons, vec!["type"]);
    }

    #[test]
    fn medium_keyword_counted_once_across_blobs() {
        let scored = score_place("Bunna Corner", "", &[], &strings(&["bunna"]));
        assert_eq!(scored.score, 5);
        assert_eq!(scored.reasons, vec!["kw:bunna"]);
    }
}
