//! Reconciliation of repeated observations of the same place.
//!
//! Each field follows its own reducer: term and category sets union and
//! never shrink, the score keeps its maximum, the review flag is recomputed
//! from the merged score, the last-seen timestamp always takes the incoming
//! value, and enrichment fields keep the first non-empty observation. The
//! union/max fields are commutative and associative; the enrichment and
//! timestamp rules deliberately are not.

use std::collections::BTreeSet;

use crate::models::PlaceRecord;
use crate::score::REVIEW_THRESHOLD;

/// Merge a newly built record into whatever is already known for its id.
///
/// With no prior record the incoming one is stored verbatim. Otherwise the
/// prior record's identity fields (name, address, first matched term and
/// category) are kept and only the reducer-governed fields change.
pub fn merge_record(existing: Option<PlaceRecord>, incoming: PlaceRecord) -> PlaceRecord {
    let Some(mut merged) = existing else {
        return incoming;
    };

    merged.matched_terms = union_sorted(&merged.matched_terms, &incoming.matched_terms);
    merged.category_ids = union_sorted(&merged.category_ids, &incoming.category_ids);

    merged.habesha_score = merged.habesha_score.max(incoming.habesha_score);
    merged.needs_review = merged.habesha_score < REVIEW_THRESHOLD;

    merged.last_seen_at = incoming.last_seen_at;

    fill_absent(&mut merged.formatted_phone_number, incoming.formatted_phone_number);
    fill_absent(
        &mut merged.international_phone_number,
        incoming.international_phone_number,
    );
    fill_absent(&mut merged.website, incoming.website);
    if merged.opening_hours.is_none() {
        merged.opening_hours = incoming.opening_hours;
    }

    merged
}

/// Set union materialized as a sorted, deduplicated sequence.
fn union_sorted(a: &[String], b: &[String]) -> Vec<String> {
    let set: BTreeSet<&String> = a.iter().chain(b.iter()).collect();
    set.into_iter().cloned().collect()
}

/// First non-empty value wins; an empty incoming value never clobbers.
fn fill_absent(slot: &mut Option<String>, incoming: Option<String>) {
    if slot.as_deref().is_none_or(str::is_empty) {
        if let Some(value) = incoming.filter(|v| !v.is_empty()) {
            *slot = Some(value);
        }
    }
}
