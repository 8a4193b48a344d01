//! Cross-source shop deduplication.
//!
//! Records from every company are flattened into one sequence (companies in
//! mapping order, then records in list order) and compared pairwise. Each
//! unclaimed record collects every later unclaimed record that passes
//! [`is_similar`]; clusters of two or more become a [`MatchGroup`].
//!
//! Comparison is O(n²) in the record count. Inputs are a few hundred shops
//! per view, so there is no postcode bucketing.

use std::collections::BTreeSet;

use crate::shops::{GroupedResults, MatchGroup, ShopRecord};
use crate::similarity::{is_similar, Threshold};

/// Find shops reported by more than one record, at the default threshold.
///
/// See [`find_common_shops_with_threshold`].
#[must_use]
pub fn find_common_shops(grouped: &GroupedResults) -> Vec<MatchGroup> {
    find_common_shops_with_threshold(grouped, Threshold::default())
}

/// Find shops reported by more than one record.
///
/// Groups come back in the order of their representative in the flattened
/// input, and the representative is always the first-seen record of its
/// cluster. Swapping company order can therefore change which record
/// represents a group but not which records are grouped together, as long
/// as similarity is transitive for the records involved.
#[must_use]
pub fn find_common_shops_with_threshold(
    grouped: &GroupedResults,
    threshold: Threshold,
) -> Vec<MatchGroup> {
    let flattened: Vec<(&ShopRecord, &str)> = grouped
        .iter()
        .flat_map(|(company, records)| records.iter().map(move |record| (record, company)))
        .collect();

    let mut consumed = vec![false; flattened.len()];
    let mut groups = Vec::new();

    for i in 0..flattened.len() {
        if consumed[i] {
            continue;
        }
        let (anchor, anchor_company) = flattened[i];
        let mut sources = BTreeSet::from([anchor_company.to_string()]);
        let mut matched = 1;

        for j in (i + 1)..flattened.len() {
            if consumed[j] {
                continue;
            }
            let (candidate, company) = flattened[j];
            if is_similar(anchor, candidate, threshold) {
                consumed[j] = true;
                sources.insert(company.to_string());
                matched += 1;
            }
        }

        if matched > 1 {
            consumed[i] = true;
            groups.push(MatchGroup {
                representative: anchor.clone(),
                sources,
                matched,
            });
        }
    }

    tracing::debug!(
        companies = grouped.len(),
        records = flattened.len(),
        groups = groups.len(),
        %threshold,
        "shop matching complete"
    );

    groups
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
