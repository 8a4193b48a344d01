//! `compare` command: explain the similarity verdict for one pair of shops.

use shopmatch_core::{
    is_similar, normalize_name, normalize_postcode, similarity_score, ShopRecord, Threshold,
};

#[derive(Debug)]
pub(crate) struct Comparison {
    pub(crate) name_a: String,
    pub(crate) name_b: String,
    pub(crate) postcode_a: String,
    pub(crate) postcode_b: String,
    pub(crate) score: f64,
    pub(crate) threshold: Threshold,
    pub(crate) similar: bool,
}

pub(crate) fn compare_pair(
    name_a: &str,
    postcode_a: &str,
    name_b: &str,
    postcode_b: &str,
    threshold: Threshold,
) -> Comparison {
    let a = ad_hoc_record("a", name_a, postcode_a);
    let b = ad_hoc_record("b", name_b, postcode_b);

    let normalized_a = normalize_name(name_a);
    let normalized_b = normalize_name(name_b);

    Comparison {
        score: similarity_score(&normalized_a, &normalized_b),
        name_a: normalized_a,
        name_b: normalized_b,
        postcode_a: normalize_postcode(postcode_a),
        postcode_b: normalize_postcode(postcode_b),
        threshold,
        similar: is_similar(&a, &b, threshold),
    }
}

fn ad_hoc_record(id: &str, name: &str, postcode: &str) -> ShopRecord {
    ShopRecord {
        shop_id: id.to_string(),
        company: id.to_string(),
        name: name.to_string(),
        postcode: postcode.to_string(),
        coordinates: None,
    }
}

impl Comparison {
    pub(crate) fn render(&self) -> String {
        let postcode_verdict = if self.postcode_a == self.postcode_b {
            "match"
        } else {
            "differ"
        };
        let verdict = if self.similar {
            "same shop"
        } else {
            "different shops"
        };
        format!(
            "names:     {:?} vs {:?}\npostcodes: {:?} vs {:?} ({postcode_verdict})\nscore:     {:.3} (threshold {})\nverdict:   {verdict}",
            self.name_a, self.name_b, self.postcode_a, self.postcode_b, self.score, self.threshold
        )
    }
}
