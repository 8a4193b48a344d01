//! `match` command: load grouped results, run the matcher, print groups.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use shopmatch_core::{
    find_common_shops_with_threshold, load_grouped, validate_grouped, AppConfig, MatchGroup,
    Threshold,
};
use shopmatch_sources::SourceClient;

use crate::OutputFormat;

/// Run the matcher over a file, or over the live source when `input` is `None`.
///
/// # Errors
///
/// Returns an error if the input cannot be loaded or fetched, or the output
/// cannot be serialized.
pub(crate) async fn run_match(
    config: &AppConfig,
    input: Option<&Path>,
    threshold: Threshold,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let validated = if let Some(path) = input {
        load_grouped(path).with_context(|| format!("loading {}", path.display()))?
    } else {
        let client = SourceClient::from_config(config).context("building shop source client")?;
        let raw = client
            .fetch_grouped()
            .await
            .context("fetching shops from source")?;
        validate_grouped(raw)
    };

    if !validated.rejected.is_empty() {
        tracing::warn!(
            rejected = validated.rejected.len(),
            "skipped malformed shop records"
        );
    }

    let groups = find_common_shops_with_threshold(&validated.grouped, threshold);
    tracing::info!(
        companies = validated.grouped.len(),
        records = validated.grouped.record_count(),
        groups = groups.len(),
        "matching finished"
    );

    println!("{}", render(&groups, format)?);
    Ok(())
}

fn render(groups: &[MatchGroup], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(groups)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(groups).context("serializing match groups")
        }
    }
}

fn render_text(groups: &[MatchGroup]) -> String {
    if groups.is_empty() {
        return "no common shops found".to_string();
    }

    let mut out = String::new();
    for group in groups {
        let shop = &group.representative;
        let sources = group
            .sources
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "{} ({}) [{} #{}] records={} sources: {sources}",
            shop.name, shop.postcode, shop.company, shop.shop_id, group.matched
        );
    }
    out.truncate(out.trim_end().len());
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use shopmatch_core::ShopRecord;

    use super::*;

    fn group() -> MatchGroup {
        MatchGroup {
            representative: ShopRecord {
                shop_id: "1".to_string(),
                company: "CompanyA".to_string(),
                name: "Joe's Pizza".to_string(),
                postcode: "AB1 2CD".to_string(),
                coordinates: None,
            },
            sources: BTreeSet::from(["CompanyB".to_string(), "CompanyA".to_string()]),
            matched: 2,
        }
    }

    #[test]
    fn render_text_lists_sorted_sources() {
        let text = render_text(&[group()]);
        assert_eq!(
            text,
            "Joe's Pizza (AB1 2CD) [CompanyA #1] records=2 sources: CompanyA, CompanyB"
        );
    }

    #[test]
    fn render_text_empty() {
        assert_eq!(render_text(&[]), "no common shops found");
    }

    #[test]
    fn render_json_is_an_array_of_groups() {
        let json = render(&[group()], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["representative"]["shopId"], "1");
        assert_eq!(value[0]["sources"], serde_json::json!(["CompanyA", "CompanyB"]));
        assert_eq!(value[0]["matched"], 2);
    }
}
