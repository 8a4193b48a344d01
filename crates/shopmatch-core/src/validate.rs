//! Validation of upstream shop records before matching.
//!
//! Upstream payloads are loosely typed: any field may be absent or carry the
//! wrong JSON type. Each field has one fallback rule:
//!
//! | Field | Missing / wrong type |
//! |-------|----------------------|
//! | `shopId` | reject (numbers are accepted and stringified) |
//! | `name` | reject |
//! | `postcode` | reject |
//! | `longitude` + `latitude` | record kept without coordinates |
//! | `company` | ignored; the grouping key is authoritative |

use serde::{Deserialize, Serialize};

use crate::shops::{Coordinates, Grouped, GroupedResults, ShopRecord};

/// Upstream shop record with every field optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawShopRecord {
    #[serde(default)]
    pub shop_id: Option<serde_json::Value>,
    #[serde(default)]
    pub company: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<serde_json::Value>,
    #[serde(default)]
    pub postcode: Option<serde_json::Value>,
    #[serde(default)]
    pub longitude: Option<serde_json::Value>,
    #[serde(default)]
    pub latitude: Option<serde_json::Value>,
}

/// Raw records keyed by company, as received from upstream.
pub type RawGroupedResults = Grouped<RawShopRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingShopId,
    MissingName,
    MissingPostcode,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MissingShopId => write!(f, "missing or non-scalar shopId"),
            RejectReason::MissingName => write!(f, "missing or non-string name"),
            RejectReason::MissingPostcode => write!(f, "missing or non-string postcode"),
        }
    }
}

/// A raw record that could not be turned into a [`ShopRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub company: String,
    /// Position of the record in its company's list.
    pub index: usize,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, Default)]
pub struct Validated {
    pub grouped: GroupedResults,
    pub rejected: Vec<RejectedRecord>,
}

/// Convert raw upstream records into [`GroupedResults`].
///
/// Company order and record order are preserved. Every company from the
/// input appears in the output, even when all of its records are rejected.
#[must_use]
pub fn validate_grouped(raw: RawGroupedResults) -> Validated {
    let mut validated = Validated::default();

    for (company, records) in raw {
        let mut kept = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match into_shop_record(&company, record) {
                Ok(shop) => kept.push(shop),
                Err(reason) => {
                    tracing::warn!(company = %company, index, %reason, "rejecting shop record");
                    validated.rejected.push(RejectedRecord {
                        company: company.clone(),
                        index,
                        reason,
                    });
                }
            }
        }
        validated.grouped.insert(company, kept);
    }

    validated
}

fn into_shop_record(company: &str, raw: RawShopRecord) -> Result<ShopRecord, RejectReason> {
    let shop_id = raw
        .shop_id
        .as_ref()
        .and_then(scalar_to_string)
        .ok_or(RejectReason::MissingShopId)?;
    let name = raw
        .name
        .as_ref()
        .and_then(|v| v.as_str())
        .ok_or(RejectReason::MissingName)?;
    let postcode = raw
        .postcode
        .as_ref()
        .and_then(|v| v.as_str())
        .ok_or(RejectReason::MissingPostcode)?;

    let coordinates = match (
        raw.longitude.as_ref().and_then(as_finite_f64),
        raw.latitude.as_ref().and_then(as_finite_f64),
    ) {
        (Some(longitude), Some(latitude)) => Some(Coordinates {
            longitude,
            latitude,
        }),
        _ => None,
    };

    Ok(ShopRecord {
        shop_id,
        company: company.to_string(),
        name: name.to_string(),
        postcode: postcode.to_string(),
        coordinates,
    })
}

fn scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accepts JSON numbers and numeric strings; some sources quote coordinates.
fn as_finite_f64(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}
