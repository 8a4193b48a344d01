//! Shop records, company groupings, and match groups.

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Longitude/latitude pair used to focus a map on a shop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

/// One shop as reported by one data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopRecord {
    /// Identifier, unique within the reporting company.
    pub shop_id: String,
    /// Name of the data source that reported this shop.
    pub company: String,
    pub name: String,
    pub postcode: String,
    /// Map focus only; never consulted when matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Shops judged to be the same physical location across sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchGroup {
    /// First record of the cluster in flattening order.
    pub representative: ShopRecord,
    /// Distinct companies whose records were folded into this group.
    pub sources: BTreeSet<String>,
    /// Number of raw records folded into this group. Always at least 2.
    pub matched: usize,
}

/// Ordered mapping from company name to the records it reported.
///
/// Iteration follows insertion order. When deserialized from a JSON or YAML
/// object, that is the document's key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouped<T> {
    entries: Vec<(String, Vec<T>)>,
}

/// Validated records keyed by company.
pub type GroupedResults = Grouped<ShopRecord>;

impl<T> Grouped<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a company's records.
    ///
    /// A company that is already present keeps its position and has its
    /// records replaced.
    pub fn insert(&mut self, company: impl Into<String>, records: Vec<T>) {
        let company = company.into();
        if let Some(slot) = self.entries.iter_mut().find(|(c, _)| *c == company) {
            slot.1 = records;
        } else {
            self.entries.push((company, records));
        }
    }

    #[must_use]
    pub fn get(&self, company: &str) -> Option<&[T]> {
        self.entries
            .iter()
            .find(|(c, _)| c == company)
            .map(|(_, records)| records.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.entries
            .iter()
            .map(|(company, records)| (company.as_str(), records.as_slice()))
    }

    /// Company names in mapping order.
    pub fn companies(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(company, _)| company.as_str())
    }

    /// Number of companies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of records across all companies.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|(_, records)| records.len()).sum()
    }
}

impl<T> Default for Grouped<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for Grouped<T> {
    type Item = (String, Vec<T>);
    type IntoIter = std::vec::IntoIter<(String, Vec<T>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T, S: Into<String>> FromIterator<(S, Vec<T>)> for Grouped<T> {
    fn from_iter<I: IntoIterator<Item = (S, Vec<T>)>>(iter: I) -> Self {
        let mut grouped = Self::new();
        for (company, records) in iter {
            grouped.insert(company, records);
        }
        grouped
    }
}

impl<T: Serialize> Serialize for Grouped<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (company, records) in &self.entries {
            map.serialize_entry(company, records)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Grouped<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupedVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for GroupedVisitor<T> {
            type Value = Grouped<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of company name to a list of shops")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut grouped = Grouped::new();
                while let Some((company, records)) = access.next_entry::<String, Vec<T>>()? {
                    grouped.insert(company, records);
                }
                Ok(grouped)
            }
        }

        deserializer.deserialize_map(GroupedVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_preserves_document_key_order() {
        let json = r#"{"Zeta": [], "Alpha": [], "Mid": []}"#;
        let grouped: Grouped<ShopRecord> = serde_json::from_str(json).unwrap();
        let companies: Vec<&str> = grouped.companies().collect();
        assert_eq!(companies, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn insert_existing_company_keeps_position() {
        let mut grouped: Grouped<u32> = Grouped::new();
        grouped.insert("A", vec![1]);
        grouped.insert("B", vec![2]);
        grouped.insert("A", vec![3, 4]);
        let companies: Vec<&str> = grouped.companies().collect();
        assert_eq!(companies, vec!["A", "B"]);
        assert_eq!(grouped.get("A"), Some(&[3, 4][..]));
        assert_eq!(grouped.record_count(), 3);
    }

    #[test]
    fn serialize_writes_object_in_insertion_order() {
        let grouped: Grouped<u32> = vec![("B", vec![1]), ("A", vec![2])].into_iter().collect();
        let json = serde_json::to_string(&grouped).unwrap();
        assert_eq!(json, r#"{"B":[1],"A":[2]}"#);
    }

    #[test]
    fn shop_record_uses_camel_case_wire_names() {
        let record = ShopRecord {
            shop_id: "42".to_string(),
            company: "CompanyA".to_string(),
            name: "Corner Shop".to_string(),
            postcode: "AB1 2CD".to_string(),
            coordinates: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["shopId"], "42");
        assert!(value.get("coordinates").is_none());
    }
}
