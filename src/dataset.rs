//! Dataset model: sample identifiers, per-sample OTU observations and
//! per-sample metadata
//!
//! The document served at the dataset URL looks like:
//!
//! ```json
//! {
//!   "names": ["940", "941"],
//!   "metadata": [{"id": 940, "ethnicity": "Caucasian", "age": 24.0}],
//!   "samples": [{"id": "940", "otu_ids": [1167], "sample_values": [163], "otu_labels": ["Bacteria"]}]
//! }
//! ```
//!
//! Samples are keyed by a string id while metadata records carry the same
//! identity as a number. Rather than comparing the two with loose equality at
//! lookup time, every metadata record is given a [`SampleKey`] when it is
//! parsed, and the selected identifier is converted to a key the same way
//! before the lookup.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// The whole document. Loaded once per fetch and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub metadata: Vec<Metadata>,
    #[serde(default)]
    pub samples: Vec<Sample>,
}

impl Dataset {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// One specimen's taxon observations.
///
/// `otu_ids`, `sample_values` and `otu_labels` are parallel: index `i` in each
/// describes the same OTU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub otu_ids: Vec<i64>,
    #[serde(default)]
    pub sample_values: Vec<f64>,
    #[serde(default)]
    pub otu_labels: Vec<String>,
}

impl Sample {
    /// Number of complete observations (shortest of the parallel arrays)
    pub fn len(&self) -> usize {
        self.otu_ids
            .len()
            .min(self.sample_values.len())
            .min(self.otu_labels.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(match n.as_f64() {
            // 940.0 names the same subject as 940
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        }),
        other => Err(serde::de::Error::custom(format!(
            "sample id must be a string or number, got {}",
            other
        ))),
    }
}

/// Canonical join key between samples and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SampleKey {
    Numeric(i64),
    /// Identifiers with no integer reading. These never match metadata.
    Text(String),
}

impl SampleKey {
    /// Key for a selected identifier, read as a leading integer.
    ///
    /// Leading whitespace is skipped, an optional sign is accepted, and
    /// parsing stops at the first non-digit: `"940"`, `"0940"` and `"940a"`
    /// all key to `940`. Strings without leading digits become `Text`.
    pub fn from_selection(id: &str) -> Self {
        let trimmed = id.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let digits_end = rest
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return SampleKey::Text(id.to_string());
        }
        match rest[..digits_end].parse::<i64>() {
            Ok(n) if negative => SampleKey::Numeric(-n),
            Ok(n) => SampleKey::Numeric(n),
            Err(_) => SampleKey::Text(id.to_string()),
        }
    }

    /// Key for a metadata `id` value as it appears in the document.
    ///
    /// Integers (and integral floats) are numeric. Strings are numeric only
    /// when the whole trimmed string is an integral number.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => SampleKey::Numeric(i),
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        SampleKey::Numeric(f as i64)
                    }
                    _ => SampleKey::Text(n.to_string()),
                },
            }),
            Value::String(s) => {
                let t = s.trim();
                let key = match t.parse::<f64>() {
                    Ok(f) if !t.is_empty() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        SampleKey::Numeric(f as i64)
                    }
                    _ => SampleKey::Text(s.clone()),
                };
                Some(key)
            }
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, SampleKey::Numeric(_))
    }
}

impl std::fmt::Display for SampleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleKey::Numeric(n) => write!(f, "{}", n),
            SampleKey::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Descriptive attributes of one sample.
///
/// The schema is open: every key of the record is kept, in document order,
/// including `id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Metadata {
    key: Option<SampleKey>,
    fields: Map<String, Value>,
}

impl Metadata {
    pub fn key(&self) -> Option<&SampleKey> {
        self.key.as_ref()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(fields: Map<String, Value>) -> Self {
        let key = fields.get("id").and_then(SampleKey::from_value);
        Self { key, fields }
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==========================================================================
    // KEY NORMALIZATION TESTS
    // ==========================================================================
    //
    // Sample ids are strings ("940"), metadata ids are numbers (940). Both
    // sides become a SampleKey so the join is a plain equality check.
    // ==========================================================================

    #[test]
    fn test_selection_key_plain_integer() {
        assert_eq!(SampleKey::from_selection("940"), SampleKey::Numeric(940));
    }

    #[test]
    fn test_selection_key_reads_leading_digits() {
        assert_eq!(SampleKey::from_selection("  0940"), SampleKey::Numeric(940));
        assert_eq!(SampleKey::from_selection("940abc"), SampleKey::Numeric(940));
        assert_eq!(SampleKey::from_selection("-7"), SampleKey::Numeric(-7));
    }

    #[test]
    fn test_selection_key_non_numeric_is_text() {
        assert_eq!(SampleKey::from_selection("abc"), SampleKey::Text("abc".to_string()));
        assert_eq!(SampleKey::from_selection(""), SampleKey::Text(String::new()));
        assert_eq!(SampleKey::from_selection("-"), SampleKey::Text("-".to_string()));
    }

    #[test]
    fn test_selection_key_overflow_is_text() {
        let huge = "99999999999999999999999";
        assert!(!SampleKey::from_selection(huge).is_numeric());
    }

    #[test]
    fn test_value_key_variants() {
        assert_eq!(SampleKey::from_value(&json!(5)), Some(SampleKey::Numeric(5)));
        assert_eq!(SampleKey::from_value(&json!(5.0)), Some(SampleKey::Numeric(5)));
        assert_eq!(SampleKey::from_value(&json!("5")), Some(SampleKey::Numeric(5)));
        assert_eq!(
            SampleKey::from_value(&json!(5.5)),
            Some(SampleKey::Text("5.5".to_string()))
        );
        assert_eq!(
            SampleKey::from_value(&json!("5abc")),
            Some(SampleKey::Text("5abc".to_string()))
        );
        assert_eq!(SampleKey::from_value(&json!(null)), None);
    }

    // ==========================================================================
    // DOCUMENT PARSING TESTS
    // ==========================================================================

    #[test]
    fn test_parse_full_document() {
        let text = r#"{
            "names": ["940", "941"],
            "metadata": [{"id": 940, "ethnicity": "Caucasian", "gender": "F", "age": 24.0}],
            "samples": [{"id": "940", "otu_ids": [1167, 2859], "sample_values": [163, 126],
                         "otu_labels": ["Bacteria", "Bacteria;Firmicutes"]}]
        }"#;
        let ds = Dataset::from_json(text).unwrap();

        assert_eq!(ds.names, vec!["940", "941"]);
        assert_eq!(ds.samples[0].id, "940");
        assert_eq!(ds.samples[0].otu_ids, vec![1167, 2859]);
        assert_eq!(ds.samples[0].sample_values, vec![163.0, 126.0]);
        assert_eq!(ds.samples[0].len(), 2);
        assert_eq!(ds.metadata[0].key(), Some(&SampleKey::Numeric(940)));
    }

    #[test]
    fn test_metadata_keeps_key_order() {
        let ds = Dataset::from_json(
            r#"{"metadata": [{"id": 1, "wfreq": 2, "age": 30, "bbtype": "I"}]}"#,
        )
        .unwrap();
        let keys: Vec<&str> = ds.metadata[0].fields().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["id", "wfreq", "age", "bbtype"]);
    }

    #[test]
    fn test_metadata_without_id_has_no_key() {
        let md: Metadata = serde_json::from_value(json!({"age": 3})).unwrap();
        assert_eq!(md.key(), None);
        assert_eq!(md.len(), 1);
    }

    #[test]
    fn test_numeric_sample_id_becomes_string() {
        let s: Sample = serde_json::from_value(json!({"id": 940})).unwrap();
        assert_eq!(s.id, "940");
        assert!(s.is_empty());
    }

    #[test]
    fn test_integral_float_sample_id_drops_fraction() {
        let s: Sample = serde_json::from_value(json!({"id": 940.0})).unwrap();
        assert_eq!(s.id, "940");
        let s: Sample = serde_json::from_value(json!({"id": 940.5})).unwrap();
        assert_eq!(s.id, "940.5");
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let ds = Dataset::from_json("{}").unwrap();
        assert!(ds.names.is_empty());
        assert!(ds.samples.is_empty());
        assert!(ds.metadata.is_empty());
    }

    #[test]
    fn test_ragged_arrays_use_shortest() {
        let s = Sample {
            id: "1".to_string(),
            otu_ids: vec![1, 2, 3],
            sample_values: vec![1.0, 2.0],
            otu_labels: vec!["a".into(), "b".into(), "c".into()],
        };
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_metadata_serializes_as_plain_object() {
        let md: Metadata = serde_json::from_value(json!({"id": 940, "age": 24})).unwrap();
        assert_eq!(serde_json::to_value(&md).unwrap(), json!({"id": 940, "age": 24}));
    }
}
