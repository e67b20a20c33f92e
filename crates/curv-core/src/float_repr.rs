//! Serde adapter for optional floats that may be infinite.
//!
//! JSON has no encoding for infinities, and `serde_json` silently turns them
//! into `null`. Unreachable curvature is stored as an infinity, so human
//! readable formats write non-finite values as the labels `"inf"`, `"-inf"`
//! and `"nan"`. Binary formats keep the raw `f64`.
//!
//! Use with `#[serde(default, with = "curv_core::float_repr")]` on `Option<f64>` fields.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serializes an optional float, labelling non-finite values.
pub fn serialize<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if !serializer.is_human_readable() {
        return value.serialize(serializer);
    }
    match value {
        None => serializer.serialize_none(),
        Some(v) if v.is_finite() => serializer.serialize_some(v),
        Some(v) => serializer.serialize_some(label(*v)),
    }
}

/// Deserializes an optional float written by [`serialize`].
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    if !deserializer.is_human_readable() {
        return Option::<f64>::deserialize(deserializer);
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Label(String),
    }

    match Option::<Repr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Repr::Number(value)) => Ok(Some(value)),
        Some(Repr::Label(text)) => parse_label(&text)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unknown float label `{text}`"))),
    }
}

/// Returns the textual label used for a non-finite float.
pub fn label(value: f64) -> &'static str {
    if value.is_nan() {
        "nan"
    } else if value > 0.0 {
        "inf"
    } else {
        "-inf"
    }
}

fn parse_label(text: &str) -> Option<f64> {
    match text {
        "inf" => Some(f64::INFINITY),
        "-inf" => Some(f64::NEG_INFINITY),
        "nan" => Some(f64::NAN),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(default, with = "super")]
        value: Option<f64>,
    }

    #[test]
    fn infinities_survive_json() {
        let holder = Holder {
            value: Some(f64::NEG_INFINITY),
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"value":"-inf"}"#);
        let decoded: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, holder);
    }

    #[test]
    fn finite_values_stay_numeric() {
        let json = serde_json::to_string(&Holder { value: Some(0.5) }).unwrap();
        assert_eq!(json, r#"{"value":0.5}"#);
        let missing: Holder = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.value, None);
    }

    #[test]
    fn unknown_labels_are_rejected() {
        assert!(serde_json::from_str::<Holder>(r#"{"value":"huge"}"#).is_err());
    }
}
