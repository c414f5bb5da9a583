//! Lenient (de)serialization for upstream numeric fields.
//!
//! Counts arrive as integers, fractions or numeric strings depending on the
//! dataset. All are read as `f64`; whole values are written back as integers.

use serde::{de, Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Number(f64),
    Text(String),
}

pub fn serialize<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
            serializer.serialize_i64(*n as i64)
        }
        Some(n) => serializer.serialize_f64(*n),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => match s.trim() {
            "" => Ok(None),
            t => t
                .parse::<f64>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid number: {}", s))),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Holder {
        #[serde(default, with = "super")]
        n: Option<f64>,
    }

    fn read(value: serde_json::Value) -> Option<f64> {
        serde_json::from_value::<Holder>(value).unwrap().n
    }

    #[test]
    fn test_accepts_integers_fractions_and_strings() {
        assert_eq!(read(json!({ "n": 12 })), Some(12.0));
        assert_eq!(read(json!({ "n": 1.5 })), Some(1.5));
        assert_eq!(read(json!({ "n": " 7 " })), Some(7.0));
        assert_eq!(read(json!({ "n": "" })), None);
        assert_eq!(read(json!({ "n": null })), None);
        assert_eq!(read(json!({})), None);
        assert!(serde_json::from_value::<Holder>(json!({ "n": "many" })).is_err());
    }

    #[test]
    fn test_whole_values_serialize_as_integers() {
        assert_eq!(
            serde_json::to_value(Holder { n: Some(120.0) }).unwrap(),
            json!({ "n": 120 })
        );
        assert_eq!(
            serde_json::to_value(Holder { n: Some(1.5) }).unwrap(),
            json!({ "n": 1.5 })
        );
    }
}
