//! Field values and the codec between them and Firestore's typed REST JSON.
//!
//! Firestore wraps every field in a single-key object naming its type,
//! e.g. `{"stringValue": "hi"}` or `{"timestampValue": "2026-01-01T00:00:00Z"}`.
//! Integers travel as decimal strings. Only the scalar types Courier stores
//! are supported here.

use crate::{Document, Fields, StoreError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Serialize to the Firestore REST representation.
    pub fn to_rest(&self) -> Value {
        match self {
            FieldValue::Null => json!({ "nullValue": null }),
            FieldValue::Boolean(b) => json!({ "booleanValue": b }),
            FieldValue::Integer(i) => json!({ "integerValue": i.to_string() }),
            FieldValue::Double(d) => json!({ "doubleValue": d }),
            FieldValue::String(s) => json!({ "stringValue": s }),
            FieldValue::Timestamp(t) => {
                json!({ "timestampValue": t.to_rfc3339_opts(SecondsFormat::Micros, true) })
            }
        }
    }

    /// Parse from the Firestore REST representation.
    pub fn from_rest(value: &Value) -> Result<FieldValue, StoreError> {
        let object = value
            .as_object()
            .ok_or_else(|| StoreError::DecodeError(format!("field value is not an object: {value}")))?;
        let (kind, inner) = object
            .iter()
            .next()
            .ok_or_else(|| StoreError::DecodeError("empty field value".to_string()))?;
        match kind.as_str() {
            "nullValue" => Ok(FieldValue::Null),
            "booleanValue" => inner
                .as_bool()
                .map(FieldValue::Boolean)
                .ok_or_else(|| StoreError::DecodeError("booleanValue is not a bool".to_string())),
            // integerValue arrives either as a decimal string or a bare number
            "integerValue" => match inner {
                Value::String(s) => s
                    .parse::<i64>()
                    .map(FieldValue::Integer)
                    .map_err(|e| StoreError::DecodeError(format!("bad integerValue: {e}"))),
                Value::Number(n) => n
                    .as_i64()
                    .map(FieldValue::Integer)
                    .ok_or_else(|| StoreError::DecodeError("integerValue out of range".to_string())),
                other => Err(StoreError::DecodeError(format!("bad integerValue: {other}"))),
            },
            "doubleValue" => inner
                .as_f64()
                .map(FieldValue::Double)
                .ok_or_else(|| StoreError::DecodeError("doubleValue is not a number".to_string())),
            "stringValue" => inner
                .as_str()
                .map(|s| FieldValue::String(s.to_string()))
                .ok_or_else(|| StoreError::DecodeError("stringValue is not a string".to_string())),
            "timestampValue" => {
                let raw = inner.as_str().ok_or_else(|| {
                    StoreError::DecodeError("timestampValue is not a string".to_string())
                })?;
                DateTime::parse_from_rfc3339(raw)
                    .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc)))
                    .map_err(|e| StoreError::DecodeError(format!("bad timestampValue: {e}")))
            }
            other => Err(StoreError::DecodeError(format!("unsupported value type: {other}"))),
        }
    }

    /// Total ordering across values, matching Firestore's type ordering:
    /// null < boolean < numbers < timestamp < string. Integers and doubles
    /// compare numerically against each other.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Boolean(a), Boolean(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Double(a), Double(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Integer(a), Double(b)) => (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal),
            (Double(a), Integer(b)) => a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Double(_) => 2,
            FieldValue::Timestamp(_) => 3,
            FieldValue::String(_) => 4,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(t: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(t)
    }
}

/// Encode a field map to the `"fields"` object of a Firestore document.
pub fn encode_fields(fields: &Fields) -> Value {
    let mut map = Map::new();
    for (name, value) in fields {
        map.insert(name.clone(), value.to_rest());
    }
    Value::Object(map)
}

/// Decode the `"fields"` object of a Firestore document.
pub fn decode_fields(value: &Value) -> Result<Fields, StoreError> {
    let object = value
        .as_object()
        .ok_or_else(|| StoreError::DecodeError("document fields is not an object".to_string()))?;
    let mut fields = Fields::new();
    for (name, raw) in object {
        fields.insert(name.clone(), FieldValue::from_rest(raw)?);
    }
    Ok(fields)
}

/// Decode one full Firestore document: the trailing segment of its resource
/// name becomes the document id.
pub fn decode_document(value: &Value) -> Result<Document, StoreError> {
    let name = value
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::DecodeError("document has no name".to_string()))?;
    let id = name
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| StoreError::DecodeError(format!("bad document name: {name}")))?
        .to_string();
    let fields = match value.get("fields") {
        Some(raw) => decode_fields(raw)?,
        None => Fields::new(),
    };
    Ok(Document { id, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn scalar_values_round_trip_through_rest_json() {
        let stamp = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let values = [
            FieldValue::Null,
            FieldValue::Boolean(true),
            FieldValue::Integer(-42),
            FieldValue::Double(2.5),
            FieldValue::String("テスト".to_string()),
            FieldValue::Timestamp(stamp),
        ];
        for value in values {
            let rest = value.to_rest();
            assert_eq!(FieldValue::from_rest(&rest).unwrap(), value, "{rest}");
        }
    }

    #[test]
    fn integers_are_encoded_as_decimal_strings() {
        assert_eq!(
            FieldValue::Integer(123).to_rest(),
            json!({ "integerValue": "123" })
        );
    }

    #[test]
    fn integer_value_also_decodes_from_a_bare_number() {
        let parsed = FieldValue::from_rest(&json!({ "integerValue": 7 })).unwrap();
        assert_eq!(parsed, FieldValue::Integer(7));
    }

    #[test]
    fn unsupported_value_kinds_are_rejected() {
        assert!(FieldValue::from_rest(&json!({ "mapValue": {} })).is_err());
    }

    #[test]
    fn document_id_comes_from_the_resource_name() {
        let doc = decode_document(&json!({
            "name": "projects/p/databases/(default)/documents/PLAY_messages/abc123",
            "fields": { "message": { "stringValue": "hi" } }
        }))
        .unwrap();
        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.fields["message"], FieldValue::String("hi".to_string()));
    }

    #[test]
    fn timestamps_order_chronologically() {
        let earlier = FieldValue::Timestamp(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let later = FieldValue::Timestamp(Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(earlier.compare(&later), Ordering::Less);
        assert_eq!(later.compare(&earlier), Ordering::Greater);
    }

    #[test]
    fn mixed_types_order_by_type_rank() {
        let null = FieldValue::Null;
        let string = FieldValue::String("a".to_string());
        assert_eq!(null.compare(&string), Ordering::Less);
        assert_eq!(
            FieldValue::Integer(2).compare(&FieldValue::Double(1.5)),
            Ordering::Greater
        );
    }
}
