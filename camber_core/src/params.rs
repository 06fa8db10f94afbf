//! # Parameter Values
//!
//! The typed value vocabulary shared by calculation inputs, results, report
//! sections and the persistence layer.
//!
//! Stored rows carry their parameters and results as JSON objects of
//! [`ParamValue`]s. The tagged representation means a row read back from
//! storage is *parsed*, never interpreted: a value is a number, a text, or a
//! list of texts, and anything else is a [`CalcError::Serialization`] error.
//!
//! [`ParamMap`] preserves insertion order so that exported reports list
//! parameters in the order the calculation produced them, independent of the
//! hash order of any intermediate container.
//!
//! ## Example
//!
//! ```rust
//! use camber_core::params::{ParamMap, ParamValue};
//!
//! let mut map = ParamMap::new();
//! map.insert("power_hp", ParamValue::Number(150.0));
//! map.insert("fuel_type", ParamValue::text("Petrol"));
//!
//! let json = map.to_json_string().unwrap();
//! let back = ParamMap::from_json_str(&json).unwrap();
//! assert_eq!(map, back);
//! ```

use crate::errors::{CalcError, CalcResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single typed parameter or result value.
///
/// Serialized with an explicit tag so stored data is self-describing:
///
/// ```json
/// {"type": "number", "value": 77.5}
/// {"type": "text", "value": "Petrol"}
/// {"type": "list", "value": ["54.3 км/ч", "90.4 км/ч"]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ParamValue {
    /// Numeric value (all formula inputs and outputs)
    Number(f64),
    /// Free text (fuel types, injector types, formatted summaries)
    Text(String),
    /// Ordered list of texts (per-gear speeds, recommendations)
    List(Vec<String>),
}

impl ParamValue {
    /// Convenience constructor for text values
    pub fn text(s: impl Into<String>) -> Self {
        ParamValue::Text(s.into())
    }

    /// Convenience constructor for list values
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Numeric payload, if this is a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text payload, if this is a text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render for report and export display.
    ///
    /// Numbers print with up to two fractional digits, with a trailing
    /// `.00`/`.0` removed so whole values read as integers. List items are
    /// joined with a comma.
    pub fn display(&self) -> String {
        match self {
            ParamValue::Number(n) => format_number(*n),
            ParamValue::Text(s) => s.clone(),
            ParamValue::List(items) => items.join(", "),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

/// Format a number for display: at most two fractional digits, no trailing
/// zeros after the point.
pub fn format_number(n: f64) -> String {
    let s = format!("{:.2}", n);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Insertion-ordered map from parameter name to [`ParamValue`].
///
/// Re-inserting an existing key replaces the value but keeps the key's
/// original position. Serializes as a plain JSON object in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamMap {
    entries: Vec<(String, ParamValue)>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. Replacement keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Serialize to the JSON object form stored in the database
    pub fn to_json_string(&self) -> CalcResult<String> {
        serde_json::to_string(self)
            .map_err(|e| CalcError::serialization(format!("failed to encode parameters: {}", e)))
    }

    /// Parse the stored JSON object form.
    ///
    /// Rejects anything that is not an object of tagged values so rows with
    /// unexpected content surface as errors instead of being interpreted.
    pub fn from_json_str(json: &str) -> CalcResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CalcError::serialization(format!("failed to decode parameters: {}", e)))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParamMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = ParamMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for ParamMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParamMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParamMapVisitor;

        impl<'de> Visitor<'de> for ParamMapVisitor {
            type Value = ParamMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object of tagged parameter values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = ParamMap::new();
                while let Some((key, value)) = access.next_entry::<String, ParamValue>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ParamMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut map = ParamMap::new();
        map.insert("zulu", 1.0);
        map.insert("alpha", 2.0);
        map.insert("mike", 3.0);
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["zulu", "alpha", "mike"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut map = ParamMap::new();
        map.insert("a", 1.0);
        map.insert("b", 2.0);
        map.insert("a", 9.0);
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map.get("a").and_then(|v| v.as_number()), Some(9.0));
    }

    #[test]
    fn test_json_round_trip() {
        let mut map = ParamMap::new();
        map.insert("power_hp", 150.0);
        map.insert("fuel_type", ParamValue::text("Petrol"));
        map.insert("speeds", ParamValue::list(["54.3 км/ч", "90.4 км/ч"]));

        let json = map.to_json_string().unwrap();
        let back = ParamMap::from_json_str(&json).unwrap();
        assert_eq!(map, back);
        let keys: Vec<&str> = back.keys().collect();
        assert_eq!(keys, vec!["power_hp", "fuel_type", "speeds"]);
    }

    #[test]
    fn test_tagged_wire_format() {
        let json = serde_json::to_string(&ParamValue::Number(77.5)).unwrap();
        assert_eq!(json, r#"{"type":"number","value":77.5}"#);
    }

    #[test]
    fn test_rejects_untagged_values() {
        // A bare number is not a tagged value
        assert!(ParamMap::from_json_str(r#"{"x": 5.0}"#).is_err());
        // Arbitrary text is not interpretable as a map at all
        assert!(ParamMap::from_json_str("__import__('os')").is_err());
        // Unknown tags are rejected
        assert!(ParamMap::from_json_str(r#"{"x": {"type":"code","value":"rm -rf"}}"#).is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(11.0), "11");
        assert_eq!(format_number(77.5), "77.5");
        assert_eq!(format_number(3.14159), "3.14");
    }
}
