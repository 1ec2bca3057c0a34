use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// The value of a single report metric.
///
/// Serialized without a tag: numbers, strings and string lists appear as the
/// plain JSON value, and `Unavailable` as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
    /// Placeholder for a metric whose calculation failed.
    Unavailable,
}

impl MetricValue {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, MetricValue::Unavailable)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetricValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetricValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<f64> for MetricValue {
    // JSON has no representation for NaN or infinities.
    fn from(value: f64) -> Self {
        if value.is_finite() {
            MetricValue::Number(value)
        } else {
            MetricValue::Unavailable
        }
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<Vec<String>> for MetricValue {
    fn from(value: Vec<String>) -> Self {
        MetricValue::List(value)
    }
}

/// The metrics of one report, in insertion order.
///
/// Serializes as a single JSON object whose keys keep the order in which the
/// metrics were computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportMetrics {
    entries: Vec<(String, MetricValue)>,
}

impl ReportMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing any previous value while keeping its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetricValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of the metrics that could not be computed.
    pub fn unavailable(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, v)| v.is_unavailable())
            .map(|(k, _)| k)
            .collect()
    }
}

impl Serialize for ReportMetrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ReportMetrics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetricsVisitor;

        impl<'de> Visitor<'de> for MetricsVisitor {
            type Value = ReportMetrics;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of metric names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut report = ReportMetrics::new();
                while let Some((key, value)) = access.next_entry::<String, MetricValue>()? {
                    report.insert(key, value);
                }
                Ok(report)
            }
        }

        deserializer.deserialize_map(MetricsVisitor)
    }
}
