// Metric model shared by every parser
//
// - mod.rs: Metric, Labels and exact MetricValue
// - exposition.rs: Prometheus text format writer

pub mod exposition;

pub use exposition::{write_exposition, ExpositionWriter};

use crate::{SmartmonError, SmartmonResult};
use std::fmt;

/// Ordered label set with unique keys.
///
/// Insertion order is kept so every series renders its labels the same way
/// on every run. Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Labels(Vec<(String, String)>);

impl Labels {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Builder form of [`Labels::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Append every pair of `other`, replacing keys already present
    pub fn extend(&mut self, other: &Labels) {
        for (k, v) in other.iter() {
            self.insert(k, v);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Exact metric value.
///
/// Counters and thresholds are kept as integers or decimal text and never
/// pass through a float, so they render exactly as smartctl reported them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetricValue {
    Bool(bool),
    Integer(i128),
    /// Normalized decimal text: optional `-`, no redundant leading zeros, a fraction
    Decimal(String),
}

impl MetricValue {
    /// Parse captured text as an exact decimal.
    ///
    /// Surrounding whitespace is ignored. Accepts an optional sign, digits
    /// and an optional fraction (`"000"`, `"36"`, `"-4"`, `"1.50"`).
    pub fn parse(text: &str) -> SmartmonResult<Self> {
        let trimmed = text.trim();
        let invalid = || SmartmonError::InvalidValue(format!("{:?} is not a decimal", text));

        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !frac_part.map_or(true, all_digits) {
            return Err(invalid());
        }
        if int_part.is_empty() && frac_part.map_or(true, str::is_empty) {
            return Err(invalid());
        }

        match frac_part {
            None => {
                let magnitude: i128 = int_part.parse().map_err(|_| invalid())?;
                Ok(MetricValue::Integer(if negative { -magnitude } else { magnitude }))
            }
            Some(frac) => {
                let int_norm = int_part.trim_start_matches('0');
                let int_norm = if int_norm.is_empty() { "0" } else { int_norm };
                let is_zero = int_norm == "0" && frac.bytes().all(|b| b == b'0');
                let sign = if negative && !is_zero { "-" } else { "" };
                if frac.is_empty() {
                    Ok(MetricValue::Decimal(format!("{}{}", sign, int_norm)))
                } else {
                    Ok(MetricValue::Decimal(format!("{}{}.{}", sign, int_norm, frac)))
                }
            }
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Bool(true) => f.write_str("1"),
            MetricValue::Bool(false) => f.write_str("0"),
            MetricValue::Integer(i) => write!(f, "{}", i),
            MetricValue::Decimal(d) => f.write_str(d),
        }
    }
}

impl From<bool> for MetricValue {
    fn from(value: bool) -> Self {
        MetricValue::Bool(value)
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Integer(value as i128)
    }
}

/// A single observation: unprefixed snake_case name, labels and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub name: String,
    pub labels: Labels,
    pub value: MetricValue,
}

impl Metric {
    pub fn new(name: impl Into<String>, labels: Labels, value: impl Into<MetricValue>) -> Self {
        Self {
            name: name.into(),
            labels,
            value: value.into(),
        }
    }

    /// Build a metric from captured text, failing if it is not an exact decimal
    pub fn parsed(name: impl Into<String>, labels: Labels, raw: &str) -> SmartmonResult<Self> {
        Ok(Self {
            name: name.into(),
            labels,
            value: MetricValue::parse(raw)?,
        })
    }
}

#[cfg(test)]
mod metrics_tests;
