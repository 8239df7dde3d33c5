//! Metric samples and their `name=value` rendering

use crate::error::ParseError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Int(u64),
    Float(f64),
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{}", v),
            // Debug keeps the fractional part on whole numbers (62.0, not 62)
            MetricValue::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl MetricValue {
    fn parse(name: &str, raw: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::MetricValue {
            name: name.to_string(),
            value: raw.to_string(),
        };
        if raw.contains(['.', 'e', 'E']) {
            raw.parse().map(MetricValue::Float).map_err(|_| invalid())
        } else {
            raw.parse().map(MetricValue::Int).map_err(|_| invalid())
        }
    }
}

/// Ordered mapping of metric name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSample {
    entries: Vec<(String, MetricValue)>,
}

impl MetricSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a metric. Replacing keeps the existing position.
    pub fn set(&mut self, name: &str, value: MetricValue) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<MetricValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, MetricValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for MetricSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

impl FromStr for MetricSample {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut sample = MetricSample::new();
        for (name, raw) in crate::record::parse_pairs(line)? {
            let value = MetricValue::parse(name, raw)?;
            sample.set(name, value);
        }
        Ok(sample)
    }
}
