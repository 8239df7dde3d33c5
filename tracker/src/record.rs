//! Experiment records parsed from `key=value` lines

use crate::error::ParseError;

pub const CMD_KEY: &str = "cmd";
pub const CMD_VALUE: &str = "data";
pub const EXP_ID_KEY: &str = "exp_id";

/// Split a line into `(key, value)` pairs on whitespace runs, then on the
/// first `=` of each token.
pub fn parse_pairs(line: &str) -> Result<Vec<(&str, &str)>, ParseError> {
    line.split_whitespace()
        .map(|token| {
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| ParseError::MissingEquals(token.to_string()))?;
            if key.is_empty() {
                return Err(ParseError::EmptyKey(token.to_string()));
            }
            Ok((key, value))
        })
        .collect()
}

/// One datum: the fixed `cmd`/`exp_id` fields followed by the parsed ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(exp_id: u64) -> Self {
        Self {
            fields: vec![
                (CMD_KEY.to_string(), CMD_VALUE.to_string()),
                (EXP_ID_KEY.to_string(), exp_id.to_string()),
            ],
        }
    }

    /// Parse one input line. Later fields overwrite earlier ones with the
    /// same key, including `cmd` and `exp_id`.
    pub fn parse_line(exp_id: u64, line: &str) -> Result<Self, ParseError> {
        let mut record = Record::new(exp_id);
        for (key, value) in parse_pairs(line.trim())? {
            record.insert(key, value);
        }
        Ok(record)
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some(field) => field.1 = value.to_string(),
            None => self.fields.push((key.to_string(), value.to_string())),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields, the fixed `cmd` and `exp_id` included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
