//! Error types shared by the collector and the publisher

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty time string")]
    EmptyTime,

    #[error("invalid time segment {segment:?} in {input:?}")]
    TimeSegment { input: String, segment: String },

    #[error("invalid day prefix {prefix:?} in {input:?}")]
    DayPrefix { input: String, prefix: String },

    #[error("time {0:?} overflows")]
    TimeOverflow(String),

    #[error("line is not valid UTF-8 after byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },

    #[error("token {0:?} has no '='")]
    MissingEquals(String),

    #[error("token {0:?} has an empty key")]
    EmptyKey(String),

    #[error("invalid metric value {value:?} for {name}")]
    MetricValue { name: String, value: String },
}

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("process error: {0}")]
    Process(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    pub fn process<S: Into<String>>(msg: S) -> Self {
        TrackerError::Process(msg.into())
    }

    pub fn transport<S: Into<String>>(msg: S) -> Self {
        TrackerError::Transport(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        TrackerError::Config(msg.into())
    }
}

impl From<reqwest::Error> for TrackerError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TrackerError::Transport(format!("request timed out: {}", e))
        } else {
            TrackerError::Transport(e.to_string())
        }
    }
}

impl From<toml::de::Error> for TrackerError {
    fn from(e: toml::de::Error) -> Self {
        TrackerError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for TrackerError {
    fn from(e: toml::ser::Error) -> Self {
        TrackerError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
