//! Engine response protocol: line-oriented `KEY=value` decoding.

use std::{fmt, str::FromStr};

use serde::Serialize;
use thiserror::Error;

/// The closed set of keys the engine may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolKey {
    Status,
    Result,
    ErrorType,
    ErrorMessage,
}

impl ProtocolKey {
    pub const ALL: [ProtocolKey; 4] = [
        ProtocolKey::Status,
        ProtocolKey::Result,
        ProtocolKey::ErrorType,
        ProtocolKey::ErrorMessage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProtocolKey::Status => "STATUS",
            ProtocolKey::Result => "RESULT",
            ProtocolKey::ErrorType => "ERROR_TYPE",
            ProtocolKey::ErrorMessage => "ERROR_MESSAGE",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for ProtocolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the `STATUS` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "SUCCESS",
            Status::Error => "ERROR",
        }
    }
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(Status::Success),
            "ERROR" => Ok(Status::Error),
            _ => Err(()),
        }
    }
}

/// Decoded engine response. Every field stays `None` unless its key was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub status: Option<String>,
    pub result: Option<String>,
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl ResultRecord {
    /// Typed view of `status`; `None` when missing or not a known sentinel.
    pub fn status(&self) -> Option<Status> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn is_success(&self) -> bool {
        self.status() == Some(Status::Success)
    }

    fn apply(&mut self, key: ProtocolKey, value: &str) {
        let slot = match key {
            ProtocolKey::Status => &mut self.status,
            ProtocolKey::Result => &mut self.result,
            ProtocolKey::ErrorType => &mut self.error_type,
            ProtocolKey::ErrorMessage => &mut self.error_message,
        };
        *slot = Some(value.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("could not parse response line: {0}")]
    MalformedLine(String),
    #[error("unsupported response key {0}")]
    UnsupportedKey(String),
}

/// Split a line into `(key, value)` when it matches `^[A-Za-z_]+=.+$`.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key_ok = !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphabetic() || b == b'_');
    if key_ok && !value.is_empty() {
        Some((key, value))
    } else {
        None
    }
}

/// Decode a raw engine response.
///
/// Blank lines are ignored. Any malformed line or unknown key fails the whole
/// response. Repeated keys overwrite earlier values.
pub fn parse_response(raw: &str) -> Result<ResultRecord, DecodeError> {
    let mut record = ResultRecord::default();
    let lines = raw.lines().map(|l| l.strip_suffix('\r').unwrap_or(l));
    for line in lines.filter(|l| !l.trim().is_empty()) {
        let (key, value) =
            split_line(line).ok_or_else(|| DecodeError::MalformedLine(line.to_string()))?;
        let key = ProtocolKey::from_key(key)
            .ok_or_else(|| DecodeError::UnsupportedKey(key.to_string()))?;
        record.apply(key, value);
    }
    Ok(record)
}
