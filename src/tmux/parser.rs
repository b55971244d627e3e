use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::SessionRecord;

/// One `list-sessions` line: attached flag, creation timestamp, then the name verbatim
static RE_SESSION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<attached>[0-9]+) (?P<created>[0-9]+) (?P<name>.*)$").unwrap()
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed session line: {0}")]
    MalformedLine(String),
}

/// Parse the full `list-sessions` output. One bad line rejects the whole listing.
pub fn parse_sessions(text: &str) -> Result<Vec<SessionRecord>, ParseError> {
    text.lines().map(parse_session_line).collect()
}

fn parse_session_line(line: &str) -> Result<SessionRecord, ParseError> {
    let malformed = || ParseError::MalformedLine(line.to_string());

    let caps = RE_SESSION_LINE.captures(line).ok_or_else(malformed)?;

    // Any non-zero digit means attached, whatever the width
    let attached = caps["attached"].bytes().any(|b| b != b'0');

    let created_at = caps["created"]
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(malformed)?;

    Ok(SessionRecord {
        name: caps["name"].to_string(),
        attached,
        created_at,
    })
}
