mod client;
mod parser;

pub use client::{attach_template, CommandRunner, ListError, RawOutput, TmuxClient};
pub use parser::{parse_sessions, ParseError};

use chrono::{DateTime, Local, Utc};

/// Represents a tmux session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Session name
    pub name: String,
    /// Whether any client is attached
    pub attached: bool,
    /// When the session was created
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Creation time in the local timezone, ISO-8601 with second precision
    pub fn created_at_local(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    }
}
