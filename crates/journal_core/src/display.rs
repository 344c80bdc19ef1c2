//! Presentation helpers applied at the UI boundary.
//!
//! Storage is strictly UTC; conversion to the viewer's offset happens here
//! and is never written back.

use chrono::{DateTime, FixedOffset, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";
const MAX_OFFSET_SECONDS: i32 = 14 * 3600;

static OFFSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:utc|gmt)?([+-])(\d{1,2})(?::?(\d{2}))?$").expect("valid offset regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayError {
    pub input: String,
}

impl Display for DisplayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported UTC offset `{}`; expected UTC, +HH:MM or -HH:MM",
            self.input
        )
    }
}

impl Error for DisplayError {}

/// How timestamps are shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub offset: FixedOffset,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { offset: utc() }
    }
}

/// Parses `UTC`, `Z`, `+05:30`, `-0800`, `UTC+8` and similar forms.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, DisplayError> {
    let trimmed = value.trim();
    let invalid = || DisplayError {
        input: trimmed.to_string(),
    };

    if ["utc", "gmt", "z"]
        .iter()
        .any(|name| trimmed.eq_ignore_ascii_case(name))
    {
        return Ok(utc());
    }

    let captures = OFFSET_RE.captures(trimmed).ok_or_else(invalid)?;
    let hours: i32 = captures[2].parse().map_err(|_| invalid())?;
    let minutes: i32 = match captures.get(3) {
        Some(value) => value.as_str().parse().map_err(|_| invalid())?,
        None => 0,
    };
    if minutes >= 60 {
        return Err(invalid());
    }

    let magnitude = hours * 3600 + minutes * 60;
    if magnitude > MAX_OFFSET_SECONDS {
        return Err(invalid());
    }
    let seconds = if &captures[1] == "-" {
        -magnitude
    } else {
        magnitude
    };

    FixedOffset::east_opt(seconds).ok_or_else(invalid)
}

/// Renders a stored UTC instant as local wall time in `offset`.
pub fn format_created_at(created_at: DateTime<Utc>, offset: FixedOffset) -> String {
    created_at
        .with_timezone(&offset)
        .format(CREATED_AT_FORMAT)
        .to_string()
}

pub fn format_minutes(minutes: i64) -> String {
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{minutes} minutes")
    }
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).expect("zero offset is valid")
}
