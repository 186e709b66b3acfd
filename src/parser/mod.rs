// LogBuddy - GPL-3.0-or-later
// This file is part of LogBuddy.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// LogBuddy is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LogBuddy is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LogBuddy.  If not, see <https://www.gnu.org/licenses/>.

//! Turning raw log lines into [`LogEntry`] records.
//!
//! A line looks like `[timestamp] TAG: body`. The classifier strips the
//! timestamp, picks the [`LogType`] from the tag and hands the body to the
//! extractor registered for that kind. TGUI lines have no tag and are
//! recognised by their shape instead.

pub mod entry;
pub mod error;
pub mod extract;
pub mod location;
pub mod log_type;
pub mod player;

pub use entry::{AdminPrivateSubtype, AdminSubtype, DamageType, LogEntry, SiliconSubtype};
pub use error::ParseError;
pub use location::{extract_location, Location};
pub use log_type::{LogFileType, LogType};
pub use player::{canonical_ckey, Player};

use chrono::{DateTime, NaiveDateTime, Utc};

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse the bracketed timestamp. Zone-less stamps are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// TGUI lines have no `TAG: ` but mention a window or a mob.
fn is_tgui_shape(rest: &str) -> bool {
    !rest.contains(": ") && (rest.contains(" in ") || rest.contains(" (as "))
}

/// Classify and parse one raw line.
///
/// Tags missing from the registry are not an error: the entry is kept as
/// [`LogType::Unknown`] with the body as text.
pub fn parse_line(line: &str) -> Result<LogEntry, ParseError> {
    profiling::scope!("parse_line");

    let Some(stamped) = line.strip_prefix('[') else {
        return Err(ParseError::structural("does not start with '['"));
    };
    let (stamp, rest) = stamped
        .split_once("] ")
        .ok_or_else(|| ParseError::structural("no '] ' after the timestamp"))?;
    let time = parse_timestamp(stamp)
        .ok_or_else(|| ParseError::structural(format!("unparsable timestamp '{stamp}'")))?;

    // An empty vote result is logged as a bare "VOTE:"
    let rest = if rest.ends_with("VOTE:") {
        format!("{rest} ")
    } else {
        rest.to_string()
    };

    if is_tgui_shape(&rest) {
        let mut entry = LogEntry::new(line.to_string(), time, LogType::Tgui);
        if let Some(extract) = extract::extractor_for(LogType::Tgui) {
            extract(&rest, &mut entry)?;
        }
        return Ok(entry);
    }

    let Some((tag, body)) = rest.split_once(": ") else {
        let mut entry = LogEntry::new(line.to_string(), time, LogType::Unknown);
        entry.text = Some(rest.trim().to_string());
        return Ok(entry);
    };

    let log_type = LogType::from_tag(tag);
    let mut entry = LogEntry::new(line.to_string(), time, log_type);
    match extract::extractor_for(log_type) {
        Some(extract) => extract(body, &mut entry)?,
        None => entry.text = Some(body.to_string()),
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_say_line() {
        let e = parse_line(r#"[2024-01-01T00:00:00.0000Z] SAY: ckey1/(Bob) "Hello" (Bridge (12,34,2))"#)
            .expect("valid say line");
        assert_eq!(e.log_type, LogType::Say);
        assert_eq!(e.agent_ckey(), Some("ckey1"));
        assert!(e.text.as_deref().is_some_and(|t| t.contains("Hello")));
        assert_eq!(e.location, Some(Location::new(12, 34, 2)));
        assert_eq!(e.location_name.as_deref(), Some("Bridge"));
        assert_eq!(e.time, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid date"));
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2023, 5, 6, 7, 8, 9).single().expect("valid date");
        assert_eq!(parse_timestamp("2023-05-06T07:08:09"), Some(expected));
        assert_eq!(parse_timestamp("2023-05-06 07:08:09"), Some(expected));
        assert!(parse_timestamp("2023-05-06 07:08:09.123").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            parse_line("SAY: no bracket"),
            Err(ParseError::Structural(_))
        ));
        assert!(matches!(
            parse_line("[2024-01-01T00:00:00Z]SAY: no space"),
            Err(ParseError::Structural(_))
        ));
        assert!(matches!(
            parse_line("[not a time] SAY: x"),
            Err(ParseError::Structural(_))
        ));
    }

    #[test]
    fn test_unknown_tag_is_kept() {
        let e = parse_line("[2024-01-01T00:00:00Z] RUNTIME: list index out of bounds")
            .expect("unknown tag");
        assert_eq!(e.log_type, LogType::Unknown);
        assert_eq!(e.text.as_deref(), Some("list index out of bounds"));

        let e = parse_line("[2024-01-01T00:00:00Z] just some words").expect("no tag at all");
        assert_eq!(e.log_type, LogType::Unknown);
    }

    #[test]
    fn test_tag_case_insensitive() {
        let e = parse_line(r#"[2024-01-01T00:00:00Z] say: ckey1/(Bob) "hi" (Bar (1,2,3))"#)
            .expect("lowercase tag");
        assert_eq!(e.log_type, LogType::Say);
    }

    #[test]
    fn test_empty_vote() {
        let e = parse_line("[2024-01-01T00:00:00Z] VOTE:").expect("bare vote");
        assert_eq!(e.log_type, LogType::Vote);
        assert_eq!(e.text.as_deref(), Some(""));
    }

    #[test]
    fn test_tgui_shape() {
        let e = parse_line("[2024-01-01T00:00:00Z] ckey1 (as Bob at 10,20,2) in tgui_window")
            .expect("tgui");
        assert_eq!(e.log_type, LogType::Tgui);
        assert_eq!(e.agent_ckey(), Some("ckey1"));
        assert_eq!(e.location, Some(Location::new(10, 20, 2)));
    }

    #[test]
    fn test_extractor_mismatch_propagates() {
        let err = parse_line("[2024-01-01T00:00:00Z] ATTACK: something went boom")
            .expect_err("attack without agent");
        assert!(matches!(
            err,
            ParseError::ExtractorMismatch {
                log_type: LogType::Attack,
                ..
            }
        ));
    }

    #[test]
    fn test_every_bracketed_line_classifies_or_fails_cleanly() {
        use crate::core::{Diagnostic, LogCollection};

        let lines = [
            "[2024-01-01T00:00:00Z] ",
            "[2024-01-01T00:00:00Z] : ",
            "[2024-01-01T00:00:00Z] SAY: ",
            "[2024-01-01T00:00:00Z] ADMIN: ",
            "[2024-01-01T00:00:00Z] TCOMMS: (spans: ",
            "[2024-01-01T00:00:00Z] PDA: a) b",
        ];
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let logs = LogCollection::from_lines(lines, &mut diagnostics);

        assert_eq!(logs.entries().len() + diagnostics.len(), lines.len());
        assert!(logs.entries().iter().all(|e| e.raw_line.starts_with('[')));
        assert!(diagnostics.iter().all(|d| d.raw_line.starts_with('[')));
    }
}
