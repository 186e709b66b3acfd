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

//! The parsed entries of one or more log files, plus the filtered view over them.
//!
//! `entries` is the authoritative, chronologically sorted list. The working
//! set is a list of indices into it, which is what every filter narrows and
//! what gets printed or written out.

use crate::core::diagnostics::DiagnosticSink;
use crate::parser::{parse_line, LogEntry, LogFileType, LogType, ParseError};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const ROUND_BANNER: &str = "Starting up round ID ";
const CENSORED: &str = "-censored";
const VOTE_CONTINUATION: &str = "- <b>";
const CONTINUATION: &str = "- ";
/// Joins a continuation onto the line it belongs to, keeping both on one physical line.
const CONTINUATION_SEPARATOR: &str = "\\n";

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("not enough information to sort the logs")]
    NotSortable,
    #[error("{} does not seem to be supported", .0.display())]
    UnsupportedFile(PathBuf),
    #[error("{} is not a folder", .0.display())]
    NotAFolder(PathBuf),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct LogCollection {
    /// Round the logs belong to, -1 if unknown
    pub round_id: i64,
    pub file_type: LogFileType,
    /// Where the logs came from, recorded in written files
    pub log_source: Option<String>,
    pub(super) entries: Vec<LogEntry>,
    pub(super) working_set: Vec<usize>,
    ckeys_seen: BTreeSet<String>,
    sortable: bool,
}

impl Default for LogCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl LogCollection {
    pub const fn new() -> Self {
        Self {
            round_id: -1,
            file_type: LogFileType::Unknown,
            log_source: None,
            entries: Vec::new(),
            working_set: Vec::new(),
            ckeys_seen: BTreeSet::new(),
            sortable: true,
        }
    }

    /// Parse a batch of raw lines. Lines that fail to parse are handed to
    /// `sink` and skipped.
    pub fn from_lines<I, S>(lines: I, sink: &mut dyn DiagnosticSink) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        profiling::scope!("LogCollection::from_lines");
        let mut builder = CollectionBuilder::new(sink);
        for line in lines {
            builder.push_line(line.as_ref());
        }
        builder.finish()
    }

    /// Every entry, in chronological order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// The working set, in order.
    pub fn working(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.working_set.iter().map(|&idx| &self.entries[idx])
    }

    pub fn head(&self, n: usize) -> impl Iterator<Item = &LogEntry> {
        self.working().take(n)
    }

    pub fn tail(&self, n: usize) -> impl Iterator<Item = &LogEntry> {
        self.working().skip(self.working_set.len().saturating_sub(n))
    }

    /// Size of the working set.
    pub fn len(&self) -> usize {
        self.working_set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working_set.is_empty()
    }

    /// Distinct ckeys seen acting in any entry.
    pub const fn ckeys_seen(&self) -> &BTreeSet<String> {
        &self.ckeys_seen
    }

    pub const fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// For collections assembled from sources whose timestamps cannot be trusted.
    /// Sorting and the perception filters refuse to run afterwards.
    pub fn mark_unsortable(&mut self) {
        self.sortable = false;
    }

    /// Drop all filters.
    pub fn reset_work_set(&mut self) {
        self.working_set = (0..self.entries.len()).collect();
    }

    /// Sort the working set chronologically (stable).
    pub fn sort(&mut self) -> Result<(), CollectionError> {
        if !self.sortable {
            return Err(CollectionError::NotSortable);
        }
        let entries = &self.entries;
        self.working_set.sort_by_key(|&idx| (entries[idx].time, idx));
        Ok(())
    }

    /// Append entries, re-sort and reset the working set.
    pub fn add_entries(&mut self, entries: impl IntoIterator<Item = LogEntry>) {
        let start = self.entries.len();
        self.entries.extend(entries);
        for entry in &self.entries[start..] {
            if let Some(ckey) = entry.agent_ckey() {
                self.ckeys_seen.insert(ckey.to_string());
            }
        }
        if self.sortable {
            self.entries.sort_by_key(|entry| entry.time);
        }
        self.reset_work_set();
    }

    /// Merge `other` into this collection. The result is marked as collated and
    /// its working set is reset.
    pub fn collate(&mut self, other: Self) -> Result<(), CollectionError> {
        profiling::scope!("LogCollection::collate");
        if !self.sortable || !other.sortable {
            return Err(CollectionError::NotSortable);
        }
        if self.round_id == -1 {
            self.round_id = other.round_id;
        }
        if self.log_source.is_none() {
            self.log_source = other.log_source;
        }
        self.ckeys_seen.extend(other.ckeys_seen);
        self.entries.extend(other.entries);
        self.entries.sort_by_key(|entry| entry.time);
        self.file_type = LogFileType::Collated;
        self.reset_work_set();
        debug!(entries = self.entries.len(), "Collated logs");
        Ok(())
    }

    /// Write the working set's raw lines, followed by a trailer naming the
    /// generator and the log source.
    pub fn write_working(&self, writer: &mut impl Write) -> io::Result<()> {
        for entry in self.working() {
            writeln!(writer, "{}", entry.raw_line)?;
        }
        writeln!(
            writer,
            "Created using LogBuddy v{} ({})",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH")
        )?;
        if let Some(source) = &self.log_source {
            writeln!(writer, "Logs acquired from {source}")?;
        }
        Ok(())
    }

    /// Like [`Self::write_working`], overwriting `path`.
    pub fn write_working_to_file(&self, path: &Path) -> Result<(), CollectionError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_working(&mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), lines = self.len(), "Wrote working set");
        Ok(())
    }
}

/// Incremental [`LogCollection`] construction, one line at a time.
///
/// Besides parsing, this takes care of the lines that are not entries of
/// their own: the round banner, censored lines and continuations.
pub struct CollectionBuilder<'a> {
    sink: &'a mut dyn DiagnosticSink,
    entries: Vec<LogEntry>,
    /// Last line that failed to parse; a continuation may still repair it
    pending: Option<(String, ParseError)>,
    round_id: i64,
    lines_seen: usize,
    skip_separator: bool,
}

impl<'a> CollectionBuilder<'a> {
    pub fn new(sink: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            sink,
            entries: Vec::new(),
            pending: None,
            round_id: -1,
            lines_seen: 0,
            skip_separator: false,
        }
    }

    pub fn push_line(&mut self, line: &str) {
        let line = line.trim_matches(['\r', '\n', ' ']);
        self.lines_seen += 1;

        if self.lines_seen == 1 {
            if let Some((_, id)) = line.split_once(ROUND_BANNER) {
                let id = id.trim_end_matches(['.', ' ']);
                match id.parse() {
                    Ok(id) => self.round_id = id,
                    Err(_) => debug!(banner = line, "Round banner without a numeric id"),
                }
                self.skip_separator = true;
                return;
            }
        }
        if std::mem::take(&mut self.skip_separator) && line.starts_with('-') {
            return;
        }

        if line.is_empty() || line.starts_with(CENSORED) {
            return;
        }

        if let Some(rest) = line.strip_prefix(VOTE_CONTINUATION) {
            if self.append_vote_option(rest) {
                return;
            }
        }

        if let Some(rest) = line.strip_prefix(CONTINUATION) {
            if self.continue_previous(rest) {
                return;
            }
        }

        self.flush_pending();
        self.parse(line.to_string());
    }

    /// Vote results list one option per line, which belong to the vote's text.
    fn append_vote_option(&mut self, option: &str) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let Some(vote) = self
            .entries
            .last_mut()
            .filter(|entry| entry.log_type == LogType::Vote)
        else {
            return false;
        };
        let option = html_escape::decode_html_entities(&option.replace("</b>", "")).into_owned();
        match &mut vote.text {
            Some(text) if !text.is_empty() => {
                text.push_str(", ");
                text.push_str(&option);
            }
            text => *text = Some(option),
        }
        true
    }

    /// Merge a continuation into the preceding line and parse the result again,
    /// so data that only shows up after the break (usually the location) is kept.
    fn continue_previous(&mut self, rest: &str) -> bool {
        if let Some((raw, _)) = self.pending.take() {
            self.parse(format!("{raw}{CONTINUATION_SEPARATOR}{rest}"));
            return true;
        }
        let Some(previous) = self.entries.last_mut() else {
            return false;
        };
        let merged = format!("{}{CONTINUATION_SEPARATOR}{rest}", previous.raw_line);
        match parse_line(&merged) {
            Ok(entry) => {
                debug!(line = %merged, "Merged continuation line");
                *previous = entry;
            }
            Err(error) => self.sink.report(&merged, &error),
        }
        true
    }

    fn parse(&mut self, raw: String) {
        match parse_line(&raw) {
            Ok(entry) => self.entries.push(entry),
            Err(error) => self.pending = Some((raw, error)),
        }
    }

    fn flush_pending(&mut self) {
        if let Some((raw, error)) = self.pending.take() {
            self.sink.report(&raw, &error);
        }
    }

    pub fn finish(mut self) -> LogCollection {
        self.flush_pending();
        let mut entries = self.entries;
        entries.sort_by_key(|entry| entry.time);

        let ckeys_seen = entries
            .iter()
            .filter_map(LogEntry::agent_ckey)
            .map(str::to_string)
            .collect();

        info!(
            entries = entries.len(),
            lines = self.lines_seen,
            round_id = self.round_id,
            "Parsed log lines"
        );

        let mut collection = LogCollection {
            round_id: self.round_id,
            entries,
            ckeys_seen,
            ..LogCollection::new()
        };
        collection.reset_work_set();
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::Diagnostic;
    use crate::parser::Location;

    fn collect(lines: &[&str]) -> (LogCollection, Vec<Diagnostic>) {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let collection = LogCollection::from_lines(lines.iter().copied(), &mut diagnostics);
        (collection, diagnostics)
    }

    fn raw_lines(collection: &LogCollection) -> Vec<&str> {
        collection.working().map(|e| e.raw_line.as_str()).collect()
    }

    #[test]
    fn test_round_banner_and_separator() {
        let (logs, diagnostics) = collect(&[
            "Starting up round ID 201234.",
            "-------------------------",
            r#"[2024-01-01T00:00:01Z] SAY: ckey1/(Bob) "hi" (Bar (1,2,3))"#,
        ]);
        assert_eq!(logs.round_id, 201_234);
        assert_eq!(logs.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_without_banner_round_is_unknown() {
        let (logs, _) = collect(&["[2024-01-01T00:00:01Z] GAME: Round started"]);
        assert_eq!(logs.round_id, -1);
    }

    #[test]
    fn test_bad_lines_are_reported_and_skipped() {
        let (logs, diagnostics) = collect(&[
            "garbage",
            "[2024-01-01T00:00:01Z] ATTACK: nobody",
            "[2024-01-01T00:00:02Z] GAME: Round started",
        ]);
        assert_eq!(logs.len(), 1);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].raw_line, "garbage");
        assert!(matches!(diagnostics[0].error, ParseError::Structural(_)));
        assert!(matches!(
            diagnostics[1].error,
            ParseError::ExtractorMismatch { .. }
        ));
    }

    #[test]
    fn test_censored_lines_dropped() {
        let (logs, diagnostics) = collect(&[
            "[2024-01-01T00:00:01Z] GAME: Round started",
            "-censored(misc logs)",
        ]);
        assert_eq!(logs.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_vote_options_appended() {
        let (logs, _) = collect(&[
            "[2024-01-01T00:00:01Z] VOTE: Map vote results",
            "- <b>Box</b>: 3",
            "- <b>Meta &amp; Co</b>: 1",
        ]);
        assert_eq!(logs.len(), 1);
        assert_eq!(
            logs.entries()[0].text.as_deref(),
            Some("Map vote results, Box: 3, Meta & Co: 1")
        );
    }

    #[test]
    fn test_continuation_merges_into_vote() {
        let lines = [
            "[2024-01-01T00:00:01Z] VOTE: ckey1/(Bob) started a vote",
            "- for a crew transfer",
            "[2024-01-01T00:00:02Z] GAME: Round started",
        ];
        let (logs, diagnostics) = collect(&lines);
        assert!(diagnostics.is_empty());
        assert_eq!(logs.entries().len(), lines.len() - 1);
        assert_eq!(
            logs.entries()[0].raw_line,
            "[2024-01-01T00:00:01Z] VOTE: ckey1/(Bob) started a vote\\nfor a crew transfer"
        );
    }

    #[test]
    fn test_continuation_picks_up_location() {
        let (logs, _) = collect(&[
            r#"[2024-01-01T00:00:01Z] SAY: ckey1/(Captain) (priority announcement) "Attention crew"#,
            r#"- Please evacuate" (Bridge (12,34,2))"#,
        ]);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs.entries()[0].location, Some(Location::new(12, 34, 2)));
    }

    #[test]
    fn test_continuation_repairs_failed_line() {
        let (logs, diagnostics) = collect(&[
            r#"[2024-01-01T00:00:01Z] SAY: ckey1/(Bob) "first"#,
            r#"- second" (Bar (1,2,3))"#,
        ]);
        assert!(diagnostics.is_empty());
        assert_eq!(logs.len(), 1);
        assert_eq!(logs.entries()[0].location, Some(Location::new(1, 2, 3)));
    }

    #[test]
    fn test_failed_line_reported_once_when_unrepaired() {
        let (logs, diagnostics) = collect(&[
            r#"[2024-01-01T00:00:01Z] SAY: ckey1/(Bob) "first"#,
            "- still no end",
        ]);
        assert!(logs.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].raw_line.ends_with("\\nstill no end"));
    }

    #[test]
    fn test_sorted_stably_by_time() {
        let (logs, _) = collect(&[
            "[2024-01-01T00:00:03Z] GAME: third",
            "[2024-01-01T00:00:01Z] GAME: first",
            "[2024-01-01T00:00:03Z] GAME: fourth",
            "[2024-01-01T00:00:02Z] GAME: second",
        ]);
        let texts: Vec<_> = logs.working().filter_map(|e| e.text.as_deref()).collect();
        assert_eq!(texts, ["first", "second", "third", "fourth"]);
    }

    #[test]
    fn test_ckeys_seen() {
        let (logs, _) = collect(&[
            r#"[2024-01-01T00:00:01Z] SAY: Ckey1[DC]/(Bob) "hi""#,
            r#"[2024-01-01T00:00:02Z] SAY: ckey2/(Alice) "hey""#,
            r#"[2024-01-01T00:00:03Z] SAY: ckey1/(Bob) "again""#,
        ]);
        let seen: Vec<_> = logs.ckeys_seen().iter().map(String::as_str).collect();
        assert_eq!(seen, ["ckey1", "ckey2"]);
    }

    #[test]
    fn test_collate_keeps_order_and_resets() {
        let (mut game, _) = collect(&[
            "[2024-01-01T00:00:01Z] GAME: one",
            "[2024-01-01T00:00:04Z] GAME: four",
        ]);
        let (attack, _) = collect(&[
            "[2024-01-01T00:00:02Z] GAME: two",
            "[2024-01-01T00:00:03Z] GAME: three",
        ]);
        game.working_set.truncate(1);
        game.collate(attack).expect("both sortable");

        assert_eq!(game.file_type, LogFileType::Collated);
        assert_eq!(game.len(), 4);
        assert!(game.entries().windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_unsortable_refuses() {
        let (mut logs, _) = collect(&["[2024-01-01T00:00:01Z] GAME: one"]);
        logs.mark_unsortable();
        assert!(matches!(logs.sort(), Err(CollectionError::NotSortable)));
        assert!(matches!(
            LogCollection::new().collate(logs),
            Err(CollectionError::NotSortable)
        ));
    }

    #[test]
    fn test_reset_restores_everything() {
        let (mut logs, _) = collect(&[
            "[2024-01-01T00:00:01Z] GAME: one",
            "[2024-01-01T00:00:02Z] GAME: two",
            "[2024-01-01T00:00:03Z] GAME: three",
        ]);
        let all: Vec<String> = raw_lines(&logs).iter().map(|s| (*s).to_string()).collect();
        logs.working_set = vec![2];
        logs.reset_work_set();
        logs.reset_work_set();
        assert_eq!(raw_lines(&logs), all);
    }

    #[test]
    fn test_head_and_tail() {
        let (logs, _) = collect(&[
            "[2024-01-01T00:00:01Z] GAME: one",
            "[2024-01-01T00:00:02Z] GAME: two",
            "[2024-01-01T00:00:03Z] GAME: three",
        ]);
        let head: Vec<_> = logs.head(2).filter_map(|e| e.text.as_deref()).collect();
        let tail: Vec<_> = logs.tail(2).filter_map(|e| e.text.as_deref()).collect();
        assert_eq!(head, ["one", "two"]);
        assert_eq!(tail, ["two", "three"]);
        assert_eq!(logs.tail(10).count(), 3);
    }

    #[test]
    fn test_add_entries() {
        let (mut logs, _) = collect(&["[2024-01-01T00:00:05Z] GAME: late"]);
        let early = parse_line(r#"[2024-01-01T00:00:01Z] SAY: ckey9/(Zed) "early""#)
            .expect("valid line");
        logs.add_entries([early]);
        assert_eq!(logs.len(), 2);
        assert_eq!(logs.entries()[0].agent_ckey(), Some("ckey9"));
        assert!(logs.ckeys_seen().contains("ckey9"));
    }

    #[test]
    fn test_write_round_trip() {
        let lines = [
            r#"[2024-01-01T00:00:01Z] SAY: ckey1/(Bob) "Hello" (Bridge (12,34,2))"#,
            "[2024-01-01T00:00:02Z] ATTACK: ckey1/(Bob) has attacked ckey2/(Alice) with the fist (NEWHP: 90) (Bridge (12,35,2))",
            "[2024-01-01T00:00:03Z] VOTE: ckey1/(Bob) started a vote\\nfor a crew transfer",
        ];
        let (mut logs, _) = collect(&lines);
        logs.log_source = Some("https://example.org/round-1/".to_string());

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.txt");
        logs.write_working_to_file(&path).expect("write");

        let written = std::fs::read_to_string(&path).expect("read back");
        let written: Vec<&str> = written.lines().collect();
        assert_eq!(&written[..3], &lines);
        assert!(written[3].starts_with("Created using LogBuddy v"));
        assert_eq!(written[4], "Logs acquired from https://example.org/round-1/");

        let (reparsed, diagnostics) = collect(&written);
        assert_eq!(reparsed.entries(), logs.entries());
        // Only the two trailer lines are skipped
        assert_eq!(diagnostics.len(), 2);
    }
}
