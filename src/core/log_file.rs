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

//! Loading collections from disk.

use crate::core::diagnostics::DiagnosticSink;
use crate::core::log_collection::{CollectionError, LogCollection};
use crate::parser::LogFileType;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Rendered HTML logs are not line based.
const UNSUPPORTED_EXTENSIONS: [&str; 2] = ["html", "htm"];

impl LogCollection {
    /// Parse one log file. The file type is inferred from its name.
    pub fn from_file(path: &Path, sink: &mut dyn DiagnosticSink) -> Result<Self, CollectionError> {
        profiling::scope!("LogCollection::from_file");

        let unsupported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                UNSUPPORTED_EXTENSIONS
                    .iter()
                    .any(|bad| ext.eq_ignore_ascii_case(bad))
            });
        if unsupported {
            return Err(CollectionError::UnsupportedFile(path.to_path_buf()));
        }

        let read_start = std::time::Instant::now();
        let buffer = fs::read(path)?;
        // Lossy conversion, the game occasionally writes invalid UTF-8
        let content = String::from_utf8_lossy(&buffer);
        debug!(
            path = %path.display(),
            bytes = buffer.len(),
            elapsed = ?read_start.elapsed(),
            "Read log file"
        );

        let mut collection = Self::from_lines(content.lines(), sink);
        collection.file_type = path
            .file_name()
            .and_then(|name| name.to_str())
            .map_or(LogFileType::Unknown, LogFileType::from_file_name);
        info!(
            path = %path.display(),
            entries = collection.entries.len(),
            file_type = ?collection.file_type,
            "Loaded log file"
        );
        Ok(collection)
    }

    /// Parse and collate every supported file in `folder`, in name order.
    pub fn from_folder(
        folder: &Path,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, CollectionError> {
        Self::from_folder_matching(folder, |_| true, sink)
    }

    /// Like [`Self::from_folder`], only picking up files whose name `accept` allows.
    pub fn from_folder_matching(
        folder: &Path,
        accept: impl Fn(&str) -> bool,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, CollectionError> {
        if !folder.is_dir() {
            return Err(CollectionError::NotAFolder(folder.to_path_buf()));
        }

        let mut paths: Vec<_> = fs::read_dir(folder)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        paths.sort();

        let mut collection = Self::new();
        let wanted = paths.iter().filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(&accept)
        });
        for path in wanted {
            info!(path = %path.display(), "Parsing");
            match Self::from_file(path, sink) {
                Ok(file) => collection.collate(file)?,
                Err(CollectionError::UnsupportedFile(path)) => {
                    warn!(path = %path.display(), "File isn't supported, skipping");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::Diagnostic;
    use std::io::Write;

    fn write(dir: &Path, name: &str, lines: &[&str]) {
        let mut file = fs::File::create(dir.join(name)).expect("create file");
        for line in lines {
            writeln!(file, "{line}").expect("write line");
        }
    }

    #[test]
    fn test_from_file_infers_type() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(
            dir.path(),
            "attack.txt",
            &["[2024-01-01T00:00:01Z] ATTACK: ckey1/(Bob) has punched ckey2/(Alice) (Bar (1,2,3))"],
        );
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let logs = LogCollection::from_file(&dir.path().join("attack.txt"), &mut diagnostics)
            .expect("readable");
        assert_eq!(logs.file_type, LogFileType::Attack);
        assert_eq!(logs.len(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_from_file_lossy_utf8() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("game.txt");
        fs::write(&path, b"[2024-01-01T00:00:01Z] GAME: caf\xe9 opened\n").expect("write");
        let logs = LogCollection::from_file(&path, &mut Vec::<Diagnostic>::new()).expect("readable");
        assert_eq!(logs.len(), 1);
        assert!(logs.entries()[0].raw_line.contains('\u{FFFD}'));
    }

    #[test]
    fn test_from_file_rejects_html() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), "round.html", &["<html></html>"]);
        let err = LogCollection::from_file(&dir.path().join("round.html"), &mut Vec::<Diagnostic>::new())
            .expect_err("html is unsupported");
        assert!(matches!(err, CollectionError::UnsupportedFile(_)));
    }

    #[test]
    fn test_from_folder_collates() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(
            dir.path(),
            "game.txt",
            &[
                "Starting up round ID 4242.",
                "-------------------------",
                "[2024-01-01T00:00:01Z] GAME: Round started",
                "[2024-01-01T00:00:04Z] GAME: Round ended",
            ],
        );
        write(
            dir.path(),
            "say.txt",
            &[r#"[2024-01-01T00:00:02Z] SAY: ckey1/(Bob) "hi" (Bar (1,2,3))"#],
        );
        write(dir.path(), "index.html", &["<html></html>"]);
        fs::create_dir(dir.path().join("nested")).expect("mkdir");

        let logs = LogCollection::from_folder(dir.path(), &mut Vec::<Diagnostic>::new()).expect("folder");
        assert_eq!(logs.file_type, LogFileType::Collated);
        assert_eq!(logs.round_id, 4242);
        assert_eq!(logs.len(), 3);
        assert_eq!(logs.entries()[1].agent_ckey(), Some("ckey1"));
    }

    #[test]
    fn test_from_folder_matching() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), "game.txt", &["[2024-01-01T00:00:01Z] GAME: Round started"]);
        write(dir.path(), "runtime.txt", &["[2024-01-01T00:00:02Z] RUNTIME: oops"]);

        let logs = LogCollection::from_folder_matching(
            dir.path(),
            |name| name == "game.txt",
            &mut Vec::<Diagnostic>::new(),
        )
        .expect("folder");
        assert_eq!(logs.len(), 1);
    }

    #[test]
    fn test_from_folder_rejects_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), "game.txt", &[]);
        let err = LogCollection::from_folder(&dir.path().join("game.txt"), &mut Vec::<Diagnostic>::new())
            .expect_err("not a folder");
        assert!(matches!(err, CollectionError::NotAFolder(_)));
    }
}
