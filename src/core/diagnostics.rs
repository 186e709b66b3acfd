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

//! Where lines that could not be parsed end up.

use crate::parser::ParseError;

/// Receives every line the collection builder had to skip.
pub trait DiagnosticSink {
    fn report(&mut self, raw_line: &str, error: &ParseError);
}

/// Logs skipped lines as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, raw_line: &str, error: &ParseError) {
        tracing::warn!(line = raw_line, %error, "Could not be parsed");
    }
}

/// Drops everything, for `--quiet` runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn report(&mut self, raw_line: &str, error: &ParseError) {
        tracing::trace!(line = raw_line, %error, "Skipped line");
    }
}

/// A skipped line and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub raw_line: String,
    pub error: ParseError,
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, raw_line: &str, error: &ParseError) {
        self.push(Diagnostic {
            raw_line: raw_line.to_string(),
            error: error.clone(),
        });
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, raw_line: &str, error: &ParseError) {
        (**self).report(raw_line, error);
    }
}
