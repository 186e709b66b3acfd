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

//! Errors raised while turning a single raw line into a [`LogEntry`].
//!
//! Both variants are whole-line failures: the collection builder catches
//! them, hands them to a diagnostic sink and moves on to the next line.
//!
//! [`LogEntry`]: crate::parser::entry::LogEntry

use super::LogType;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The line is not shaped like `[timestamp] body` at all.
    #[error("malformed line: {0}")]
    Structural(String),

    /// The tag was recognised but the body lacks a delimiter its extractor needs.
    #[error("{log_type} body does not match any known shape (expected {expected})")]
    ExtractorMismatch {
        log_type: LogType,
        expected: &'static str,
    },
}

impl ParseError {
    pub(crate) fn structural(reason: impl Into<String>) -> Self {
        Self::Structural(reason.into())
    }

    pub(crate) const fn mismatch(log_type: LogType, expected: &'static str) -> Self {
        Self::ExtractorMismatch { log_type, expected }
    }
}
