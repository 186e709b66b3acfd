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

//! Filters over the working set.
//!
//! Every filter reads the current working set and replaces it with the
//! entries it keeps. A filter that would keep nothing leaves the working set
//! alone and reports [`FilterOutcome::Empty`] instead.

use crate::core::LogCollection;
use crate::parser::{canonical_ckey, Location, LogEntry, LogType};
use std::collections::BTreeSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("radius must be positive, got {0}")]
    InvalidRadius(i32),
    #[error("'{0}' is not a location, expected x,y,z")]
    InvalidLocation(String),
    #[error("walking error must not be negative, got {0}")]
    InvalidWalkingError(i32),
    #[error("nothing to filter by")]
    EmptyQuery,
    #[error("not enough information to sort the logs")]
    NotSortable,
}

/// What a filter did to the working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The working set now holds this many entries
    Applied(usize),
    /// Nothing matched; the working set was left unchanged
    Empty,
}

/// How [`LogCollection::filter_by_location_name`] compares names.
/// Both ignore case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMatch {
    #[default]
    Exact,
    Contains,
}

/// Largest x or y the logs can hold (three digits).
const MAX_XY: i32 = 999;
/// Largest z the logs can hold (two digits).
const MAX_Z: i32 = 99;

/// Parse a user-supplied `x,y,z` (parentheses optional). Coordinates outside
/// what a log line can carry are rejected.
pub fn parse_location_arg(text: &str) -> Result<Location, FilterError> {
    let invalid = || FilterError::InvalidLocation(text.to_string());
    let location: Location = text.parse().map_err(|_| invalid())?;
    let on_map = (0..=MAX_XY).contains(&location.x)
        && (0..=MAX_XY).contains(&location.y)
        && (0..=MAX_Z).contains(&location.z);
    if on_map {
        Ok(location)
    } else {
        Err(invalid())
    }
}

impl LogCollection {
    /// Install `kept` as the new working set unless it is empty.
    pub(super) fn apply(&mut self, kept: Vec<usize>, filter: &str) -> FilterOutcome {
        if kept.is_empty() {
            warn!(filter, "Operation completed with empty set, working set left unchanged");
            return FilterOutcome::Empty;
        }
        debug!(filter, before = self.working_set.len(), after = kept.len(), "Filter applied");
        let count = kept.len();
        self.working_set = kept;
        FilterOutcome::Applied(count)
    }

    fn retain_working(&self, mut keep: impl FnMut(&LogEntry) -> bool) -> Vec<usize> {
        self.working_set
            .iter()
            .copied()
            .filter(|&idx| keep(&self.entries[idx]))
            .collect()
    }

    /// Keep entries whose agent is one of `ckeys` (case-insensitive).
    pub fn filter_ckeys<S: AsRef<str>>(&mut self, ckeys: &[S]) -> Result<FilterOutcome, FilterError> {
        profiling::scope!("filter_ckeys");
        let wanted: BTreeSet<String> = ckeys
            .iter()
            .filter_map(|ckey| canonical_ckey(ckey.as_ref()))
            .collect();
        if wanted.is_empty() {
            return Err(FilterError::EmptyQuery);
        }
        let kept = self.retain_working(|entry| {
            entry
                .agent_ckey()
                .is_some_and(|ckey| wanted.contains(ckey))
        });
        Ok(self.apply(kept, "ckeys"))
    }

    /// Keep entries whose raw line contains any of `strings`.
    ///
    /// With `additive`, matches are searched in all entries and added to the
    /// current working set instead of narrowing it.
    pub fn filter_strings<S: AsRef<str>>(
        &mut self,
        strings: &[S],
        case_sensitive: bool,
        additive: bool,
    ) -> Result<FilterOutcome, FilterError> {
        profiling::scope!("filter_strings");
        let needles: Vec<String> = strings
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| !s.is_empty())
            .map(|s| {
                if case_sensitive {
                    s.to_string()
                } else {
                    s.to_lowercase()
                }
            })
            .collect();
        if needles.is_empty() {
            return Err(FilterError::EmptyQuery);
        }

        let matches = |entry: &LogEntry| {
            if case_sensitive {
                needles.iter().any(|n| entry.raw_line.contains(n.as_str()))
            } else {
                let haystack = entry.raw_line.to_lowercase();
                needles.iter().any(|n| haystack.contains(n.as_str()))
            }
        };

        if !additive {
            let kept = self.retain_working(matches);
            return Ok(self.apply(kept, "strings"));
        }

        let found: Vec<usize> = (0..self.entries.len())
            .filter(|&idx| matches(&self.entries[idx]))
            .collect();
        if found.is_empty() {
            return Ok(self.apply(found, "strings (additive)"));
        }
        let union: BTreeSet<usize> = self.working_set.iter().copied().chain(found).collect();
        Ok(self.apply(union.into_iter().collect(), "strings (additive)"))
    }

    /// Keep entries of the `include` kinds (all kinds when empty) that are not
    /// in `exclude`. Exclusion wins when a kind is in both.
    pub fn filter_by_type(
        &mut self,
        include: &[LogType],
        exclude: &[LogType],
    ) -> Result<FilterOutcome, FilterError> {
        if include.is_empty() && exclude.is_empty() {
            return Err(FilterError::EmptyQuery);
        }
        let kept = self.retain_working(|entry| {
            (include.is_empty() || include.contains(&entry.log_type))
                && !exclude.contains(&entry.log_type)
        });
        Ok(self.apply(kept, "type"))
    }

    pub fn filter_by_location_name(
        &mut self,
        name: &str,
        mode: NameMatch,
    ) -> Result<FilterOutcome, FilterError> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Err(FilterError::EmptyQuery);
        }
        let kept = self.retain_working(|entry| {
            entry.location_name.as_ref().is_some_and(|own| {
                let own = own.to_lowercase();
                match mode {
                    NameMatch::Exact => own == name,
                    NameMatch::Contains => own.contains(&name),
                }
            })
        });
        Ok(self.apply(kept, "location name"))
    }

    /// Keep entries on the same z-level within `radius` tiles on both axes.
    /// Entries without a location are dropped.
    pub fn filter_by_radius(
        &mut self,
        location: Location,
        radius: i32,
    ) -> Result<FilterOutcome, FilterError> {
        if radius <= 0 {
            return Err(FilterError::InvalidRadius(radius));
        }
        let kept = self.retain_working(|entry| {
            entry
                .location
                .is_some_and(|own| own.within_box(&location, radius))
        });
        Ok(self.apply(kept, "radius"))
    }
}
