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

//! Who could have heard what.
//!
//! The logs never say where a player is, only where the things they did
//! happened. The simulation walks the entries in order, moves the player to
//! the location of every entry they took part in, and keeps the entries that
//! happened close enough to that last known position. It is a heuristic:
//! positions go stale between entries, which `walking_error` pads for.

use crate::core::filter::{FilterError, FilterOutcome};
use crate::core::LogCollection;
use crate::parser::{canonical_ckey, Location, LogType};
use std::collections::BTreeSet;

/// Tiles a player can hear speech from.
pub const HEARING_RANGE: i32 = 9;

/// Default padding on top of [`HEARING_RANGE`].
pub const DEFAULT_WALKING_ERROR: i32 = 4;

impl LogCollection {
    /// Indices of the working-set entries `ckey` plausibly perceived, in
    /// chronological order. With `types`, only entries of those kinds are
    /// kept unless `ckey` took part in them.
    pub fn heard_entries(
        &self,
        ckey: &str,
        types: Option<&[LogType]>,
        walking_error: i32,
    ) -> Result<Vec<usize>, FilterError> {
        self.heard_among(&self.working_set, ckey, types, walking_error)
    }

    fn heard_among(
        &self,
        candidates: &[usize],
        ckey: &str,
        types: Option<&[LogType]>,
        walking_error: i32,
    ) -> Result<Vec<usize>, FilterError> {
        profiling::scope!("heard_among");
        if !self.is_sortable() {
            return Err(FilterError::NotSortable);
        }
        if walking_error < 0 {
            return Err(FilterError::InvalidWalkingError(walking_error));
        }
        let ckey = canonical_ckey(ckey).ok_or(FilterError::EmptyQuery)?;
        let range = HEARING_RANGE.saturating_add(walking_error);

        let mut order = candidates.to_vec();
        order.sort_by_key(|&idx| (self.entries[idx].time, idx));

        let mut current = Location::ORIGIN;
        let mut previous = Location::ORIGIN;
        let mut heard = Vec::new();

        for idx in order {
            let entry = &self.entries[idx];

            if entry.involves(&ckey) {
                if let Some(location) = entry.location {
                    previous = current;
                    current = location;
                }
                heard.push(idx);
                continue;
            }

            // Changed z-level since the last move; position is unreliable
            if previous.z != current.z {
                continue;
            }
            if types.is_some_and(|types| !types.contains(&entry.log_type)) {
                continue;
            }

            let radio = entry.log_type == LogType::Tcomms;
            let audible = entry
                .location
                .map_or(radio, |location| radio || location.within_box(&current, range));
            if audible {
                heard.push(idx);
            }
        }

        Ok(heard)
    }

    /// Narrow the working set to what `ckey` could have heard.
    pub fn filter_heard(
        &mut self,
        ckey: &str,
        walking_error: i32,
    ) -> Result<FilterOutcome, FilterError> {
        let heard = self.heard_entries(ckey, None, walking_error)?;
        Ok(self.apply(heard, "heard"))
    }

    /// Reconstruct a conversation: the entries acted by one of `ckeys` that
    /// any of them could have heard.
    pub fn filter_conversation<S: AsRef<str>>(
        &mut self,
        ckeys: &[S],
        walking_error: i32,
    ) -> Result<FilterOutcome, FilterError> {
        let participants: BTreeSet<String> = ckeys
            .iter()
            .filter_map(|ckey| canonical_ckey(ckey.as_ref()))
            .collect();
        if participants.is_empty() {
            return Err(FilterError::EmptyQuery);
        }

        let spoken: Vec<usize> = self
            .working_set
            .iter()
            .copied()
            .filter(|&idx| {
                self.entries[idx]
                    .agent_ckey()
                    .is_some_and(|ckey| participants.contains(ckey))
            })
            .collect();

        let mut conversation = BTreeSet::new();
        for ckey in &participants {
            conversation.extend(self.heard_among(&spoken, ckey, None, walking_error)?);
        }

        // Indices follow the chronological order of `entries`
        let mut conversation: Vec<usize> = conversation.into_iter().collect();
        conversation.sort_by_key(|&idx| (self.entries[idx].time, idx));
        Ok(self.apply(conversation, "conversation"))
    }
}
