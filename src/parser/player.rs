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

//! The recurring `ckey/(name)` player token.

use serde::Serialize;
use std::fmt;

/// Sentinel the game writes when a mob has no client attached.
pub const NO_KEY: &str = "*no key*";

/// A player reference as it appears in a log line.
///
/// Plain value type: two players with the same ckey are still independent copies.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Player {
    /// Canonical ckey (`[a-z0-9@]`), `None` for keyless mobs
    pub ckey: Option<String>,
    /// Display name of the mob at the time of logging
    pub mob_name: Option<String>,
}

impl Player {
    pub fn new(ckey: Option<&str>, mob_name: Option<&str>) -> Self {
        Self {
            ckey: ckey.and_then(canonical_ckey),
            mob_name: mob_name.map(str::to_string),
        }
    }

    /// A keyless player known only by name, e.g. an item or an NPC.
    pub fn named(mob_name: &str) -> Self {
        Self {
            ckey: None,
            mob_name: Some(mob_name.to_string()),
        }
    }

    /// Parse `ckey/(name)`. Parentheses around the name are optional, and a
    /// missing closing one is tolerated since callers usually split on `") "`.
    ///
    /// Returns `None` when the token has no `/` separator.
    pub fn parse(token: &str) -> Option<Self> {
        let (key, name) = token.trim().split_once('/')?;
        let name = name.strip_prefix('(').unwrap_or(name);
        let name = name.strip_suffix(')').unwrap_or(name);

        Some(Self {
            ckey: canonical_ckey(key),
            mob_name: Some(name.to_string()),
        })
    }

    /// Case-insensitive ckey comparison against a user-supplied key.
    pub fn has_ckey(&self, ckey: &str) -> bool {
        match (&self.ckey, canonical_ckey(ckey)) {
            (Some(own), Some(other)) => *own == other,
            _ => false,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/({})",
            self.ckey.as_deref().unwrap_or(NO_KEY),
            self.mob_name.as_deref().unwrap_or_default()
        )
    }
}

/// Canonicalize a raw key: drop a leading `@` and a trailing `[DC]`, then keep
/// only lowercase `[a-z0-9@]`. The `*no key*` sentinel and keys that end up
/// empty map to `None`.
pub fn canonical_ckey(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw == NO_KEY {
        return None;
    }
    let raw = raw.strip_prefix('@').unwrap_or(raw);
    let raw = raw.strip_suffix("[DC]").unwrap_or(raw);

    let ckey: String = raw
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '@')
        .collect();

    if ckey.is_empty() {
        None
    } else {
        Some(ckey)
    }
}
