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

use super::location::{extract_location, name_before, Location};
use super::player::Player;
use super::LogType;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DamageType {
    #[default]
    Unknown,
    Brute,
    Burn,
    Toxin,
    Oxygen,
    Cellular,
}

impl DamageType {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "BRUTE" => Self::Brute,
            "BURN" => Self::Burn,
            "TOXIN" | "TOX" => Self::Toxin,
            "OXYGEN" | "OXY" => Self::Oxygen,
            "CELLULAR" | "CLONE" => Self::Cellular,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SiliconSubtype {
    #[default]
    Misc,
    Cyborg,
    Law,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AdminSubtype {
    Announce,
    SubtlePm,
    BuildMode,
    DirectNarrate,
    GlobalNarrate,
    #[default]
    Misc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AdminPrivateSubtype {
    Asay,
    Pm,
    Ticket,
    Note,
    #[default]
    Misc,
}

/// One parsed log line.
///
/// `raw_line` is the verbatim source and is what gets written back out;
/// every other field is a best-effort reading of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub raw_line: String,
    pub time: DateTime<Utc>,
    pub log_type: LogType,
    /// Who performed the action
    pub agent: Option<Player>,
    /// Who the action was performed on
    pub patient: Option<Player>,
    pub location: Option<Location>,
    pub location_name: Option<String>,
    /// Remaining free text (message, action description, ...)
    pub text: Option<String>,
    pub is_dead: Option<bool>,

    // Attack
    pub combat_mode: Option<bool>,
    pub damage_type: Option<DamageType>,
    pub new_hp: Option<f64>,

    pub silicon_subtype: Option<SiliconSubtype>,
    pub virus_name: Option<String>,
    pub telecomms_network: Option<String>,

    // Admin
    pub admin_subtype: Option<AdminSubtype>,
    pub adminprivate_subtype: Option<AdminPrivateSubtype>,
    pub ticket_number: Option<u32>,
}

impl LogEntry {
    /// An entry with only the line-level fields filled in. Extractors fill in the rest.
    pub const fn new(raw_line: String, time: DateTime<Utc>, log_type: LogType) -> Self {
        Self {
            raw_line,
            time,
            log_type,
            agent: None,
            patient: None,
            location: None,
            location_name: None,
            text: None,
            is_dead: None,
            combat_mode: None,
            damage_type: None,
            new_hp: None,
            silicon_subtype: None,
            virus_name: None,
            telecomms_network: None,
            admin_subtype: None,
            adminprivate_subtype: None,
            ticket_number: None,
        }
    }

    /// Set `location` from the last coordinate triple in `text`.
    /// Returns the byte offset of the triple, if one was found.
    pub(crate) fn set_location_from(&mut self, text: &str) -> Option<usize> {
        let (location, offset) = extract_location(text)?;
        self.location = Some(location);
        Some(offset)
    }

    /// Like [`Self::set_location_from`], also taking the location name that
    /// precedes the coordinates in `text`.
    pub(crate) fn set_named_location_from(&mut self, text: &str) -> Option<usize> {
        let offset = self.set_location_from(text)?;
        self.location_name = name_before(text, offset);
        Some(offset)
    }

    pub fn agent_ckey(&self) -> Option<&str> {
        self.agent.as_ref().and_then(|p| p.ckey.as_deref())
    }

    /// Whether `ckey` took part in this event as agent, patient, or a player
    /// token embedded in the text.
    pub fn involves(&self, ckey: &str) -> bool {
        let as_player = |p: &Option<Player>| p.as_ref().is_some_and(|p| p.has_ckey(ckey));
        if as_player(&self.agent) || as_player(&self.patient) {
            return true;
        }
        let token = format!("{}/(", ckey.to_lowercase());
        self.text
            .as_ref()
            .is_some_and(|text| text.to_lowercase().contains(&token))
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> LogEntry {
        let mut entry = LogEntry::new(String::new(), DateTime::<Utc>::default(), LogType::Game);
        entry.text = Some(text.to_string());
        entry
    }

    #[test]
    fn test_damage_type_parse() {
        assert_eq!(DamageType::parse("brute"), DamageType::Brute);
        assert_eq!(DamageType::parse("BURN"), DamageType::Burn);
        assert_eq!(DamageType::parse("stamina"), DamageType::Unknown);
    }

    #[test]
    fn test_involves_embedded_token() {
        let e = entry("Ckey1/(Bob) was gibbed");
        assert!(e.involves("ckey1"));
        assert!(!e.involves("ckey2"));
    }

    #[test]
    fn test_set_named_location() {
        let mut e = entry("");
        let offset = e.set_named_location_from("Bar (12,34,2)");
        assert_eq!(offset, Some(4));
        assert_eq!(e.location, Some(Location::new(12, 34, 2)));
        assert_eq!(e.location_name.as_deref(), Some("Bar"));
    }
}
