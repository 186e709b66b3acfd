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

//! Event kinds and the tag registry that maps a line's tag to one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// What kind of event a line records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogType {
    Unknown,
    Access,
    Game,
    Admin,
    AdminPrivate,
    Ooc,
    Say,
    Whisper,
    Emote,
    RadioEmote,
    Attack,
    Vote,
    Silicon,
    Pda,
    Mecha,
    Paper,
    Virus,
    Tcomms,
    Uplink,
    Shuttle,
    Topic,
    /// Tagless TGUI interaction line, recognised by shape.
    Tgui,
}

static TAG_REGISTRY: LazyLock<HashMap<&'static str, LogType>> = LazyLock::new(|| {
    LogType::ALL
        .iter()
        .filter_map(|&log_type| log_type.tag().map(|tag| (tag, log_type)))
        .collect()
});

impl LogType {
    /// Every kind that is introduced by a literal tag.
    pub const ALL: [Self; 20] = [
        Self::Access,
        Self::Game,
        Self::Admin,
        Self::AdminPrivate,
        Self::Ooc,
        Self::Say,
        Self::Whisper,
        Self::Emote,
        Self::RadioEmote,
        Self::Attack,
        Self::Vote,
        Self::Silicon,
        Self::Pda,
        Self::Mecha,
        Self::Paper,
        Self::Virus,
        Self::Tcomms,
        Self::Uplink,
        Self::Shuttle,
        Self::Topic,
    ];

    /// The literal tag as written in the logs, without the trailing colon.
    pub const fn tag(self) -> Option<&'static str> {
        match self {
            Self::Access => Some("ACCESS"),
            Self::Game => Some("GAME"),
            Self::Admin => Some("ADMIN"),
            Self::AdminPrivate => Some("ADMINPRIVATE"),
            Self::Ooc => Some("OOC"),
            Self::Say => Some("SAY"),
            Self::Whisper => Some("WHISPER"),
            Self::Emote => Some("EMOTE"),
            Self::RadioEmote => Some("RADIOEMOTE"),
            Self::Attack => Some("ATTACK"),
            Self::Vote => Some("VOTE"),
            Self::Silicon => Some("SILICON"),
            Self::Pda => Some("PDA"),
            Self::Mecha => Some("MECHA"),
            Self::Paper => Some("PAPER"),
            Self::Virus => Some("VIRUS"),
            Self::Tcomms => Some("TCOMMS"),
            Self::Uplink => Some("UPLINK"),
            Self::Shuttle => Some("SHUTTLE"),
            Self::Topic => Some("TOPIC"),
            Self::Unknown | Self::Tgui => None,
        }
    }

    /// Look a tag up in the registry (case-insensitive, exact).
    /// Tags the registry does not know map to `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        TAG_REGISTRY
            .get(tag.trim().to_ascii_uppercase().as_str())
            .copied()
            .unwrap_or(Self::Unknown)
    }

    pub const fn label(self) -> &'static str {
        match self.tag() {
            Some(tag) => tag,
            None => match self {
                Self::Tgui => "TGUI",
                _ => "UNKNOWN",
            },
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a user-supplied type name. Unlike [`LogType::from_tag`] this rejects
/// names it does not know, so typos in filters are reported.
impl FromStr for LogType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TGUI" => Ok(Self::Tgui),
            "UNKNOWN" => Ok(Self::Unknown),
            other => match Self::from_tag(other) {
                Self::Unknown => Err(format!("unknown log type '{s}'")),
                known => Ok(known),
            },
        }
    }
}

/// Kind of log file, inferred from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogFileType {
    #[default]
    Unknown,
    Collated,
    Game,
    Attack,
    Pda,
    Silicon,
    Mecha,
    Virus,
    Telecomms,
    Uplink,
    Shuttle,
    Tgui,
}

impl LogFileType {
    /// `game.txt` -> `Game`, `telecomms.log` -> `Telecomms`, anything else -> `Unknown`.
    pub fn from_file_name(name: &str) -> Self {
        let stem = name.split('.').next().unwrap_or(name);
        match stem.to_ascii_lowercase().as_str() {
            "game" => Self::Game,
            "attack" => Self::Attack,
            "pda" => Self::Pda,
            "silicon" => Self::Silicon,
            "mecha" => Self::Mecha,
            "virus" => Self::Virus,
            "telecomms" => Self::Telecomms,
            "uplink" => Self::Uplink,
            "shuttle" => Self::Shuttle,
            "tgui" => Self::Tgui,
            _ => Self::Unknown,
        }
    }
}
