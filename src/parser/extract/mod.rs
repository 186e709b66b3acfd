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

//! Per-kind field extractors.
//!
//! Every extractor gets the body of a line (everything after `TAG: `) and the
//! entry under construction. They all follow the same pattern: try a fixed,
//! ordered list of literal prefixes or delimiters, and fall back to a generic
//! shape. A delimiter that must be there but is not raises
//! [`ParseError::ExtractorMismatch`].

mod admin;
mod attack;
mod devices;
mod misc;
mod speech;
mod tgui;

use super::entry::LogEntry;
use super::error::ParseError;
use super::player::Player;
use super::LogType;
use fancy_regex::Regex;
use std::sync::LazyLock;

/// Signature shared by all extractors.
pub type Extractor = fn(&str, &mut LogEntry) -> Result<(), ParseError>;

/// `ckey/(name)` at the start of a string. The key may contain spaces.
static LEADING_PLAYER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\*no key\*|[^/()\[\]]+?)/\(([^)]*)\)").expect("valid regex literal")
});

/// The extractor for a kind, or `None` for kinds whose body is kept as plain text.
pub const fn extractor_for(log_type: LogType) -> Option<Extractor> {
    match log_type {
        LogType::Access => Some(misc::parse_access),
        LogType::Game => Some(misc::parse_game),
        LogType::Admin => Some(admin::parse_admin),
        LogType::AdminPrivate => Some(admin::parse_adminprivate),
        LogType::Ooc | LogType::Say | LogType::Whisper => Some(speech::parse_say),
        LogType::Emote | LogType::RadioEmote => Some(speech::parse_emote),
        LogType::Attack => Some(attack::parse_attack),
        LogType::Vote => Some(misc::parse_vote),
        LogType::Silicon => Some(devices::parse_silicon),
        LogType::Pda => Some(devices::parse_pda),
        LogType::Mecha => Some(devices::parse_mecha),
        LogType::Paper => Some(misc::parse_paper),
        LogType::Virus => Some(misc::parse_virus),
        LogType::Tcomms => Some(devices::parse_tcomms),
        LogType::Uplink => Some(devices::parse_uplink),
        LogType::Shuttle => Some(misc::parse_shuttle),
        LogType::Topic => Some(misc::parse_topic),
        LogType::Tgui => Some(tgui::parse_tgui),
        LogType::Unknown => None,
    }
}

/// `split_once` that reports which delimiter was missing.
fn split<'a>(
    text: &'a str,
    delimiter: &'static str,
    entry: &LogEntry,
) -> Result<(&'a str, &'a str), ParseError> {
    text.split_once(delimiter)
        .ok_or_else(|| ParseError::mismatch(entry.log_type, delimiter))
}

/// Split off the agent token that ends at the first `") "`.
fn split_agent<'a>(body: &'a str, entry: &LogEntry) -> Result<(Player, &'a str), ParseError> {
    let (token, rest) = split(body, ") ", entry)?;
    let player = Player::parse(token)
        .ok_or_else(|| ParseError::mismatch(entry.log_type, "ckey/(name) agent token"))?;
    Ok((player, rest))
}

/// A `ckey/(name)` token at the very start of `text`, and what follows it with
/// any separating spaces and colons removed.
fn leading_player(text: &str) -> Option<(Player, &str)> {
    let caps = LEADING_PLAYER.captures(text).ok().flatten()?;
    let whole = caps.get(0)?;
    let key = caps.get(1)?.as_str();
    let name = caps.get(2)?.as_str();
    let rest = text[whole.end()..].trim_start_matches([' ', ':']);
    Some((Player::new(Some(key), Some(name)), rest))
}

fn unescape(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Collapse the runs of spaces left behind after cutting markers out of a body.
fn squeeze(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
