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

//! SAY, WHISPER, OOC, EMOTE and RADIOEMOTE.

use super::{split, split_agent, unescape};
use crate::parser::entry::LogEntry;
use crate::parser::error::ParseError;

/// Announcements relayed through the say log without a quoted message.
const PASSTHROUGH_PREFIXES: [&str; 2] = ["(priority announcement)", "(message to the other server)"];

const DEAD_MARKER: &str = "(DEAD) ";

fn is_passthrough(text: &str) -> bool {
    PASSTHROUGH_PREFIXES.iter().any(|p| text.starts_with(p)) && !text.contains("\" ")
}

/// `ckey/(name) "message" [extra] (Location (x,y,z))`
pub(super) fn parse_say(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    if is_passthrough(body) {
        entry.text = Some(unescape(body.trim()));
        return Ok(());
    }

    let (agent, other) = split_agent(body, entry)?;
    entry.agent = Some(agent);

    if is_passthrough(other) {
        entry.text = Some(unescape(other.trim()));
        return Ok(());
    }

    // A message at the very end of the line has no separator after its closing quote
    let (message, rest) = match other.split_once("\" ") {
        Some(parts) => parts,
        None if other.trim_end().len() > 1 && other.trim_end().ends_with('"') => {
            (other.trim_end(), "")
        }
        None => split(other, "\" ", entry)?,
    };

    let is_dead = message.contains(DEAD_MARKER);
    let message = message.replacen(DEAD_MARKER, "", 1);
    entry.is_dead = Some(is_dead);

    let mut text = unescape(message.trim().trim_matches('"'));

    // Anything between the message and the location, e.g. "FORCED by ..."
    let (extra, location) = rest.split_once('(').unwrap_or((rest, ""));
    let extra = extra.trim();
    if !extra.is_empty() {
        text.push_str(" | ");
        text.push_str(extra);
    }
    entry.text = Some(text);

    if let Some(offset) = entry.set_location_from(location) {
        let name = location[..offset].trim();
        if !name.is_empty() {
            entry.location_name = Some(name.to_string());
        }
    }
    Ok(())
}

/// `ckey/(name) action (Location (x,y,z))`
pub(super) fn parse_emote(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    let (agent, other) = split_agent(body, entry)?;
    entry.agent = Some(agent);

    let Some((action, location)) = other.split_once(" (") else {
        entry.text = Some(unescape(other.trim()));
        return Ok(());
    };
    entry.text = Some(unescape(action.trim()));

    if let Some(offset) = entry.set_location_from(location) {
        let name = location[..offset].trim();
        if !name.is_empty() {
            entry.location_name = Some(name.to_string());
        }
    }
    Ok(())
}
