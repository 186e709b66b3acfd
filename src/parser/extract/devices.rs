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

//! Lines logged by in-game machinery: SILICON, PDA, MECHA, TCOMMS and UPLINK.

use super::{split, split_agent, unescape};
use crate::parser::entry::{LogEntry, SiliconSubtype};
use crate::parser::error::ParseError;
use crate::parser::location::name_before;
use crate::parser::player::Player;

const MONITOR_CONSOLE: &str = "PDA: message monitor console";

/// `[CYBORG: |LAW: ]ckey/(name) text`
///
/// Law changes made with an upload console are logged by the console's user
/// as `used <console> on target/(name) ...`; the user is the agent.
pub(super) fn parse_silicon(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    let (subtype, rest) = if let Some(rest) = body.strip_prefix("CYBORG: ") {
        (SiliconSubtype::Cyborg, rest)
    } else if let Some(rest) = body.strip_prefix("LAW: ") {
        (SiliconSubtype::Law, rest)
    } else {
        (SiliconSubtype::Misc, body)
    };
    entry.silicon_subtype = Some(subtype);

    let (agent, other) = split_agent(rest, entry)?;
    entry.agent = Some(agent);

    if subtype == SiliconSubtype::Law && other.starts_with("used ") {
        let (_, target) = split(other, " on ", entry)?;
        let token = target.split(") ").next().unwrap_or(target);
        if let Some(user) = Player::parse(token) {
            entry.agent = Some(user);
        }
    }
    entry.set_location_from(other);
    entry.text = Some(other.trim().to_string());
    Ok(())
}

/// Two layouts:
///
/// `ckey/(name) (PDA: PDA-Bob (Job)) to Alice (Job) "text" (Location (x,y,z))`
///
/// `ckey/(name) (PDA: message monitor console) sent "text" to Alice (Job) (Location (x,y,z))`
///
/// The recipient is only ever logged by name.
pub(super) fn parse_pda(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    let (agent, other) = split_agent(body, entry)?;
    entry.agent = Some(agent);

    if other.contains(MONITOR_CONSOLE) {
        let (_, rest) = split(other, ") sent \"", entry)?;
        let (text, rest) = split(rest, "\" to ", entry)?;
        let recipient = match entry.set_named_location_from(rest) {
            Some(offset) => {
                let head = &rest[..offset];
                head[..head.rfind('(').unwrap_or(head.len())].trim()
            }
            None => rest.trim(),
        };
        entry.patient = Some(Player::named(recipient));
        entry.text = Some(unescape(text.trim()));
        return Ok(());
    }

    let other = other.trim_start_matches([' ', '(']);
    let (_, rest) = split(other, " to ", entry)?;
    let (recipient, rest) = split(rest, ") \"", entry)?;
    let recipient = recipient
        .rsplit_once(" (")
        .map_or(recipient, |(name, _job)| name);
    entry.patient = Some(Player::named(recipient.trim()));

    // A message spanning several lines has no closing quote on this one
    let text = match rest.split_once("\" (") {
        Some((text, location)) => {
            if let Some(offset) = entry.set_location_from(location) {
                entry.location_name = Some(location[..offset].trim().to_string())
                    .filter(|name| !name.is_empty());
            }
            text
        }
        None => rest,
    };
    entry.text = Some(unescape(text.trim()));
    Ok(())
}

/// Free text with a trailing `(Location (x,y,z))`.
pub(super) fn parse_mecha(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    entry.text = Some(body.trim().to_string());
    entry.set_named_location_from(body);
    Ok(())
}

/// `speaker [Network] (spans: ...) "text" (language: ...) (Location (x,y,z))`
///
/// Only lines with a `(spans: ...)` segment are speech. The rest (machines
/// linking up and so on) keep their body as text.
pub(super) fn parse_tcomms(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    if !body.contains(" (spans: ") {
        entry.text = Some(body.trim().to_string());
        return Ok(());
    }

    entry.is_dead = Some(false);
    let (speaker, rest) = split(body, " [", entry)?;
    entry.agent = Some(if speaker.contains("/(") {
        Player::parse(speaker).unwrap_or_else(|| Player::named(speaker))
    } else {
        Player::named(speaker)
    });

    let (network, rest) = split(rest, "] (", entry)?;
    entry.telecomms_network = Some(network.to_string());

    let (_spans, rest) = split(rest, ") \"", entry)?;
    let (text, rest) = split(rest, "\" (", entry)?;
    entry.text = Some(unescape(text.trim()));

    let (_language, location) = split(rest, ") (", entry)?;
    if let Some(offset) = entry.set_location_from(location) {
        entry.location_name = Some(location[..offset].trim().to_string())
            .filter(|name| !name.is_empty());
    }
    Ok(())
}

/// `ckey/(name) bought ... for N telecrystals ...`
pub(super) fn parse_uplink(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    let (agent, other) = split_agent(body, entry)?;
    entry.agent = Some(agent);
    entry.text = Some(unescape(other.trim()));
    entry.is_dead = Some(false);
    if let Some(offset) = entry.set_location_from(other) {
        entry.location_name = name_before(other, offset);
    }
    Ok(())
}
