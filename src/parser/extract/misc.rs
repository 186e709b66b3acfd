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

//! The simpler kinds: ACCESS, GAME, VOTE, PAPER, VIRUS, SHUTTLE and TOPIC.

use super::{leading_player, split, split_agent, unescape};
use crate::parser::entry::LogEntry;
use crate::parser::error::ParseError;

const ACCESS_PREFIXES: [&str; 4] = ["Failed Login: ", "Mob Login: ", "Login: ", "Logout: "];

const CULTURE_BOTTLE: &str = "A culture bottle was printed for the virus ";
const INFECTED: &str = " was infected by virus: ";

/// Optional leading player, optional location, the rest as text.
fn player_and_text(body: &str, entry: &mut LogEntry) {
    let rest = match leading_player(body) {
        Some((agent, rest)) => {
            entry.agent = Some(agent);
            rest
        }
        None => body,
    };
    entry.set_named_location_from(rest);
    entry.text = Some(unescape(rest.trim()));
}

/// `Login: ckey/(name) from <ip>-<cid> || BYOND v...` and friends.
pub(super) fn parse_access(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    let rest = ACCESS_PREFIXES
        .iter()
        .find_map(|prefix| body.strip_prefix(prefix))
        .unwrap_or(body);
    if let Some((agent, _)) = leading_player(rest) {
        entry.agent = Some(agent);
    }
    entry.text = Some(body.trim().to_string());
    Ok(())
}

pub(super) fn parse_game(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    player_and_text(body, entry);
    Ok(())
}

/// Vote results are highlighted with `<b>` tags, which are dropped.
pub(super) fn parse_vote(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    let body = body.replace("<b>", "").replace("</b>", "");
    let body = body.trim();
    match leading_player(body) {
        Some((agent, rest)) => {
            entry.agent = Some(agent);
            entry.text = Some(unescape(rest.trim()));
        }
        None => entry.text = Some(unescape(body)),
    }
    Ok(())
}

/// `ckey/(name) writes ...`
pub(super) fn parse_paper(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    let (agent, other) = split_agent(body, entry)?;
    entry.agent = Some(agent);
    entry.text = Some(other.trim().to_string());
    Ok(())
}

/// Two layouts, both ending in a location:
///
/// `A culture bottle was printed for the virus <name> sym:<symptoms> by ckey/(name) ...`
///
/// `ckey/(name) was infected by virus: <name> sym:<symptoms> ...`
pub(super) fn parse_virus(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    if let Some(rest) = body.strip_prefix(CULTURE_BOTTLE) {
        let (_, printer) = split(rest, ") by ", entry)?;
        entry.agent = leading_player(printer).map(|(agent, _)| agent);
        let (name, symptoms) = split(rest, " sym:", entry)?;
        entry.virus_name = Some(name.trim().to_string());
        entry.text = Some(format!("printed, sym:{}", symptoms.trim()));
    } else {
        let (agent, rest) = split(body, INFECTED, entry)?;
        entry.agent = leading_player(agent).map(|(agent, _)| agent);
        let (name, symptoms) = split(rest, " sym:", entry)?;
        entry.virus_name = Some(name.trim().to_string());
        entry.text = Some(format!("infected, sym:{}", symptoms.trim()));
    }
    entry.set_named_location_from(body);
    Ok(())
}

/// Shuttle call reasons and shuttle purchases are logged without an agent.
pub(super) fn parse_shuttle(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    if body.starts_with("Shuttle call reason:") || body.contains(" set a new shuttle, ") {
        entry.text = Some(unescape(body.trim()));
        return Ok(());
    }
    let (agent, other) = split_agent(body, entry)?;
    entry.agent = Some(agent);
    entry.text = Some(unescape(other.trim()));
    Ok(())
}

pub(super) fn parse_topic(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    player_and_text(body, entry);
    Ok(())
}
