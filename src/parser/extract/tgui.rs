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

//! TGUI lines. These carry no tag; the classifier recognises them by shape.
//!
//! A mob-backed user is logged as `key (as Mob Name at x,y,z)`, a bare client
//! as just `key`. Either may be followed by ` in <window or context>` and then
//! the payload.

use super::split;
use crate::parser::entry::LogEntry;
use crate::parser::error::ParseError;
use crate::parser::location::Location;
use crate::parser::player::{Player, NO_KEY};

pub(super) fn parse_tgui(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    let mut agent = Player::new(Some(NO_KEY), None);
    let mut rest = body;

    if let Some((key, after)) = body.split_once(" (as ") {
        let (mob, after) = split(after, " at ", entry)?;
        let (coordinates, after) = split(after, ")", entry)?;
        entry.location = Some(
            coordinates
                .parse::<Location>()
                .map_err(|_| ParseError::mismatch(entry.log_type, "x,y,z"))?,
        );
        agent = Player::new(Some(key.trim()), Some(mob));
        rest = after;
    }

    if let Some((client, after)) = rest.split_once(" in ") {
        // Only a bare client leaves anything in front of " in "
        let client = client.trim();
        if !client.is_empty() {
            agent = Player::new(Some(client), None);
        }
        rest = after;
    }

    entry.agent = Some(agent);
    let rest = rest.trim();
    entry.text = Some(if rest.is_empty() { "Empty" } else { rest }.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LogType;
    use chrono::{DateTime, Utc};

    fn tgui(body: &str) -> Result<LogEntry, ParseError> {
        let mut entry = LogEntry::new(body.to_string(), DateTime::<Utc>::default(), LogType::Tgui);
        parse_tgui(body, &mut entry)?;
        Ok(entry)
    }

    #[test]
    fn test_mob_user() {
        let e = tgui("ckey1 (as Bob Smith at 100,120,2) in /datum/tgui/window: opened")
            .expect("mob");
        let agent = e.agent.expect("agent");
        assert_eq!(agent.ckey.as_deref(), Some("ckey1"));
        assert_eq!(agent.mob_name.as_deref(), Some("Bob Smith"));
        assert_eq!(e.location, Some(Location::new(100, 120, 2)));
        assert_eq!(e.text.as_deref(), Some("/datum/tgui/window: opened"));
    }

    #[test]
    fn test_bare_client() {
        let e = tgui("ckey2 in chat_panel").expect("client");
        assert_eq!(e.agent_ckey(), Some("ckey2"));
        assert_eq!(e.location, None);
        assert_eq!(e.text.as_deref(), Some("chat_panel"));
    }

    #[test]
    fn test_empty_payload() {
        let e = tgui("ckey1 (as Bob at 1,2,3)").expect("no payload");
        assert_eq!(e.text.as_deref(), Some("Empty"));
    }

    #[test]
    fn test_bad_coordinates() {
        assert!(tgui("ckey1 (as Bob at somewhere) in window").is_err());
    }
}
