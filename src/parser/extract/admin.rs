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

//! ADMIN and ADMINPRIVATE lines.
//!
//! Both start with an optional literal sub-tag that decides the layout of the
//! rest of the line. Sub-tags are tried in table order; lines without a known
//! sub-tag fall back to the generic "agent did something to patient" shape.

use super::{leading_player, split, unescape, Extractor};
use crate::parser::entry::{AdminPrivateSubtype, AdminSubtype, LogEntry};
use crate::parser::error::ParseError;
use crate::parser::player::{canonical_ckey, Player};
use fancy_regex::Regex;
use std::sync::LazyLock;

/// Any `ckey/(name)` token inside free text. Keys here are single words so a
/// preceding verb is not swallowed into the key.
static EMBEDDED_PLAYER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\*no key\*|[A-Za-z0-9_@.\-]+)/\(([^)]*)\)").expect("valid regex literal")
});

struct SubTag {
    prefix: &'static str,
    handler: Extractor,
}

static ADMIN_RULES: &[SubTag] = &[
    SubTag {
        prefix: "Announce: ",
        handler: announce,
    },
    SubTag {
        prefix: "SubtlePM: ",
        handler: subtle_pm,
    },
    SubTag {
        prefix: "Build Mode: ",
        handler: build_mode,
    },
    SubTag {
        prefix: "DirectNarrate: ",
        handler: direct_narrate,
    },
    SubTag {
        prefix: "GlobalNarrate: ",
        handler: global_narrate,
    },
];

static ADMINPRIVATE_RULES: &[SubTag] = &[
    SubTag {
        prefix: "ASAY: ",
        handler: asay,
    },
    SubTag {
        prefix: "PM: ",
        handler: private_message,
    },
    SubTag {
        prefix: "Ticket #",
        handler: ticket,
    },
    SubTag {
        prefix: "NOTE: ",
        handler: note,
    },
];

pub(super) fn parse_admin(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    for rule in ADMIN_RULES {
        if let Some(rest) = body.strip_prefix(rule.prefix) {
            return (rule.handler)(rest, entry);
        }
    }
    entry.admin_subtype = Some(AdminSubtype::Misc);
    generic(body, entry);
    Ok(())
}

pub(super) fn parse_adminprivate(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    for rule in ADMINPRIVATE_RULES {
        if let Some(rest) = body.strip_prefix(rule.prefix) {
            return (rule.handler)(rest, entry);
        }
    }
    entry.adminprivate_subtype = Some(AdminPrivateSubtype::Misc);
    generic(body, entry);
    Ok(())
}

/// Leading agent when there is one, first other player mentioned as patient.
fn generic(body: &str, entry: &mut LogEntry) {
    let rest = match leading_player(body) {
        Some((agent, rest)) => {
            entry.agent = Some(agent);
            rest
        }
        None => body,
    };
    entry.patient = first_embedded_player(rest);
    entry.set_location_from(rest);
    entry.text = Some(unescape(rest.trim()));
}

fn first_embedded_player(text: &str) -> Option<Player> {
    let caps = EMBEDDED_PLAYER.captures(text).ok().flatten()?;
    Some(Player::new(
        Some(caps.get(1)?.as_str()),
        Some(caps.get(2)?.as_str()),
    ))
}

fn require_agent<'a>(rest: &'a str, entry: &mut LogEntry) -> Result<&'a str, ParseError> {
    let (agent, rest) = leading_player(rest)
        .ok_or_else(|| ParseError::mismatch(entry.log_type, "ckey/(name) agent token"))?;
    entry.agent = Some(agent);
    Ok(rest)
}

/// `Announce: ckey/(name) : message`
fn announce(rest: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    entry.admin_subtype = Some(AdminSubtype::Announce);
    let message = require_agent(rest, entry)?;
    entry.text = Some(unescape(message.trim()));
    Ok(())
}

/// `SubtlePM: ckey/(name) -> target/(name) : message`
fn subtle_pm(rest: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    entry.admin_subtype = Some(AdminSubtype::SubtlePm);
    let rest = require_agent(rest, entry)?;
    let (_, rest) = split(rest, "-> ", entry)?;
    let (target, message) = leading_player(rest)
        .ok_or_else(|| ParseError::mismatch(entry.log_type, "ckey/(name) target token"))?;
    entry.patient = Some(target);
    entry.text = Some(unescape(message.trim()));
    Ok(())
}

/// `Build Mode: ckey/(name) <action> at (x,y,z)`
fn build_mode(rest: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    entry.admin_subtype = Some(AdminSubtype::BuildMode);
    let action = require_agent(rest, entry)?;
    entry.set_location_from(action);
    entry.text = Some(unescape(action.trim()));
    Ok(())
}

/// `DirectNarrate: ckey/(name) to (Mob Name/key): message`
///
/// The target is written name first, the other way round from the usual token.
fn direct_narrate(rest: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    entry.admin_subtype = Some(AdminSubtype::DirectNarrate);
    let rest = require_agent(rest, entry)?;
    let rest = rest.strip_prefix("to (").unwrap_or(rest);
    let (target, message) = split(rest, "): ", entry)?;
    entry.patient = Some(match target.rsplit_once('/') {
        Some((name, key)) => Player {
            ckey: canonical_ckey(key),
            mob_name: Some(name.to_string()),
        },
        None => Player::named(target),
    });
    entry.text = Some(unescape(message.trim()));
    Ok(())
}

/// `GlobalNarrate: ckey/(name) : message`
fn global_narrate(rest: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    entry.admin_subtype = Some(AdminSubtype::GlobalNarrate);
    let message = require_agent(rest, entry)?;
    entry.text = Some(unescape(message.trim()));
    Ok(())
}

/// `ASAY: ckey/(name) : message`
fn asay(rest: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    entry.adminprivate_subtype = Some(AdminPrivateSubtype::Asay);
    let message = require_agent(rest, entry)?;
    entry.text = Some(unescape(message.trim()));
    Ok(())
}

/// `PM: [Ticket #n: ]ckey/(name)->target: message`, where the target is a
/// player token or a bare name such as an external relay.
fn private_message(rest: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    entry.adminprivate_subtype = Some(AdminPrivateSubtype::Pm);
    let rest = match rest.strip_prefix("Ticket #") {
        Some(ticket) => {
            let (number, rest) = split(ticket, ": ", entry)?;
            entry.ticket_number = number.trim().parse().ok();
            rest
        }
        None => rest,
    };

    let (sender, rest) = split(rest, "->", entry)?;
    let sender = leading_player(sender).map_or_else(|| Player::named(sender.trim()), |(p, _)| p);
    entry.agent = Some(sender);

    let (target, message) = match leading_player(rest) {
        Some((target, message)) => (target, message),
        None => {
            let (name, message) = split(rest, ": ", entry)?;
            (Player::named(name.trim()), message)
        }
    };
    entry.patient = Some(target);
    entry.text = Some(unescape(message.trim()));
    Ok(())
}

/// `Ticket #n: <free text mentioning the players involved>`
fn ticket(rest: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    entry.adminprivate_subtype = Some(AdminPrivateSubtype::Ticket);
    let (number, rest) = split(rest, ":", entry)?;
    let number = number
        .trim()
        .parse()
        .map_err(|_| ParseError::mismatch(entry.log_type, "numeric ticket id"))?;
    entry.ticket_number = Some(number);

    let rest = rest.trim_start();
    match leading_player(rest) {
        Some((agent, text)) => {
            entry.agent = Some(agent);
            entry.text = Some(unescape(text.trim()));
        }
        None => {
            entry.agent = first_embedded_player(rest);
            entry.text = Some(unescape(rest.trim()));
        }
    }
    Ok(())
}

/// `NOTE: ckey/(name) has added a note to target: message`
fn note(rest: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    entry.adminprivate_subtype = Some(AdminPrivateSubtype::Note);
    let text = require_agent(rest, entry)?;
    entry.text = Some(unescape(text.trim()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::location::Location;
    use crate::parser::LogType;
    use chrono::{DateTime, Utc};

    fn admin(body: &str) -> Result<LogEntry, ParseError> {
        let mut entry = LogEntry::new(body.to_string(), DateTime::<Utc>::default(), LogType::Admin);
        parse_admin(body, &mut entry)?;
        Ok(entry)
    }

    fn private(body: &str) -> Result<LogEntry, ParseError> {
        let mut entry =
            LogEntry::new(body.to_string(), DateTime::<Utc>::default(), LogType::AdminPrivate);
        parse_adminprivate(body, &mut entry)?;
        Ok(entry)
    }

    fn ckey(player: Option<&Player>) -> Option<&str> {
        player.and_then(|p| p.ckey.as_deref())
    }

    #[test]
    fn test_announce() {
        let e = admin("Announce: admin1/(Centcom) : The station is on fire").expect("announce");
        assert_eq!(e.admin_subtype, Some(AdminSubtype::Announce));
        assert_eq!(e.agent_ckey(), Some("admin1"));
        assert_eq!(e.text.as_deref(), Some("The station is on fire"));
    }

    #[test]
    fn test_subtle_pm() {
        let e = admin("SubtlePM: admin1/(Centcom) -> ckey2/(Alice) : you hear a voice")
            .expect("subtle pm");
        assert_eq!(e.admin_subtype, Some(AdminSubtype::SubtlePm));
        assert_eq!(ckey(e.patient.as_ref()), Some("ckey2"));
        assert_eq!(e.text.as_deref(), Some("you hear a voice"));
    }

    #[test]
    fn test_subtle_pm_without_arrow_is_mismatch() {
        assert!(admin("SubtlePM: admin1/(Centcom) ckey2/(Alice) : hi").is_err());
    }

    #[test]
    fn test_build_mode_location() {
        let e = admin("Build Mode: admin1/(Centcom) built a wall at (45,67,2)").expect("build");
        assert_eq!(e.admin_subtype, Some(AdminSubtype::BuildMode));
        assert_eq!(e.location, Some(Location::new(45, 67, 2)));
    }

    #[test]
    fn test_direct_narrate_reversed_target() {
        let e = admin("DirectNarrate: admin1/(Centcom) to (Alice Smith/Ckey2): You feel cold")
            .expect("narrate");
        assert_eq!(e.admin_subtype, Some(AdminSubtype::DirectNarrate));
        let patient = e.patient.expect("target");
        assert_eq!(patient.ckey.as_deref(), Some("ckey2"));
        assert_eq!(patient.mob_name.as_deref(), Some("Alice Smith"));
        assert_eq!(e.text.as_deref(), Some("You feel cold"));
    }

    #[test]
    fn test_admin_generic_fallback() {
        let e = admin("admin1/(Centcom) has healed ckey2/(Alice)").expect("generic");
        assert_eq!(e.admin_subtype, Some(AdminSubtype::Misc));
        assert_eq!(e.agent_ckey(), Some("admin1"));
        assert_eq!(ckey(e.patient.as_ref()), Some("ckey2"));

        let e = admin("Round ID set to 12345").expect("agentless");
        assert!(e.agent.is_none());
        assert_eq!(e.text.as_deref(), Some("Round ID set to 12345"));
    }

    #[test]
    fn test_asay() {
        let e = private("ASAY: admin1/(Centcom) : who is on?").expect("asay");
        assert_eq!(e.adminprivate_subtype, Some(AdminPrivateSubtype::Asay));
        assert_eq!(e.agent_ckey(), Some("admin1"));
        assert_eq!(e.text.as_deref(), Some("who is on?"));
    }

    #[test]
    fn test_pm_with_ticket() {
        let e = private("PM: Ticket #12: ckey2/(Alice)->admin1/(Centcom): help please")
            .expect("pm");
        assert_eq!(e.adminprivate_subtype, Some(AdminPrivateSubtype::Pm));
        assert_eq!(e.ticket_number, Some(12));
        assert_eq!(e.agent_ckey(), Some("ckey2"));
        assert_eq!(ckey(e.patient.as_ref()), Some("admin1"));
        assert_eq!(e.text.as_deref(), Some("help please"));
    }

    #[test]
    fn test_pm_to_external_relay() {
        let e = private("PM: admin1/(Centcom)->IRCKEY: relayed").expect("pm");
        let patient = e.patient.expect("relay");
        assert_eq!(patient.ckey, None);
        assert_eq!(patient.mob_name.as_deref(), Some("IRCKEY"));
        assert_eq!(e.text.as_deref(), Some("relayed"));
    }

    #[test]
    fn test_ticket() {
        let e = private("Ticket #7: ckey2/(Alice): Ticket opened").expect("ticket");
        assert_eq!(e.adminprivate_subtype, Some(AdminPrivateSubtype::Ticket));
        assert_eq!(e.ticket_number, Some(7));
        assert_eq!(e.agent_ckey(), Some("ckey2"));

        assert!(private("Ticket #seven: ckey2/(Alice): hi").is_err());
    }

    #[test]
    fn test_note() {
        let e = private("NOTE: admin1/(Centcom) has added a note to ckey2: griefing").expect("note");
        assert_eq!(e.adminprivate_subtype, Some(AdminPrivateSubtype::Note));
        assert_eq!(e.agent_ckey(), Some("admin1"));
    }
}
