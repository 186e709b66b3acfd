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

//! ATTACK lines.
//!
//! The patient cannot be found with a single pattern: keys may contain spaces,
//! so the only reliable anchor is the action verb in front of it. Each verb
//! phrase in [`PATIENT_RULES`] says how many words to skip before the patient
//! token starts. Rules are tried in order and the first matching prefix wins.

use super::{split, squeeze};
use crate::parser::entry::{DamageType, LogEntry};
use crate::parser::error::ParseError;
use crate::parser::location::{extract_location, name_before};
use crate::parser::player::Player;
use fancy_regex::Regex;
use std::sync::LazyLock;

static COMBAT_MODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(COMBAT MODE: (\d)\)").expect("valid regex literal"));
static DAMAGE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(DAMTYPE: (\w+)\)").expect("valid regex literal"));
static NEW_HP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(NEWHP: (-?\d+(?:\.\d+)?)\)").expect("valid regex literal"));

struct PatientRule {
    prefix: &'static str,
    /// Words to skip (counting the verb phrase) before the patient token
    words: usize,
    /// Marker removed from the action before counting words
    noise: Option<&'static str>,
}

const fn rule(prefix: &'static str, words: usize) -> PatientRule {
    PatientRule {
        prefix,
        words,
        noise: None,
    }
}

const fn noisy(prefix: &'static str, words: usize, noise: &'static str) -> PatientRule {
    PatientRule {
        prefix,
        words,
        noise: Some(noise),
    }
}

// Some prefixes carry the game's own typos ("has places", "has kicks"); they
// match what is actually logged.
static PATIENT_RULES: &[PatientRule] = &[
    rule("injected", 1),
    noisy("has shot", 2, "(CQC) "),
    noisy("has sprayed", 2, "(CQC) "),
    noisy("has attacked", 2, "(CQC) "),
    noisy("has grabbed", 2, "(CQC) "),
    noisy("has shaken", 2, "(CQC) "),
    noisy("has bolted", 2, "(CQC) "),
    noisy("has unbolted", 2, "(CQC) "),
    noisy("has fed", 2, "(CQC) "),
    noisy("has kicked", 2, "(CQC) "),
    noisy("has flashed", 2, "(CQC) "),
    noisy("was flashed", 2, "(CQC) "),
    noisy("has tabled", 2, "(CQC) "),
    noisy("has shoved", 2, "(CQC) "),
    noisy("has pushed", 2, "(CQC) "),
    noisy("has healed", 2, "(CQC) "),
    noisy("has injected", 2, "(CQC) "),
    noisy("has punched", 2, "(CQC) "),
    noisy("has revived", 2, "(CQC) "),
    noisy("has applied", 2, "(CQC) "),
    noisy("has CPRed", 2, "(CQC) "),
    noisy("has handcuffed", 2, "(CQC) "),
    noisy("has crushed", 2, "(CQC) "),
    noisy("has tackled", 2, "(CQC) "),
    noisy("has electrocuted", 2, "(CQC) "),
    noisy("has attached", 2, "(CQC) "),
    noisy("has strangled", 2, "(CQC) "),
    noisy("has cremated", 2, "(CQC) "),
    noisy("has zapped", 2, "(CQC) "),
    noisy("has implanted", 2, "(CQC) "),
    noisy("has stung", 2, "(CQC) "),
    noisy("has augmented", 2, "(CQC) "),
    noisy("has bopped", 2, "(CQC) "),
    noisy("has stuffed", 2, "(CQC) "),
    noisy("has places", 2, "(CQC) "),
    noisy("has kicks", 2, "(CQC) "),
    noisy("has splashed", 2, "(thrown) "),
    rule("has fired at", 3),
    rule("has operated on", 3),
    rule("has stun attacked", 3),
    rule("has restrained (CQC)", 3),
    rule("has CQCs (CQC)", 3),
    rule("has disarmed (CQC)", 3),
    rule("has resisted grab", 3),
    rule("has broke grab", 3),
    rule("has head slammed", 3),
    rule("has attempted to inject", 4),
    rule("has attempted to punch", 4),
    rule("has attempted to strangle", 4),
    rule("has been shot by", 4),
    rule("has threw and hit", 4),
    rule("has attempted to handcuff", 4),
    rule("has attempted to apply", 4),
    rule("has failed to handcuff", 4),
    rule("has tended to the wounds", 5),
    rule("has attempted to neck grab", 5),
    rule("has overloaded the heart of", 5),
];

/// Actions where the patient comes first, e.g. `ckey2/(Bob) is being stripped of ...`.
/// Only checked when the action does not start with one of [`ACTOR_VERBS`].
const PATIENT_FIRST_PHRASES: [&str; 4] = [
    "is being stripped of",
    "has been stripped of",
    "is being pickpocketed of",
    "is having the",
];

const ACTOR_VERBS: [&str; 4] = ["has", "was", "is", "started"];

/// `ckey/(name) <action> [patient] ... (COMBAT MODE: n) (DAMTYPE: t) (NEWHP: hp) (Location (x,y,z))`
///
/// Item-caused attacks use a bracketed item name instead: `[frag grenade] has ...`.
pub(super) fn parse_attack(body: &str, entry: &mut LogEntry) -> Result<(), ParseError> {
    let other = if body.starts_with('[') {
        let (item, rest) = split(body, "] ", entry)?;
        entry.agent = Some(Player::named(&item[1..]));
        rest
    } else {
        let (token, rest) = split(body, ") ", entry)?;
        let agent = Player::parse(token)
            .ok_or_else(|| ParseError::mismatch(entry.log_type, "ckey/(name) agent token"))?;
        entry.agent = Some(agent);
        rest
    };

    let mut action = other.to_string();

    // Everything from the location name onwards is dropped from the action text
    if let Some((location, offset)) = extract_location(other) {
        entry.location = Some(location);
        if offset > 0 {
            entry.location_name = name_before(other, offset);
            let head = &other[..offset];
            let cut = head.rfind('(').unwrap_or(head.len());
            action = head[..cut].trim_matches([' ', '(']).to_string();
        }
    }

    if let Some((whole, flag)) = capture(&COMBAT_MODE, &action) {
        entry.combat_mode = Some(flag != "0");
        action = action.replacen(&whole, "", 1);
    }
    if let Some((whole, name)) = capture(&DAMAGE_TYPE, &action) {
        entry.damage_type = Some(DamageType::parse(&name));
        action = action.replacen(&whole, "", 1);
    }
    if let Some((whole, hp)) = capture(&NEW_HP, &action) {
        entry.new_hp = hp.parse().ok();
        action = action.replacen(&whole, "", 1);
    }

    let action = squeeze(&action);
    entry.patient = find_patient(&action);
    entry.text = Some(action);
    Ok(())
}

/// Whole match and first group of `regex` in `text`.
fn capture(regex: &Regex, text: &str) -> Option<(String, String)> {
    let caps = regex.captures(text).ok().flatten()?;
    Some((caps.get(0)?.as_str().to_string(), caps.get(1)?.as_str().to_string()))
}

fn find_patient(action: &str) -> Option<Player> {
    if let Some(rule) = PATIENT_RULES.iter().find(|r| action.starts_with(r.prefix)) {
        let action = rule
            .noise
            .map_or_else(|| action.to_string(), |noise| action.replace(noise, ""));
        let target = action.splitn(rule.words + 1, ' ').nth(rule.words)?;
        if target.starts_with('[') {
            return None;
        }
        let token = target.split(") ").next().unwrap_or(target);
        return if token.contains("/(") {
            Player::parse(token)
        } else {
            None
        };
    }

    let actor_first = ACTOR_VERBS.iter().any(|verb| action.starts_with(verb));
    if !actor_first && PATIENT_FIRST_PHRASES.iter().any(|p| action.contains(p)) {
        let token = action.split(") ").next().unwrap_or(action);
        return Player::parse(token);
    }

    None
}
