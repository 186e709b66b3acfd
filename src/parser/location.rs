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

//! Map coordinates embedded in free text as `(x,y,z)`.

use super::error::ParseError;
use fancy_regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static COORDINATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((\d{1,3}),(\d{1,3}),(\d{1,2})\)").expect("valid regex literal")
});

/// A tile position. `z` is the map layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Location {
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Axis-aligned box test on the same map layer. Nothing is within a
    /// non-positive range.
    pub const fn within_box(&self, other: &Self, range: i32) -> bool {
        if range <= 0 {
            return false;
        }
        let range = range.unsigned_abs();
        self.z == other.z && self.x.abs_diff(other.x) < range && self.y.abs_diff(other.y) < range
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

/// Parses `x,y,z`, optionally wrapped in parentheses and with spaces after commas.
impl FromStr for Location {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);

        let parts = inner
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ParseError::structural(format!("bad coordinate in '{s}': {e}")))?;

        match parts.as_slice() {
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            _ => Err(ParseError::structural(format!(
                "expected three coordinates, got {} in '{s}'",
                parts.len()
            ))),
        }
    }
}

/// Find the coordinates of the event in `text`.
///
/// Earlier triples are usually incidental mentions, so the last one wins.
/// Returns the location and the byte offset of its opening parenthesis, which
/// callers use to slice off the location name that precedes it.
pub fn extract_location(text: &str) -> Option<(Location, usize)> {
    let caps = COORDINATES
        .captures_iter(text)
        .filter_map(Result::ok)
        .last()?;
    let whole = caps.get(0)?;

    let coordinate = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<i32>().ok());
    let location = Location::new(coordinate(1)?, coordinate(2)?, coordinate(3)?);

    Some((location, whole.start()))
}

/// Location name immediately before the coordinates: the text after the last
/// `(` that precedes `offset`, trimmed.
pub fn name_before(text: &str, offset: usize) -> Option<String> {
    let before = &text[..offset];
    let name = before.rsplit('(').next().unwrap_or(before).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_location() {
        let text = "Bridge (12,34,2)";
        let (loc, offset) = extract_location(text).expect("has coordinates");
        assert_eq!(loc, Location::new(12, 34, 2));
        assert_eq!(offset, 7);
        assert_eq!(&text[offset..], "(12,34,2)");
    }

    #[test]
    fn test_last_location_wins() {
        let text = "threw the beacon (1,2,3) at Cargo Bay (100,200,4)";
        let (loc, offset) = extract_location(text).expect("has coordinates");
        assert_eq!(loc, Location::new(100, 200, 4));
        assert_eq!(&text[..offset], "threw the beacon (1,2,3) at Cargo Bay ");
    }

    #[test]
    fn test_no_location() {
        assert!(extract_location("no coordinates here").is_none());
        // z only allows two digits, x and y three
        assert!(extract_location("(1,2,345)").is_none());
        assert!(extract_location("(1234,2,3)").is_none());
        assert!(extract_location("(1, 2, 3)").is_none());
    }

    #[test]
    fn test_name_before() {
        let text = "with the toolbox (Medbay Central (70,80,2)";
        let (_, offset) = extract_location(text).expect("has coordinates");
        assert_eq!(name_before(text, offset).as_deref(), Some("Medbay Central"));
        assert_eq!(name_before("(1,1,1)", 0), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("12,34,2".parse::<Location>(), Ok(Location::new(12, 34, 2)));
        assert_eq!("(12, 34, 2)".parse::<Location>(), Ok(Location::new(12, 34, 2)));
        assert!("12,34".parse::<Location>().is_err());
        assert!("a,b,c".parse::<Location>().is_err());
    }

    #[test]
    fn test_within_box_requires_same_layer() {
        let here = Location::new(10, 10, 2);
        assert!(here.within_box(&Location::new(14, 6, 2), 5));
        assert!(!here.within_box(&Location::new(15, 10, 2), 5));
        assert!(!here.within_box(&Location::new(10, 10, 3), 5));
        assert!(!here.within_box(&here, 0));
    }

    #[test]
    fn test_within_box_extreme_coordinates() {
        let far = Location::new(i32::MIN, i32::MIN, 2);
        let here = Location::new(i32::MAX, 0, 2);
        assert!(!far.within_box(&here, i32::MAX));
        assert!(far.within_box(&far, 1));
    }
}
