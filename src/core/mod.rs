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

pub mod diagnostics;
pub mod filter;
pub mod log_collection;
pub mod log_file;
pub mod perception;

pub use diagnostics::{Diagnostic, DiagnosticSink, SilentSink, TracingSink};
pub use filter::{parse_location_arg, FilterError, FilterOutcome, NameMatch};
pub use log_collection::{CollectionBuilder, CollectionError, LogCollection};
pub use perception::{DEFAULT_WALKING_ERROR, HEARING_RANGE};
