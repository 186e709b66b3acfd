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

use crate::core::perception::DEFAULT_WALKING_ERROR;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Log files a round folder usually holds that are worth parsing.
pub const DEFAULT_LOG_FILES: [&str; 9] = [
    "game.txt",
    "attack.txt",
    "pda.txt",
    "silicon.txt",
    "mecha.txt",
    "virus.txt",
    "telecomms.txt",
    "uplink.txt",
    "shuttle.txt",
];

/// Global user configuration stored in config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Added to the hearing range to make up for stale positions
    pub walking_error: i32,

    /// Default for text searches
    pub case_sensitive: bool,

    /// File names to pick up when a folder is given
    pub log_files: Vec<String>,

    /// Don't report lines that could not be parsed
    pub quiet: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            walking_error: DEFAULT_WALKING_ERROR,
            case_sensitive: false,
            log_files: DEFAULT_LOG_FILES.iter().map(|&name| name.to_string()).collect(),
            quiet: false,
        }
    }
}

impl GlobalConfig {
    /// Get the path to the global config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("logbuddy").join("config.json"))
    }

    /// Load global config from disk, returning defaults if not found
    pub fn load() -> Self {
        Self::config_path().map_or_else(Self::default, |path| Self::load_from(&path))
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("No global config found, using defaults");
            return Self::default();
        }
        tracing::info!("Loading global config from {path:?}");
        match std::fs::read_to_string(path).map(|contents| serde_json::from_str::<Self>(&contents)) {
            Ok(Ok(config)) => config,
            Ok(Err(e)) => {
                tracing::warn!("Ignoring malformed config {path:?}: {e}");
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Cannot read config {path:?}: {e}");
                Self::default()
            }
        }
    }

    /// Save global config to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path().ok_or("Could not determine config directory")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Create directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {e}"))?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {e}"))?;

        std::fs::write(path, json).map_err(|e| format!("Failed to write config file: {e}"))?;

        tracing::info!("Saved global config to {path:?}");
        Ok(())
    }

    /// Whether a file found in a round folder should be parsed.
    pub fn wants_file(&self, file_name: &str) -> bool {
        self.log_files
            .iter()
            .any(|wanted| wanted.eq_ignore_ascii_case(file_name))
    }
}
