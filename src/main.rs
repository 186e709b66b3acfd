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

//! Command-line front end: load round logs, narrow them down, print what is left.

use anyhow::Context;
use clap::Parser;
use logbuddy::config::GlobalConfig;
use logbuddy::core::{
    parse_location_arg, DiagnosticSink, FilterOutcome, LogCollection, NameMatch, SilentSink,
    TracingSink,
};
use logbuddy::parser::{LogEntry, LogType};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
#[command(name = "logbuddy")]
#[command(version)]
#[command(about = "Investigate Space Station 13 round logs", long_about = None)]
struct Args {
    /// Log files or round folders; everything given is collated
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,

    /// Keep entries acted by these ckeys
    #[arg(long, value_name = "CKEY", value_delimiter = ',')]
    ckey: Vec<String>,

    /// Keep entries containing any of these strings
    #[arg(long, value_name = "TEXT")]
    search: Vec<String>,

    /// Match --search case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Keep only these kinds (SAY, ATTACK, ...)
    #[arg(long = "type", value_name = "TYPE", value_delimiter = ',')]
    types: Vec<LogType>,

    /// Drop these kinds
    #[arg(long = "exclude-type", value_name = "TYPE", value_delimiter = ',')]
    exclude_types: Vec<LogType>,

    /// Keep entries that happened in this area
    #[arg(long, value_name = "NAME")]
    location_name: Option<String>,

    /// Match --location-name as a substring
    #[arg(long, requires = "location_name")]
    name_contains: bool,

    /// Centre of the --radius filter
    #[arg(long, value_name = "X,Y,Z", requires = "radius")]
    around: Option<String>,

    /// Keep entries within this many tiles of --around
    #[arg(long, value_name = "R", requires = "around", allow_negative_numbers = true)]
    radius: Option<i32>,

    /// Keep what this ckey could have heard
    #[arg(long, value_name = "CKEY")]
    heard: Option<String>,

    /// Reconstruct a conversation between these ckeys
    #[arg(long, value_name = "CKEY", value_delimiter = ',')]
    conversation: Vec<String>,

    /// Tiles added to the hearing range (defaults to the configured value)
    #[arg(long, value_name = "N")]
    walking_error: Option<i32>,

    /// Only print the first N entries
    #[arg(long, value_name = "N", conflicts_with_all = ["tail", "output"])]
    head: Option<usize>,

    /// Only print the last N entries
    #[arg(long, value_name = "N", conflicts_with = "output")]
    tail: Option<usize>,

    /// Write the working set to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print entries as JSON
    #[arg(long, conflicts_with = "output")]
    json: bool,

    /// Log every skipped and merged line
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors and keep unparsable lines to yourself
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(args: &Args) {
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else if args.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn load_path(
    path: &Path,
    config: &GlobalConfig,
    sink: &mut dyn DiagnosticSink,
) -> anyhow::Result<LogCollection> {
    let logs = if path.is_dir() {
        LogCollection::from_folder_matching(path, |name| config.wants_file(name), sink)
    } else {
        LogCollection::from_file(path, sink)
    };
    logs.with_context(|| format!("Failed to load {}", path.display()))
}

fn load(paths: &[PathBuf], config: &GlobalConfig, quiet: bool) -> anyhow::Result<LogCollection> {
    let mut sink: Box<dyn DiagnosticSink> = if quiet {
        Box::new(SilentSink)
    } else {
        Box::new(TracingSink)
    };

    let mut logs = match paths {
        [single] => load_path(single, config, sink.as_mut())?,
        _ => {
            let mut logs = LogCollection::new();
            for path in paths {
                let loaded = load_path(path, config, sink.as_mut())?;
                logs.collate(loaded)
                    .with_context(|| format!("Cannot collate {}", path.display()))?;
            }
            logs
        }
    };

    if logs.log_source.is_none() {
        let source: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        logs.log_source = Some(source.join(", "));
    }
    Ok(logs)
}

fn report(filter: &str, outcome: FilterOutcome) {
    if let FilterOutcome::Applied(remaining) = outcome {
        info!(filter, remaining, "Filter applied");
    }
}

fn apply_filters(logs: &mut LogCollection, args: &Args, config: &GlobalConfig) -> anyhow::Result<()> {
    let walking_error = args.walking_error.unwrap_or(config.walking_error);

    if !args.ckey.is_empty() {
        report("ckey", logs.filter_ckeys(&args.ckey)?);
    }
    if !args.search.is_empty() {
        let case_sensitive = args.case_sensitive || config.case_sensitive;
        report("search", logs.filter_strings(&args.search, case_sensitive, false)?);
    }
    if !args.types.is_empty() || !args.exclude_types.is_empty() {
        report("type", logs.filter_by_type(&args.types, &args.exclude_types)?);
    }
    if let Some(name) = &args.location_name {
        let mode = if args.name_contains {
            NameMatch::Contains
        } else {
            NameMatch::Exact
        };
        report("location name", logs.filter_by_location_name(name, mode)?);
    }
    if let (Some(around), Some(radius)) = (&args.around, args.radius) {
        let centre = parse_location_arg(around)?;
        report("radius", logs.filter_by_radius(centre, radius)?);
    }
    if let Some(ckey) = &args.heard {
        report("heard", logs.filter_heard(ckey, walking_error)?);
    }
    if !args.conversation.is_empty() {
        report(
            "conversation",
            logs.filter_conversation(&args.conversation, walking_error)?,
        );
    }
    Ok(())
}

fn print(logs: &LogCollection, args: &Args) -> anyhow::Result<()> {
    let selected: Vec<&LogEntry> = match (args.head, args.tail) {
        (Some(n), _) => logs.head(n).collect(),
        (None, Some(n)) => logs.tail(n).collect(),
        (None, None) => logs.working().collect(),
    };

    let mut out = BufWriter::new(io::stdout().lock());
    if args.json {
        serde_json::to_writer_pretty(&mut out, &selected).context("Failed to serialize entries")?;
        writeln!(out)?;
    } else {
        for entry in selected {
            writeln!(out, "{entry}")?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    info!("LogBuddy starting up (version {})", env!("CARGO_PKG_VERSION"));

    let config = GlobalConfig::load();
    let quiet = args.quiet || config.quiet;

    let mut logs = load(&args.paths, &config, quiet)?;
    info!(
        round_id = logs.round_id,
        entries = logs.entries().len(),
        players = logs.ckeys_seen().len(),
        "Logs loaded"
    );

    apply_filters(&mut logs, &args, &config).context("Invalid filter")?;

    if let Some(path) = &args.output {
        logs.write_working_to_file(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), entries = logs.len(), "Saved working set");
        return Ok(());
    }

    print(&logs, &args)
}
