//! Session and catch logging under `logs/`: sessions as a JSON array,
//! catches as JSON Lines

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::fishing::TickOutcome;
use crate::screen_reader::Coordinate;
use crate::utils::path::get_data_dir;

/// Session entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub start: String,
    pub stop: Option<String>,
}

/// One finished fishing cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchLogEntry {
    pub timestamp: String,
    #[serde(rename = "catch")]
    pub status: bool,
    /// no_bite, no_splash or caught
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Coordinate>,
}

impl CatchLogEntry {
    /// Entry for a cycle-ending outcome; `None` for intermediate ticks
    pub fn from_outcome(outcome: &TickOutcome) -> Option<Self> {
        let (status, kind, marker) = match *outcome {
            TickOutcome::Caught { marker } => (true, "caught", Some(marker)),
            TickOutcome::NoBite => (false, "no_bite", None),
            TickOutcome::NoSplash => (false, "no_splash", None),
            _ => return None,
        };
        Some(Self {
            timestamp: Utc::now().to_rfc3339(),
            status,
            outcome: kind.to_string(),
            marker,
        })
    }
}

fn logs_dir() -> PathBuf {
    get_data_dir().join("logs")
}

/// Get sessions file path
pub fn get_sessions_path() -> PathBuf {
    logs_dir().join("sessions.json")
}

/// Get fishing log file path (one JSON object per line)
pub fn get_fishing_log_path() -> PathBuf {
    logs_dir().join("fishing_log.jsonl")
}

/// Read a JSON array; a missing file is empty, a corrupt one is an error
fn read_entries<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {:?}", path)),
    };
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
}

/// Read a JSON array that is about to be rewritten.
///
/// A file that does not parse is renamed to `<name>.corrupt-<timestamp>` and
/// treated as empty, so the next write never destroys the old content.
fn read_entries_for_update<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match read_entries(path) {
        Ok(entries) => Ok(entries),
        Err(e) if path.exists() => {
            let backup = corrupt_backup_path(path);
            tracing::warn!("[LOG] {:#}, moving it to {:?}", e, backup);
            fs::rename(path, &backup).with_context(|| format!("Failed to move {:?} aside", path))?;
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

fn corrupt_backup_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3f");
    path.with_file_name(format!("{}.corrupt-{}", name, stamp))
}

fn write_entries<T: Serialize>(path: &Path, entries: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let content = serde_json::to_string_pretty(entries)?;
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {:?}", parent))?;
    }
    Ok(())
}

/// Append a catch entry as one line to the log at `path`
pub fn append_catch(path: &Path, entry: CatchLogEntry) -> Result<()> {
    ensure_parent(path)?;
    let mut line = serde_json::to_string(&entry)?;
    line.push('\n');
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {:?}", path))?;
    file.write_all(line.as_bytes())
        .with_context(|| format!("Failed to write {:?}", path))
}

/// Load every readable catch entry; malformed lines are skipped with a warning
pub fn load_catches(path: &Path) -> Vec<CatchLogEntry> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!("[LOG] Failed to read {:?}: {}", path, e);
            }
            return Vec::new();
        }
    };
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(i, line)| match serde_json::from_str(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("[LOG] Skipping line {} of {:?}: {}", i + 1, path, e);
                None
            }
        })
        .collect()
}

/// Load sessions from `path`; an unreadable file is logged and reads as empty
pub fn load_sessions(path: &Path) -> Vec<Session> {
    read_entries(path).unwrap_or_else(|e| {
        tracing::warn!("[SESSION] {:#}", e);
        Vec::new()
    })
}

/// Open a new session, closing a dangling one left by a crash first
pub fn start_session(path: &Path) -> Result<()> {
    let mut sessions: Vec<Session> = read_entries_for_update(path)?;
    let now = Utc::now().to_rfc3339();
    if let Some(last) = sessions.last_mut().filter(|s| s.stop.is_none()) {
        tracing::warn!("[SESSION] Previous session {} was never closed", last.start);
        last.stop = Some(now.clone());
    }
    sessions.push(Session { start: now, stop: None });
    write_entries(path, &sessions)
}

/// Close the open session, if any
pub fn stop_session(path: &Path) -> Result<()> {
    let mut sessions: Vec<Session> = read_entries_for_update(path)?;
    match sessions.last_mut().filter(|s| s.stop.is_none()) {
        Some(last) => last.stop = Some(Utc::now().to_rfc3339()),
        None => {
            tracing::debug!("[SESSION] No active session to stop");
            return Ok(());
        }
    }
    write_entries(path, &sessions)
}
