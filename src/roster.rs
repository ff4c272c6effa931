//! Roster import: `name,deck` CSV into player registrations.

use serde::Deserialize;
use std::fs::File;
use std::io;
use std::path::Path;

/// One row of a roster file.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct PlayerEntry {
    pub name: String,
    #[serde(default)]
    pub deck: String,
}

/// Errors reading a roster.
#[derive(Debug)]
pub enum RosterError {
    Io(io::Error),
    Csv(csv::Error),
    /// A row without a player name (1-based line number).
    EmptyName { line: u64 },
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Io(e) => write!(f, "Cannot open roster: {}", e),
            RosterError::Csv(e) => write!(f, "Invalid roster: {}", e),
            RosterError::EmptyName { line } => write!(f, "Missing player name on line {}", line),
        }
    }
}

impl std::error::Error for RosterError {}

impl From<io::Error> for RosterError {
    fn from(e: io::Error) -> Self {
        RosterError::Io(e)
    }
}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

/// Parse a roster with a `name,deck` header. Fields are trimmed; the deck column may be
/// empty or absent.
pub fn read_roster<R: io::Read>(reader: R) -> Result<Vec<PlayerEntry>, RosterError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut entries = Vec::new();
    for row in rdr.deserialize::<PlayerEntry>() {
        let entry = row?;
        if entry.name.is_empty() {
            let line = entries.len() as u64 + 2;
            return Err(RosterError::EmptyName { line });
        }
        entries.push(entry);
    }
    log::debug!("read {} roster entries", entries.len());
    Ok(entries)
}

/// Read a roster file from disk.
pub fn load_roster(path: &Path) -> Result<Vec<PlayerEntry>, RosterError> {
    read_roster(File::open(path)?)
}
