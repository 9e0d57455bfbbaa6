//! Append-only CSV log of stock movements.
//!
//! Columns: `Date,Time,Action,SKU,Quantity,ItemName`, with dates as
//! `dd-MM-yyyy` and times as `HH:mm:ss`. `ItemName` is last so it may contain
//! commas; it is empty when the action carries no name.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const HEADER: &str = "Date,Time,Action,SKU,Quantity,ItemName";
const DATE_FORMAT: &str = "%d-%m-%Y";
const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Error)]
pub enum TransactionLogError {
    #[error("transaction log I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown transaction action `{0}`")]
    UnknownAction(String),

    #[error("malformed transaction row: {0}")]
    Malformed(String),

    #[error("cannot log {field} containing a comma or line break")]
    Unencodable { field: &'static str },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> TransactionLogError + '_ {
    move |source| TransactionLogError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Kind of stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    Added,
    Sold,
    Restocked,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Added => "ADDED",
            Action::Sold => "SOLD",
            Action::Restocked => "RESTOCKED",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Action {
    type Err = TransactionLogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADDED" => Ok(Action::Added),
            "SOLD" => Ok(Action::Sold),
            "RESTOCKED" => Ok(Action::Restocked),
            _ => Err(TransactionLogError::UnknownAction(s.to_string())),
        }
    }
}

/// One logged movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEntry {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub action: Action,
    pub sku: String,
    pub quantity: i64,
    pub item_name: Option<String>,
}

impl TransactionEntry {
    pub fn new(
        at: NaiveDateTime,
        action: Action,
        sku: impl Into<String>,
        quantity: i64,
        item_name: Option<String>,
    ) -> Self {
        Self {
            date: at.date(),
            // Whole seconds only; that is all the file keeps.
            time: NaiveTime::from_num_seconds_from_midnight_opt(
                at.time().num_seconds_from_midnight(),
                0,
            )
            .unwrap_or(at.time()),
            action,
            sku: sku.into(),
            quantity,
            item_name,
        }
    }

    /// Stamped with the local wall-clock time.
    pub fn now(
        action: Action,
        sku: impl Into<String>,
        quantity: i64,
        item_name: Option<String>,
    ) -> Self {
        Self::new(Local::now().naive_local(), action, sku, quantity, item_name)
    }

    fn to_row(&self) -> Result<String, TransactionLogError> {
        if self.sku.contains([',', '\n', '\r']) {
            return Err(TransactionLogError::Unencodable { field: "sku" });
        }
        let name = self.item_name.as_deref().unwrap_or("");
        if name.contains(['\n', '\r']) {
            return Err(TransactionLogError::Unencodable { field: "item name" });
        }
        Ok(format!(
            "{},{},{},{},{},{}",
            self.date.format(DATE_FORMAT),
            self.time.format(TIME_FORMAT),
            self.action,
            self.sku,
            self.quantity,
            name
        ))
    }

    fn parse_row(line: &str) -> Result<Self, TransactionLogError> {
        let fields: Vec<&str> = line.splitn(6, ',').collect();
        if fields.len() < 5 {
            return Err(TransactionLogError::Malformed(line.to_string()));
        }
        let malformed = |what: &str| TransactionLogError::Malformed(format!("{what} in `{line}`"));

        let date =
            NaiveDate::parse_from_str(fields[0], DATE_FORMAT).map_err(|_| malformed("bad date"))?;
        let time =
            NaiveTime::parse_from_str(fields[1], TIME_FORMAT).map_err(|_| malformed("bad time"))?;
        let action = fields[2].parse::<Action>()?;
        let quantity = fields[4].trim().parse::<i64>().map_err(|_| malformed("bad quantity"))?;
        let item_name = fields
            .get(5)
            .map(|n| n.to_string())
            .filter(|n| !n.is_empty());

        Ok(Self {
            date,
            time,
            action,
            sku: fields[3].to_string(),
            quantity,
            item_name,
        })
    }
}

/// Handle on a transaction log file.
#[derive(Debug, Clone)]
pub struct TransactionLog {
    path: PathBuf,
}

impl TransactionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the file is new or empty.
    pub fn append(&self, entry: &TransactionEntry) -> Result<(), TransactionLogError> {
        let row = entry.to_row()?;
        let is_new = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err(&self.path))?;
        let mut out = String::new();
        if is_new {
            out.push_str(HEADER);
            out.push('\n');
        }
        out.push_str(&row);
        out.push('\n');
        file.write_all(out.as_bytes()).map_err(io_err(&self.path))?;

        debug!(action = %entry.action, sku = %entry.sku, quantity = entry.quantity, "transaction logged");
        Ok(())
    }

    /// Every parseable row. A missing file is an empty log; malformed rows
    /// are skipped with a warning.
    pub fn read_all(&self) -> Result<Vec<TransactionEntry>, TransactionLogError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(&self.path)(e)),
        };

        let entries = text
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match TransactionEntry::parse_row(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "skipping transaction row");
                    None
                }
            })
            .collect();
        Ok(entries)
    }

    pub fn filter_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<TransactionEntry>, TransactionLogError> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.date == date)
            .collect())
    }

    pub fn filter_by_action(
        &self,
        action: Action,
    ) -> Result<Vec<TransactionEntry>, TransactionLogError> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.action == action)
            .collect())
    }

    /// Write `entries` to `{dir}/{LABEL}_{dd-MM-yyyy}_{HH-MM-SS}.csv` and
    /// return the path.
    pub fn export(
        entries: &[TransactionEntry],
        dir: &Path,
        label: &str,
        at: NaiveDateTime,
    ) -> Result<PathBuf, TransactionLogError> {
        std::fs::create_dir_all(dir).map_err(io_err(dir))?;
        let path = dir.join(format!(
            "{}_{}.csv",
            label.trim().to_ascii_uppercase(),
            at.format("%d-%m-%Y_%H-%M-%S")
        ));

        let mut out = format!("{HEADER}\n");
        for entry in entries {
            out.push_str(&entry.to_row()?);
            out.push('\n');
        }
        std::fs::write(&path, out).map_err(io_err(&path))?;

        info!(path = %path.display(), rows = entries.len(), "transactions exported");
        Ok(path)
    }
}
