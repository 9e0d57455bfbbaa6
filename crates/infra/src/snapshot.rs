//! Whole-inventory CSV snapshot.
//!
//! File layout:
//!
//! ```text
//! Inventory Saved At: 15-10-2026 09:30:00
//! sku,name,quantity,reorderThreshold,shelfLifeDays
//! A1,Milk,5,10,3
//!
//! ```
//!
//! The format has no quoting, so text fields containing `,` or a line break
//! are refused on save.

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, info, warn};

use stockroom_inventory::{InventoryRecord, InventoryStore};

pub const HEADER: &str = "sku,name,quantity,reorderThreshold,shelfLifeDays";
const SAVED_AT_PREFIX: &str = "Inventory Saved At: ";
const SAVED_AT_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to {action} inventory file {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {field} of SKU `{sku}`: contains a comma or line break")]
    Unencodable { sku: String, field: &'static str },
}

/// Result of [`load_inventory`].
#[derive(Debug, Default)]
pub struct LoadedInventory {
    pub store: InventoryStore,
    /// Timestamp from the first line, when it parses.
    pub saved_at: Option<NaiveDateTime>,
    /// Rows that were present but rejected.
    pub skipped: usize,
}

/// Write every record of `store` to `path`, replacing the file. Returns the
/// number of rows written.
///
/// Nothing is written if any record cannot be encoded.
pub fn save_inventory(
    store: &InventoryStore,
    path: &Path,
    saved_at: NaiveDateTime,
) -> Result<usize, SnapshotError> {
    let mut out = format!(
        "{SAVED_AT_PREFIX}{}\n{HEADER}\n",
        saved_at.format(SAVED_AT_FORMAT)
    );
    let mut rows = 0;
    for record in store.records() {
        out.push_str(&encode_row(record)?);
        out.push('\n');
        rows += 1;
    }
    out.push('\n');

    std::fs::write(path, out).map_err(|source| SnapshotError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows, "inventory saved");
    Ok(rows)
}

/// Read a snapshot written by [`save_inventory`].
///
/// A missing file is an empty inventory. Blank lines and rows with fewer than
/// five columns are ignored; rows whose numbers do not parse or fail record
/// validation are skipped and counted.
pub fn load_inventory(path: &Path) -> Result<LoadedInventory, SnapshotError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no inventory file yet; starting empty");
            return Ok(LoadedInventory::default());
        }
        Err(source) => {
            return Err(SnapshotError::Io {
                action: "read",
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut lines = text.lines().enumerate();
    let saved_at = lines.next().and_then(|(_, first)| {
        first
            .strip_prefix(SAVED_AT_PREFIX)
            .and_then(|ts| NaiveDateTime::parse_from_str(ts.trim(), SAVED_AT_FORMAT).ok())
    });
    // Column header.
    lines.next();

    let mut loaded = LoadedInventory {
        saved_at,
        ..LoadedInventory::default()
    };
    for (n, line) in lines {
        let line = line.trim_end_matches('\r');
        let fields: Vec<&str> = line.split(',').collect();
        if line.trim().is_empty() || fields.len() < 5 {
            if !line.trim().is_empty() {
                debug!(line = n + 1, "ignoring short inventory row");
            }
            continue;
        }

        match decode_row(&fields) {
            Ok(record) => {
                loaded.store.add_item(record);
            }
            Err(reason) => {
                warn!(path = %path.display(), line = n + 1, %reason, "skipping invalid inventory row");
                loaded.skipped += 1;
            }
        }
    }

    info!(
        path = %path.display(),
        records = loaded.store.len(),
        skipped = loaded.skipped,
        "inventory loaded"
    );
    Ok(loaded)
}

/// Whether `text` can go into a snapshot field unquoted.
pub fn is_encodable(text: &str) -> bool {
    !text.contains([',', '\n', '\r'])
}

/// Fails with [`SnapshotError::Unencodable`] when [`save_inventory`] would
/// refuse `record`.
pub fn ensure_encodable(record: &InventoryRecord) -> Result<(), SnapshotError> {
    let sku = record.sku().as_str();
    for (field, value) in [("sku", sku), ("name", record.name())] {
        if !is_encodable(value) {
            return Err(SnapshotError::Unencodable {
                sku: sku.to_string(),
                field,
            });
        }
    }
    Ok(())
}

fn encode_row(record: &InventoryRecord) -> Result<String, SnapshotError> {
    ensure_encodable(record)?;
    let sku = record.sku().as_str();
    Ok(format!(
        "{},{},{},{},{}",
        sku,
        record.name(),
        record.quantity(),
        record.reorder_threshold(),
        record.shelf_life_days()
    ))
}

fn decode_row(fields: &[&str]) -> Result<InventoryRecord, String> {
    let number = |i: usize, name: &str| {
        fields[i]
            .trim()
            .parse::<i64>()
            .map_err(|e| format!("{name} `{}`: {e}", fields[i]))
    };
    InventoryRecord::new(
        fields[0],
        fields[1],
        number(2, "quantity")?,
        number(3, "reorder threshold")?,
        number(4, "shelf life")?,
    )
    .map_err(|e| e.to_string())
}
