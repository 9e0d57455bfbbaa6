//! Prompt-driven command loop.
//!
//! Generic over its input and output so it can be driven from a terminal or
//! from a buffer in tests. End of input is treated like `exit`.

use std::io::{BufRead, Write};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use stockroom_core::DomainError;
use stockroom_infra::{
    Action, StorageConfig, TransactionEntry, TransactionLog, ensure_encodable, save_inventory,
};
use stockroom_inventory::{InventoryRecord, InventoryStore, Ranking};

use crate::command::Command;

/// Whether the loop keeps going after a command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Session<R, W> {
    store: InventoryStore,
    config: StorageConfig,
    log: TransactionLog,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(store: InventoryStore, config: StorageConfig, input: R, output: W) -> Self {
        let log = TransactionLog::new(config.log_file.clone());
        Self {
            store,
            config,
            log,
            input,
            output,
        }
    }

    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Run until `exit` or end of input, then save the inventory.
    pub fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "Welcome to the Stockroom inventory system")?;

        loop {
            writeln!(
                self.output,
                "\nChoose an option: add | sell | receive | list | restock | expiring | history | help | exit"
            )?;
            let Some(line) = self.prompt(">> ")? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(msg) => {
                    writeln!(self.output, "Invalid command ({msg}). Type `help` for the list.")?;
                    continue;
                }
            };

            if self.dispatch(command)? == Flow::Exit {
                break;
            }
        }

        writeln!(self.output, "Saving and exiting. Goodbye!")?;
        self.save()
    }

    fn dispatch(&mut self, command: Command) -> anyhow::Result<Flow> {
        let flow = match command {
            Command::Add => self.add()?,
            Command::Sell => self.movement(Action::Sold)?,
            Command::Receive => self.movement(Action::Restocked)?,
            Command::List => self.list_low_stock()?,
            Command::Restock => self.ranked(Ranking::Restock)?,
            Command::Expiring => self.ranked(Ranking::ExpiringSoon)?,
            Command::History => self.history()?,
            Command::Help => self.help()?,
            Command::Exit => Flow::Exit,
        };
        Ok(flow)
    }

    /// Records the file format cannot hold are reported and left out; the
    /// rest are still written.
    fn save(&mut self) -> anyhow::Result<()> {
        let refused: Vec<_> = self
            .store
            .records()
            .filter_map(|r| ensure_encodable(r).err())
            .collect();
        for err in &refused {
            warn!(error = %err, "record left out of inventory file");
            writeln!(self.output, "Error: {err}")?;
        }

        let path = &self.config.inventory_file;
        let saved_at = Local::now().naive_local();
        let result = if refused.is_empty() {
            save_inventory(&self.store, path, saved_at)
        } else {
            let savable: InventoryStore = self
                .store
                .records()
                .filter(|r| ensure_encodable(r).is_ok())
                .cloned()
                .collect();
            save_inventory(&savable, path, saved_at)
        };
        result.with_context(|| format!("failed to save inventory to {path:?}"))?;
        Ok(())
    }

    /// `None` on end of input.
    fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// `Ok(None)` aborts the current command (end of input or a bad number).
    fn prompt_number(&mut self, label: &str) -> anyhow::Result<Option<i64>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        match raw.trim().parse::<i64>() {
            Ok(n) => Ok(Some(n)),
            Err(_) => {
                writeln!(self.output, "Error: `{}` is not a whole number.", raw.trim())?;
                Ok(None)
            }
        }
    }

    fn report(&mut self, err: &DomainError) -> anyhow::Result<()> {
        writeln!(self.output, "Error: {err}")?;
        Ok(())
    }

    fn record_transaction(&self, action: Action, sku: &str, qty: i64, name: Option<String>) {
        let entry = TransactionEntry::now(action, sku, qty, name);
        if let Err(e) = self.log.append(&entry) {
            warn!(error = %e, %action, sku, "failed to write transaction log");
        }
    }

    fn add(&mut self) -> anyhow::Result<Flow> {
        let Some(sku) = self.prompt("Enter SKU: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(name) = self.prompt("Enter item name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(quantity) = self.prompt_number("Enter quantity: ")? else {
            return Ok(Flow::Continue);
        };
        let Some(threshold) = self.prompt_number("Enter reorder threshold: ")? else {
            return Ok(Flow::Continue);
        };
        let Some(shelf_life) = self.prompt_number("Enter shelf life in days: ")? else {
            return Ok(Flow::Continue);
        };

        let record = match InventoryRecord::new(&sku, name, quantity, threshold, shelf_life) {
            Ok(record) => record,
            Err(e) => {
                self.report(&e)?;
                return Ok(Flow::Continue);
            }
        };

        if let Err(e) = ensure_encodable(&record) {
            writeln!(self.output, "Error: {e}")?;
            return Ok(Flow::Continue);
        }

        let (sku, name, qty) = (
            record.sku().to_string(),
            record.name().to_string(),
            record.quantity(),
        );
        if self.store.add_item(record).is_some() {
            info!(%sku, "item replaced");
        }
        self.record_transaction(Action::Added, &sku, qty, Some(name));
        writeln!(self.output, "Item added successfully.")?;
        Ok(Flow::Continue)
    }

    /// `sell` and `receive`.
    fn movement(&mut self, action: Action) -> anyhow::Result<Flow> {
        let Some(sku) = self.prompt("Enter SKU: ")? else {
            return Ok(Flow::Exit);
        };
        let label = match action {
            Action::Sold => "Enter quantity to sell: ",
            _ => "Enter quantity to receive: ",
        };
        let Some(qty) = self.prompt_number(label)? else {
            return Ok(Flow::Continue);
        };

        let sku = sku.trim();
        let result = match action {
            Action::Sold => self.store.sell_item(sku, qty),
            _ => self.store.receive_stock(sku, qty),
        };
        if let Err(e) = result {
            self.report(&e)?;
            return Ok(Flow::Continue);
        }

        let name = self.store.get(sku).map(|r| r.name().to_string());
        self.record_transaction(action, sku, qty, name);
        let done = match action {
            Action::Sold => "Item sold successfully.",
            _ => "Stock updated successfully.",
        };
        writeln!(self.output, "{done}")?;
        Ok(Flow::Continue)
    }

    fn list_low_stock(&mut self) -> anyhow::Result<Flow> {
        let mut low = self.store.list_low_stock();
        if low.is_empty() {
            writeln!(self.output, "All items are sufficiently stocked.")?;
            return Ok(Flow::Continue);
        }
        low.sort_by(|a, b| a.sku().cmp(b.sku()));
        writeln!(self.output, "Low Stock Items:")?;
        for record in &low {
            writeln!(self.output, "{record}")?;
        }
        Ok(Flow::Continue)
    }

    fn ranked(&mut self, ranking: Ranking) -> anyhow::Result<Flow> {
        let Some(count) = self.prompt_number("How many suggestions: ")? else {
            return Ok(Flow::Continue);
        };
        let Ok(count) = usize::try_from(count) else {
            writeln!(self.output, "Error: the number of suggestions cannot be negative.")?;
            return Ok(Flow::Continue);
        };

        let records = match ranking {
            Ranking::Restock => self.store.suggest_restocks(count),
            Ranking::ExpiringSoon => self.store.suggest_expiring_soon(count),
        };
        if records.is_empty() {
            writeln!(self.output, "No items in inventory.")?;
            return Ok(Flow::Continue);
        }
        for (i, record) in records.iter().enumerate() {
            writeln!(
                self.output,
                "{}. {record} (urgency {})",
                i + 1,
                ranking.priority(record)
            )?;
        }
        Ok(Flow::Continue)
    }

    fn history(&mut self) -> anyhow::Result<Flow> {
        let Some(by) = self.prompt("Filter by (date | action): ")? else {
            return Ok(Flow::Exit);
        };
        let (entries, label) = match by.trim().to_ascii_lowercase().as_str() {
            "date" => {
                let Some(raw) = self.prompt("Enter date (dd-MM-yyyy): ")? else {
                    return Ok(Flow::Exit);
                };
                let Ok(date) = NaiveDate::parse_from_str(raw.trim(), "%d-%m-%Y") else {
                    writeln!(self.output, "Error: `{}` is not a dd-MM-yyyy date.", raw.trim())?;
                    return Ok(Flow::Continue);
                };
                (self.log.filter_by_date(date)?, "DATE")
            }
            "action" => {
                let Some(raw) = self.prompt("Enter action (ADDED | SOLD | RESTOCKED): ")? else {
                    return Ok(Flow::Exit);
                };
                match raw.parse::<Action>() {
                    Ok(action) => (self.log.filter_by_action(action)?, action.as_str()),
                    Err(e) => {
                        writeln!(self.output, "Error: {e}")?;
                        return Ok(Flow::Continue);
                    }
                }
            }
            other => {
                writeln!(self.output, "Error: cannot filter by `{other}`.")?;
                return Ok(Flow::Continue);
            }
        };

        if entries.is_empty() {
            writeln!(self.output, "No matching transactions.")?;
            return Ok(Flow::Continue);
        }
        for e in &entries {
            writeln!(
                self.output,
                "{} {} {:<9} {} x{} {}",
                e.date.format("%d-%m-%Y"),
                e.time.format("%H:%M:%S"),
                e.action,
                e.sku,
                e.quantity,
                e.item_name.as_deref().unwrap_or("")
            )?;
        }

        let Some(answer) = self.prompt("Export these rows? (y/n): ")? else {
            return Ok(Flow::Exit);
        };
        if answer.trim().eq_ignore_ascii_case("y") {
            let path = TransactionLog::export(
                &entries,
                &self.config.export_dir,
                label,
                Local::now().naive_local(),
            )?;
            writeln!(self.output, "Exported filtered data to: {}", path.display())?;
        }
        Ok(Flow::Continue)
    }

    fn help(&mut self) -> anyhow::Result<Flow> {
        for c in Command::ALL {
            writeln!(self.output, "  {:<9} {}", c.name(), c.summary())?;
        }
        Ok(Flow::Continue)
    }
}
