use core::str::FromStr;

/// Top-level commands of the interactive loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Add,
    Sell,
    Receive,
    List,
    Restock,
    Expiring,
    History,
    Help,
    Exit,
}

impl Command {
    pub const ALL: [Command; 9] = [
        Command::Add,
        Command::Sell,
        Command::Receive,
        Command::List,
        Command::Restock,
        Command::Expiring,
        Command::History,
        Command::Help,
        Command::Exit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Add => "add",
            Command::Sell => "sell",
            Command::Receive => "receive",
            Command::List => "list",
            Command::Restock => "restock",
            Command::Expiring => "expiring",
            Command::History => "history",
            Command::Help => "help",
            Command::Exit => "exit",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Command::Add => "add or replace an item",
            Command::Sell => "take units out of stock",
            Command::Receive => "put units into stock",
            Command::List => "list items below their reorder threshold",
            Command::Restock => "suggest the items most in need of restocking",
            Command::Expiring => "suggest the items with the shortest shelf life",
            Command::History => "filter (and optionally export) the transaction log",
            Command::Help => "show this list",
            Command::Exit => "save and quit",
        }
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Command::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| format!("unknown command `{}`", s.trim()))
    }
}
