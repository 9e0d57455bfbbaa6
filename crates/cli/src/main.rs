use anyhow::Context;

use stockroom_cli::Session;
use stockroom_infra::{StorageConfig, load_inventory};

fn main() -> anyhow::Result<()> {
    stockroom_observability::init();

    let config = StorageConfig::from_env()?;
    config.ensure_dirs()?;

    let loaded = load_inventory(&config.inventory_file)
        .with_context(|| format!("failed to load inventory from {:?}", config.inventory_file))?;
    if loaded.skipped > 0 {
        tracing::warn!(skipped = loaded.skipped, "some inventory rows could not be loaded");
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Session::new(loaded.store, config, stdin.lock(), stdout.lock()).run()
}
