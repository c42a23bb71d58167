use anyhow::{Context, Result};
use log::info;
use std::env;
use std::io;

use credit_card_tracker::{App, AppConfig, ExpenseStore, PersistenceAdapter, VERSION};

fn main() -> Result<()> {
    // Quiet by default so log lines don't interleave with the menu
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    // Optional first argument: directory holding the data files
    let mut config = AppConfig::from_env();
    if let Some(dir) = args.get(1) {
        config = config.with_data_dir(dir);
    }

    info!(
        "Starting {} v{} (data file: {})",
        config.app_name,
        VERSION,
        config.file_path("json").display()
    );

    let stdin = io::stdin();
    let mut app = App::new(
        ExpenseStore::new(),
        PersistenceAdapter::new(config),
        stdin.lock(),
        io::stdout(),
    );

    app.initialize().context("Failed to initialize application")?;
    app.run().context("Command loop failed")?;
    app.shutdown().context("Failed to shut down cleanly")?;

    Ok(())
}
