mod config;
mod db;
mod error;
mod logging;
mod models;
mod plan;
mod run;
mod ui;

use anyhow::Result;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::from_env()?;
    logging::init(&config)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting dreamplan");

    let mut db = db::Database::open(&config.db_path)?;

    match args.len() {
        1 => run::as_tui(&mut db, &config),
        2.. => run::as_cli(&args, &mut db, &config),
        _ => {
            eprintln!("Usage: dreamplan [command]");
            Ok(())
        }
    }
}
