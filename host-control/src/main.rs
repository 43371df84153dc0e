mod config;
mod logger;
mod reading;
mod store;

use std::{
    io::{self, BufReader},
    time::Duration,
};

use config::{Config, ConfigError};
use store::CsvStore;

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("serial port: {0}")]
    Serial(#[from] serialport::Error),
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let store = CsvStore::open(&config.csv_dir, config.max_rows)?;

    let port = serialport::new(&config.port, config.baud).timeout(Duration::from_secs(2)).open()?;
    log::info!("listening on {} @ {} baud, writing to {}", config.port, config.baud, config.csv_dir.display());

    let mut reader = BufReader::new(port);
    let stored = logger::run(&mut reader, &store, || {
        chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
    })?;
    log::info!("port closed after {stored} readings");
    Ok(())
}
