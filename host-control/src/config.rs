use std::path::PathBuf;

const PORT: &str = "/dev/ttyUSB0";
const BAUD: u32 = 115200;
const CSV_DIR: &str = "csv";
const MAX_ROWS: usize = 100;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Variable is set but does not hold a number
    #[error("{var}={value:?} is not a number")]
    NotANumber { var: &'static str, value: String },
    /// A CSV file has to keep at least one row
    #[error("TMP116_MAX_ROWS must be at least 1")]
    ZeroRows,
}

#[derive(Debug, PartialEq)]
pub struct Config {
    pub port: String,
    pub baud: u32,
    pub csv_dir: PathBuf,
    pub max_rows: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok(), find_port)
    }

    /// Builds the config from `lookup`, asking `detect_port` only when no port is configured
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Option<String>,
        detect_port: impl FnOnce() -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let port = lookup("TMP116_PORT")
            .or_else(detect_port)
            .unwrap_or_else(|| PORT.to_string());

        let baud = parse_var(&lookup, "TMP116_BAUD")?.unwrap_or(BAUD);
        let max_rows = parse_var(&lookup, "TMP116_MAX_ROWS")?.unwrap_or(MAX_ROWS);
        if max_rows == 0 {
            return Err(ConfigError::ZeroRows);
        }

        let csv_dir = lookup("TMP116_CSV_DIR").unwrap_or_else(|| CSV_DIR.to_string()).into();

        Ok(Self { port, baud, csv_dir, max_rows })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&'static str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::NotANumber { var, value }),
    }
}

/// First USB serial adapter on the machine, if any
fn find_port() -> Option<String> {
    let ports = serialport::available_ports().ok()?;
    ports
        .into_iter()
        .find(|p| matches!(p.port_type, serialport::SerialPortType::UsbPort(_)))
        .map(|p| p.port_name)
}
