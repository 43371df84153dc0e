use std::{
    fs::{self, File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use crate::reading::{self, Reading};

const HEADER: &str = "time, sensor, quantity, value";

/// One CSV file per sensor/quantity stream, each capped at `max_rows` rows
#[derive(Debug)]
pub struct CsvStore {
    dir: PathBuf,
    max_rows: usize,
}

impl CsvStore {
    pub fn open(dir: impl Into<PathBuf>, max_rows: usize) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, max_rows })
    }

    /// File for the reading's stream, `None` when a name would not stay inside the directory
    pub fn path_for(&self, reading: &Reading) -> Option<PathBuf> {
        if !reading::is_valid_name(&reading.sensor) || !reading::is_valid_name(&reading.quantity) {
            return None;
        }
        let name = format!("{}_{}.csv", reading.sensor, reading.quantity).to_lowercase();
        Some(self.dir.join(name))
    }

    /// Appends the reading under `time` and drops the oldest rows past the cap
    pub fn append(&self, time: &str, reading: &Reading) -> io::Result<PathBuf> {
        let path = self.path_for(reading).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("bad stream name in {reading}"))
        })?;

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{HEADER}")?;
        }
        writeln!(file, "{time}, {reading}")?;
        drop(file);

        self.trim(&path)?;
        Ok(path)
    }

    /// Rewrites the file keeping the header and the newest `max_rows` rows
    fn trim(&self, path: &Path) -> io::Result<()> {
        let lines = BufReader::new(File::open(path)?).lines().collect::<io::Result<Vec<_>>>()?;
        let Some((header, rows)) = lines.split_first() else {
            return Ok(());
        };
        if rows.len() <= self.max_rows {
            return Ok(());
        }

        let mut file = File::create(path)?;
        writeln!(file, "{header}")?;
        for row in &rows[rows.len() - self.max_rows..] {
            writeln!(file, "{row}")?;
        }
        Ok(())
    }
}
