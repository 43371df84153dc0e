use std::io::{self, BufRead};

use crate::{reading::Reading, store::CsvStore};

/// Stores every reading line from `reader` until it runs dry, returns how many were stored.
///
/// Read timeouts are waited out, anything that does not parse is logged and skipped.
pub fn run(reader: &mut impl BufRead, store: &CsvStore, now: impl Fn() -> String) -> io::Result<usize> {
    let mut stored = 0;
    let mut buf = Vec::new();
    loop {
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) if buf.is_empty() => return Ok(stored),
            Ok(_) => {}
            // the board only talks once a second, idle reads time out.
            // A partial line stays in `buf` and is completed by the next read.
            Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
            Err(e) => return Err(e),
        }

        // line noise on reset is not UTF-8, it fails to parse below
        let line = String::from_utf8_lossy(&buf);
        match line.parse::<Reading>() {
            Ok(reading) => {
                let path = store.append(&now(), &reading)?;
                log::info!("{reading} -> {}", path.display());
                stored += 1;
            }
            Err(e) => log::warn!("skipping {:?}: {e}", line.trim()),
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::VecDeque,
        fs,
        io::{BufReader, Read},
        path::PathBuf,
        time::{SystemTime, UNIX_EPOCH},
    };

    /// Hands out scripted chunks, an `Err` entry fails that one read
    struct Script(VecDeque<Result<&'static [u8], io::ErrorKind>>);

    impl Read for Script {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            match self.0.pop_front() {
                None => Ok(0),
                Some(Err(kind)) => Err(kind.into()),
                Some(Ok(chunk)) => {
                    out[..chunk.len()].copy_from_slice(chunk);
                    Ok(chunk.len())
                }
            }
        }
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        std::env::temp_dir().join(format!("host-control-logger-{tag}-{}-{nanos}", std::process::id()))
    }

    fn log_script(tag: &str, script: Vec<Result<&'static [u8], io::ErrorKind>>) -> (PathBuf, io::Result<usize>) {
        let dir = temp_dir(tag);
        let store = CsvStore::open(&dir, 10).unwrap();
        let mut reader = BufReader::new(Script(script.into()));
        let result = run(&mut reader, &store, || "t".to_string());
        (dir, result)
    }

    #[test]
    fn stores_good_lines_and_skips_the_rest() {
        let (dir, result) = log_script(
            "mixed",
            vec![
                Ok(b"TMP116, id, 0x1116\r\n"),
                Ok(b"\xff\xfe garbage\r\n"),
                Ok(b"TMP116, temperature, 23.00\r\n"),
                Ok(b"TMP116, error, read\r\n"),
                Ok(b"TMP116, temperature, nan\r\n"),
                Ok(b"TMP116, temperature, -1.25\r\n"),
            ],
        );
        assert_eq!(result.unwrap(), 2);
        assert_eq!(
            fs::read_to_string(dir.join("tmp116_temperature.csv")).unwrap(),
            "time, sensor, quantity, value\nt, TMP116, temperature, 23\nt, TMP116, temperature, -1.25\n"
        );
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn partial_line_survives_timeout() {
        let (dir, result) = log_script(
            "timeout",
            vec![
                Err(io::ErrorKind::TimedOut),
                Ok(b"TMP116, tempe"),
                Err(io::ErrorKind::TimedOut),
                Ok(b"rature, 21.5\r\n"),
                Ok(b"TMP116, temperature, 21.75"),
            ],
        );
        assert_eq!(result.unwrap(), 2);
        assert_eq!(
            fs::read_to_string(dir.join("tmp116_temperature.csv")).unwrap(),
            "time, sensor, quantity, value\nt, TMP116, temperature, 21.5\nt, TMP116, temperature, 21.75\n"
        );

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn other_read_errors_stop_the_logger() {
        let (dir, result) = log_script(
            "broken",
            vec![
                Ok(b"TMP116, temperature, 20.0\r\n"),
                Err(io::ErrorKind::BrokenPipe),
                Ok(b"TMP116, temperature, 20.5\r\n"),
            ],
        );
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(
            fs::read_to_string(dir.join("tmp116_temperature.csv")).unwrap(),
            "time, sensor, quantity, value\nt, TMP116, temperature, 20\n"
        );

        fs::remove_dir_all(dir).unwrap();
    }
}
