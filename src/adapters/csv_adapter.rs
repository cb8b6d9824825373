//! CSV file data adapter.
//!
//! Reads kline-export files named `<SYMBOL>.csv` with the columns
//! `open_time, open, high, low, close, volume_base, close_time,
//! volume_quote` (times in epoch milliseconds, header row expected).

use chrono::{DateTime, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

use crate::domain::candle::Candle;
use crate::domain::error::CandlebotError;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn data_error(reason: String) -> CandlebotError {
    CandlebotError::Data { reason }
}

fn field<'a>(record: &'a csv::StringRecord, index: usize, name: &str) -> Result<&'a str, CandlebotError> {
    record
        .get(index)
        .ok_or_else(|| data_error(format!("missing {} column", name)))
}

fn parse_number(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, CandlebotError> {
    field(record, index, name)?
        .trim()
        .parse()
        .map_err(|e| data_error(format!("invalid {} value: {}", name, e)))
}

fn parse_time(record: &csv::StringRecord, index: usize, name: &str) -> Result<NaiveDateTime, CandlebotError> {
    let millis: i64 = field(record, index, name)?
        .trim()
        .parse()
        .map_err(|e| data_error(format!("invalid {} value: {}", name, e)))?;
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| data_error(format!("{} {} out of range", name, millis)))
}

impl DataPort for CsvAdapter {
    fn fetch_candles(&self, symbol: &str) -> Result<Vec<Candle>, CandlebotError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for result in reader.records() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;

            candles.push(Candle::new(
                parse_number(&record, 1, "open")?,
                parse_number(&record, 2, "high")?,
                parse_number(&record, 3, "low")?,
                parse_number(&record, 4, "close")?,
                parse_number(&record, 5, "volume_base")?,
                parse_number(&record, 7, "volume_quote")?,
                parse_time(&record, 0, "open_time")?,
                parse_time(&record, 6, "close_time")?,
            ));
        }

        candles.sort_by_key(|c| c.open_time);
        for pair in candles.windows(2) {
            if pair[0].open_time == pair[1].open_time {
                return Err(data_error(format!(
                    "duplicate candle at {}",
                    pair[0].open_time
                )));
            }
        }
        Ok(candles)
    }

    fn list_symbols(&self) -> Result<Vec<String>, CandlebotError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_error(format!("directory entry error: {}", e)))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if let Some(symbol) = name.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
