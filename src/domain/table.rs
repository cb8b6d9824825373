//! Candle table: OHLCV rows plus an arena of named derived columns.
//!
//! Indicator computations insert columns into the arena; "already
//! computed" is a presence lookup against it. Column display names are
//! part of the public contract (strategies and the CSV writer key off
//! them).

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::candle::Candle;

/// Closed set of derived column identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    NextClose,
    CloseDelta,
    Tp,
    Sma,
    Mad,
    Clv,
    Mr,
    /// EMA-smoothed raw close delta (RSI intermediate).
    Ema,
    Emau,
    Emad,
    Rs,
    Adi,
    AdiEma,
    Cci,
    Macd,
    MacdEma,
    Mfi,
    Obv,
    ObvCa,
    Pvt,
    PvtCa,
    Rsi,
}

impl Column {
    /// Every column identity, in the order used for CSV export.
    pub const ALL: [Column; 22] = [
        Column::NextClose,
        Column::CloseDelta,
        Column::Tp,
        Column::Sma,
        Column::Mad,
        Column::Clv,
        Column::Mr,
        Column::Ema,
        Column::Emau,
        Column::Emad,
        Column::Rs,
        Column::Adi,
        Column::AdiEma,
        Column::Cci,
        Column::Macd,
        Column::MacdEma,
        Column::Mfi,
        Column::Obv,
        Column::ObvCa,
        Column::Pvt,
        Column::PvtCa,
        Column::Rsi,
    ];
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Column::NextClose => "Next Close",
            Column::CloseDelta => "Close Delta",
            Column::Tp => "TP",
            Column::Sma => "SMA",
            Column::Mad => "MAD",
            Column::Clv => "CLV",
            Column::Mr => "MR",
            Column::Ema => "EMA",
            Column::Emau => "EMAU",
            Column::Emad => "EMAD",
            Column::Rs => "RS",
            Column::Adi => "ADI",
            Column::AdiEma => "ADIEMA",
            Column::Cci => "CCI",
            Column::Macd => "MACD",
            Column::MacdEma => "MACDEMA",
            Column::Mfi => "MFI",
            Column::Obv => "OBV",
            Column::ObvCa => "OBVCA",
            Column::Pvt => "PVT",
            Column::PvtCa => "PVTCA",
            Column::Rsi => "RSI",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CandleTable {
    candles: Vec<Candle>,
    columns: BTreeMap<Column, Vec<f64>>,
}

impl CandleTable {
    /// Build a table and populate the derived "Next Close" and
    /// "Close Delta" columns.
    ///
    /// The last row has no forward close, so "Next Close" repeats its own
    /// close there, pinning the final "Close Delta" to zero.
    pub fn from_candles(candles: Vec<Candle>) -> Self {
        let mut table = Self {
            candles,
            columns: BTreeMap::new(),
        };

        let n = table.candles.len();
        let mut next_close = Vec::with_capacity(n);
        let mut close_delta = Vec::with_capacity(n);
        for i in 0..n {
            let close = table.candles[i].close;
            let next = if i + 1 < n {
                table.candles[i + 1].close
            } else {
                close
            };
            next_close.push(next);
            close_delta.push(if close != 0.0 { (next - close) / close } else { 0.0 });
        }
        table.insert_column(Column::NextClose, next_close);
        table.insert_column(Column::CloseDelta, close_delta);
        table
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn candle(&self, index: usize) -> &Candle {
        &self.candles[index]
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn close(&self, index: usize) -> f64 {
        self.candles[index].close
    }

    /// Collect a per-row series from the candle fields.
    pub fn map_candles<F: FnMut(&Candle) -> f64>(&self, f: F) -> Vec<f64> {
        self.candles.iter().map(f).collect()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains_key(&column)
    }

    pub fn column(&self, column: Column) -> Option<&[f64]> {
        self.columns.get(&column).map(Vec::as_slice)
    }

    pub fn value(&self, column: Column, index: usize) -> Option<f64> {
        self.columns.get(&column).map(|v| v[index])
    }

    /// Columns currently present, in `Column::ALL` order.
    pub fn present_columns(&self) -> Vec<Column> {
        self.columns.keys().copied().collect()
    }

    /// Insert a column aligned 1:1 with the candle rows.
    pub fn insert_column(&mut self, column: Column, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.candles.len());
        self.columns.insert(column, values);
    }

    /// Remove the first `n` rows from the candles and every column,
    /// re-indexing contiguously.
    pub fn drop_front(&mut self, n: usize) {
        let n = n.min(self.candles.len());
        self.candles.drain(..n);
        for values in self.columns.values_mut() {
            values.drain(..n);
        }
    }

    /// Trailing window of `len` rows ending at `end` (inclusive).
    pub fn window(&self, end: usize, len: usize) -> TableWindow<'_> {
        assert!(end < self.candles.len());
        let start = (end + 1).saturating_sub(len);
        TableWindow {
            table: self,
            start,
            end,
        }
    }
}

/// Borrowed trailing slice of a table, as handed to strategies.
#[derive(Debug, Clone, Copy)]
pub struct TableWindow<'a> {
    table: &'a CandleTable,
    start: usize,
    /// Inclusive.
    end: usize,
}

impl<'a> TableWindow<'a> {
    /// Number of rows in the window, always at least 1.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Candle at window-relative index.
    pub fn candle(&self, index: usize) -> &'a Candle {
        self.table.candle(self.start + index)
    }

    /// Column value at window-relative index.
    pub fn value(&self, column: Column, index: usize) -> Option<f64> {
        self.table.value(column, self.start + index)
    }

    /// Column value `offset` rows before the window's last row
    /// (offset 0 is the row under evaluation).
    pub fn value_back(&self, column: Column, offset: usize) -> Option<f64> {
        if self.start + offset > self.end {
            return None;
        }
        self.table.value(column, self.end - offset)
    }

    pub fn last_close(&self) -> f64 {
        self.table.close(self.end)
    }
}
