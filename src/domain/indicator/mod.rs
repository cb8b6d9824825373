//! Technical indicator engine.
//!
//! The catalog is the closed [`Indicator`] enum; unknown names fail at
//! parse time with `UnknownIndicator`, never inside a computation.
//! Composite indicators pull their primitive dependencies in through
//! `ensure_*` guards keyed on column presence, so shared primitives are
//! computed once per table no matter how many composites request them.
//! Intermediate columns stay in the table afterwards; callers that do
//! not want to inspect them can ignore them.

mod adi;
mod cci;
mod macd;
mod mfi;
mod obv;
mod pvt;
mod rsi;

pub(crate) mod primitives;
pub mod smoothing;

use std::fmt;
use std::str::FromStr;

use crate::domain::error::CandlebotError;
use crate::domain::table::{CandleTable, Column};

/// Shared epsilon guarding divisions against degenerate (constant-price,
/// zero-volume) windows.
pub(crate) const EPS: f64 = 1e-4;

/// The indicator catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Adi,
    Cci,
    Macd,
    Mfi,
    Obv,
    Pvt,
    Rsi,
}

impl Indicator {
    pub const ALL: [Indicator; 7] = [
        Indicator::Adi,
        Indicator::Cci,
        Indicator::Macd,
        Indicator::Mfi,
        Indicator::Obv,
        Indicator::Pvt,
        Indicator::Rsi,
    ];

    /// The column this indicator is named after (its presence marks the
    /// indicator as computed).
    pub fn output_column(&self) -> Column {
        match self {
            Indicator::Adi => Column::Adi,
            Indicator::Cci => Column::Cci,
            Indicator::Macd => Column::Macd,
            Indicator::Mfi => Column::Mfi,
            Indicator::Obv => Column::Obv,
            Indicator::Pvt => Column::Pvt,
            Indicator::Rsi => Column::Rsi,
        }
    }

    /// Parse a list of indicator names. The special name `ALL` expands to
    /// the whole catalog. Fails with `UnknownIndicator` carrying every
    /// name that did not resolve.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Indicator>, CandlebotError> {
        let mut parsed: Vec<Indicator> = Vec::new();
        let mut unknown: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name == "ALL" {
                for indicator in Indicator::ALL {
                    if !parsed.contains(&indicator) {
                        parsed.push(indicator);
                    }
                }
                continue;
            }
            match name.parse::<Indicator>() {
                Ok(indicator) => {
                    if !parsed.contains(&indicator) {
                        parsed.push(indicator);
                    }
                }
                Err(_) => unknown.push(name.to_string()),
            }
        }
        if !unknown.is_empty() {
            return Err(CandlebotError::UnknownIndicator { names: unknown });
        }
        Ok(parsed)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Indicator::Adi => "ADI",
            Indicator::Cci => "CCI",
            Indicator::Macd => "MACD",
            Indicator::Mfi => "MFI",
            Indicator::Obv => "OBV",
            Indicator::Pvt => "PVT",
            Indicator::Rsi => "RSI",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Indicator {
    type Err = CandlebotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADI" => Ok(Indicator::Adi),
            "CCI" => Ok(Indicator::Cci),
            "MACD" => Ok(Indicator::Macd),
            "MFI" => Ok(Indicator::Mfi),
            "OBV" => Ok(Indicator::Obv),
            "PVT" => Ok(Indicator::Pvt),
            "RSI" => Ok(Indicator::Rsi),
            _ => Err(CandlebotError::UnknownIndicator {
                names: vec![s.to_string()],
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    window: usize,
}

impl IndicatorEngine {
    pub const DEFAULT_WINDOW: usize = 12;

    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Rows removed by a warm-up drop. MACD carries the deepest
    /// compounded lookback (the 2W base EMA re-smoothed), so four
    /// windows cover every indicator in the catalog.
    pub fn warmup_rows(&self) -> usize {
        self.window * 4
    }

    /// Enrich the table in place with the requested indicators and their
    /// primitive dependencies. Never adds or removes rows unless
    /// `drop_warmup` is set, which removes exactly the first
    /// `warmup_rows()` rows and re-indexes.
    pub fn compute(&self, table: &mut CandleTable, indicators: &[Indicator], drop_warmup: bool) {
        for &indicator in indicators {
            if table.has_column(indicator.output_column()) {
                continue;
            }
            match indicator {
                Indicator::Adi => adi::compute(table, self.window),
                Indicator::Cci => cci::compute(table, self.window),
                Indicator::Macd => macd::compute(table, self.window),
                Indicator::Mfi => mfi::compute(table, self.window),
                Indicator::Obv => obv::compute(table, self.window),
                Indicator::Pvt => pvt::compute(table, self.window),
                Indicator::Rsi => rsi::compute(table, self.window),
            }
        }
        if drop_warmup {
            table.drop_front(self.warmup_rows());
        }
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}
