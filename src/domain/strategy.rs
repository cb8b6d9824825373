//! Trading strategies: polymorphic prediction units.
//!
//! A strategy reads indicator columns from a trailing window of the
//! enriched table and maps them to a signed scalar in [-1, 1]: negative
//! means the price looks low (buy), positive means it looks high
//! (sell), zero means no signal. Concrete variants live behind the
//! closed [`StrategyKind`] registry; unknown names fail at lookup.

use std::str::FromStr;

use crate::domain::error::CandlebotError;
use crate::domain::indicator::Indicator;
use crate::domain::settings::StrategySettings;
use crate::domain::table::{Column, TableWindow};

pub trait Strategy: std::fmt::Debug {
    /// Trailing rows the strategy needs, at least 2.
    fn lookback(&self) -> usize;

    /// Indicators whose columns the strategy reads.
    fn required_indicators(&self) -> &'static [Indicator];

    /// Signed prediction in [-1, 1]; 0 when there is no meaningful
    /// signal (including a window missing the required columns).
    fn predict(&self, window: &TableWindow<'_>) -> f64;
}

/// Closed strategy registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Adi,
    Cci,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::Adi, StrategyKind::Cci];

    pub fn build(&self, settings: &StrategySettings) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Adi => Box::new(AdiStrategy),
            StrategyKind::Cci => Box::new(CciStrategy {
                cci_min: settings.cci_min,
                cci_max: settings.cci_max,
            }),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = CandlebotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADI" => Ok(StrategyKind::Adi),
            "CCI" => Ok(StrategyKind::Cci),
            _ => Err(CandlebotError::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

/// Look a strategy up by name and build it.
pub fn build_strategy(
    name: &str,
    settings: &StrategySettings,
) -> Result<Box<dyn Strategy>, CandlebotError> {
    Ok(name.parse::<StrategyKind>()?.build(settings))
}

/// ADI/ADIEMA crossover: a buy while the index sits below its smoothing
/// on two consecutive rows, a sell while it sits above.
#[derive(Debug)]
struct AdiStrategy;

impl Strategy for AdiStrategy {
    fn lookback(&self) -> usize {
        2
    }

    fn required_indicators(&self) -> &'static [Indicator] {
        &[Indicator::Adi]
    }

    fn predict(&self, window: &TableWindow<'_>) -> f64 {
        let (Some(adi), Some(adi_prev), Some(ema), Some(ema_prev)) = (
            window.value_back(Column::Adi, 0),
            window.value_back(Column::Adi, 1),
            window.value_back(Column::AdiEma, 0),
            window.value_back(Column::AdiEma, 1),
        ) else {
            return 0.0;
        };

        if adi < ema && adi_prev < ema_prev {
            -1.0
        } else if adi > ema && adi_prev > ema_prev {
            1.0
        } else {
            0.0
        }
    }
}

/// CCI threshold strategy: sell above `cci_max`, buy below `cci_min`,
/// with magnitude CCI/100 clamped to the unit interval.
#[derive(Debug)]
struct CciStrategy {
    cci_min: f64,
    cci_max: f64,
}

impl Strategy for CciStrategy {
    fn lookback(&self) -> usize {
        2
    }

    fn required_indicators(&self) -> &'static [Indicator] {
        &[Indicator::Cci]
    }

    fn predict(&self, window: &TableWindow<'_>) -> f64 {
        let Some(cci) = window.value_back(Column::Cci, 0) else {
            return 0.0;
        };

        if cci > self.cci_max {
            (cci / 100.0).min(1.0)
        } else if cci < self.cci_min {
            (cci / 100.0).max(-1.0)
        } else {
            0.0
        }
    }
}
