//! Rule-driven backtest simulator.
//!
//! Unlike the analyzer this is not pluggable per strategy: the trading
//! rule is fixed to CCI thresholds. The account holds free (quote) and
//! active (asset, marked to market) money plus banked income; every
//! transfer between them pays the commission haircut. An optional skim
//! locks a fraction of each mark-to-market gain into income,
//! independent of the trading rule.

use crate::domain::error::CandlebotError;
use crate::domain::table::{CandleTable, Column};

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub initial_free: f64,
    pub initial_active: f64,
    /// Fraction of each mark-to-market gain withdrawn into income.
    pub withdrawal_coef: f64,
    pub commission: f64,
    pub upper_threshold: f64,
    pub lower_threshold: f64,
    /// The walk stops once free + active falls to or below this.
    pub min_capital: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            initial_free: 1000.0,
            initial_active: 1000.0,
            withdrawal_coef: 0.0,
            commission: 0.001,
            upper_threshold: 100.0,
            lower_threshold: -100.0,
            min_capital: 0.0,
        }
    }
}

/// How a simulation run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationOutcome {
    /// Rows processed before stopping.
    pub steps: usize,
    /// True when the walk stopped early on capital exhaustion.
    pub exhausted: bool,
}

#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
    free_money: f64,
    active_money: f64,
    income: f64,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let free_money = config.initial_free;
        let active_money = config.initial_active;
        Self {
            config,
            free_money,
            active_money,
            income: 0.0,
        }
    }

    pub fn free_money(&self) -> f64 {
        self.free_money
    }

    pub fn active_money(&self) -> f64 {
        self.active_money
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    /// Walk the table row by row. Requires the CCI column.
    pub fn simulate(&mut self, table: &CandleTable) -> Result<SimulationOutcome, CandlebotError> {
        let cci = table
            .column(Column::Cci)
            .ok_or_else(|| CandlebotError::MissingColumn {
                column: Column::Cci.to_string(),
            })?;

        if table.is_empty() {
            return Ok(SimulationOutcome {
                steps: 0,
                exhausted: false,
            });
        }

        let mut prev_price = table.close(0);
        for i in 0..table.len() {
            let price = table.close(i);

            // Mark the held asset to the new price, skimming part of any
            // gain out of the tradable pool.
            let mut new_active = self.active_money * price / prev_price;
            if price > prev_price && self.config.withdrawal_coef > 0.0 {
                let skim = (new_active - self.active_money) * self.config.withdrawal_coef;
                new_active -= skim;
                self.income += skim * (1.0 - self.config.commission);
            }
            self.active_money = new_active;

            if self.free_money + self.active_money <= self.config.min_capital {
                return Ok(SimulationOutcome {
                    steps: i,
                    exhausted: true,
                });
            }

            if cci[i] > self.config.upper_threshold && self.active_money > 0.0 {
                self.liquidate();
            } else if cci[i] < self.config.lower_threshold && self.free_money > 0.0 {
                self.invest();
            }

            prev_price = price;
        }

        Ok(SimulationOutcome {
            steps: table.len(),
            exhausted: false,
        })
    }

    /// Convert the whole active balance to cash, net of commission.
    fn liquidate(&mut self) {
        self.free_money += self.active_money * (1.0 - self.config.commission);
        self.active_money = 0.0;
    }

    /// Convert the whole cash balance to the asset, net of commission.
    fn invest(&mut self) {
        self.active_money += self.free_money * (1.0 - self.config.commission);
        self.free_money = 0.0;
    }
}
