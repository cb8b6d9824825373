//! Strategy evaluator: walks the table row by row and replays the
//! strategy's predictions through a fractional position ledger.
//!
//! The ledger holds `amount`, the fraction of capital currently in the
//! risk asset, and a volume-weighted entry-price accumulator. A buy
//! converts a fraction of the remaining cash, a sell realizes profit
//! against the weighted entry price. Signals that cannot be acted on
//! (selling from cash, buying while fully invested) are no-ops.

use crate::domain::error::CandlebotError;
use crate::domain::settings::StrategySettings;
use crate::domain::strategy::{Strategy, build_strategy};
use crate::domain::table::CandleTable;

/// Aggregate statistics of one evaluation run.
///
/// `num_orders` stays an integer so "no trades occurred" is observable
/// as distinct from "trades with zero net effect".
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Average profit of an all-money order, before commission.
    pub avg_profit: f64,
    /// Total transacted size relative to all money.
    pub orders_size: f64,
    /// Number of completed orders.
    pub num_orders: u32,
    /// Average profit of an all-money order, after commission.
    pub com_profit: f64,
    /// Total profit with commission and compound interest.
    pub total_profit: f64,
}

/// Resolve a strategy by name and evaluate it.
pub fn analyze(
    table: &CandleTable,
    strategy_name: &str,
    settings: &StrategySettings,
    commission: f64,
) -> Result<AnalysisReport, CandlebotError> {
    let strategy = build_strategy(strategy_name, settings)?;
    Ok(analyze_with(table, strategy.as_ref(), commission))
}

/// Evaluate an already-built strategy over the table.
pub fn analyze_with(table: &CandleTable, strategy: &dyn Strategy, commission: f64) -> AnalysisReport {
    let lookback = strategy.lookback().max(2);

    let mut amount = 0.0_f64;
    let mut avg_price = 0.0_f64;
    let mut sum_profit = 0.0_f64;
    let mut orders_size = 0.0_f64;
    let mut num_orders = 0u32;

    for i in (lookback - 1)..table.len() {
        let prediction = strategy.predict(&table.window(i, lookback));
        let price = table.close(i);

        if prediction < 0.0 && amount < 1.0 {
            num_orders += 1;
            let size = -prediction * (1.0 - amount);
            orders_size += size;
            avg_price += price * size;
            amount += size;
        } else if prediction > 0.0 && amount > 0.0 {
            num_orders += 1;
            let size = prediction * amount;
            let entry_price = avg_price / amount;
            orders_size += size;
            sum_profit += size * (price - entry_price) / entry_price;
            avg_price -= size * entry_price;
            amount -= size;
        }
    }

    let avg_profit = if orders_size > 0.0 {
        sum_profit / orders_size
    } else {
        0.0
    };
    let total_profit = if num_orders > 0 {
        ((sum_profit - orders_size * commission) / f64::from(num_orders) + 1.0)
            .powi(num_orders as i32)
            - 1.0
    } else {
        0.0
    };

    AnalysisReport {
        avg_profit,
        orders_size,
        num_orders,
        com_profit: avg_profit - commission,
        total_profit,
    }
}
