//! Primitive columns shared between composite indicators.
//!
//! Every `ensure_*` checks the column arena before computing, so a
//! primitive requested by several composites is calculated once per
//! table.

use crate::domain::indicator::{EPS, smoothing};
use crate::domain::table::{CandleTable, Column};

/// TP = (low + close + high) / 3.
pub(crate) fn ensure_typical_price(table: &mut CandleTable) {
    if table.has_column(Column::Tp) {
        return;
    }
    let tp = table.map_candles(|c| c.typical_price());
    table.insert_column(Column::Tp, tp);
}

/// Trailing mean of the typical price.
pub(crate) fn ensure_sma(table: &mut CandleTable, window: usize) {
    if table.has_column(Column::Sma) {
        return;
    }
    ensure_typical_price(table);
    let sma = smoothing::rolling_mean(table.column(Column::Tp).unwrap(), window);
    table.insert_column(Column::Sma, sma);
}

/// Trailing mean absolute deviation of the typical price from its SMA.
pub(crate) fn ensure_mad(table: &mut CandleTable, window: usize) {
    if table.has_column(Column::Mad) {
        return;
    }
    ensure_sma(table, window);
    let tp = table.column(Column::Tp).unwrap();
    let sma = table.column(Column::Sma).unwrap();
    let abs_dev: Vec<f64> = tp.iter().zip(sma).map(|(t, s)| (t - s).abs()).collect();
    let mad = smoothing::rolling_mean(&abs_dev, window);
    table.insert_column(Column::Mad, mad);
}

/// Close Location Value: volume weighted by where the close sits in the
/// bar's range.
pub(crate) fn ensure_clv(table: &mut CandleTable) {
    if table.has_column(Column::Clv) {
        return;
    }
    let clv = table.map_candles(|c| {
        c.volume_base * (2.0 * c.close - c.low - c.high) / (c.high - c.low + EPS)
    });
    table.insert_column(Column::Clv, clv);
}

/// Money Ratio: positive over negative typical-price-weighted volume in
/// the trailing window.
pub(crate) fn ensure_money_ratio(table: &mut CandleTable, window: usize) {
    if table.has_column(Column::Mr) {
        return;
    }
    ensure_typical_price(table);

    let n = table.len();
    let volume = table.map_candles(|c| c.volume_base);
    let tp = table.column(Column::Tp).unwrap();
    let mut positive = vec![0.0; n];
    let mut negative = vec![0.0; n];
    for i in 0..n {
        let flow = tp[i] * volume[i];
        // A flat or rising typical price counts as buying pressure; the
        // first row has no predecessor and counts as rising.
        if i == 0 || tp[i] >= tp[i - 1] {
            positive[i] = flow;
        } else {
            negative[i] = flow;
        }
    }
    let positive_sum = smoothing::rolling_sum(&positive, window);
    let negative_sum = smoothing::rolling_sum(&negative, window);
    let mr: Vec<f64> = positive_sum
        .iter()
        .zip(&negative_sum)
        .map(|(p, n)| p / n.max(EPS))
        .collect();
    table.insert_column(Column::Mr, mr);
}

/// Smoothed close deltas: EMA of the raw delta plus its clipped up and
/// down components (EMA / EMAU / EMAD). The first row's delta is zero.
pub(crate) fn ensure_delta_smoothing(table: &mut CandleTable, window: usize) {
    if table.has_column(Column::Ema) {
        return;
    }
    let n = table.len();
    let mut delta = vec![0.0; n];
    for i in 1..n {
        delta[i] = table.close(i) - table.close(i - 1);
    }
    let up: Vec<f64> = delta.iter().map(|d| d.max(0.0)).collect();
    let down: Vec<f64> = delta.iter().map(|d| (-d).max(0.0)).collect();
    table.insert_column(Column::Ema, smoothing::ema(&delta, window));
    table.insert_column(Column::Emau, smoothing::ema(&up, window));
    table.insert_column(Column::Emad, smoothing::ema(&down, window));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::Candle;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_candle(i: usize, low: f64, close: f64, high: f64, volume: f64) -> Candle {
        let open_time = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + chrono::Duration::minutes(i as i64);
        Candle::new(
            close,
            high,
            low,
            close,
            volume,
            volume * close,
            open_time,
            open_time + chrono::Duration::minutes(1),
        )
    }

    fn flat_table(closes: &[f64]) -> CandleTable {
        CandleTable::from_candles(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| make_candle(i, c, c, c, 1000.0))
                .collect(),
        )
    }

    #[test]
    fn typical_price_column() {
        let mut table = CandleTable::from_candles(vec![make_candle(0, 90.0, 105.0, 110.0, 10.0)]);
        ensure_typical_price(&mut table);
        let tp = table.column(Column::Tp).unwrap();
        assert_relative_eq!(tp[0], (90.0 + 105.0 + 110.0) / 3.0);
    }

    #[test]
    fn typical_price_is_memoized() {
        let mut table = flat_table(&[10.0, 20.0]);
        table.insert_column(Column::Tp, vec![1.0, 2.0]);
        ensure_typical_price(&mut table);
        assert_eq!(table.column(Column::Tp).unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn sma_of_flat_prices_is_the_price() {
        let mut table = flat_table(&[50.0; 6]);
        ensure_sma(&mut table, 3);
        for &v in table.column(Column::Sma).unwrap() {
            assert_relative_eq!(v, 50.0);
        }
    }

    #[test]
    fn mad_of_flat_prices_is_zero() {
        let mut table = flat_table(&[50.0; 6]);
        ensure_mad(&mut table, 3);
        for &v in table.column(Column::Mad).unwrap() {
            assert_relative_eq!(v, 0.0);
        }
    }

    #[test]
    fn mad_pulls_in_sma_and_tp() {
        let mut table = flat_table(&[10.0, 12.0, 14.0, 16.0]);
        ensure_mad(&mut table, 2);
        assert!(table.has_column(Column::Tp));
        assert!(table.has_column(Column::Sma));
        assert!(table.has_column(Column::Mad));
    }

    #[test]
    fn clv_close_at_high_is_positive_volume() {
        // close == high: CLV ≈ volume * (high - low) / (high - low + eps)
        let mut table = CandleTable::from_candles(vec![make_candle(0, 90.0, 110.0, 110.0, 500.0)]);
        ensure_clv(&mut table);
        let clv = table.column(Column::Clv).unwrap();
        assert_relative_eq!(clv[0], 500.0 * 20.0 / (20.0 + EPS));
    }

    #[test]
    fn clv_zero_range_is_guarded() {
        let mut table = flat_table(&[100.0]);
        ensure_clv(&mut table);
        assert_relative_eq!(table.column(Column::Clv).unwrap()[0], 0.0);
    }

    #[test]
    fn money_ratio_all_rising_is_large() {
        let mut table = flat_table(&[10.0, 11.0, 12.0, 13.0]);
        ensure_money_ratio(&mut table, 3);
        for &v in table.column(Column::Mr).unwrap() {
            // Every flow is positive, so MR = positive / eps.
            assert!(v > 1000.0);
        }
    }

    #[test]
    fn money_ratio_all_falling_is_near_zero() {
        let mut table = flat_table(&[13.0, 12.0, 11.0, 10.0]);
        ensure_money_ratio(&mut table, 2);
        // Past the warm-up rows the positive side only sees row 0.
        let mr = table.column(Column::Mr).unwrap();
        assert_relative_eq!(mr[3], 0.0);
    }

    #[test]
    fn delta_smoothing_splits_up_and_down() {
        let mut table = flat_table(&[10.0, 12.0, 9.0]);
        ensure_delta_smoothing(&mut table, 2);
        let up = table.column(Column::Emau).unwrap();
        let down = table.column(Column::Emad).unwrap();
        // Row 1: delta +2 -> only the up side moves.
        assert!(up[1] > 0.0);
        assert_relative_eq!(down[1], 0.0);
        // Row 2: delta -3 -> the down side dominates.
        assert!(down[2] > 0.0);
    }

    #[test]
    fn delta_smoothing_first_row_has_no_move() {
        let mut table = flat_table(&[10.0, 11.0]);
        ensure_delta_smoothing(&mut table, 3);
        assert_relative_eq!(table.column(Column::Emau).unwrap()[0], 0.0);
        assert_relative_eq!(table.column(Column::Emad).unwrap()[0], 0.0);
    }
}
