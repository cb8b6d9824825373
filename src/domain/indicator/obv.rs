//! On-Balance Volume over a trailing window.
//!
//! Each row contributes its base volume signed by the direction of the
//! step-over-step close change; OBV is the trailing-window sum of those
//! contributions and OBVCA its cumulative average. The first row has no
//! previous close and contributes nothing.

use crate::domain::indicator::smoothing;
use crate::domain::table::{CandleTable, Column};

pub(crate) fn compute(table: &mut CandleTable, window: usize) {
    let n = table.len();
    let mut signed_volume = vec![0.0; n];
    for i in 1..n {
        let step = table.close(i) - table.close(i - 1);
        signed_volume[i] = if step > 0.0 {
            table.candle(i).volume_base
        } else if step < 0.0 {
            -table.candle(i).volume_base
        } else {
            0.0
        };
    }
    let obv = smoothing::rolling_sum(&signed_volume, window);
    let obv_ca = smoothing::rolling_mean(&obv, window);
    table.insert_column(Column::Obv, obv);
    table.insert_column(Column::ObvCa, obv_ca);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candle::Candle;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_table(rows: &[(f64, f64)]) -> CandleTable {
        let candles = rows
            .iter()
            .enumerate()
            .map(|(i, &(close, volume))| {
                let open_time = NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    + chrono::Duration::minutes(i as i64);
                Candle::new(
                    close,
                    close,
                    close,
                    close,
                    volume,
                    volume * close,
                    open_time,
                    open_time + chrono::Duration::minutes(1),
                )
            })
            .collect();
        CandleTable::from_candles(candles)
    }

    #[test]
    fn obv_first_row_contributes_nothing() {
        let mut table = make_table(&[(100.0, 1000.0)]);
        compute(&mut table, 3);
        assert_relative_eq!(table.column(Column::Obv).unwrap()[0], 0.0);
    }

    #[test]
    fn obv_adds_volume_on_up_step() {
        let mut table = make_table(&[(100.0, 1000.0), (105.0, 500.0)]);
        compute(&mut table, 3);
        assert_relative_eq!(table.column(Column::Obv).unwrap()[1], 500.0);
    }

    #[test]
    fn obv_subtracts_volume_on_down_step() {
        let mut table = make_table(&[(100.0, 1000.0), (95.0, 300.0)]);
        compute(&mut table, 3);
        assert_relative_eq!(table.column(Column::Obv).unwrap()[1], -300.0);
    }

    #[test]
    fn obv_flat_step_contributes_nothing() {
        let mut table = make_table(&[(100.0, 1000.0), (100.0, 500.0)]);
        compute(&mut table, 3);
        assert_relative_eq!(table.column(Column::Obv).unwrap()[1], 0.0);
    }

    #[test]
    fn obv_window_limits_lookback() {
        // Steps: +500, +500, -200; window 2 sums only the last two.
        let mut table = make_table(&[
            (100.0, 1000.0),
            (101.0, 500.0),
            (102.0, 500.0),
            (101.0, 200.0),
        ]);
        compute(&mut table, 2);
        let obv = table.column(Column::Obv).unwrap();
        assert_relative_eq!(obv[2], 1000.0);
        assert_relative_eq!(obv[3], 300.0);
    }

    #[test]
    fn obv_ca_is_windowed_average_of_obv() {
        let mut table = make_table(&[
            (100.0, 1000.0),
            (101.0, 500.0),
            (102.0, 500.0),
            (101.0, 200.0),
        ]);
        compute(&mut table, 2);
        let obv = table.column(Column::Obv).unwrap().to_vec();
        let ca = table.column(Column::ObvCa).unwrap();
        assert_relative_eq!(ca[3], (obv[2] + obv[3]) / 2.0);
    }
}
