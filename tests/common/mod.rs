#![allow(dead_code)]

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

pub use candlebot::domain::candle::Candle;
use candlebot::domain::table::CandleTable;

/// Deterministic oscillating price series: enough movement to drive
/// every indicator without pulling in a random number generator.
pub fn generate_candles(count: usize, base_price: f64) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let wave = ((i * 31) % 17) as f64 - 8.0;
            let drift = (i / 10) as f64 * 0.5;
            let close = base_price + wave + drift;
            let open = close - 0.5;
            let high = close.max(open) + 1.5;
            let low = close.min(open) - 1.5;
            let volume = 800.0 + ((i * 13) % 29) as f64 * 50.0;
            let open_time = NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                + chrono::Duration::minutes(i as i64);
            Candle::new(
                open,
                high,
                low,
                close,
                volume,
                volume * close,
                open_time,
                open_time + chrono::Duration::minutes(1),
            )
        })
        .collect()
}

pub fn make_table(count: usize, base_price: f64) -> CandleTable {
    CandleTable::from_candles(generate_candles(count, base_price))
}

/// Write candles in the kline-export layout the CSV adapter reads.
pub fn write_candles_csv(dir: &Path, symbol: &str, candles: &[Candle]) {
    let mut content =
        String::from("open_time,open,high,low,close,volume_base,close_time,volume_quote\n");
    for candle in candles {
        content.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            candle.open_time.and_utc().timestamp_millis(),
            candle.open,
            candle.high,
            candle.low,
            candle.close,
            candle.volume_base,
            candle.close_time.and_utc().timestamp_millis(),
            candle.volume_quote,
        ));
    }
    fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}

/// A config pointing at `data_dir`, with a small window so short
/// fixtures survive the warm-up drop.
pub fn sample_ini(data_dir: &Path) -> String {
    format!(
        r#"
[data]
path = {}
symbol = BTCUSDT
timeframe = 1m

[indicators]
window = 6
indicators = ALL
drop_warmup = true

[analyzer]
strategy = CCI
commission = 0.001

[strategy.CCI]
cci_min = -100
cci_max = 100

[simulator]
initial_free = 1000
initial_active = 1000
withdrawal_coef = 0.0
commission = 0.001
upper_threshold = 100
lower_threshold = -100
min_capital = 0
"#,
        data_dir.display()
    )
}
