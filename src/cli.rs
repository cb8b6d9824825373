//! CLI definition and dispatch.
//!
//! Progress and reports go to stderr; machine-consumable listings go to
//! stdout. Exit codes come from the error taxonomy.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analyzer;
use crate::domain::error::CandlebotError;
use crate::domain::indicator::{Indicator, IndicatorEngine};
use crate::domain::settings::{
    DataSettings, build_analyzer_settings, build_data_settings, build_indicator_settings,
    build_simulator_config, build_strategy_settings,
};
use crate::domain::simulator::Simulator;
use crate::domain::strategy::build_strategy;
use crate::domain::table::{CandleTable, Column};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "candlebot", about = "Candle indicator engine and strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a strategy over stored candles
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Strategy name, overriding the configured one
        #[arg(long)]
        strategy: Option<String>,
    },
    /// Run the rule-driven account simulation
    Simulate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Compute indicators and write the enriched table as CSV
    Enrich {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Comma-separated indicator names, overriding the configured list
        #[arg(long)]
        indicators: Option<String>,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            config,
            symbol,
            strategy,
        } => run_analyze(&config, symbol.as_deref(), strategy.as_deref()),
        Command::Simulate { config, symbol } => run_simulate(&config, symbol.as_deref()),
        Command::Enrich {
            config,
            output,
            symbol,
            indicators,
        } => run_enrich(&config, &output, symbol.as_deref(), indicators.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            (&err).into()
        }
    }
}

fn load_config(path: &Path) -> Result<FileConfigAdapter, CandlebotError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| CandlebotError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_table(
    config: &dyn ConfigPort,
    symbol_override: Option<&str>,
) -> Result<(CandleTable, DataSettings), CandlebotError> {
    let mut data = build_data_settings(config)?;
    if let Some(symbol) = symbol_override {
        data.symbol = symbol.to_uppercase();
    }

    let adapter = CsvAdapter::new(PathBuf::from(&data.path));
    eprintln!(
        "Loading {} {} candles from {}",
        data.symbol, data.timeframe, data.path
    );
    let candles = adapter.fetch_candles(&data.symbol)?;
    eprintln!("  {} rows", candles.len());
    Ok((CandleTable::from_candles(candles), data))
}

fn check_rows(table: &CandleTable, minimum: usize) -> Result<(), CandlebotError> {
    if table.len() < minimum {
        return Err(CandlebotError::InsufficientData {
            rows: table.len(),
            minimum,
        });
    }
    Ok(())
}

pub fn run_analyze(
    config_path: &Path,
    symbol: Option<&str>,
    strategy_override: Option<&str>,
) -> Result<(), CandlebotError> {
    let config = load_config(config_path)?;
    let indicator_settings = build_indicator_settings(&config)?;
    let mut analyzer_settings = build_analyzer_settings(&config)?;
    if let Some(name) = strategy_override {
        analyzer_settings.strategy = name.to_string();
    }
    let strategy_settings = build_strategy_settings(&config)?;
    let strategy = build_strategy(&analyzer_settings.strategy, &strategy_settings)?;

    let (mut table, data) = load_table(&config, symbol)?;

    let engine = IndicatorEngine::new(indicator_settings.window);
    let minimum = if indicator_settings.drop_warmup {
        engine.warmup_rows() + strategy.lookback()
    } else {
        strategy.lookback()
    };
    check_rows(&table, minimum)?;

    // The strategy's own indicators first, then any configured extras.
    let mut indicators = strategy.required_indicators().to_vec();
    for indicator in &indicator_settings.indicators {
        if !indicators.contains(indicator) {
            indicators.push(*indicator);
        }
    }
    engine.compute(&mut table, &indicators, indicator_settings.drop_warmup);

    eprintln!(
        "Evaluating {} on {} over {} rows",
        analyzer_settings.strategy,
        data.symbol,
        table.len()
    );
    let report = analyzer::analyze_with(&table, strategy.as_ref(), analyzer_settings.commission);

    eprintln!("\n=== Analysis Results ===");
    eprintln!("Orders:            {}", report.num_orders);
    eprintln!("Orders size:       {:.4}", report.orders_size);
    eprintln!("Avg profit:        {:.6}", report.avg_profit);
    eprintln!("After commission:  {:.6}", report.com_profit);
    eprintln!("Total profit:      {:.6}", report.total_profit);
    Ok(())
}

pub fn run_simulate(config_path: &Path, symbol: Option<&str>) -> Result<(), CandlebotError> {
    let config = load_config(config_path)?;
    let indicator_settings = build_indicator_settings(&config)?;
    let simulator_config = build_simulator_config(&config)?;

    let (mut table, data) = load_table(&config, symbol)?;

    let engine = IndicatorEngine::new(indicator_settings.window);
    let minimum = if indicator_settings.drop_warmup {
        engine.warmup_rows() + 1
    } else {
        1
    };
    check_rows(&table, minimum)?;
    engine.compute(
        &mut table,
        &[Indicator::Cci],
        indicator_settings.drop_warmup,
    );

    eprintln!("Simulating {} over {} rows", data.symbol, table.len());
    let mut simulator = Simulator::new(simulator_config);
    let outcome = simulator.simulate(&table)?;

    eprintln!("\n=== Simulation Results ===");
    eprintln!("Steps:          {}", outcome.steps);
    if outcome.exhausted {
        eprintln!("Stopped early:  capital exhausted");
    }
    eprintln!("Free money:     {:.2}", simulator.free_money());
    eprintln!("Active money:   {:.2}", simulator.active_money());
    eprintln!("Income:         {:.2}", simulator.income());
    Ok(())
}

pub fn run_enrich(
    config_path: &Path,
    output: &Path,
    symbol: Option<&str>,
    indicators_override: Option<&str>,
) -> Result<(), CandlebotError> {
    let config = load_config(config_path)?;
    let mut indicator_settings = build_indicator_settings(&config)?;
    if let Some(names) = indicators_override {
        let names: Vec<&str> = names
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        indicator_settings.indicators = Indicator::parse_list(&names)?;
    }

    let (mut table, data) = load_table(&config, symbol)?;

    let engine = IndicatorEngine::new(indicator_settings.window);
    if indicator_settings.drop_warmup {
        check_rows(&table, engine.warmup_rows() + 1)?;
    }
    engine.compute(
        &mut table,
        &indicator_settings.indicators,
        indicator_settings.drop_warmup,
    );

    write_enriched_csv(&table, output)?;
    eprintln!(
        "Wrote {} rows of {} to {}",
        table.len(),
        data.symbol,
        output.display()
    );
    Ok(())
}

fn write_enriched_csv(table: &CandleTable, output: &Path) -> Result<(), CandlebotError> {
    let csv_error =
        |e: csv::Error| CandlebotError::Data { reason: format!("CSV write error: {}", e) };
    let mut writer = csv::Writer::from_path(output).map_err(csv_error)?;
    let columns: Vec<Column> = Column::ALL
        .into_iter()
        .filter(|&c| table.has_column(c))
        .collect();

    let mut header = vec![
        "open_time".to_string(),
        "open".to_string(),
        "high".to_string(),
        "low".to_string(),
        "close".to_string(),
        "middle".to_string(),
        "volume_base".to_string(),
        "volume_quote".to_string(),
        "close_time".to_string(),
    ];
    header.extend(columns.iter().map(|c| c.to_string()));
    writer.write_record(&header).map_err(csv_error)?;

    for i in 0..table.len() {
        let candle = table.candle(i);
        let mut record = vec![
            candle.open_time.and_utc().timestamp_millis().to_string(),
            candle.open.to_string(),
            candle.high.to_string(),
            candle.low.to_string(),
            candle.close.to_string(),
            candle.middle.to_string(),
            candle.volume_base.to_string(),
            candle.volume_quote.to_string(),
            candle.close_time.and_utc().timestamp_millis().to_string(),
        ];
        for &column in &columns {
            record.push(table.value(column, i).unwrap().to_string());
        }
        writer.write_record(&record).map_err(csv_error)?;
    }

    writer.flush()?;
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), CandlebotError> {
    let config = load_config(config_path)?;
    let path = config
        .get_string("data", "path")
        .unwrap_or_else(|| "data".to_string());

    let adapter = CsvAdapter::new(PathBuf::from(&path));
    let symbols = adapter.list_symbols()?;
    if symbols.is_empty() {
        eprintln!("No symbols found in {}", path);
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    Ok(())
}
