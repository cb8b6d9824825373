//! Typed settings built from the configuration port.
//!
//! Each builder validates its section up front so a bad config fails
//! before any data is loaded, with errors naming the offending section
//! and key.

use crate::domain::error::CandlebotError;
use crate::domain::indicator::{Indicator, IndicatorEngine};
use crate::domain::simulator::SimulatorConfig;
use crate::domain::strategy::StrategyKind;
use crate::domain::timeframe::tf_to_minutes;
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone)]
pub struct DataSettings {
    pub path: String,
    pub symbol: String,
    pub timeframe: String,
}

#[derive(Debug, Clone)]
pub struct IndicatorSettings {
    pub window: usize,
    pub indicators: Vec<Indicator>,
    pub drop_warmup: bool,
}

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub strategy: String,
    pub commission: f64,
}

/// Parameters consumed by strategy constructors.
#[derive(Debug, Clone)]
pub struct StrategySettings {
    pub cci_min: f64,
    pub cci_max: f64,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            cci_min: -100.0,
            cci_max: 100.0,
        }
    }
}

pub fn build_data_settings(config: &dyn ConfigPort) -> Result<DataSettings, CandlebotError> {
    let symbol = config
        .get_string("data", "symbol")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| CandlebotError::ConfigMissing {
            section: "data".into(),
            key: "symbol".into(),
        })?;

    let timeframe = config
        .get_string("data", "timeframe")
        .unwrap_or_else(|| "1m".to_string());
    tf_to_minutes(&timeframe).map_err(|_| CandlebotError::ConfigInvalid {
        section: "data".into(),
        key: "timeframe".into(),
        reason: format!("unrecognized timeframe {timeframe:?}"),
    })?;

    Ok(DataSettings {
        path: config
            .get_string("data", "path")
            .unwrap_or_else(|| "data".to_string()),
        symbol,
        timeframe,
    })
}

pub fn build_indicator_settings(
    config: &dyn ConfigPort,
) -> Result<IndicatorSettings, CandlebotError> {
    let window = config.get_int(
        "indicators",
        "window",
        IndicatorEngine::DEFAULT_WINDOW as i64,
    );
    if window < 2 {
        return Err(CandlebotError::ConfigInvalid {
            section: "indicators".into(),
            key: "window".into(),
            reason: "window must be at least 2".into(),
        });
    }

    let mut names = config.get_list("indicators", "indicators");
    if names.is_empty() {
        names.push("ALL".to_string());
    }
    let indicators = Indicator::parse_list(&names)?;

    Ok(IndicatorSettings {
        window: window as usize,
        indicators,
        drop_warmup: config.get_bool("indicators", "drop_warmup", true),
    })
}

pub fn build_analyzer_settings(config: &dyn ConfigPort) -> Result<AnalyzerSettings, CandlebotError> {
    let strategy = config
        .get_string("analyzer", "strategy")
        .unwrap_or_else(|| "CCI".to_string());
    strategy.parse::<StrategyKind>()?;

    let commission = config.get_double("analyzer", "commission", 0.001);
    validate_commission(commission, "analyzer")?;

    Ok(AnalyzerSettings {
        strategy,
        commission,
    })
}

pub fn build_strategy_settings(config: &dyn ConfigPort) -> Result<StrategySettings, CandlebotError> {
    let defaults = StrategySettings::default();
    let cci_min = config.get_double("strategy.CCI", "cci_min", defaults.cci_min);
    let cci_max = config.get_double("strategy.CCI", "cci_max", defaults.cci_max);
    if cci_min >= cci_max {
        return Err(CandlebotError::ConfigInvalid {
            section: "strategy.CCI".into(),
            key: "cci_min".into(),
            reason: "cci_min must be below cci_max".into(),
        });
    }
    Ok(StrategySettings { cci_min, cci_max })
}

pub fn build_simulator_config(config: &dyn ConfigPort) -> Result<SimulatorConfig, CandlebotError> {
    let defaults = SimulatorConfig::default();

    let initial_free = config.get_double("simulator", "initial_free", defaults.initial_free);
    let initial_active = config.get_double("simulator", "initial_active", defaults.initial_active);
    for (key, value) in [("initial_free", initial_free), ("initial_active", initial_active)] {
        if value < 0.0 {
            return Err(CandlebotError::ConfigInvalid {
                section: "simulator".into(),
                key: key.into(),
                reason: format!("{key} must be non-negative"),
            });
        }
    }

    let withdrawal_coef =
        config.get_double("simulator", "withdrawal_coef", defaults.withdrawal_coef);
    if !(0.0..=1.0).contains(&withdrawal_coef) {
        return Err(CandlebotError::ConfigInvalid {
            section: "simulator".into(),
            key: "withdrawal_coef".into(),
            reason: "withdrawal_coef must be between 0 and 1".into(),
        });
    }

    let commission = config.get_double("simulator", "commission", defaults.commission);
    validate_commission(commission, "simulator")?;

    let upper_threshold =
        config.get_double("simulator", "upper_threshold", defaults.upper_threshold);
    let lower_threshold =
        config.get_double("simulator", "lower_threshold", defaults.lower_threshold);
    if lower_threshold >= upper_threshold {
        return Err(CandlebotError::ConfigInvalid {
            section: "simulator".into(),
            key: "lower_threshold".into(),
            reason: "lower_threshold must be below upper_threshold".into(),
        });
    }

    Ok(SimulatorConfig {
        initial_free,
        initial_active,
        withdrawal_coef,
        commission,
        upper_threshold,
        lower_threshold,
        min_capital: config.get_double("simulator", "min_capital", defaults.min_capital),
    })
}

fn validate_commission(value: f64, section: &str) -> Result<(), CandlebotError> {
    if !(0.0..1.0).contains(&value) {
        return Err(CandlebotError::ConfigInvalid {
            section: section.into(),
            key: "commission".into(),
            reason: "commission must be in [0, 1)".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn data_settings_require_a_symbol() {
        let err = build_data_settings(&adapter("[data]\npath = data\n")).unwrap_err();
        assert!(matches!(
            err,
            CandlebotError::ConfigMissing { key, .. } if key == "symbol"
        ));
    }

    #[test]
    fn data_settings_validate_the_timeframe() {
        let err = build_data_settings(&adapter(
            "[data]\nsymbol = BTCUSDT\ntimeframe = 3y\n",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            CandlebotError::ConfigInvalid { key, .. } if key == "timeframe"
        ));
    }

    #[test]
    fn data_settings_defaults() {
        let settings = build_data_settings(&adapter("[data]\nsymbol = BTCUSDT\n")).unwrap();
        assert_eq!(settings.path, "data");
        assert_eq!(settings.timeframe, "1m");
    }

    #[test]
    fn indicator_settings_defaults_to_full_catalog() {
        let settings = build_indicator_settings(&adapter("")).unwrap();
        assert_eq!(settings.window, IndicatorEngine::DEFAULT_WINDOW);
        assert_eq!(settings.indicators.len(), Indicator::ALL.len());
        assert!(settings.drop_warmup);
    }

    #[test]
    fn indicator_settings_parse_the_list() {
        let settings = build_indicator_settings(&adapter(
            "[indicators]\nwindow = 8\nindicators = CCI, RSI\ndrop_warmup = no\n",
        ))
        .unwrap();
        assert_eq!(settings.window, 8);
        assert_eq!(settings.indicators, vec![Indicator::Cci, Indicator::Rsi]);
        assert!(!settings.drop_warmup);
    }

    #[test]
    fn indicator_settings_reject_small_window() {
        let err =
            build_indicator_settings(&adapter("[indicators]\nwindow = 1\n")).unwrap_err();
        assert!(matches!(
            err,
            CandlebotError::ConfigInvalid { key, .. } if key == "window"
        ));
    }

    #[test]
    fn indicator_settings_surface_unknown_names() {
        let err = build_indicator_settings(&adapter(
            "[indicators]\nindicators = CCI, NOPE\n",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            CandlebotError::UnknownIndicator { names } if names == vec!["NOPE".to_string()]
        ));
    }

    #[test]
    fn analyzer_settings_validate_strategy_and_commission() {
        let settings = build_analyzer_settings(&adapter(
            "[analyzer]\nstrategy = ADI\ncommission = 0.002\n",
        ))
        .unwrap();
        assert_eq!(settings.strategy, "ADI");
        assert!((settings.commission - 0.002).abs() < f64::EPSILON);

        let err = build_analyzer_settings(&adapter("[analyzer]\nstrategy = ML\n")).unwrap_err();
        assert!(matches!(err, CandlebotError::UnknownStrategy { .. }));

        let err = build_analyzer_settings(&adapter("[analyzer]\ncommission = 1.5\n")).unwrap_err();
        assert!(matches!(
            err,
            CandlebotError::ConfigInvalid { key, .. } if key == "commission"
        ));
    }

    #[test]
    fn strategy_settings_require_ordered_thresholds() {
        let err = build_strategy_settings(&adapter(
            "[strategy.CCI]\ncci_min = 100\ncci_max = -100\n",
        ))
        .unwrap_err();
        assert!(matches!(err, CandlebotError::ConfigInvalid { .. }));
    }

    #[test]
    fn simulator_config_reads_all_fields() {
        let config = build_simulator_config(&adapter(
            "[simulator]\ninitial_free = 500\ninitial_active = 250\nwithdrawal_coef = 0.1\ncommission = 0.005\nupper_threshold = 120\nlower_threshold = -80\nmin_capital = 10\n",
        ))
        .unwrap();
        assert!((config.initial_free - 500.0).abs() < f64::EPSILON);
        assert!((config.initial_active - 250.0).abs() < f64::EPSILON);
        assert!((config.withdrawal_coef - 0.1).abs() < f64::EPSILON);
        assert!((config.commission - 0.005).abs() < f64::EPSILON);
        assert!((config.upper_threshold - 120.0).abs() < f64::EPSILON);
        assert!((config.lower_threshold + 80.0).abs() < f64::EPSILON);
        assert!((config.min_capital - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn simulator_config_rejects_crossed_thresholds() {
        let err = build_simulator_config(&adapter(
            "[simulator]\nupper_threshold = -50\nlower_threshold = 50\n",
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            CandlebotError::ConfigInvalid { key, .. } if key == "lower_threshold"
        ));
    }

    #[test]
    fn simulator_config_defaults_match_simulator() {
        let config = build_simulator_config(&adapter("")).unwrap();
        let defaults = SimulatorConfig::default();
        assert!((config.initial_free - defaults.initial_free).abs() < f64::EPSILON);
        assert!((config.commission - defaults.commission).abs() < f64::EPSILON);
    }
}
