use driftcast_core::Symbol;
use driftcast_forecast::{BacktestReport, Engine, EngineError};

use crate::cli::BacktestArgs;
use crate::error::CliError;

use super::{envelope_error, parse_method, CommandResult};

pub async fn run(args: &BacktestArgs, engine: &Engine) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let (method, method_warning) = parse_method(&args.method);
    let warnings = method_warning.into_iter().collect::<Vec<_>>();

    match engine.backtest(&symbol, args.k, method).await {
        Ok(report) => {
            let missing = report.mae.is_none();
            let result = CommandResult::ok(serde_json::to_value(&report)?).with_warnings(warnings);
            Ok(if missing {
                result.with_warning("not enough history to backtest this horizon")
            } else {
                result
            })
        }
        Err(EngineError::DataUnavailable { symbol }) => {
            let lookback = engine.config().backtest_lookback;
            let report = BacktestReport::new(symbol.clone(), args.k, method, lookback, None);
            Ok(CommandResult::ok(serde_json::to_value(&report)?)
                .with_warnings(warnings)
                .with_error(envelope_error(
                    "engine.data_unavailable",
                    format!("no price data for {symbol}"),
                    engine.source_id(),
                )?))
        }
        Err(error) => Err(error.into()),
    }
}
