use driftcast_core::Symbol;
use driftcast_forecast::{Engine, EngineError};
use serde::Serialize;

use crate::cli::HistoryArgs;
use crate::error::CliError;

use super::{envelope_error, CommandResult};

#[derive(Debug, Serialize)]
struct HistoryResponseData {
    symbol: Symbol,
    closes: Vec<f64>,
}

pub async fn run(args: &HistoryArgs, engine: &Engine) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;

    match engine.history(&symbol, args.days).await {
        Ok(closes) => Ok(CommandResult::ok(serde_json::to_value(HistoryResponseData {
            symbol,
            closes,
        })?)),
        Err(EngineError::DataUnavailable { symbol }) => {
            let message = format!("no price data for {symbol}");
            Ok(CommandResult::ok(serde_json::to_value(HistoryResponseData {
                symbol,
                closes: Vec::new(),
            })?)
            .with_error(envelope_error(
                "engine.data_unavailable",
                message,
                engine.source_id(),
            )?))
        }
        Err(error) => Err(error.into()),
    }
}
