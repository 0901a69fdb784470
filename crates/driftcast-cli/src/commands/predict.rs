use driftcast_forecast::{Engine, Prediction};

use crate::cli::PredictArgs;
use crate::error::CliError;

use super::{envelope_error, parse_method, CommandResult};

pub async fn run(args: &PredictArgs, engine: &Engine) -> Result<CommandResult, CliError> {
    let text = args.input.text();
    let (method, method_warning) = parse_method(&args.method);

    let prediction = engine.predict(&text, method).await?;
    let mut result = CommandResult::ok(serde_json::to_value(&prediction)?)
        .with_warnings(method_warning.into_iter().collect());

    match &prediction {
        Prediction::Unresolved { .. } => {
            result = result.with_error(envelope_error(
                "resolve.unresolved",
                "could not detect a valid ticker or company from input",
                engine.source_id(),
            )?);
        }
        Prediction::NoData { symbol } => {
            result = result.with_error(envelope_error(
                "engine.data_unavailable",
                format!("no price data for {symbol}"),
                engine.source_id(),
            )?);
        }
        Prediction::PriceOnly { .. } => {}
        Prediction::Forecast {
            method: used,
            backtest,
            degraded,
            ..
        } => {
            if let Some(reason) = degraded {
                result = result.with_warning(format!("{method} fell back to {used}: {reason}"));
            }
            if backtest.is_none() {
                result = result.with_warning("not enough history to backtest this horizon");
            }
        }
    }

    Ok(result)
}
