use driftcast_forecast::{DeepPrediction, Engine};

use crate::cli::InputArgs;
use crate::error::CliError;

use super::{envelope_error, CommandResult};

pub async fn run(args: &InputArgs, engine: &Engine) -> Result<CommandResult, CliError> {
    let prediction = engine.predict_plus(&args.text()).await?;
    let result = CommandResult::ok(serde_json::to_value(&prediction)?);

    let error = match &prediction {
        DeepPrediction::Unresolved { .. } => Some(envelope_error(
            "resolve.unresolved",
            "could not detect a valid ticker or company from input",
            engine.source_id(),
        )?),
        DeepPrediction::NoData { symbol } => Some(envelope_error(
            "engine.data_unavailable",
            format!("no price data for {symbol}"),
            engine.source_id(),
        )?),
        DeepPrediction::TwinPlus { .. } => None,
    };

    Ok(match error {
        Some(error) => result.with_error(error),
        None => result,
    })
}
