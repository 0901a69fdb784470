use driftcast_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => {
            for line in table_lines(envelope)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn table_lines(envelope: &Envelope<Value>) -> Result<Vec<String>, CliError> {
    let meta = &envelope.meta;
    let mut lines = vec![format!("request_id  : {}", meta.request_id)];
    if let Some(trace_id) = &meta.trace_id {
        lines.push(format!("trace_id    : {trace_id}"));
    }
    lines.push(format!("schema      : {}", meta.schema_version));
    lines.push(format!("generated_at: {}", meta.generated_at));
    lines.push(format!(
        "sources     : {}",
        meta.source_chain
            .iter()
            .map(|source| source.as_str())
            .collect::<Vec<_>>()
            .join(",")
    ));
    lines.push(format!("latency_ms  : {}", meta.latency_ms));

    if !meta.warnings.is_empty() {
        lines.push(String::from("warnings:"));
        lines.extend(meta.warnings.iter().map(|warning| format!("  - {warning}")));
    }

    lines.push(String::from("data:"));
    match &envelope.data {
        Value::Object(fields) => {
            let width = fields.keys().map(String::len).max().unwrap_or(0);
            for (key, value) in fields {
                match value {
                    Value::Array(_) | Value::Object(_) => {
                        lines.push(format!("  {key}:"));
                        let nested = serde_json::to_string_pretty(value)?;
                        lines.extend(nested.lines().map(|line| format!("    {line}")));
                    }
                    scalar => lines.push(format!("  {key:<width$} : {}", scalar_text(scalar))),
                }
            }
        }
        other => {
            let pretty = serde_json::to_string_pretty(other)?;
            lines.extend(pretty.lines().map(|line| format!("  {line}")));
        }
    }

    if !envelope.errors.is_empty() {
        lines.push(String::from("errors:"));
        lines.extend(
            envelope
                .errors
                .iter()
                .map(|error| format!("  - {}: {}", error.code, error.message)),
        );
    }

    Ok(lines)
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::from("-"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftcast_core::{EnvelopeError, EnvelopeMeta, ProviderId};
    use serde_json::json;

    #[test]
    fn table_aligns_scalars_and_nests_collections() {
        let meta = EnvelopeMeta::new("request-12345", vec![ProviderId::Fixture], 4).expect("meta");
        let data = json!({ "symbol": "AAPL", "result": 191.2, "backtest": null, "summary": ["a"] });
        let error = EnvelopeError::new("engine.data_unavailable", "no data").expect("error");
        let envelope = Envelope::with_errors(meta, data, vec![error]).expect("envelope");

        let lines = table_lines(&envelope).expect("renders");
        assert!(lines.contains(&String::from("  symbol   : AAPL")));
        assert!(lines.contains(&String::from("  backtest : -")));
        assert!(lines.contains(&String::from("  summary:")));
        assert!(lines.contains(&String::from("  - engine.data_unavailable: no data")));
        assert!(lines.contains(&String::from("sources     : fixture")));
    }
}
