//! Sink factory: build the configured sink set from a blueprint.

use contracts::{MeasurementSink, RigError, SinkConfig, SinkType};
use tracing::info;

use crate::sinks::{CsvSink, JsonlSink, LogSink};

/// Instantiate every configured sink.
///
/// # Errors
/// Fails on the first sink that cannot be built; a sink that cannot
/// open its output at startup is a configuration problem, not a
/// runtime one.
pub fn create_sinks(configs: &[SinkConfig]) -> Result<Vec<Box<dyn MeasurementSink>>, RigError> {
    let mut sinks: Vec<Box<dyn MeasurementSink>> = Vec::with_capacity(configs.len());

    for config in configs {
        let sink: Box<dyn MeasurementSink> = match config.sink_type {
            SinkType::Csv => Box::new(CsvSink::from_params(&config.name, &config.params)?),
            SinkType::Jsonl => Box::new(JsonlSink::from_params(&config.name, &config.params)?),
            SinkType::Log => Box::new(LogSink::new(&config.name)),
        };
        info!(sink = %config.name, sink_type = ?config.sink_type, "sink ready");
        sinks.push(sink);
    }

    Ok(sinks)
}
