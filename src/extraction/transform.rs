//! Normaliza la salida cruda de la herramienta según las opciones pedidas.

use super::options::ExtractionOptions;
use super::outcome::{ExtractionOutcome, Payload};
use crate::errors::TransformError;
use serde_json::Value;
use tracing::debug;

/// Interpreta la salida como JSON. Una salida vacía o `null` cuenta como fallo.
pub fn parse_structured(raw: &str) -> Result<Value, TransformError> {
    let value: Value = serde_json::from_str(raw)?;
    if value.is_null() {
        return Err(TransformError::Empty);
    }
    Ok(value)
}

/// Con salida estructurada, un JSON inválido o truncado es un fallo: nunca se
/// recurre al texto crudo. Sin ella, el texto se devuelve intacto.
pub fn transform(raw: &str, options: &ExtractionOptions) -> ExtractionOutcome {
    if !options.structured_output {
        return ExtractionOutcome::success(Payload::Text(raw.to_string()));
    }

    match parse_structured(raw) {
        Ok(value) => ExtractionOutcome::success(Payload::Structured(value)),
        Err(error) => {
            debug!(error = %error, bytes = raw.len(), "salida estructurada inválida");
            ExtractionOutcome::transform_failure(&error)
        }
    }
}
