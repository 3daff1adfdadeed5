//! Resultado etiquetado de una extracción.

use crate::errors::{AdapterError, TransformError};
use serde_json::Value;

/// Contenido de una extracción exitosa. La variante la decide la opción
/// `structured_output` con la que se pidió la extracción.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Structured(Value),
    Text(String),
}

/// Origen de un fallo, para distinguir "la extracción falló" de
/// "la salida no se pudo interpretar".
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureKind {
    Adapter,
    Transform,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExtractionOutcome {
    Success { payload: Payload },
    Failure { message: String, kind: FailureKind },
}

impl ExtractionOutcome {
    pub fn success(payload: Payload) -> Self {
        Self::Success { payload }
    }

    pub fn adapter_failure(error: &AdapterError) -> Self {
        Self::Failure {
            message: error.to_string(),
            kind: FailureKind::Adapter,
        }
    }

    pub fn transform_failure(error: &TransformError) -> Self {
        Self::Failure {
            message: error.to_string(),
            kind: FailureKind::Transform,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Success { payload } => Some(payload),
            Self::Failure { .. } => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }
}
