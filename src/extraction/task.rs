//! Extracción en segundo plano con cancelación explícita.

use super::adapter::{ExtractionRequest, MetadataExtractor, extract_with};
use super::outcome::ExtractionOutcome;
use crate::errors::AdapterError;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Tarea de extracción en curso. Siempre resuelve a un `ExtractionOutcome`;
/// cancelarla produce un fallo de tipo adaptador y termina el proceso hijo.
#[derive(Debug)]
pub struct ExtractionTask {
    handle: JoinHandle<ExtractionOutcome>,
    cancel: CancellationToken,
}

impl ExtractionTask {
    pub(crate) fn spawn(extractor: Arc<dyn MetadataExtractor>, request: ExtractionRequest) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    info!(file = %request.file.name(), "extracción cancelada");
                    ExtractionOutcome::adapter_failure(&AdapterError::Cancelled)
                }
                outcome = extract_with(extractor.as_ref(), &request) => outcome,
            }
        });

        Self { handle, cancel }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub async fn outcome(self) -> ExtractionOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(_) => ExtractionOutcome::adapter_failure(&AdapterError::TaskAborted),
        }
    }
}
