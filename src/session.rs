//! Estado de una sesión de trabajo: archivo actual, opciones y resultado o
//! campos en edición.

use crate::errors::SessionError;
use crate::extraction::{ExtractionAdapter, ExtractionOptions, ExtractionOutcome, ExtractionRequest};
use crate::metadata::{MetadataFieldModel, fields_from_payload, render, render_field_model};
use crate::selection::SelectedFile;
use chrono::{DateTime, Local};
use std::pin::pin;
use tracing::{debug, info};

/// A lo sumo uno de `outcome` y `fields` está presente a la vez.
#[derive(Debug, Default)]
pub struct Session {
    file: Option<SelectedFile>,
    options: ExtractionOptions,
    outcome: Option<ExtractionOutcome>,
    fields: Option<MetadataFieldModel>,
    in_flight: bool,
    extracted_at: Option<DateTime<Local>>,
}

impl Session {
    pub fn new(options: ExtractionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Nueva sesión para `file`; el resultado y los campos anteriores se descartan.
    pub fn select(self, file: SelectedFile) -> Self {
        info!(file = %file.name(), size = file.size(), "archivo seleccionado");
        Self {
            file: Some(file),
            ..Self::new(self.options)
        }
    }

    /// Vuelve al estado inicial conservando las opciones.
    pub fn reset(self) -> Self {
        debug!("sesión reiniciada");
        Self::new(self.options)
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn options(&self) -> ExtractionOptions {
        self.options
    }

    pub fn set_options(&mut self, options: ExtractionOptions) {
        self.options = options;
    }

    pub fn outcome(&self) -> Option<&ExtractionOutcome> {
        self.outcome.as_ref()
    }

    pub fn fields(&self) -> Option<&MetadataFieldModel> {
        self.fields.as_ref()
    }

    pub fn extracted_at(&self) -> Option<&DateTime<Local>> {
        self.extracted_at.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Marca la sesión como ocupada y arma la solicitud con las opciones
    /// vigentes. Debe cerrarse con [`Session::complete_extraction`].
    pub fn begin_extraction(&mut self) -> Result<ExtractionRequest, SessionError> {
        if self.in_flight {
            return Err(SessionError::ExtractionInFlight);
        }
        let file = self.file.clone().ok_or(SessionError::NoFileSelected)?;

        self.in_flight = true;
        Ok(ExtractionRequest::new(file, self.options))
    }

    pub fn complete_extraction(&mut self, outcome: ExtractionOutcome) {
        self.in_flight = false;
        self.extracted_at = Some(Local::now());
        self.fields = None;
        self.outcome = Some(outcome);
    }

    /// Ciclo completo de extracción; la sesión queda libre sin importar el
    /// resultado. Si `interrupt` termina antes que la extracción, la tarea se
    /// cancela y el resultado es un fallo de tipo adaptador.
    pub async fn extract<F>(
        &mut self,
        adapter: &ExtractionAdapter,
        interrupt: F,
    ) -> Result<ExtractionOutcome, SessionError>
    where
        F: Future<Output = ()>,
    {
        let request = self.begin_extraction()?;
        let task = adapter.spawn(request);
        let token = task.cancellation_token();

        let mut pending = pin!(task.outcome());
        let finished = tokio::select! {
            outcome = pending.as_mut() => Some(outcome),
            () = interrupt => None,
        };
        let outcome = match finished {
            Some(outcome) => outcome,
            None => {
                token.cancel();
                pending.await
            }
        };

        self.complete_extraction(outcome.clone());
        Ok(outcome)
    }

    /// Abre el editor. Un resultado exitoso se carga como campos; sin él, el
    /// editor empieza vacío.
    pub fn edit_fields(&mut self) -> Result<&mut MetadataFieldModel, SessionError> {
        if self.file.is_none() {
            return Err(SessionError::NoFileSelected);
        }

        let outcome = self.outcome.take();
        Ok(self.fields.get_or_insert_with(|| {
            let fields = outcome
                .as_ref()
                .and_then(ExtractionOutcome::payload)
                .map(fields_from_payload)
                .unwrap_or_default();
            debug!(count = fields.len(), "editor de metadata abierto");
            fields
        }))
    }

    /// Texto visible: el resultado exitoso o los campos editados.
    pub fn display_text(&self) -> Option<String> {
        if let Some(fields) = &self.fields {
            return Some(render_field_model(fields));
        }
        self.outcome.as_ref().and_then(render)
    }

    /// Archivo de origen y texto listos para descargar.
    pub fn export_contents(&self) -> Result<(&SelectedFile, String), SessionError> {
        let file = self.file.as_ref().ok_or(SessionError::NoFileSelected)?;
        let text = self.display_text().ok_or(SessionError::NothingToExport)?;
        Ok((file, text))
    }
}
