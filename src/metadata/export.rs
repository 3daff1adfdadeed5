//! Representación textual de resultados y campos editados, y su descarga.

use super::fields::MetadataFieldModel;
use crate::errors::ExportError;
use crate::extraction::{ExtractionOutcome, Payload};
use crate::selection::SelectedFile;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EXPORT_SUFFIX: &str = "-metadata.json";

/// Texto de un resultado exitoso. Los fallos no se representan aquí: quien
/// llama decide cómo mostrarlos.
pub fn render(outcome: &ExtractionOutcome) -> Option<String> {
    outcome.payload().map(render_payload)
}

/// JSON con sangría de dos espacios y el orden de claves recibido, o el
/// texto crudo sin cambios.
pub fn render_payload(payload: &Payload) -> String {
    match payload {
        Payload::Structured(value) => format!("{value:#}"),
        Payload::Text(text) => text.clone(),
    }
}

/// Objeto JSON indexado por etiqueta en orden de inserción. Si una etiqueta se
/// repite, prevalece el último valor en la posición de la primera aparición.
pub fn render_field_model(fields: &MetadataFieldModel) -> String {
    render_pairs(&fields.to_pairs())
}

pub fn render_pairs(pairs: &[(String, String)]) -> String {
    let mut object = Map::with_capacity(pairs.len());
    for (tag, value) in pairs {
        object.insert(tag.clone(), Value::String(value.clone()));
    }
    format!("{:#}", Value::Object(object))
}

/// `<nombre-original>-metadata.json`
pub fn export_file_name(file: &SelectedFile) -> String {
    format!("{}{}", file.name(), EXPORT_SUFFIX)
}

/// Guarda `contents` junto a los demás exportes en `directory`.
pub fn write_export(
    contents: &str,
    file: &SelectedFile,
    directory: &Path,
) -> Result<PathBuf, ExportError> {
    let target = directory.join(export_file_name(file));
    fs::write(&target, contents).map_err(|source| ExportError::Write {
        path: target.clone(),
        source,
    })?;
    info!(path = %target.display(), bytes = contents.len(), "metadata exportada");
    Ok(target)
}
