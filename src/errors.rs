//! Errores tipados del pipeline de extracción, la sesión y la exportación.

use std::path::PathBuf;
use thiserror::Error;

/// Fallos de la herramienta externa de extracción.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("No se pudo ejecutar `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// Mensaje reportado por la herramienta, tal cual.
    #[error("{0}")]
    Tool(String),
    #[error("La herramienta terminó con código {code:?} sin reportar un error")]
    ExitStatus { code: Option<i32> },
    #[error("La salida de la herramienta no es texto UTF-8 válido")]
    InvalidEncoding,
    #[error("Extracción cancelada")]
    Cancelled,
    #[error("La tarea de extracción terminó de forma inesperada")]
    TaskAborted,
}

/// La salida se pidió estructurada pero no pudo interpretarse.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("No se pudo interpretar la salida como JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No se pudo interpretar la salida como JSON: la herramienta no devolvió datos")]
    Empty,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No hay ningún archivo seleccionado")]
    NoFileSelected,
    #[error("Ya hay una extracción en curso")]
    ExtractionInFlight,
    #[error("No hay resultados para exportar")]
    NothingToExport,
    #[error("No se pudo leer `{}`: {source}", .path.display())]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{}` no es un archivo", .0.display())]
    NotAFile(PathBuf),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No se pudo guardar `{}`: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
