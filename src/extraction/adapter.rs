//! Puente hacia la herramienta externa de extracción.

use super::options::ExtractionOptions;
use super::outcome::ExtractionOutcome;
use super::task::ExtractionTask;
use super::transform::transform;
use crate::errors::AdapterError;
use crate::selection::SelectedFile;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info, warn};

pub const DEFAULT_EXIFTOOL: &str = "exiftool";

/// Una invocación concreta: el archivo y los argumentos derivados de las
/// opciones vigentes al momento de pedirla.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractionRequest {
    pub file: SelectedFile,
    pub options: ExtractionOptions,
    pub flags: Vec<String>,
}

impl ExtractionRequest {
    pub fn new(file: SelectedFile, options: ExtractionOptions) -> Self {
        let flags = options.build_args();
        Self {
            file,
            options,
            flags,
        }
    }
}

/// Capacidad opaca que lee un archivo y devuelve su metadata como texto.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn run(&self, path: &Path, flags: &[String]) -> Result<String, AdapterError>;
}

/// Ejecuta el binario de ExifTool como proceso hijo.
#[derive(Clone, Debug)]
pub struct ExifTool {
    program: PathBuf,
}

impl ExifTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new(DEFAULT_EXIFTOOL)
    }
}

#[async_trait]
impl MetadataExtractor for ExifTool {
    async fn run(&self, path: &Path, flags: &[String]) -> Result<String, AdapterError> {
        debug!(program = %self.program.display(), ?flags, file = %path.display(), "ejecutando extractor");

        // kill_on_drop: cancelar la tarea también termina el proceso.
        let output = Command::new(&self.program)
            .args(flags)
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| AdapterError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            warn!(status = ?output.status.code(), %stderr, "el extractor terminó con error");
            if stderr.is_empty() {
                return Err(AdapterError::ExitStatus {
                    code: output.status.code(),
                });
            }
            return Err(AdapterError::Tool(stderr));
        }

        if !stderr.is_empty() {
            debug!(%stderr, "advertencias del extractor");
        }

        String::from_utf8(output.stdout).map_err(|_| AdapterError::InvalidEncoding)
    }
}

/// Ejecuta extracciones y siempre entrega un `ExtractionOutcome`.
#[derive(Clone)]
pub struct ExtractionAdapter {
    extractor: Arc<dyn MetadataExtractor>,
}

impl ExtractionAdapter {
    pub fn new(extractor: Arc<dyn MetadataExtractor>) -> Self {
        Self { extractor }
    }

    pub fn exiftool(program: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(ExifTool::new(program)))
    }

    pub async fn extract(&self, request: &ExtractionRequest) -> ExtractionOutcome {
        extract_with(self.extractor.as_ref(), request).await
    }

    /// Lanza la extracción como tarea cancelable.
    pub fn spawn(&self, request: ExtractionRequest) -> ExtractionTask {
        ExtractionTask::spawn(Arc::clone(&self.extractor), request)
    }
}

impl std::fmt::Debug for ExtractionAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionAdapter").finish_non_exhaustive()
    }
}

pub(crate) async fn extract_with(
    extractor: &dyn MetadataExtractor,
    request: &ExtractionRequest,
) -> ExtractionOutcome {
    match extractor.run(request.file.path(), &request.flags).await {
        Ok(raw) => {
            info!(file = %request.file.name(), bytes = raw.len(), "extracción completada");
            transform(&raw, &request.options)
        }
        Err(error) => {
            warn!(file = %request.file.name(), error = %error, "la extracción falló");
            ExtractionOutcome::adapter_failure(&error)
        }
    }
}
