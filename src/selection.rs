//! Referencia al archivo elegido por el usuario.

use crate::errors::SessionError;
use crate::formatting::format_size;
use infer::Infer;
use std::fs;
use std::path::{Path, PathBuf};

/// Archivo seleccionado en la sesión. Solo guarda la ruta y datos de
/// presentación; el contenido nunca se copia.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    path: PathBuf,
    name: String,
    size: u64,
    mime: Option<String>,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|value| value.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            size,
            mime: None,
        }
    }

    /// Valida que la ruta apunte a un archivo legible y reúne sus datos.
    pub fn from_path(path: &Path) -> Result<Self, SessionError> {
        let metadata = fs::metadata(path).map_err(|source| SessionError::FileUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        if !metadata.is_file() {
            return Err(SessionError::NotAFile(path.to_path_buf()));
        }

        let mut file = Self::new(path, metadata.len());
        file.mime = mime_type(path);
        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn display_size(&self) -> String {
        format_size(self.size)
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }
}

fn mime_type(path: &Path) -> Option<String> {
    let infer = Infer::new();
    infer
        .get_from_path(path)
        .ok()
        .flatten()
        .map(|kind| kind.mime_type().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn from_path_reads_name_and_size() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("foto.jpg");
        fs::write(&path, b"0123456789")?;

        let file = SelectedFile::from_path(&path)?;

        assert_eq!(file.name(), "foto.jpg");
        assert_eq!(file.size(), 10);
        assert_eq!(file.display_size(), "10 Bytes");
        Ok(())
    }

    #[test]
    fn from_path_rejects_directories() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;

        let result = SelectedFile::from_path(dir.path());

        assert!(matches!(result, Err(SessionError::NotAFile(_))));
        Ok(())
    }

    #[test]
    fn from_path_reports_missing_files() {
        let result = SelectedFile::from_path(Path::new("/no/existe/foto.jpg"));
        assert!(matches!(result, Err(SessionError::FileUnavailable { .. })));
    }
}
