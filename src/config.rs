//! Configuración de ExifLens: archivo `exiflens.toml` opcional y variables
//! de entorno `EXIFLENS_*`.

use crate::extraction::ExtractionOptions;
use crate::extraction::adapter::DEFAULT_EXIFTOOL;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "exiflens.toml";
pub const ENV_PREFIX: &str = "EXIFLENS";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Ejecutable de ExifTool; por defecto se busca en `PATH`.
    pub exiftool_path: PathBuf,
    pub structured_output: bool,
    pub numeric_output: bool,
    /// Carpeta donde se guardan los `-metadata.json`.
    pub export_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let options = ExtractionOptions::default();
        Self {
            exiftool_path: PathBuf::from(DEFAULT_EXIFTOOL),
            structured_output: options.structured_output,
            numeric_output: options.numeric_output,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// El archivo es opcional; las variables de entorno tienen prioridad.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn extraction_options(&self) -> ExtractionOptions {
        ExtractionOptions::new(self.structured_output, self.numeric_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;

        let settings = Settings::load_from(&dir.path().join("exiflens.toml"))?;

        assert_eq!(settings.exiftool_path, PathBuf::from("exiftool"));
        assert_eq!(settings.extraction_options(), ExtractionOptions::new(true, false));
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("exiflens.toml");
        fs::write(
            &path,
            "exiftool_path = \"/opt/exiftool/exiftool\"\nstructured_output = false\nnumeric_output = true\n",
        )?;

        let settings = Settings::load_from(&path)?;

        assert_eq!(settings.exiftool_path, PathBuf::from("/opt/exiftool/exiftool"));
        assert_eq!(settings.extraction_options(), ExtractionOptions::new(false, true));
        assert_eq!(settings.export_dir, PathBuf::from("."));
        Ok(())
    }
}
