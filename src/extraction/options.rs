//! Opciones de extracción y su traducción a argumentos de ExifTool.

/// Pide salida JSON en lugar de texto.
pub const STRUCTURED_FLAG: &str = "-json";
/// Pide valores numéricos en lugar de valores legibles.
pub const NUMERIC_FLAG: &str = "-n";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExtractionOptions {
    pub structured_output: bool,
    pub numeric_output: bool,
}

impl ExtractionOptions {
    pub fn new(structured_output: bool, numeric_output: bool) -> Self {
        Self {
            structured_output,
            numeric_output,
        }
    }

    /// Argumentos en el orden que espera la herramienta: `-json` antes de `-n`.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(2);
        if self.structured_output {
            args.push(STRUCTURED_FLAG.to_string());
        }
        if self.numeric_output {
            args.push(NUMERIC_FLAG.to_string());
        }
        args
    }
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            structured_output: true,
            numeric_output: false,
        }
    }
}
