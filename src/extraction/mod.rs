//! Pipeline de extracción: argumentos, invocación de la herramienta y
//! normalización del resultado.

pub mod adapter;
pub mod options;
pub mod outcome;
pub mod task;
pub mod transform;

pub use adapter::{ExifTool, ExtractionAdapter, ExtractionRequest, MetadataExtractor};
pub use options::ExtractionOptions;
pub use outcome::{ExtractionOutcome, FailureKind, Payload};
pub use task::ExtractionTask;
pub use transform::transform;

#[cfg(test)]
mod tests;
