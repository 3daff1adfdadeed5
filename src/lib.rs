//! ExifLens: ejecuta ExifTool sobre un archivo, normaliza su salida y
//! permite editar y exportar la metadata como JSON.

pub mod app;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod formatting;
pub mod metadata;
pub mod selection;
pub mod session;
pub mod telemetry;
pub mod ui;
