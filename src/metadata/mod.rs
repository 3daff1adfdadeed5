//! Modelo editable de metadata y su serialización.

pub mod export;
pub mod fields;
pub mod loader;

pub use export::{render, render_field_model};
pub use fields::{FieldId, MetadataField, MetadataFieldModel};
pub use loader::fields_from_payload;
