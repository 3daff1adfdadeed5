//! Convierte un resultado de extracción en campos editables.

use super::fields::MetadataFieldModel;
use crate::extraction::Payload;
use serde_json::{Map, Value};

const TAG_KEY: &str = "Tag";
const VALUE_KEY: &str = "Value";

/// Los arreglos de objetos `{"Tag", "Value"}` dan un campo por elemento. Otros
/// arreglos usan las claves de su primer objeto (ExifTool devuelve un objeto
/// por archivo). El texto se divide en líneas `Etiqueta : Valor`.
pub fn fields_from_payload(payload: &Payload) -> MetadataFieldModel {
    match payload {
        Payload::Structured(value) => fields_from_value(value),
        Payload::Text(text) => fields_from_text(text),
    }
}

fn fields_from_value(value: &Value) -> MetadataFieldModel {
    match value {
        Value::Array(items) if !items.is_empty() && items.iter().all(is_tag_value_entry) => {
            MetadataFieldModel::from_pairs(items.iter().filter_map(|item| {
                let object = item.as_object()?;
                let tag = object.get(TAG_KEY).map(value_to_text)?;
                let value = object.get(VALUE_KEY).map(value_to_text).unwrap_or_default();
                Some((tag, value))
            }))
        }
        Value::Array(items) => items
            .iter()
            .find_map(Value::as_object)
            .map(fields_from_object)
            .unwrap_or_default(),
        Value::Object(object) => fields_from_object(object),
        _ => MetadataFieldModel::new(),
    }
}

fn is_tag_value_entry(item: &Value) -> bool {
    item.as_object()
        .is_some_and(|object| object.contains_key(TAG_KEY))
}

fn fields_from_object(object: &Map<String, Value>) -> MetadataFieldModel {
    MetadataFieldModel::from_pairs(
        object
            .iter()
            .map(|(tag, value)| (tag.clone(), value_to_text(value))),
    )
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn fields_from_text(text: &str) -> MetadataFieldModel {
    MetadataFieldModel::from_pairs(text.lines().filter_map(|line| {
        let (tag, value) = line.split_once(':')?;
        let tag = tag.trim();
        if tag.is_empty() {
            return None;
        }
        Some((tag.to_string(), value.trim().to_string()))
    }))
}
