//! Lista editable de pares etiqueta/valor.

/// Identificador estable de un campo. No se reutiliza dentro de un modelo,
/// así que sigue siendo válido aunque se eliminen otros campos.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FieldId(u64);

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MetadataField {
    pub tag: String,
    pub value: String,
}

impl MetadataField {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

/// Campos en orden de inserción. Las etiquetas repetidas se permiten.
#[derive(Clone, Debug, Default)]
pub struct MetadataFieldModel {
    entries: Vec<(FieldId, MetadataField)>,
    next_id: u64,
}

impl MetadataFieldModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, T, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, V)>,
        T: Into<String>,
        V: Into<String>,
    {
        let mut model = Self::new();
        for (tag, value) in pairs {
            model.add_field(tag, value);
        }
        model
    }

    /// Agrega un campo al final. No se valida el contenido.
    pub fn add_field(&mut self, tag: impl Into<String>, value: impl Into<String>) -> FieldId {
        let id = FieldId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, MetadataField::new(tag, value)));
        id
    }

    /// Campo vacío listo para que el usuario lo complete.
    pub fn add_blank(&mut self) -> FieldId {
        self.add_field("", "")
    }

    /// Devuelve `false` si el campo ya no existía; repetir la llamada no tiene efecto.
    pub fn remove_field(&mut self, id: FieldId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn update_field(&mut self, id: FieldId, tag: Option<&str>, value: Option<&str>) -> bool {
        let Some(field) = self.get_mut(id) else {
            return false;
        };

        if let Some(tag) = tag {
            field.tag = tag.to_string();
        }
        if let Some(value) = value {
            field.value = value.to_string();
        }
        true
    }

    pub fn get(&self, id: FieldId) -> Option<&MetadataField> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, field)| field)
    }

    fn get_mut(&mut self, id: FieldId) -> Option<&mut MetadataField> {
        self.entries
            .iter_mut()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, field)| field)
    }

    fn position(&self, id: FieldId) -> Option<usize> {
        self.entries.iter().position(|(entry_id, _)| *entry_id == id)
    }

    /// Identificador del campo en la posición indicada (base 0).
    pub fn id_at(&self, index: usize) -> Option<FieldId> {
        self.entries.get(index).map(|(id, _)| *id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &MetadataField)> {
        self.entries.iter().map(|(id, field)| (*id, field))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Única vía de exportación: los pares en el orden visible.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(_, field)| (field.tag.clone(), field.value.clone()))
            .collect()
    }

    /// Etiquetas que aparecen más de una vez, en el orden de su primera
    /// aparición. Al exportar solo sobrevive el último valor de cada una.
    pub fn duplicate_tags(&self) -> Vec<&str> {
        let mut duplicates: Vec<&str> = Vec::new();
        for (index, (_, field)) in self.entries.iter().enumerate() {
            let repeated = self.entries[..index]
                .iter()
                .any(|(_, earlier)| earlier.tag == field.tag);
            if repeated && !duplicates.contains(&field.tag.as_str()) {
                duplicates.push(&field.tag);
            }
        }
        duplicates
    }
}
