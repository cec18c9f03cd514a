use log::debug;
use std::collections::BTreeMap;

/// Reserved field holding the pre-correction snapshot used by undo.
///
/// A note type only gets undo support if it defines this field.
pub const SNAPSHOT_FIELD: &str = "OriginalContent";

/// Field name to corrected text, as returned by the model.
pub type CorrectionResult = BTreeMap<String, String>;

/// An ordered set of named fields, as exposed by the host editor.
///
/// Field names are unique. The set of names is fixed once the note is built:
/// [`Note::set`] only updates existing fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Note {
    fields: Vec<(String, String)>,
}

impl Note {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a note from `(name, value)` pairs. A repeated name replaces the
    /// earlier value and keeps its original position.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .fold(Self::new(), |note, (name, value)| note.with_field(name, value))
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.fields[idx].1 = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrites the value of an existing field. Returns `false` if the note
    /// does not define `name`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.fields[idx].1 = value.into();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Fields eligible for correction, in note order.
    pub fn editable_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(name, _)| *name != SNAPSHOT_FIELD)
    }

    pub fn supports_undo(&self) -> bool {
        self.contains(SNAPSHOT_FIELD)
    }

    /// Writes corrected values back onto the note.
    ///
    /// Only fields present in both the result and the note are touched; the
    /// snapshot field is never overwritten from a correction. Returns how many
    /// field values actually changed.
    pub fn apply_corrections(&mut self, corrections: &CorrectionResult) -> usize {
        let mut changed = 0;
        for (name, value) in self.fields.iter_mut() {
            if name.as_str() == SNAPSHOT_FIELD {
                continue;
            }
            if let Some(corrected) = corrections.get(name.as_str()) {
                if *value != *corrected {
                    debug!("Field '{}' corrected", name);
                    *value = corrected.clone();
                    changed += 1;
                }
            }
        }
        changed
    }
}
