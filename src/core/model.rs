use std::path::PathBuf;

use serde_json::{Map, Value};

/// Wire keys reserved by the extraction service; everything else in a
/// record is treated as a data field.
pub const KEY_DOCUMENT_TYPE: &str = "Document Type";
pub const KEY_SIDES_DETECTED: &str = "Sides Detected";
pub const KEY_SOURCE_FILES: &str = "Source Files";
pub const KEY_PHOTO_PATH: &str = "Photo Path";

/// Separator used when a merged identity carries several document type
/// labels. Labels are sorted before joining, so the composite label is
/// stable regardless of merge order.
pub const TYPE_SEPARATOR: &str = " + ";

/// Field map that preserves first-seen key order. Extraction output has a
/// handful of fields per document, so a vector of pairs is enough and the
/// column order of the final spreadsheet falls out of it directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, Option<String>)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key` if it is present and non-blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    /// Sets `key` unconditionally, appending it if unseen.
    pub fn insert(&mut self, key: &str, value: Option<String>) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// First-writer-wins set: the value is stored only if the key is
    /// unseen or its current value is blank. An identity's first non-empty
    /// reading of a field is never clobbered by a later fragment.
    pub fn fill(&mut self, key: &str, value: Option<String>) {
        if self.get(key).is_some() {
            return;
        }
        self.insert(key, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One extraction result from the vision service, typically covering one
/// uploaded page or image. Untrusted input: any of these may be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub document_type: String,
    pub fields: FieldMap,
    pub sides_detected: Vec<String>,
    pub source_files: Vec<String>,
}

/// A merged, deduplicated output record representing one physical document
/// or person. `sides_detected` is resolution-time scratch state and never
/// reaches exported records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub document_type: String,
    pub fields: FieldMap,
    pub sides_detected: Vec<String>,
    pub source_files: Vec<String>,
    pub photo_path: Option<PathBuf>,
}

impl Identity {
    pub fn from_fragment(fragment: Fragment) -> Self {
        Self {
            document_type: fragment.document_type,
            fields: fragment.fields,
            sides_detected: fragment.sides_detected,
            source_files: fragment.source_files,
            photo_path: None,
        }
    }

    /// Individual type labels of a possibly composite document type.
    pub fn type_labels(&self) -> impl Iterator<Item = &str> {
        self.document_type
            .split(TYPE_SEPARATOR)
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.type_labels().any(|l| l == kind)
    }

    /// Flat JSON record for export. Sides are stripped; the photo path is
    /// present only when a face was attached.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert(
            KEY_DOCUMENT_TYPE.to_string(),
            Value::String(self.document_type.clone()),
        );
        for (key, value) in self.fields.iter() {
            let json = match value {
                Some(v) => Value::String(v.to_string()),
                None => Value::Null,
            };
            record.insert(key.to_string(), json);
        }
        record.insert(
            KEY_SOURCE_FILES.to_string(),
            Value::Array(
                self.source_files
                    .iter()
                    .map(|f| Value::String(f.clone()))
                    .collect(),
            ),
        );
        if let Some(path) = &self.photo_path {
            record.insert(
                KEY_PHOTO_PATH.to_string(),
                Value::String(path.display().to_string()),
            );
        }
        record
    }
}

/// Order-preserving set union used for source files and side labels.
pub fn union_ordered(existing: &mut Vec<String>, incoming: &[String]) {
    for item in incoming {
        if !existing.iter().any(|e| e == item) {
            existing.push(item.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fill_keeps_first_non_empty_value() {
        let mut fields = FieldMap::new();
        fields.fill("Name", Some("Atul Kumar".to_string()));
        fields.fill("Name", Some("ATUL K".to_string()));
        assert_eq!(fields.get("Name"), Some("Atul Kumar"));
    }

    #[test]
    fn fill_replaces_blank_values() {
        let mut fields = FieldMap::new();
        fields.fill("Address", Some("  ".to_string()));
        assert_eq!(fields.get("Address"), None);
        fields.fill("Address", Some("12 MG Road".to_string()));
        assert_eq!(fields.get("Address"), Some("12 MG Road"));
    }

    #[test]
    fn field_order_is_first_seen() {
        let mut fields = FieldMap::new();
        fields.insert("Name", Some("A".to_string()));
        fields.insert("DOB", None);
        fields.insert("Name", Some("B".to_string()));
        let keys: Vec<_> = fields.keys().collect();
        assert_eq!(keys, vec!["Name", "DOB"]);
    }

    #[test]
    fn record_strips_sides_and_includes_photo() {
        let mut identity = Identity {
            document_type: "Aadhar".to_string(),
            sides_detected: vec!["Front".to_string(), "Back".to_string()],
            source_files: vec!["a.jpg".to_string()],
            ..Identity::default()
        };
        identity.fields.insert("Name", Some("Ravi".to_string()));
        identity.photo_path = Some(PathBuf::from("/tmp/face.jpg"));

        let record = identity.to_record();
        assert!(!record.contains_key(KEY_SIDES_DETECTED));
        assert_eq!(
            record[KEY_PHOTO_PATH],
            Value::String("/tmp/face.jpg".to_string())
        );
        assert_eq!(record[KEY_DOCUMENT_TYPE], Value::String("Aadhar".to_string()));
    }

    #[test]
    fn composite_labels_split() {
        let identity = Identity {
            document_type: "Driving Licence + PAN".to_string(),
            ..Identity::default()
        };
        assert!(identity.has_kind("PAN"));
        assert!(identity.has_kind("Driving Licence"));
        assert!(!identity.has_kind("Aadhar"));
    }

    #[test]
    fn union_ordered_dedups_and_preserves_order() {
        let mut files = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        union_ordered(&mut files, &["b.jpg".to_string(), "c.jpg".to_string()]);
        assert_eq!(files, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }
}
