pub mod json_export;
pub mod xlsx_export;

use std::path::PathBuf;

use anyhow::Result;

use crate::core::model::Identity;

pub use json_export::JsonExporter;
pub use xlsx_export::XlsxExporter;

pub trait Exporter {
    /// Renders the identity list and returns the path of the written file.
    fn export(&self, identities: &[Identity]) -> Result<PathBuf>;
}

/// Data field columns in first-seen order across the identity list.
/// Document type, source files and the photo get fixed positions around
/// these in both exporters.
pub fn field_columns(identities: &[Identity]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for identity in identities {
        for key in identity.fields.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.to_string());
            }
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::FieldMap;
    use pretty_assertions::assert_eq;

    #[test]
    fn columns_follow_first_seen_order() {
        let mut first = FieldMap::new();
        first.insert("Name", Some("A".to_string()));
        first.insert("DOB", None);
        let mut second = FieldMap::new();
        second.insert("Name", Some("B".to_string()));
        second.insert("Address", Some("X".to_string()));

        let identities = vec![
            Identity {
                fields: first,
                ..Identity::default()
            },
            Identity {
                fields: second,
                ..Identity::default()
            },
        ];
        assert_eq!(field_columns(&identities), vec!["Name", "DOB", "Address"]);
    }
}
