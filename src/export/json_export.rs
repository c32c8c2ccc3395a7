use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde_json::Value;

use crate::core::model::Identity;
use crate::export::Exporter;

/// Machine-readable dump of the final identity records, one flat object
/// per identity.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl Exporter for JsonExporter {
    fn export(&self, identities: &[Identity]) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir)?;
        let records: Vec<Value> = identities
            .iter()
            .map(|identity| Value::Object(identity.to_record()))
            .collect();
        let path = self.out_dir.join("identities.json");
        let data = serde_json::to_string_pretty(&records)?;
        fs::write(&path, data)?;
        Ok(path)
    }
}
