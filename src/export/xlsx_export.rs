use std::path::PathBuf;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Image, Workbook};
use tracing::warn;

use crate::core::model::{Identity, KEY_DOCUMENT_TYPE, KEY_SOURCE_FILES};
use crate::export::{field_columns, Exporter};

/// Longer text wraps instead of widening the column further.
const MAX_COLUMN_WIDTH: usize = 50;
const PHOTO_COLUMN: &str = "Photo";

/// Spreadsheet with one row per identity: auto-sized, word-wrapped text
/// columns in first-seen field order and the cropped photo embedded in
/// the last column when one was resolved.
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    out_path: PathBuf,
}

impl XlsxExporter {
    pub fn new(out_path: PathBuf) -> Self {
        Self { out_path }
    }
}

impl Exporter for XlsxExporter {
    fn export(&self, identities: &[Identity]) -> Result<PathBuf> {
        let mut headers = vec![KEY_DOCUMENT_TYPE.to_string()];
        headers.extend(field_columns(identities));
        headers.push(KEY_SOURCE_FILES.to_string());
        let has_photos = identities.iter().any(|i| i.photo_path.is_some());
        if has_photos {
            headers.push(PHOTO_COLUMN.to_string());
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        let header_format = Format::new().set_bold().set_text_wrap();
        let cell_format = Format::new().set_text_wrap();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header.as_str(), &header_format)?;
        }

        for (row_idx, identity) in identities.iter().enumerate() {
            let row = row_idx as u32 + 1;
            for (col, header) in headers.iter().enumerate() {
                if header == PHOTO_COLUMN {
                    // Photos stay best-effort all the way out: a bad crop
                    // leaves the cell blank, it never aborts the export.
                    if let Some(photo) = &identity.photo_path {
                        let embedded = Image::new(photo)
                            .and_then(|image| worksheet.embed_image(row, col as u16, &image));
                        if let Err(err) = embedded {
                            warn!(
                                photo = %photo.display(),
                                error = %err,
                                "could not embed photo, leaving cell blank"
                            );
                        }
                    }
                    continue;
                }

                let text = cell_text(identity, header);
                widths[col] = widths[col].max(text.chars().count());
                worksheet.write_string_with_format(row, col as u16, text, &cell_format)?;
            }
        }

        for (col, width) in widths.iter().enumerate() {
            let padded = (width + 2).min(MAX_COLUMN_WIDTH);
            worksheet.set_column_width(col as u16, padded as f64)?;
        }

        workbook
            .save(&self.out_path)
            .with_context(|| format!("failed to write spreadsheet {}", self.out_path.display()))?;
        Ok(self.out_path.clone())
    }
}

fn cell_text(identity: &Identity, header: &str) -> String {
    match header {
        KEY_DOCUMENT_TYPE => identity.document_type.clone(),
        KEY_SOURCE_FILES => identity.source_files.join(", "),
        field => identity.fields.get(field).unwrap_or_default().to_string(),
    }
}
