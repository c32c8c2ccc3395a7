use thiserror::Error;

/// User-facing rejection of an extraction request. Any of these aborts
/// the whole request with no partial result; everything else in the
/// pipeline degrades best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("No readable images found in the upload.")]
    NoImages,

    #[error("No documents detected in the uploaded files.")]
    NoDocuments,

    #[error(
        "Incomplete {document} detected ({holder}). Missing: {missing}. \
         Please upload both Front and Back sides."
    )]
    IncompleteSides {
        document: String,
        holder: String,
        /// Comma-joined list of missing side labels.
        missing: String,
    },

    #[error("{present} detected but no {missing} found. Please upload {missing} as well.")]
    MissingCounterpart { present: String, missing: String },
}
