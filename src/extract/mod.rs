pub mod client;
pub mod fragments;

use anyhow::Result;
use serde_json::Value;

use crate::ingest::SourcePool;

pub use client::GroqVisionClient;
pub use fragments::normalize_fragments;

/// External vision extraction service: given the pooled images, returns
/// raw per-document JSON records. Best-effort and untrusted; callers must
/// tolerate malformed or empty output.
pub trait VisionExtractor {
    fn extract(&self, pool: &SourcePool) -> Result<Vec<Value>>;
}
