use std::path::PathBuf;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::error::Rejection;
use crate::core::model::Identity;
use crate::core::rules::RuleSet;
use crate::export::{Exporter, JsonExporter, XlsxExporter};
use crate::extract::{normalize_fragments, VisionExtractor};
use crate::ingest::{build_pool, PageRasterizer, SourcePool};
use crate::photo::{FaceLocator, PhotoResolver};
use crate::resolve::matcher::MatchConfig;
use crate::resolve::{validate, IdentityResolver, ResolveEngine};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub work_dir: PathBuf,
    pub dpi: u32,
}

impl PipelineConfig {
    pub fn new(inputs: Vec<PathBuf>, output: PathBuf, work_dir: PathBuf, dpi: u32) -> Self {
        Self {
            inputs,
            output,
            work_dir,
            dpi,
        }
    }
}

#[derive(Debug)]
pub struct ExtractionOutcome {
    pub identities: Vec<Identity>,
    pub spreadsheet: PathBuf,
    pub records: PathBuf,
}

/// Turns raw extraction records into the final validated identity list.
///
/// Order of operations matters: pairing is checked on raw fragments (it is
/// about what was uploaded), side completeness on merged identities (front
/// and back may arrive as separate fragments that merge), and photos are
/// attached last so dropped identities never cost a face scan.
pub fn resolve_identities(
    raw: Vec<Value>,
    pool: &SourcePool,
    locator: &dyn FaceLocator,
    match_config: MatchConfig,
    rules: &RuleSet,
) -> Result<Vec<Identity>> {
    let fragments = normalize_fragments(raw);
    if fragments.is_empty() {
        return Err(Rejection::NoDocuments.into());
    }
    debug!(fragments = fragments.len(), "normalized extraction output");

    validate::check_pairing(&fragments, rules)?;

    let resolver = IdentityResolver::with_config(match_config);
    let identities = resolver.resolve(fragments);
    debug!(identities = identities.len(), "merged fragments");

    let mut identities = validate::check_sides(identities, rules)?;
    if identities.is_empty() {
        return Err(Rejection::NoDocuments.into());
    }

    PhotoResolver::new(locator).resolve_all(&mut identities, pool);

    Ok(identities)
}

/// Full request flow: ingest uploads, call the vision service, resolve,
/// validate and export. Returns the written file paths alongside the
/// identity list.
pub fn run(
    config: &PipelineConfig,
    extractor: &dyn VisionExtractor,
    locator: &dyn FaceLocator,
) -> Result<ExtractionOutcome> {
    let rasterizer = PageRasterizer::new(config.work_dir.join("pages"), config.dpi);
    let pool = build_pool(&config.inputs, &rasterizer)?;
    if pool.is_empty() {
        return Err(Rejection::NoImages.into());
    }
    info!(images = pool.len(), "source pool ready");

    // A failed or empty extraction means the same thing to the user:
    // nothing usable was found. No retries here; that belongs to callers.
    let raw = match extractor.extract(&pool) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(error = %err, "vision extraction failed, treating as no documents");
            return Err(Rejection::NoDocuments.into());
        }
    };
    let identities = resolve_identities(
        raw,
        &pool,
        locator,
        MatchConfig::default(),
        &RuleSet::default(),
    )?;
    info!(identities = identities.len(), "resolution complete");

    std::fs::create_dir_all(&config.output)?;
    let spreadsheet =
        XlsxExporter::new(config.output.join("identities.xlsx")).export(&identities)?;
    let records = JsonExporter::new(config.output.clone()).export(&identities)?;

    Ok(ExtractionOutcome {
        identities,
        spreadsheet,
        records,
    })
}
