/// How a completeness rule reacts when its evidence is missing.
///
/// Hard rules abort the whole request; soft rules only drop the offending
/// identity from the output set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Hard,
    Soft,
}

/// Multi-sided document rule: the named sides must all appear in the
/// identity's detected side labels after title-casing.
#[derive(Debug, Clone)]
pub struct SidesRule {
    pub kind: String,
    pub required: Vec<String>,
    pub severity: Severity,
}

/// Paired presence rule: if fragments of one kind exist in a batch, the
/// other kind must exist too. Evaluated symmetrically on raw fragments,
/// before any merging, because the requirement is about what was uploaded.
#[derive(Debug, Clone)]
pub struct PairRule {
    pub a: String,
    pub b: String,
}

/// Completeness rules keyed by document kind. Kinds without a rule pass
/// through untouched, so unrecognized document types from the extraction
/// service are tolerated rather than dropped.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub sides: Vec<SidesRule>,
    pub pairs: Vec<PairRule>,
    /// Field used as the best-available display name in rejection messages.
    pub display_field: String,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            sides: vec![SidesRule {
                kind: "Aadhar".to_string(),
                required: vec!["Front".to_string(), "Back".to_string()],
                severity: Severity::Hard,
            }],
            pairs: vec![PairRule {
                a: "PAN".to_string(),
                b: "Driving Licence".to_string(),
            }],
            display_field: "Name".to_string(),
        }
    }
}
