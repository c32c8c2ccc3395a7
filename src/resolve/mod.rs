pub mod matcher;
pub mod merge;
pub mod validate;

use tracing::debug;

use crate::core::model::{Fragment, Identity};
use crate::resolve::matcher::MatchConfig;

pub use matcher::{find_match, MatchRule, MATCH_PRIORITY};
pub use merge::merge_fragment;

pub trait ResolveEngine {
    /// Groups fragments into identities. Deterministic for a given input
    /// order; new identities are appended in arrival order.
    fn resolve(&self, fragments: Vec<Fragment>) -> Vec<Identity>;
}

#[derive(Debug, Default)]
pub struct IdentityResolver {
    config: MatchConfig,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }
}

impl ResolveEngine for IdentityResolver {
    fn resolve(&self, fragments: Vec<Fragment>) -> Vec<Identity> {
        let mut identities: Vec<Identity> = Vec::new();

        for fragment in fragments {
            match matcher::find_match(&identities, &fragment, &self.config) {
                Some(idx) => {
                    debug!(
                        document_type = %fragment.document_type,
                        merged_into = idx,
                        "fragment matched existing identity"
                    );
                    let existing = std::mem::take(&mut identities[idx]);
                    identities[idx] = merge::merge_fragment(existing, fragment);
                }
                None => {
                    debug!(
                        document_type = %fragment.document_type,
                        "fragment starts new identity"
                    );
                    identities.push(Identity::from_fragment(fragment));
                }
            }
        }

        identities
    }
}
