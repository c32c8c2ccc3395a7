use std::collections::BTreeSet;

use crate::core::model::{union_ordered, Fragment, Identity, TYPE_SEPARATOR};

/// Merges a fragment into an identity, returning the merged value.
///
/// Field policy is first-writer-wins: the incoming value only fills slots
/// that are currently blank. Source files and side labels are unioned.
pub fn merge_fragment(mut identity: Identity, fragment: Fragment) -> Identity {
    identity.document_type = composite_label(&identity.document_type, &fragment.document_type);

    for (key, value) in fragment.fields.iter() {
        identity.fields.fill(key, value.map(str::to_string));
    }

    union_ordered(&mut identity.source_files, &fragment.source_files);
    union_ordered(&mut identity.sides_detected, &fragment.sides_detected);

    identity
}

/// Deduplicated, alphabetically sorted union of two (possibly composite)
/// type labels. Sorting makes the final label independent of merge order
/// and re-merging idempotent.
pub fn composite_label(a: &str, b: &str) -> String {
    let labels: BTreeSet<&str> = a
        .split(TYPE_SEPARATOR)
        .chain(b.split(TYPE_SEPARATOR))
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    labels.into_iter().collect::<Vec<_>>().join(TYPE_SEPARATOR)
}
