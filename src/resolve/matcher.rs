use crate::core::model::{Fragment, Identity};

/// Tuning knobs for identity matching. The source documents never pin the
/// exact name-length cutoff, so it stays configurable with a conservative
/// default rather than a hard-coded literal.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Government-ID fields checked by the strong matcher, in order.
    pub id_fields: Vec<String>,
    /// Display-name field checked by the fallback matcher.
    pub name_field: String,
    /// Minimum normalized name length accepted by the name matcher; short
    /// common names like "Raj" must not cause cross-person merges.
    pub min_name_chars: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            id_fields: vec![
                "Aadhar Number".to_string(),
                "PAN Number".to_string(),
                "DL Number".to_string(),
            ],
            name_field: "Name".to_string(),
            min_name_chars: 4,
        }
    }
}

/// Match strategies in priority order: first rule to succeed wins and no
/// later rule is consulted. Keeping this an explicit list makes the
/// precedence visible and each rule independently testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    StrongId,
    Name,
}

pub const MATCH_PRIORITY: [MatchRule; 2] = [MatchRule::StrongId, MatchRule::Name];

/// Lowercases and collapses internal whitespace for key comparison.
pub fn normalize_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Finds the identity the fragment should merge into, if any. Rules are
/// tried in priority order; within a rule the earliest matching identity
/// wins, which keeps resolution deterministic for a given input order.
pub fn find_match(
    identities: &[Identity],
    fragment: &Fragment,
    config: &MatchConfig,
) -> Option<usize> {
    for rule in MATCH_PRIORITY {
        for (idx, identity) in identities.iter().enumerate() {
            if rule_matches(rule, identity, fragment, config) {
                return Some(idx);
            }
        }
    }
    None
}

fn rule_matches(
    rule: MatchRule,
    identity: &Identity,
    fragment: &Fragment,
    config: &MatchConfig,
) -> bool {
    match rule {
        MatchRule::StrongId => config.id_fields.iter().any(|field| {
            match (identity.fields.get(field), fragment.fields.get(field)) {
                (Some(a), Some(b)) => normalize_key(a) == normalize_key(b),
                _ => false,
            }
        }),
        MatchRule::Name => {
            let a = identity.fields.get(&config.name_field);
            let b = fragment.fields.get(&config.name_field);
            match (a, b) {
                (Some(a), Some(b)) => {
                    let a = normalize_key(a);
                    let b = normalize_key(b);
                    a == b && a.chars().count() >= config.min_name_chars
                }
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::FieldMap;

    fn fragment_with(fields: &[(&str, &str)]) -> Fragment {
        let mut map = FieldMap::new();
        for (k, v) in fields {
            map.insert(k, Some(v.to_string()));
        }
        Fragment {
            document_type: "PAN".to_string(),
            fields: map,
            ..Fragment::default()
        }
    }

    fn identity_with(fields: &[(&str, &str)]) -> Identity {
        Identity::from_fragment(fragment_with(fields))
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_key("  Atul   KUMAR "), "atul kumar");
    }

    #[test]
    fn strong_id_wins_over_name_mismatch() {
        let identities = vec![identity_with(&[
            ("Name", "Atul Kumar"),
            ("PAN Number", "ABCDE1234F"),
        ])];
        let fragment = fragment_with(&[
            ("Name", "A. Kumar"),
            ("PAN Number", "abcde1234f"),
        ]);
        assert_eq!(
            find_match(&identities, &fragment, &MatchConfig::default()),
            Some(0)
        );
    }

    #[test]
    fn short_names_never_match() {
        let identities = vec![identity_with(&[("Name", "Raj")])];
        let fragment = fragment_with(&[("Name", "Raj")]);
        assert_eq!(
            find_match(&identities, &fragment, &MatchConfig::default()),
            None
        );
    }

    #[test]
    fn long_equal_names_match() {
        let identities = vec![identity_with(&[("Name", "Atul Kumar")])];
        let fragment = fragment_with(&[("Name", "atul  kumar")]);
        assert_eq!(
            find_match(&identities, &fragment, &MatchConfig::default()),
            Some(0)
        );
    }

    #[test]
    fn no_keys_means_no_match() {
        let identities = vec![identity_with(&[("Name", "Atul Kumar")])];
        let fragment = fragment_with(&[("Address", "12 MG Road")]);
        assert_eq!(
            find_match(&identities, &fragment, &MatchConfig::default()),
            None
        );
    }

    #[test]
    fn empty_id_values_do_not_match() {
        let mut identity = identity_with(&[("Name", "Someone Else")]);
        identity.fields.insert("DL Number", Some("  ".to_string()));
        let mut fragment = fragment_with(&[]);
        fragment.fields.insert("DL Number", Some("  ".to_string()));
        assert_eq!(
            find_match(&[identity], &fragment, &MatchConfig::default()),
            None
        );
    }

    #[test]
    fn strong_id_tried_before_name_across_all_identities() {
        // Identity 0 matches by name, identity 1 by ID; the ID rule runs
        // first over the whole list, so identity 1 wins.
        let identities = vec![
            identity_with(&[("Name", "Atul Kumar")]),
            identity_with(&[("Name", "Other Person"), ("DL Number", "HR01 856")]),
        ];
        let fragment = fragment_with(&[("Name", "Atul Kumar"), ("DL Number", "hr01 856")]);
        assert_eq!(
            find_match(&identities, &fragment, &MatchConfig::default()),
            Some(1)
        );
    }
}
