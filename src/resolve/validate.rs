use tracing::debug;

use crate::core::error::Rejection;
use crate::core::model::{Fragment, Identity};
use crate::core::rules::{RuleSet, Severity};

/// Symmetric paired-presence check, run on raw fragments before merging:
/// the pairing requirement is about what the user uploaded, not about what
/// later matched.
pub fn check_pairing(fragments: &[Fragment], rules: &RuleSet) -> Result<(), Rejection> {
    for pair in &rules.pairs {
        let has_a = fragments.iter().any(|f| f.document_type == pair.a);
        let has_b = fragments.iter().any(|f| f.document_type == pair.b);
        if has_a && !has_b {
            return Err(Rejection::MissingCounterpart {
                present: pair.a.clone(),
                missing: pair.b.clone(),
            });
        }
        if has_b && !has_a {
            return Err(Rejection::MissingCounterpart {
                present: pair.b.clone(),
                missing: pair.a.clone(),
            });
        }
    }
    Ok(())
}

/// Side-completeness check over merged identities. Hard rules reject the
/// whole request; soft rules filter the offending identity and keep the
/// rest. Returns the surviving identities in their original order.
pub fn check_sides(identities: Vec<Identity>, rules: &RuleSet) -> Result<Vec<Identity>, Rejection> {
    let mut kept = Vec::with_capacity(identities.len());

    'identity: for identity in identities {
        for rule in &rules.sides {
            if !identity.has_kind(&rule.kind) {
                continue;
            }
            let present: Vec<String> = identity
                .sides_detected
                .iter()
                .map(|s| title_case(s))
                .collect();
            let missing: Vec<&str> = rule
                .required
                .iter()
                .filter(|side| !present.iter().any(|p| p == *side))
                .map(String::as_str)
                .collect();
            if missing.is_empty() {
                continue;
            }
            match rule.severity {
                Severity::Hard => {
                    let holder = identity
                        .fields
                        .get(&rules.display_field)
                        .unwrap_or("Unknown")
                        .to_string();
                    return Err(Rejection::IncompleteSides {
                        document: rule.kind.clone(),
                        holder,
                        missing: missing.join(", "),
                    });
                }
                Severity::Soft => {
                    debug!(
                        kind = %rule.kind,
                        missing = %missing.join(", "),
                        "dropping identity with incomplete sides"
                    );
                    continue 'identity;
                }
            }
        }
        kept.push(identity);
    }

    Ok(kept)
}

/// Canonical casing for side labels ("front" -> "Front").
fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::FieldMap;
    use crate::core::rules::SidesRule;

    fn fragment(doc_type: &str) -> Fragment {
        Fragment {
            document_type: doc_type.to_string(),
            ..Fragment::default()
        }
    }

    fn aadhar(name: &str, sides: &[&str]) -> Identity {
        let mut fields = FieldMap::new();
        fields.insert("Name", Some(name.to_string()));
        Identity {
            document_type: "Aadhar".to_string(),
            fields,
            sides_detected: sides.iter().map(|s| s.to_string()).collect(),
            ..Identity::default()
        }
    }

    #[test]
    fn pan_without_dl_is_rejected() {
        let err = check_pairing(&[fragment("PAN")], &RuleSet::default()).unwrap_err();
        assert!(err.to_string().contains("Driving Licence"));
    }

    #[test]
    fn dl_without_pan_is_rejected() {
        let err = check_pairing(&[fragment("Driving Licence")], &RuleSet::default()).unwrap_err();
        assert!(err.to_string().contains("PAN"));
    }

    #[test]
    fn pairing_passes_when_both_present() {
        let fragments = vec![fragment("PAN"), fragment("Driving Licence")];
        assert!(check_pairing(&fragments, &RuleSet::default()).is_ok());
    }

    #[test]
    fn unknown_types_have_no_pairing_rule() {
        let fragments = vec![fragment("Voter ID"), fragment("Passport")];
        assert!(check_pairing(&fragments, &RuleSet::default()).is_ok());
    }

    #[test]
    fn aadhar_missing_back_rejects_request() {
        let err = check_sides(vec![aadhar("Ravi", &["Front"])], &RuleSet::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Back"));
        assert!(msg.contains("Ravi"));
        assert!(!msg.contains("Missing: Front"));
    }

    #[test]
    fn side_labels_are_case_insensitive() {
        let kept = check_sides(
            vec![aadhar("Ravi Shankar", &["front", "BACK"])],
            &RuleSet::default(),
        )
        .unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn unnamed_identity_reported_as_unknown() {
        let mut identity = aadhar("Ravi", &[]);
        identity.fields = FieldMap::new();
        let err = check_sides(vec![identity], &RuleSet::default()).unwrap_err();
        assert!(err.to_string().contains("Unknown"));
    }

    #[test]
    fn soft_rule_drops_identity_instead_of_rejecting() {
        let rules = RuleSet {
            sides: vec![SidesRule {
                kind: "Aadhar".to_string(),
                required: vec!["Front".to_string(), "Back".to_string()],
                severity: Severity::Soft,
            }],
            ..RuleSet::default()
        };
        let identities = vec![
            aadhar("Ravi Shankar", &["Front"]),
            Identity {
                document_type: "Passport".to_string(),
                ..Identity::default()
            },
        ];
        let kept = check_sides(identities, &rules).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].document_type, "Passport");
    }

    #[test]
    fn sides_rule_applies_to_composite_labels() {
        let mut identity = aadhar("Ravi Shankar", &["Front"]);
        identity.document_type = "Aadhar + PAN".to_string();
        assert!(check_sides(vec![identity], &RuleSet::default()).is_err());
    }
}
