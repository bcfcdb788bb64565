//! Identity inference for named-entry lists (§4.3). Picks a single field
//! that uniquely identifies every entry of a Sequence-of-Mappings, so the
//! diff engine can align entries by identity instead of position.

use crate::node::Node;

const STANDARD_CANDIDATES: [&str; 3] = ["name", "key", "id"];

#[derive(Debug, Clone)]
pub struct IdentityOptions {
    /// Appended to the standard `name`/`key`/`id` list before the
    /// non-standard guess (§4.3 rule 1).
    pub additional_candidates: Vec<String>,
    /// Opt-in for the `(apiVersion, kind, namespace, name)` composite
    /// identity (§4.3 rule 2).
    pub kubernetes: bool,
    /// Minimum sequence length before the non-standard guess (§4.3 rule 3)
    /// is even attempted. The spec fixes this at 3 by default.
    pub non_standard_threshold: usize,
}

impl Default for IdentityOptions {
    fn default() -> Self {
        IdentityOptions {
            additional_candidates: Vec::new(),
            kubernetes: false,
            non_standard_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Field(String),
    Kubernetes,
    None,
}

/// A Kubernetes document-level or list-entry identity tuple (§4.3 rule 2,
/// §4.4.4).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KubernetesTuple {
    pub api_version: String,
    pub kind: String,
    pub namespace: Option<String>,
    pub name: String,
}

pub fn kubernetes_tuple(entry: &Node) -> Option<KubernetesTuple> {
    let api_version = entry.get("apiVersion")?.as_str()?.to_string();
    let kind = entry.get("kind")?.as_str()?.to_string();
    let metadata = entry.get("metadata")?;
    let name = metadata.get("name")?.as_str()?.to_string();
    let namespace = metadata.get("namespace").and_then(Node::as_str).map(String::from);
    Some(KubernetesTuple {
        api_version,
        kind,
        namespace,
        name,
    })
}

fn is_kubernetes_style(entries: &[Node]) -> bool {
    !entries.is_empty() && entries.iter().all(|e| kubernetes_tuple(e).is_some())
}

/// All entries must be Mappings for any identity to apply.
fn all_mappings(entries: &[Node]) -> bool {
    !entries.is_empty() && entries.iter().all(|e| e.as_mapping().is_some())
}

fn appears_exactly_once_in_every_entry(entries: &[Node], field: &str) -> bool {
    entries.iter().all(|entry| {
        entry
            .as_mapping()
            .map(|pairs| pairs.iter().filter(|(k, _)| k.as_str() == Some(field)).count() == 1)
            .unwrap_or(false)
    })
}

/// Entry point: decide how `from` and `to` (the two sides of a Sequence
/// comparison) should align their entries.
pub fn infer(from: &[Node], to: &[Node], opts: &IdentityOptions) -> Identity {
    if !all_mappings(from) || !all_mappings(to) {
        return Identity::None;
    }

    let mut candidates: Vec<String> = STANDARD_CANDIDATES.iter().map(|s| s.to_string()).collect();
    candidates.extend(opts.additional_candidates.iter().cloned());

    for candidate in &candidates {
        if appears_exactly_once_in_every_entry(from, candidate)
            && appears_exactly_once_in_every_entry(to, candidate)
        {
            return Identity::Field(candidate.clone());
        }
    }

    if opts.kubernetes && is_kubernetes_style(from) && is_kubernetes_style(to) {
        return Identity::Kubernetes;
    }

    if let Some(field) = non_standard_guess(from, to, opts.non_standard_threshold) {
        return Identity::Field(field);
    }

    Identity::None
}

fn non_standard_guess(from: &[Node], to: &[Node], threshold: usize) -> Option<String> {
    if from.len() <= threshold || to.len() <= threshold {
        return None;
    }
    for field in common_string_fields(from, to) {
        if is_unique_within(from, &field) && is_unique_within(to, &field) {
            return Some(field);
        }
    }
    None
}

fn string_fields_common_to_all(entries: &[Node]) -> Vec<String> {
    let Some(first) = entries.first().and_then(Node::as_mapping) else {
        return Vec::new();
    };
    let mut fields: Vec<String> = first
        .iter()
        .filter_map(|(k, v)| {
            if v.as_str().is_some() {
                k.as_str().map(String::from)
            } else {
                None
            }
        })
        .collect();
    for entry in &entries[1..] {
        let Some(mapping) = entry.as_mapping() else {
            return Vec::new();
        };
        fields.retain(|f| {
            mapping
                .iter()
                .any(|(k, v)| k.as_str() == Some(f.as_str()) && v.as_str().is_some())
        });
    }
    fields
}

fn common_string_fields(from: &[Node], to: &[Node]) -> Vec<String> {
    let from_fields = string_fields_common_to_all(from);
    let to_fields = string_fields_common_to_all(to);
    from_fields.into_iter().filter(|f| to_fields.contains(f)).collect()
}

fn is_unique_within(entries: &[Node], field: &str) -> bool {
    let mut values: Vec<&str> = entries.iter().filter_map(|e| e.get(field).and_then(Node::as_str)).collect();
    if values.len() != entries.len() {
        return false;
    }
    values.sort_unstable();
    values.dedup();
    values.len() == entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pairs: Vec<(&str, Node)>) -> Node {
        Node::Mapping(pairs.into_iter().map(|(k, v)| (Node::String(k.into()), v)).collect())
    }

    #[test]
    fn picks_name_when_universal() {
        let from = vec![
            entry(vec![("name", Node::String("a".into()))]),
            entry(vec![("name", Node::String("b".into()))]),
        ];
        let to = from.clone();
        assert_eq!(infer(&from, &to, &IdentityOptions::default()), Identity::Field("name".into()));
    }

    #[test]
    fn rejects_field_present_only_on_one_side() {
        let from = vec![
            entry(vec![("name", Node::String("a".into()))]),
            entry(vec![("name", Node::String("b".into()))]),
        ];
        let to = vec![
            entry(vec![("other", Node::String("a".into()))]),
            entry(vec![("other", Node::String("b".into()))]),
        ];
        assert_eq!(infer(&from, &to, &IdentityOptions::default()), Identity::None);
    }

    #[test]
    fn non_standard_guess_needs_more_than_threshold_entries() {
        let mk = |vals: &[&str]| {
            vals.iter()
                .map(|v| entry(vec![("sku", Node::String((*v).into()))]))
                .collect::<Vec<_>>()
        };
        let three = mk(&["a", "b", "c"]);
        assert_eq!(infer(&three, &three, &IdentityOptions::default()), Identity::None);

        let four = mk(&["a", "b", "c", "d"]);
        assert_eq!(infer(&four, &four, &IdentityOptions::default()), Identity::Field("sku".into()));
    }

    #[test]
    fn kubernetes_tuple_requires_opt_in() {
        let mk = |name: &str| {
            entry(vec![
                ("apiVersion", Node::String("v1".into())),
                ("kind", Node::String("Pod".into())),
                (
                    "metadata",
                    Node::Mapping(vec![(Node::String("name".into()), Node::String(name.into()))]),
                ),
            ])
        };
        let from = vec![mk("a"), mk("b")];
        let to = from.clone();
        assert_eq!(infer(&from, &to, &IdentityOptions::default()), Identity::None);

        let opts = IdentityOptions { kubernetes: true, ..Default::default() };
        assert_eq!(infer(&from, &to, &opts), Identity::Kubernetes);
    }
}
