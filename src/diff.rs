//! The diff engine (§4.4): recursive structural comparison of two Nodes
//! yielding a `Report`. Total once inputs are valid `Node`s — it never
//! fails mid-comparison (§7).

use std::collections::HashMap;

use crate::config::CompareOptions;
use crate::error::CompareError;
use crate::identity::{self, Identity};
use crate::input::InputFile;
use crate::node::Node;
use crate::path::{Path, Segment};

#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Addition(Node),
    Removal(Node),
    Modification(Node, Node),
    /// Named-entry lists carry `String` identities; purely positional
    /// sequences carry the `Node` elements themselves (§4.6.1).
    OrderChange(OrderChange),
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderChange {
    Named { from: Vec<String>, to: Vec<String> },
    Positional { from: Vec<Node>, to: Vec<Node> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diff {
    pub path: Path,
    pub details: Vec<Detail>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub from: InputFile,
    pub to: InputFile,
    pub diffs: Vec<Diff>,
}

/// Entry point (§4.4): zips the two files' document sequences
/// document-by-document.
pub fn compare(from: &InputFile, to: &InputFile, opts: &CompareOptions) -> Result<Report, CompareError> {
    let diffs = if from.documents.len() == to.documents.len() {
        let mut diffs = Vec::new();
        for (idx, (f, t)) in from.documents.iter().zip(to.documents.iter()).enumerate() {
            diffs.extend(compare_nodes(Path::root(idx), &f.root, &t.root, opts));
        }
        diffs
    } else if opts.detect_renames {
        compare_by_kubernetes_rename(from, to, opts)
    } else {
        return Err(CompareError::DocumentCountMismatch { from: from.documents.len(), to: to.documents.len() });
    };

    let diffs = apply_ignorable_changes(diffs, opts);

    Ok(Report { from: from.clone(), to: to.clone(), diffs })
}

/// §4.4.4: documents are "the same resource" when their Kubernetes
/// identity tuples match; unmatched documents become Addition/Removal
/// diffs at the document root.
fn compare_by_kubernetes_rename(from: &InputFile, to: &InputFile, opts: &CompareOptions) -> Vec<Diff> {
    let mut diffs = Vec::new();
    let mut to_by_tuple: HashMap<_, usize> = HashMap::new();
    for (idx, doc) in to.documents.iter().enumerate() {
        if let Some(tuple) = identity::kubernetes_tuple(&doc.root) {
            to_by_tuple.entry(tuple).or_insert(idx);
        }
    }

    let mut matched_to = vec![false; to.documents.len()];
    for (idx, doc) in from.documents.iter().enumerate() {
        let path = Path::root(idx);
        match identity::kubernetes_tuple(&doc.root).and_then(|tuple| to_by_tuple.get(&tuple).copied()) {
            Some(to_idx) => {
                matched_to[to_idx] = true;
                diffs.extend(compare_nodes(path, &doc.root, &to.documents[to_idx].root, opts));
            }
            None => diffs.push(Diff { path, details: vec![Detail::Removal(doc.root.clone())] }),
        }
    }
    for (idx, doc) in to.documents.iter().enumerate() {
        if !matched_to[idx] {
            diffs.push(Diff { path: Path::root(idx), details: vec![Detail::Addition(doc.root.clone())] });
        }
    }
    diffs
}

/// §4.4.1 dispatch for two Nodes at path `p`.
fn compare_nodes(path: Path, a: &Node, b: &Node, opts: &CompareOptions) -> Vec<Diff> {
    if a.kind() != b.kind() {
        return vec![Diff { path, details: vec![Detail::Modification(a.clone(), b.clone())] }];
    }

    match (a, b) {
        (Node::Mapping(_), Node::Mapping(_)) => compare_mappings(path, a, b, opts),
        (Node::Sequence(from_items), Node::Sequence(to_items)) => {
            compare_sequences(path, from_items, to_items, opts)
        }
        _ => {
            if let Some(diff) = compare_scalars(&path, a, b, opts) {
                vec![diff]
            } else {
                Vec::new()
            }
        }
    }
}

fn compare_scalars(path: &Path, a: &Node, b: &Node, opts: &CompareOptions) -> Option<Diff> {
    let (a, b) = if opts.format_strings {
        (canonicalize_if_json(a), canonicalize_if_json(b))
    } else {
        (a.clone(), b.clone())
    };
    if a.equal(&b) {
        return None;
    }
    Some(Diff { path: path.clone(), details: vec![Detail::Modification(a, b)] })
}

fn canonicalize_if_json(node: &Node) -> Node {
    let Node::String(s) = node else { return node.clone() };
    match serde_json::from_str::<serde_json::Value>(s) {
        Ok(value) => Node::String(serde_json::to_string(&value).unwrap_or_else(|_| s.clone())),
        Err(_) => node.clone(),
    }
}

/// §4.4.2: walk `from`'s keys, then `to`'s extra keys.
fn compare_mappings(path: Path, a: &Node, b: &Node, opts: &CompareOptions) -> Vec<Diff> {
    let from_pairs = a.as_mapping().unwrap_or(&[]);
    let to_pairs = b.as_mapping().unwrap_or(&[]);

    let mut removed = Vec::new();
    let mut added = Vec::new();
    let mut nested = Vec::new();

    for (key, from_value) in from_pairs {
        let Some(key_name) = key.as_str() else { continue };
        match to_pairs.iter().find(|(k, _)| k.as_str() == Some(key_name)) {
            Some((_, to_value)) => {
                nested.extend(compare_nodes(path.pushed(Segment::Field(key_name.to_string())), from_value, to_value, opts));
            }
            None => removed.push((key.clone(), from_value.clone())),
        }
    }
    for (key, to_value) in to_pairs {
        let Some(key_name) = key.as_str() else { continue };
        if !from_pairs.iter().any(|(k, _)| k.as_str() == Some(key_name)) {
            added.push((key.clone(), to_value.clone()));
        }
    }

    let mut diffs = Vec::new();
    if !removed.is_empty() || !added.is_empty() {
        let mut details = Vec::new();
        if !removed.is_empty() {
            details.push(Detail::Removal(Node::Mapping(removed)));
        }
        if !added.is_empty() {
            details.push(Detail::Addition(Node::Mapping(added)));
        }
        diffs.push(Diff { path, details });
    }
    diffs.extend(nested);
    diffs
}

/// §4.4.3 dispatch.
fn compare_sequences(path: Path, from: &[Node], to: &[Node], opts: &CompareOptions) -> Vec<Diff> {
    if from.is_empty() && to.is_empty() {
        return Vec::new();
    }
    if from.len() == 1 && to.len() == 1 {
        return compare_nodes(path, &from[0], &to[0], opts);
    }

    match identity::infer(from, to, &opts.identity) {
        Identity::Field(key) => compare_keyed_sequence(path, from, to, &key, opts),
        Identity::Kubernetes => compare_keyed_sequence_by(
            path,
            from,
            to,
            identity::kubernetes_tuple,
            |tuple| Segment::Keyed { key: "metadata.name".to_string(), value: tuple.name.clone() },
            |tuple| format!("{}/{}", tuple.kind, tuple.name),
            opts,
        ),
        Identity::None => compare_positional_sequence(path, from, to, opts),
    }
}

/// §4.4.3a: align entries by a single string-valued identity field.
fn compare_keyed_sequence(path: Path, from: &[Node], to: &[Node], key: &str, opts: &CompareOptions) -> Vec<Diff> {
    compare_keyed_sequence_by(
        path,
        from,
        to,
        |n| n.get(key).and_then(Node::as_str).map(String::from),
        |id| Segment::Keyed { key: key.to_string(), value: id.clone() },
        |id| id.clone(),
        opts,
    )
}

fn compare_keyed_sequence_by<I, Ident, Seg, Render>(
    path: Path,
    from: &[Node],
    to: &[Node],
    identity_of: Ident,
    segment_for: Seg,
    render_id: Render,
    opts: &CompareOptions,
) -> Vec<Diff>
where
    I: Eq + std::hash::Hash + Clone,
    Ident: Fn(&Node) -> Option<I>,
    Seg: Fn(&I) -> Segment,
    Render: Fn(&I) -> String,
{
    let to_by_id: HashMap<I, usize> = to
        .iter()
        .enumerate()
        .filter_map(|(idx, n)| identity_of(n).map(|id| (id, idx)))
        .collect();

    let mut removed = Vec::new();
    let mut added = Vec::new();
    let mut nested = Vec::new();
    let mut from_order = Vec::new();
    let mut to_order = Vec::new();
    let mut matched_to = vec![false; to.len()];

    for from_entry in from {
        let id = identity_of(from_entry);
        match id.as_ref().and_then(|id| to_by_id.get(id).copied()) {
            Some(to_idx) => {
                matched_to[to_idx] = true;
                let id = id.unwrap();
                from_order.push(render_id(&id));
                nested.extend(compare_nodes(path.pushed(segment_for(&id)), from_entry, &to[to_idx], opts));
            }
            None => removed.push(from_entry.clone()),
        }
    }
    for (idx, to_entry) in to.iter().enumerate() {
        if matched_to[idx] {
            to_order.push(render_id(&identity_of(to_entry).unwrap()));
        } else {
            added.push(to_entry.clone());
        }
    }

    let mut details = Vec::new();
    if from_order != to_order {
        details.push(Detail::OrderChange(OrderChange::Named { from: from_order, to: to_order }));
    }
    if !removed.is_empty() {
        details.push(Detail::Removal(Node::Sequence(removed)));
    }
    if !added.is_empty() {
        details.push(Detail::Addition(Node::Sequence(added)));
    }

    let mut diffs = Vec::new();
    if !details.is_empty() {
        diffs.push(Diff { path, details });
    }
    diffs.extend(nested);
    diffs
}

/// §4.4.3b: align entries by stable hash, with a fallback equality check
/// on collision (§9).
fn compare_positional_sequence(path: Path, from: &[Node], to: &[Node], opts: &CompareOptions) -> Vec<Diff> {
    let mut to_by_hash: HashMap<u64, Vec<usize>> = HashMap::new();
    for (idx, n) in to.iter().enumerate() {
        to_by_hash.entry(n.stable_hash()).or_default().push(idx);
    }

    let mut matched_to = vec![false; to.len()];
    let mut removed = Vec::new();
    let mut from_order = Vec::new();

    for from_entry in from {
        let hash = from_entry.stable_hash();
        let candidate = to_by_hash
            .get(&hash)
            .into_iter()
            .flatten()
            .find(|&&idx| !matched_to[idx] && to[idx].equal(from_entry));
        match candidate.copied() {
            Some(idx) => {
                matched_to[idx] = true;
                from_order.push(from_entry.clone());
            }
            None => removed.push(from_entry.clone()),
        }
    }

    let mut added = Vec::new();
    let mut to_order = Vec::new();
    for (idx, to_entry) in to.iter().enumerate() {
        if matched_to[idx] {
            to_order.push(to_entry.clone());
        } else {
            added.push(to_entry.clone());
        }
    }

    let mut details = Vec::new();
    if from_order != to_order {
        details.push(Detail::OrderChange(OrderChange::Positional { from: from_order, to: to_order }));
    }
    if !removed.is_empty() {
        details.push(Detail::Removal(Node::Sequence(removed)));
    }
    if !added.is_empty() {
        details.push(Detail::Addition(Node::Sequence(added)));
    }

    if details.is_empty() {
        Vec::new()
    } else {
        vec![Diff { path, details }]
    }
}

/// §4.4.5: suppress classes of diffs at source.
fn apply_ignorable_changes(mut diffs: Vec<Diff>, opts: &CompareOptions) -> Vec<Diff> {
    if opts.ignore_order_changes {
        for diff in &mut diffs {
            diff.details.retain(|d| !matches!(d, Detail::OrderChange(_)));
        }
    }
    if opts.ignore_whitespace_changes {
        for diff in &mut diffs {
            diff.details.retain(|d| match d {
                Detail::Modification(Node::String(a), Node::String(b)) => a.trim() != b.trim(),
                _ => true,
            });
        }
    }
    diffs.retain(|d| !d.details.is_empty());
    if opts.ignore_value_changes {
        diffs.retain(|d| !d.details.iter().all(|detail| matches!(detail, Detail::Modification(_, _))));
    }
    diffs
}
