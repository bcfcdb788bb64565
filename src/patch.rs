//! The derived patch path (§4.7): applying a serialized list of Add/
//! Remove/Replace operations to a document tree. Not a general-purpose
//! JSON-patch engine — the `apply-patch` subcommand that drives this is
//! external to the core (§1).

use thiserror::Error;

use crate::error::TraversalError;
use crate::node::Node;
use crate::path::{Path, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Remove,
    Replace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatchOperation {
    pub op: Op,
    pub path: Path,
    /// Present for `Add`/`Replace`; ignored for `Remove`.
    pub value: Option<Node>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error(transparent)]
    Traversal(#[from] TraversalError),

    #[error("'add'/'replace' operation at {path} is missing a value")]
    MissingValue { path: String },

    #[error("'replace' at {path} found nothing to replace")]
    ReplaceTargetMissing { path: String },

    #[error("cannot apply '{op:?}' to the document root")]
    RootNotAddressable { op: Op },
}

/// Resolves `patch_op.path`, verifies the operation's expected shape, and
/// mutates `document` in place.
pub fn apply(document: &mut Node, patch_op: &PatchOperation) -> Result<(), PatchError> {
    match patch_op.op {
        Op::Remove => {
            patch_op.path.delete(document)?;
            Ok(())
        }
        Op::Replace => {
            let rendered = patch_op.path.render(crate::path::Style::Slash, None);
            let value = patch_op
                .value
                .clone()
                .ok_or_else(|| PatchError::MissingValue { path: rendered.clone() })?;
            // Verify the target already exists before overwriting it.
            patch_op.path.traverse(document).map_err(|_| PatchError::ReplaceTargetMissing { path: rendered })?;
            set_at(document, &patch_op.path, value)
        }
        Op::Add => {
            let rendered = patch_op.path.render(crate::path::Style::Slash, None);
            let value = patch_op.value.clone().ok_or(PatchError::MissingValue { path: rendered })?;
            add_at(document, &patch_op.path, value)
        }
    }
}

fn set_at(document: &mut Node, path: &Path, value: Node) -> Result<(), PatchError> {
    let Some((last, parent_path)) = path.elements.split_last() else {
        *document = value;
        return Ok(());
    };
    let parent_path = Path { document_idx: path.document_idx, elements: parent_path.to_vec() };
    let parent = mut_at(document, &parent_path)?;
    match (parent, last) {
        (Node::Mapping(pairs), Segment::Field(name)) => {
            match pairs.iter_mut().find(|(k, _)| k.as_str() == Some(name.as_str())) {
                Some((_, v)) => *v = value,
                None => pairs.push((Node::String(name.clone()), value)),
            }
        }
        (Node::Sequence(items), Segment::Index(idx)) if *idx < items.len() => items[*idx] = value,
        (Node::Sequence(items), Segment::Keyed { key, value: id_value }) => {
            if let Some(item) = items.iter_mut().find(|item| item.get_nested(key).and_then(Node::as_str) == Some(id_value.as_str())) {
                *item = value;
            }
        }
        _ => {}
    }
    Ok(())
}

fn add_at(document: &mut Node, path: &Path, value: Node) -> Result<(), PatchError> {
    let Some((last, parent_path)) = path.elements.split_last() else {
        return Err(PatchError::RootNotAddressable { op: Op::Add });
    };
    let parent_path = Path { document_idx: path.document_idx, elements: parent_path.to_vec() };
    let parent = mut_at(document, &parent_path)?;
    match (parent, last) {
        (Node::Mapping(pairs), Segment::Field(name)) => {
            match pairs.iter_mut().find(|(k, _)| k.as_str() == Some(name.as_str())) {
                Some((_, v)) => *v = value,
                None => pairs.push((Node::String(name.clone()), value)),
            }
        }
        (Node::Sequence(items), Segment::Index(idx)) => {
            let idx = (*idx).min(items.len());
            items.insert(idx, value);
        }
        (Node::Sequence(items), Segment::Keyed { .. }) => items.push(value),
        _ => {}
    }
    Ok(())
}

fn mut_at<'a>(document: &'a mut Node, path: &Path) -> Result<&'a mut Node, PatchError> {
    let mut cursor = document;
    for segment in &path.elements {
        cursor = match (cursor, segment) {
            (Node::Mapping(pairs), Segment::Field(name)) => {
                let found = pairs.iter_mut().find(|(k, _)| k.as_str() == Some(name.as_str()));
                match found {
                    Some((_, v)) => v,
                    None => {
                        return Err(TraversalError::MissingKey {
                            prefix: String::new(),
                            key: name.clone(),
                            available: pairs.iter().filter_map(|(k, _)| k.as_str().map(String::from)).collect(),
                        }
                        .into());
                    }
                }
            }
            (Node::Sequence(items), Segment::Index(idx)) => {
                let len = items.len();
                items
                    .get_mut(*idx)
                    .ok_or(TraversalError::IndexOutOfRange { prefix: String::new(), index: *idx, length: len })?
            }
            (Node::Sequence(items), Segment::Keyed { key, value }) => items
                .iter_mut()
                .find(|item| item.get_nested(key).and_then(Node::as_str) == Some(value.as_str()))
                .ok_or_else(|| TraversalError::NoSuchKeyedEntry {
                    prefix: String::new(),
                    key: key.clone(),
                    value: value.clone(),
                })?,
            (other, segment) => {
                return Err(TraversalError::KindMismatch {
                    prefix: String::new(),
                    expected: match segment {
                        Segment::Field(_) => crate::node::Kind::Mapping,
                        _ => crate::node::Kind::Sequence,
                    },
                    found: other.kind(),
                }
                .into());
            }
        };
    }
    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: Vec<(&str, Node)>) -> Node {
        Node::Mapping(pairs.into_iter().map(|(k, v)| (Node::String(k.into()), v)).collect())
    }

    #[test]
    fn replace_overwrites_existing_value() {
        let mut doc = mapping(vec![("name", Node::String("a".into()))]);
        let patch = PatchOperation {
            op: Op::Replace,
            path: Path::parse_slash("/name", 0).unwrap(),
            value: Some(Node::String("b".into())),
        };
        apply(&mut doc, &patch).unwrap();
        assert_eq!(doc.get("name"), Some(&Node::String("b".into())));
    }

    #[test]
    fn replace_fails_when_target_missing() {
        let mut doc = mapping(vec![]);
        let patch = PatchOperation {
            op: Op::Replace,
            path: Path::parse_slash("/name", 0).unwrap(),
            value: Some(Node::String("b".into())),
        };
        assert!(apply(&mut doc, &patch).is_err());
    }

    #[test]
    fn add_inserts_new_mapping_key() {
        let mut doc = mapping(vec![]);
        let patch = PatchOperation {
            op: Op::Add,
            path: Path::parse_slash("/name", 0).unwrap(),
            value: Some(Node::String("b".into())),
        };
        apply(&mut doc, &patch).unwrap();
        assert_eq!(doc.get("name"), Some(&Node::String("b".into())));
    }

    #[test]
    fn remove_deletes_mapping_key() {
        let mut doc = mapping(vec![("name", Node::String("a".into()))]);
        let patch = PatchOperation { op: Op::Remove, path: Path::parse_slash("/name", 0).unwrap(), value: None };
        apply(&mut doc, &patch).unwrap();
        assert_eq!(doc.get("name"), None);
    }
}
