//! Path addressing grammar (§4.2): an element-wise coordinate from a
//! Document root to a Node, parsed and rendered in two equivalent forms.

use crate::error::{ParseError, TraversalError};
use crate::identity::{self, IdentityOptions};
use crate::input::InputFile;
use crate::node::{Kind, Node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
    /// A mapping inside a sequence whose entry has `key: value`.
    Keyed { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Dot,
    Slash,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    pub document_idx: usize,
    pub elements: Vec<Segment>,
}

impl Path {
    pub fn root(document_idx: usize) -> Self {
        Path { document_idx, elements: Vec::new() }
    }

    pub fn pushed(&self, segment: Segment) -> Self {
        let mut copy = self.clone();
        copy.elements.push(segment);
        copy
    }

    pub fn is_root(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn parent(&self) -> Option<Path> {
        if self.elements.is_empty() {
            return None;
        }
        let mut copy = self.clone();
        copy.elements.pop();
        Some(copy)
    }

    /// Parse slash-style: `/a/b=c/0/d`. Does not need the document.
    pub fn parse_slash(s: &str, document_idx: usize) -> Result<Path, ParseError> {
        let rest = s.strip_prefix('/').ok_or(ParseError::MissingLeadingSlash)?;
        if rest.is_empty() {
            return Ok(Path::root(document_idx));
        }
        let mut elements = Vec::new();
        for raw in split_unescaped(rest, '/') {
            elements.push(parse_slash_segment(&raw)?);
        }
        Ok(Path { document_idx, elements })
    }

    /// Parse dot-style: `a.b.c.0.d`. Named-entry identity is the bare
    /// value, so this walks `document` in lockstep to disambiguate whether
    /// a segment is a map key, an index, or a named entry.
    pub fn parse_dot(s: &str, document: &Node, document_idx: usize) -> Result<Path, ParseError> {
        let mut elements = Vec::new();
        let mut cursor = document;
        for raw in s.split('.').filter(|s| !s.is_empty()) {
            let segment = match cursor {
                Node::Sequence(items) => {
                    if let Ok(idx) = raw.parse::<usize>() {
                        if items.get(idx).is_none() {
                            return Err(ParseError::IndexOutOfRange {
                                prefix: render_elements(&elements, Style::Dot),
                                index: idx,
                            });
                        }
                        Segment::Index(idx)
                    } else {
                        let key = identity::infer(items, items, &IdentityOptions::default());
                        let key_field = match key {
                            identity::Identity::Field(f) => f,
                            _ => "name".to_string(),
                        };
                        if !items.iter().any(|item| {
                            item.get(&key_field).and_then(Node::as_str) == Some(raw)
                        }) {
                            return Err(ParseError::NamedEntryNotFound {
                                prefix: render_elements(&elements, Style::Dot),
                                name: raw.to_string(),
                            });
                        }
                        Segment::Keyed { key: key_field, value: raw.to_string() }
                    }
                }
                _ => Segment::Field(raw.to_string()),
            };
            cursor = step(cursor, &segment).ok_or_else(|| ParseError::NamedEntryNotFound {
                prefix: render_elements(&elements, Style::Dot),
                name: raw.to_string(),
            })?;
            elements.push(segment);
        }
        Ok(Path { document_idx, elements })
    }

    pub fn render(&self, style: Style, show_document_idx: Option<usize>) -> String {
        let mut out = render_elements(&self.elements, style);
        if let Some(total_docs) = show_document_idx {
            if total_docs > 1 {
                out.push_str(&format!("  (document #{})", self.document_idx));
            }
        }
        out
    }

    pub fn traverse<'a>(&self, document: &'a Node) -> Result<&'a Node, TraversalError> {
        let mut cursor = document;
        let mut rendered_prefix = String::new();
        for segment in &self.elements {
            cursor = step(cursor, segment).ok_or_else(|| segment_error(cursor, segment, &rendered_prefix))?;
            rendered_prefix.push_str(&render_elements(std::slice::from_ref(segment), Style::Slash));
        }
        Ok(cursor)
    }

    /// Removes the node addressed by this path from its parent container.
    pub fn delete(&self, document: &mut Node) -> Result<(), TraversalError> {
        let Some((last, parent_path)) = self.elements.split_last() else {
            return Ok(());
        };
        let parent_path = Path { document_idx: self.document_idx, elements: parent_path.to_vec() };
        let parent = step_mut(document, &parent_path)?;
        match (parent, last) {
            (Node::Mapping(pairs), Segment::Field(name)) => {
                pairs.retain(|(k, _)| k.as_str() != Some(name.as_str()));
            }
            (Node::Sequence(items), Segment::Index(idx)) => {
                if *idx < items.len() {
                    items.remove(*idx);
                }
            }
            (Node::Sequence(items), Segment::Keyed { key, value }) => {
                items.retain(|item| item.get_nested(key).and_then(Node::as_str) != Some(value.as_str()));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Relocates an `InputFile`'s document root to a sub-node (§4.2). Fails
/// unless the file has exactly one document. If the target is a Sequence
/// and `list_to_docs` is set, each entry becomes its own document.
pub fn change_root(
    input: &InputFile,
    path: &Path,
    list_to_docs: bool,
) -> Result<InputFile, crate::error::CompareError> {
    if input.documents.len() != 1 {
        return Err(crate::error::CompareError::NotASingleDocument { count: input.documents.len() });
    }
    let root = &input.documents[0].root;
    let target = path
        .traverse(root)
        .unwrap_or(&Node::Null);

    let note = format!("YAML root was changed to {}", path.render(Style::Slash, None));
    let documents = if list_to_docs {
        match target {
            Node::Sequence(items) => items
                .iter()
                .cloned()
                .map(crate::input::Document::new)
                .collect(),
            other => vec![crate::input::Document::new(other.clone())],
        }
    } else {
        vec![crate::input::Document::new(target.clone())]
    };

    Ok(InputFile { location: input.location.clone(), note: Some(note), documents })
}

fn step<'a>(node: &'a Node, segment: &Segment) -> Option<&'a Node> {
    match (node, segment) {
        (Node::Mapping(_), Segment::Field(name)) => node.get(name),
        (Node::Sequence(items), Segment::Index(idx)) => items.get(*idx),
        (Node::Sequence(items), Segment::Keyed { key, value }) => {
            items.iter().find(|item| item.get_nested(key).and_then(Node::as_str) == Some(value.as_str()))
        }
        _ => None,
    }
}

fn step_mut<'a>(node: &'a mut Node, path: &Path) -> Result<&'a mut Node, TraversalError> {
    let mut cursor = node;
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
                        });
                    }
                }
            }
            (Node::Sequence(items), Segment::Index(idx)) => {
                let len = items.len();
                items.get_mut(*idx).ok_or(TraversalError::IndexOutOfRange {
                    prefix: String::new(),
                    index: *idx,
                    length: len,
                })?
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
                    expected: expected_kind(segment),
                    found: other.kind(),
                });
            }
        };
    }
    Ok(cursor)
}

fn expected_kind(segment: &Segment) -> Kind {
    match segment {
        Segment::Field(_) => Kind::Mapping,
        Segment::Index(_) | Segment::Keyed { .. } => Kind::Sequence,
    }
}

fn segment_error(cursor: &Node, segment: &Segment, prefix: &str) -> TraversalError {
    match (cursor, segment) {
        (Node::Mapping(pairs), Segment::Field(name)) => TraversalError::MissingKey {
            prefix: prefix.to_string(),
            key: name.clone(),
            available: pairs.iter().filter_map(|(k, _)| k.as_str().map(String::from)).collect(),
        },
        (Node::Sequence(items), Segment::Index(idx)) => TraversalError::IndexOutOfRange {
            prefix: prefix.to_string(),
            index: *idx,
            length: items.len(),
        },
        (Node::Sequence(_), Segment::Keyed { key, value }) => TraversalError::NoSuchKeyedEntry {
            prefix: prefix.to_string(),
            key: key.clone(),
            value: value.clone(),
        },
        (other, segment) => TraversalError::KindMismatch {
            prefix: prefix.to_string(),
            expected: expected_kind(segment),
            found: other.kind(),
        },
    }
}

fn split_unescaped(s: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                current.push(next);
                chars.next();
                continue;
            }
        }
        if c == sep {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);
    parts
}

fn parse_slash_segment(raw: &str) -> Result<Segment, ParseError> {
    let eq_count = raw.matches('=').count();
    if eq_count > 1 {
        return Err(ParseError::AmbiguousKeyedSegment { segment: raw.to_string() });
    }
    if let Some((key, value)) = raw.split_once('=') {
        return Ok(Segment::Keyed { key: key.to_string(), value: value.to_string() });
    }
    if let Ok(idx) = raw.parse::<usize>() {
        return Ok(Segment::Index(idx));
    }
    Ok(Segment::Field(raw.to_string()))
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('/', "\\/")
}

fn render_elements(elements: &[Segment], style: Style) -> String {
    match style {
        Style::Slash => {
            let mut out = String::from("/");
            for (i, segment) in elements.iter().enumerate() {
                if i > 0 {
                    out.push('/');
                }
                match segment {
                    Segment::Field(name) => out.push_str(&escape(name)),
                    Segment::Index(idx) => out.push_str(&idx.to_string()),
                    Segment::Keyed { key, value } => {
                        out.push_str(&escape(key));
                        out.push('=');
                        out.push_str(&escape(value));
                    }
                }
            }
            out
        }
        Style::Dot => {
            let mut parts = Vec::new();
            for segment in elements {
                match segment {
                    Segment::Field(name) => parts.push(name.clone()),
                    Segment::Index(idx) => parts.push(idx.to_string()),
                    Segment::Keyed { value, .. } => parts.push(value.clone()),
                }
            }
            parts.join(".")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn doc() -> Node {
        Node::Mapping(vec![(
            Node::String("list".into()),
            Node::Sequence(vec![
                Node::Mapping(vec![(Node::String("name".into()), Node::String("A".into()))]),
                Node::Mapping(vec![(Node::String("name".into()), Node::String("B".into()))]),
            ]),
        )])
    }

    #[test]
    fn slash_round_trip_without_keyed() {
        let p = Path { document_idx: 0, elements: vec![Segment::Field("a".into()), Segment::Index(3)] };
        let rendered = p.render(Style::Slash, None);
        assert_eq!(rendered, "/a/3");
        let parsed = Path::parse_slash(&rendered, 0).unwrap();
        assert_eq!(parsed, p);
    }

    #[test]
    fn slash_escapes_field_names_with_slashes() {
        let p = Path { document_idx: 0, elements: vec![Segment::Field("a/b".into())] };
        let rendered = p.render(Style::Slash, None);
        assert_eq!(rendered, "/a\\/b");
        let parsed = Path::parse_slash(&rendered, 0).unwrap();
        assert_eq!(parsed, p);
    }

    #[test]
    fn keyed_segment_renders_key_equals_value() {
        let p = Path { document_idx: 0, elements: vec![Segment::Field("list".into()), Segment::Keyed { key: "name".into(), value: "A".into() }] };
        assert_eq!(p.render(Style::Slash, None), "/list/name=A");
        assert_eq!(p.render(Style::Dot, None), "list.A");
    }

    #[test]
    fn dot_style_requires_document_for_named_entries() {
        let document = doc();
        let parsed = Path::parse_dot("list.A", &document, 0).unwrap();
        assert_eq!(
            parsed.elements,
            vec![Segment::Field("list".into()), Segment::Keyed { key: "name".into(), value: "A".into() }]
        );
    }

    #[test]
    fn traverse_reports_kind_mismatch() {
        let document = doc();
        let p = Path { document_idx: 0, elements: vec![Segment::Field("list".into()), Segment::Field("name".into())] };
        let err = p.traverse(&document).unwrap_err();
        assert!(matches!(err, TraversalError::KindMismatch { .. }));
    }

    #[test]
    fn traverse_missing_key_lists_available_keys() {
        let document = doc();
        let p = Path { document_idx: 0, elements: vec![Segment::Field("nope".into())] };
        let err = p.traverse(&document).unwrap_err();
        match err {
            TraversalError::MissingKey { available, .. } => assert_eq!(available, vec!["list".to_string()]),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
