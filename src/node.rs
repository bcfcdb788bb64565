//! The document tree (§3, §4.1). A closed, tagged variant instead of a
//! dynamic-any container — dispatch in the diff engine is exhaustive and a
//! type change is a kind mismatch, never a runtime type assertion.

use std::hash::{Hash, Hasher};

/// One parsed scalar or container value. Mapping and Sequence are the only
/// recursive variants; everything else is a leaf.
#[derive(Debug, Clone)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Carries the original textual form (e.g. `2010-09-09`). Kept distinct
    /// from `String` so that a front-end's timestamp/string resolution
    /// decision survives into the diff as a kind, not a lossy coercion.
    Timestamp(String),
    Binary(Vec<u8>),
    Sequence(Vec<Node>),
    /// Ordered list of pairs, preserving insertion order. Order never
    /// participates in `Node` equality — see `Node::equal` — but is kept
    /// around for rendering and for `OrderChange` detection upstream.
    Mapping(Vec<(Node, Node)>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Timestamp,
    Binary,
    Sequence,
    Mapping,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Int => "integer",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Timestamp => "timestamp",
            Kind::Binary => "binary",
            Kind::Sequence => "list",
            Kind::Mapping => "map",
        };
        f.write_str(name)
    }
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Node::Null => Kind::Null,
            Node::Bool(_) => Kind::Bool,
            Node::Int(_) => Kind::Int,
            Node::Float(_) => Kind::Float,
            Node::String(_) => Kind::String,
            Node::Timestamp(_) => Kind::Timestamp,
            Node::Binary(_) => Kind::Binary,
            Node::Sequence(_) => Kind::Sequence,
            Node::Mapping(_) => Kind::Mapping,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(Node, Node)]> {
        match self {
            Node::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Linear-scan lookup by string key; mappings are small in practice.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Like `get`, but `key` may be dot-separated (e.g. `metadata.name`) to
    /// reach a field nested under intermediate mappings — used for identity
    /// fields, like the Kubernetes tuple's name, that don't live at the
    /// entry's top level.
    pub fn get_nested(&self, key: &str) -> Option<&Node> {
        let mut cursor = self;
        for segment in key.split('.') {
            cursor = cursor.get(segment)?;
        }
        Some(cursor)
    }

    /// A rendering-friendly scalar form, used for path identity values and
    /// for the `key=value` slash-style path segment.
    pub fn scalar_display(&self) -> Option<String> {
        match self {
            Node::Null => Some("null".to_string()),
            Node::Bool(b) => Some(b.to_string()),
            Node::Int(i) => Some(i.to_string()),
            Node::Float(f) => Some(f.to_string()),
            Node::String(s) => Some(s.clone()),
            Node::Timestamp(t) => Some(t.clone()),
            _ => None,
        }
    }

    /// Structural equality (§4.1): order never participates for Mapping.
    pub fn equal(&self, other: &Node) -> bool {
        self == other
    }

    /// 64-bit digest agreeing with `equal`; Mapping hashing is
    /// key-order-independent (canonicalized by sorting per-entry hashes).
    pub fn stable_hash(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.hash_into(&mut hasher);
        hasher.finish()
    }

    fn hash_into<H: Hasher>(&self, hasher: &mut H) {
        match self {
            Node::Null => 0u8.hash(hasher),
            Node::Bool(b) => {
                1u8.hash(hasher);
                b.hash(hasher);
            }
            Node::Int(i) => {
                2u8.hash(hasher);
                i.hash(hasher);
            }
            Node::Float(fp) => {
                3u8.hash(hasher);
                fp.to_bits().hash(hasher);
            }
            Node::String(s) => {
                4u8.hash(hasher);
                s.hash(hasher);
            }
            Node::Timestamp(t) => {
                5u8.hash(hasher);
                t.hash(hasher);
            }
            Node::Binary(b) => {
                6u8.hash(hasher);
                b.hash(hasher);
            }
            Node::Sequence(items) => {
                7u8.hash(hasher);
                items.len().hash(hasher);
                for item in items {
                    item.hash_into(hasher);
                }
            }
            Node::Mapping(pairs) => {
                8u8.hash(hasher);
                pairs.len().hash(hasher);
                let mut entry_hashes: Vec<u64> = pairs
                    .iter()
                    .map(|(k, v)| {
                        let mut entry_hasher = std::collections::hash_map::DefaultHasher::new();
                        k.hash_into(&mut entry_hasher);
                        v.hash_into(&mut entry_hasher);
                        entry_hasher.finish()
                    })
                    .collect();
                entry_hashes.sort_unstable();
                for h in entry_hashes {
                    h.hash(hasher);
                }
            }
        }
    }
}

impl PartialEq for Node {
    /// Mapping order never participates: two mappings are equal iff they
    /// carry the same set of (key, value) pairs. Sequences stay positional.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Null, Node::Null) => true,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Int(a), Node::Int(b)) => a == b,
            (Node::Float(a), Node::Float(b)) => a == b,
            (Node::String(a), Node::String(b)) => a == b,
            (Node::Timestamp(a), Node::Timestamp(b)) => a == b,
            (Node::Binary(a), Node::Binary(b)) => a == b,
            (Node::Sequence(a), Node::Sequence(b)) => a == b,
            (Node::Mapping(a), Node::Mapping(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.iter().any(|(k2, v2)| k == k2 && v == v2))
            }
            _ => false,
        }
    }
}

impl Eq for NodeEq {}

/// Newtype used only where a strict `Eq` bound is required (e.g. as a
/// `HashMap` key). `Node` itself only implements `PartialEq` because
/// `Float` carries an `f64`.
#[derive(Debug, Clone)]
pub struct NodeEq(pub Node);

impl PartialEq for NodeEq {
    fn eq(&self, other: &Self) -> bool {
        self.0.equal(&other.0)
    }
}

impl Hash for NodeEq {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.stable_hash());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: Vec<(&str, Node)>) -> Node {
        Node::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (Node::String(k.to_string()), v))
                .collect(),
        )
    }

    #[test]
    fn mapping_equality_ignores_key_order() {
        let a = mapping(vec![("name", Node::String("a".into())), ("age", Node::Int(1))]);
        let b = mapping(vec![("age", Node::Int(1)), ("name", Node::String("a".into()))]);
        assert!(a.equal(&b));
    }

    #[test]
    fn stable_hash_is_key_order_independent() {
        let a = mapping(vec![("name", Node::String("a".into())), ("age", Node::Int(1))]);
        let b = mapping(vec![("age", Node::Int(1)), ("name", Node::String("a".into()))]);
        assert_eq!(a.stable_hash(), b.stable_hash());
    }

    #[test]
    fn get_nested_walks_dotted_keys() {
        let node = mapping(vec![(
            "metadata",
            mapping(vec![("name", Node::String("demo".into()))]),
        )]);
        assert_eq!(node.get_nested("metadata.name"), Some(&Node::String("demo".into())));
        assert_eq!(node.get_nested("metadata.missing"), None);
        assert_eq!(node.get_nested("missing.name"), None);
    }

    #[test]
    fn sequences_compare_positionally() {
        let a = Node::Sequence(vec![Node::Int(1), Node::Int(2)]);
        let b = Node::Sequence(vec![Node::Int(2), Node::Int(1)]);
        assert!(!a.equal(&b));
    }

    #[test]
    fn kind_mismatch_is_not_equal() {
        assert!(!Node::Int(1).equal(&Node::String("1".into())));
    }
}
