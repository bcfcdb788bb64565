//! A minimal YAML-flavored text dump of a `Node` subtree, used only to
//! render Addition/Removal/Modification blocks (§4.6.1). Not a YAML
//! emitter in the parser-front-end sense — the core never needs to
//! reproduce a byte-for-byte serialization, only a readable rendering.

use crate::node::Node;

pub fn dump(node: &Node) -> String {
    let mut out = String::new();
    dump_node(node, 0, &mut out);
    out.trim_end().to_string()
}

fn indent_str(level: usize) -> String {
    "  ".repeat(level)
}

fn dump_node(node: &Node, indent: usize, out: &mut String) {
    match node {
        Node::Mapping(pairs) => {
            if pairs.is_empty() {
                out.push_str(&format!("{}{{}}\n", indent_str(indent)));
                return;
            }
            for (key, value) in pairs {
                let key_str = key.scalar_display().unwrap_or_else(|| "?".to_string());
                match value {
                    Node::Mapping(inner) if !inner.is_empty() => {
                        out.push_str(&format!("{}{}:\n", indent_str(indent), key_str));
                        dump_node(value, indent + 1, out);
                    }
                    Node::Sequence(items) if !items.is_empty() => {
                        out.push_str(&format!("{}{}:\n", indent_str(indent), key_str));
                        dump_node(value, indent, out);
                    }
                    _ => {
                        out.push_str(&format!("{}{}: {}\n", indent_str(indent), key_str, scalar_str(value)));
                    }
                }
            }
        }
        Node::Sequence(items) => {
            if items.is_empty() {
                out.push_str(&format!("{}[]\n", indent_str(indent)));
                return;
            }
            for item in items {
                match item {
                    Node::Mapping(inner) if !inner.is_empty() => {
                        out.push_str(&format!("{}- ", indent_str(indent)));
                        let mut inner_out = String::new();
                        dump_node(item, indent + 1, &mut inner_out);
                        out.push_str(inner_out.trim_start());
                    }
                    Node::Sequence(inner) if !inner.is_empty() => {
                        out.push_str(&format!("{}-\n", indent_str(indent)));
                        dump_node(item, indent + 1, out);
                    }
                    _ => {
                        out.push_str(&format!("{}- {}\n", indent_str(indent), scalar_str(item)));
                    }
                }
            }
        }
        scalar => out.push_str(&format!("{}{}\n", indent_str(indent), scalar_str(scalar))),
    }
}

fn scalar_str(node: &Node) -> String {
    match node {
        Node::Null => "null".to_string(),
        Node::Bool(b) => b.to_string(),
        Node::Int(i) => i.to_string(),
        Node::Float(f) => f.to_string(),
        Node::String(s) => {
            if s.is_empty() || s.contains(": ") || s.contains('\n') || s.starts_with(['-', '"', '\'']) {
                format!("{s:?}")
            } else {
                s.clone()
            }
        }
        Node::Timestamp(t) => t.clone(),
        Node::Binary(bytes) => format!("!!binary ({} bytes)", bytes.len()),
        Node::Sequence(_) | Node::Mapping(_) => unreachable!("handled by dump_node"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dumps_a_flat_mapping() {
        let node = Node::Mapping(vec![
            (Node::String("name".into()), Node::String("foo".into())),
            (Node::String("count".into()), Node::Int(3)),
        ]);
        assert_eq!(dump(&node), "name: foo\ncount: 3");
    }

    #[test]
    fn dumps_a_sequence_of_mappings() {
        let node = Node::Sequence(vec![Node::Mapping(vec![(Node::String("name".into()), Node::String("a".into()))])]);
        assert_eq!(dump(&node), "- name: a");
    }
}
