//! Parsing front-ends (§4.8, component H): one pure function per accepted
//! format, each lowering into `dyff`'s own `Node` so the diff engine never
//! has to know which parser produced a document.

use saphyr::{LoadableYamlNode, MarkedYamlOwned, ScalarOwned, YamlDataOwned};

use crate::cli_error::LoadError;
use crate::node::Node;

pub fn parse_yaml(location: &str, text: &str) -> Result<Vec<Node>, LoadError> {
    let docs = MarkedYamlOwned::load_from_str(text)
        .map_err(|e| LoadError::Yaml { location: location.to_string(), message: e.to_string() })?;
    Ok(docs.iter().map(lower_yaml).collect())
}

fn lower_yaml(node: &MarkedYamlOwned) -> Node {
    match &node.data {
        YamlDataOwned::Value(ScalarOwned::Null) => Node::Null,
        YamlDataOwned::Value(ScalarOwned::Boolean(b)) => Node::Bool(*b),
        YamlDataOwned::Value(ScalarOwned::Integer(i)) => Node::Int(*i),
        YamlDataOwned::Value(ScalarOwned::FloatingPoint(fp)) => Node::Float(fp.into_inner()),
        YamlDataOwned::Value(ScalarOwned::String(s)) => Node::String(s.clone()),
        // Raw scalar text saphyr hasn't resolved against the YAML core schema
        // yet; resolve it the same way a `Value` variant would have been.
        YamlDataOwned::Representation(s, _style, tag) => resolve_scalar(s, tag.as_deref()),
        YamlDataOwned::Sequence(items) => Node::Sequence(items.iter().map(lower_yaml).collect()),
        YamlDataOwned::Mapping(pairs) => {
            Node::Mapping(pairs.iter().map(|(k, v)| (lower_yaml(k), lower_yaml(v))).collect())
        }
        YamlDataOwned::Tagged(_tag, inner) => lower_yaml(inner),
        YamlDataOwned::Alias(_) | YamlDataOwned::BadValue => Node::Null,
    }
}

/// YAML 1.1 core-schema resolution for an unresolved scalar: explicit tags
/// win, then the usual null/bool/int/float/timestamp/string ladder.
fn resolve_scalar(raw: &str, tag: Option<&str>) -> Node {
    if let Some(tag) = tag {
        match tag {
            "tag:yaml.org,2002:str" => return Node::String(raw.to_string()),
            "tag:yaml.org,2002:timestamp" => return Node::Timestamp(raw.to_string()),
            "tag:yaml.org,2002:binary" => {
                return Node::Binary(raw.as_bytes().to_vec());
            }
            _ => {}
        }
    }
    if raw.is_empty() || raw == "~" || raw.eq_ignore_ascii_case("null") {
        return Node::Null;
    }
    if raw.eq_ignore_ascii_case("true") {
        return Node::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Node::Bool(false);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Node::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Node::Float(f);
    }
    if is_timestamp_like(raw) {
        return Node::Timestamp(raw.to_string());
    }
    Node::String(raw.to_string())
}

fn is_timestamp_like(s: &str) -> bool {
    let digits_and_dashes = s.len() >= 8
        && s.chars().take(10).all(|c| c.is_ascii_digit() || c == '-')
        && s.matches('-').count() >= 2;
    digits_and_dashes
}

pub fn parse_json(location: &str, text: &str) -> Result<Vec<Node>, LoadError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| LoadError::Json { location: location.to_string(), source: e })?;
    Ok(vec![lower_json(&value)])
}

fn lower_json(value: &serde_json::Value) -> Node {
    match value {
        serde_json::Value::Null => Node::Null,
        serde_json::Value::Bool(b) => Node::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Int(i)
            } else {
                Node::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Node::String(s.clone()),
        serde_json::Value::Array(items) => Node::Sequence(items.iter().map(lower_json).collect()),
        serde_json::Value::Object(map) => {
            Node::Mapping(map.iter().map(|(k, v)| (Node::String(k.clone()), lower_json(v))).collect())
        }
    }
}

pub fn parse_toml(location: &str, text: &str) -> Result<Vec<Node>, LoadError> {
    let value: toml::Value = toml::from_str(text)
        .map_err(|e| LoadError::Toml { location: location.to_string(), source: e })?;
    Ok(vec![lower_toml(&value)])
}

fn lower_toml(value: &toml::Value) -> Node {
    match value {
        toml::Value::String(s) => Node::String(s.clone()),
        toml::Value::Integer(i) => Node::Int(*i),
        toml::Value::Float(f) => Node::Float(*f),
        toml::Value::Boolean(b) => Node::Bool(*b),
        toml::Value::Datetime(dt) => Node::Timestamp(dt.to_string()),
        toml::Value::Array(items) => Node::Sequence(items.iter().map(lower_toml).collect()),
        toml::Value::Table(table) => {
            Node::Mapping(table.iter().map(|(k, v)| (Node::String(k.clone()), lower_toml(v))).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_preserves_mapping_key_order() {
        let docs = parse_yaml("-", "b: 1\na: 2\n").unwrap();
        assert_eq!(docs.len(), 1);
        let pairs = docs[0].as_mapping().unwrap();
        assert_eq!(pairs[0].0, Node::String("b".into()));
        assert_eq!(pairs[1].0, Node::String("a".into()));
    }

    #[test]
    fn yaml_splits_multiple_documents() {
        let docs = parse_yaml("-", "a: 1\n---\nb: 2\n").unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn json_numbers_without_a_fraction_are_ints() {
        let docs = parse_json("-", r#"{"count": 3}"#).unwrap();
        assert_eq!(docs[0].get("count"), Some(&Node::Int(3)));
    }

    #[test]
    fn toml_table_lowers_to_mapping() {
        let docs = parse_toml("-", "name = \"demo\"\ncount = 3\n").unwrap();
        assert_eq!(docs[0].get("name"), Some(&Node::String("demo".into())));
        assert_eq!(docs[0].get("count"), Some(&Node::Int(3)));
    }
}
