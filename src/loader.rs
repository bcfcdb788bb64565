//! The loader (§4.9, component I): reads local files or STDIN, sniffs the
//! format, and produces an `InputFile`. `load_pair` fetches both sides
//! concurrently (§5) — the first failure short-circuits and the other
//! task is dropped rather than awaited to completion.

use std::io::Read;

use crate::cli_error::LoadError;
use crate::input::{Document, InputFile};
use crate::node::Node;
use crate::parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
    Toml,
}

fn sniff_by_extension(location: &str) -> Option<Format> {
    let ext = std::path::Path::new(location).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "yaml" | "yml" => Some(Format::Yaml),
        "json" => Some(Format::Json),
        "toml" => Some(Format::Toml),
        _ => None,
    }
}

fn parse_with(format: Format, location: &str, text: &str) -> Result<Vec<Node>, LoadError> {
    match format {
        Format::Yaml => parse::parse_yaml(location, text),
        Format::Json => parse::parse_json(location, text),
        Format::Toml => parse::parse_toml(location, text),
    }
}

/// Tries the extension-sniffed format first, then the remaining two in a
/// fixed order, returning the first successful parse.
fn parse_any(location: &str, text: &str) -> Result<Vec<Node>, LoadError> {
    let ordered = match sniff_by_extension(location) {
        Some(first) => {
            let mut order = vec![first];
            order.extend([Format::Yaml, Format::Json, Format::Toml].into_iter().filter(|f| *f != first));
            order
        }
        None => vec![Format::Yaml, Format::Json, Format::Toml],
    };

    let mut last_err = None;
    for format in ordered {
        match parse_with(format, location, text) {
            Ok(docs) => return Ok(docs),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| LoadError::UnknownFormat { location: location.to_string() }))
}

fn read_location(location: &str) -> Result<String, LoadError> {
    if location == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| LoadError::Io { location: location.to_string(), source: e })?;
        return String::from_utf8(buf).map_err(|_| LoadError::NotUtf8 { location: location.to_string() });
    }
    std::fs::read_to_string(location).map_err(|e| LoadError::Io { location: location.to_string(), source: e })
}

/// Loads and parses one location into an `InputFile`.
pub async fn load(location: &str) -> Result<InputFile, LoadError> {
    let owned = location.to_string();
    let text = tokio::task::spawn_blocking(move || read_location(&owned))
        .await
        .expect("loader task panicked")?;
    let docs = parse_any(location, &text)?;
    Ok(InputFile::new(location, docs.into_iter().map(Document::new).collect()))
}

/// Loads `from` and `to` concurrently; the first to fail short-circuits
/// and the other future is dropped (cooperative cancellation, not
/// preemption — §5).
pub async fn load_pair(from: &str, to: &str) -> Result<(InputFile, InputFile), LoadError> {
    tokio::try_join!(load(from), load(to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sniffs_yaml_by_extension() {
        assert_eq!(sniff_by_extension("values.yaml"), Some(Format::Yaml));
        assert_eq!(sniff_by_extension("values.json"), Some(Format::Json));
        assert_eq!(sniff_by_extension("Cargo.toml"), Some(Format::Toml));
        assert_eq!(sniff_by_extension("-"), None);
    }

    #[tokio::test]
    async fn parse_any_falls_back_across_formats() {
        let docs = parse_any("config", r#"{"a": 1}"#).unwrap();
        assert_eq!(docs.len(), 1);
    }
}
