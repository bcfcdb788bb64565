//! The default terminal report (§4.6.1): one block per Diff, a path
//! header followed by a detail rendering per Removal/Addition/
//! Modification/OrderChange, in that priority order.

use indent::indent_all_by;

use crate::classify::{self, StringChange};
use crate::config::RenderOptions;
use crate::diff::{Detail, Diff, OrderChange, Report};
use crate::node::Node;
use crate::path::Style as PathStyle;

use super::dump::dump;
use super::inline_diff::compute_inline_diff;
use super::table::render_side_by_side;
use super::{
    addition_style, banner, bold_style, dim_style, emphasis_addition_style, emphasis_removal_style,
    modification_style, order_style, removal_style, styled, Color,
};

pub fn render_human(report: &Report, opts: &RenderOptions) -> String {
    let color = Color::from(opts);
    let mut out = String::new();

    if opts.show_banner {
        out.push_str(&banner(&report.from.location, &report.to.location, report.diffs.len(), color));
        out.push('\n');
    }

    let total_docs = report.from.documents.len();
    for diff in &report.diffs {
        out.push('\n');
        out.push_str(&render_diff(diff, total_docs, opts, color));
        out.push('\n');
    }

    out
}

fn render_diff(diff: &Diff, total_docs: usize, opts: &RenderOptions, color: Color) -> String {
    let show_doc = if opts.show_document_idx { Some(total_docs) } else { None };
    let rendered_path = if diff.path.is_root() {
        "(root level)".to_string()
    } else {
        diff.path.render(opts.style, show_doc)
    };
    let mut out = format!("{}\n", styled(color, bold_style(), &rendered_path));

    if let [Detail::Removal(removed), Detail::Addition(added)] = diff.details.as_slice() {
        out.push_str(&render_removal_addition_pair(removed, added, opts, color));
        return out;
    }

    for detail in &diff.details {
        out.push_str(&render_detail(detail, opts, color));
    }
    out
}

fn render_removal_addition_pair(removed: &Node, added: &Node, opts: &RenderOptions, color: Color) -> String {
    let mut out = String::new();
    out.push_str(&styled(color, removal_style(), &format!("{}\n", entry_header("-", "removed", removed))));
    out.push_str(&styled(color, addition_style(), &format!("{}\n", entry_header("+", "added", added))));

    let removed_dump = dump(removed);
    let added_dump = dump(added);
    if !opts.no_table {
        if let Some(table) = render_side_by_side(&removed_dump, &added_dump, opts.terminal_width, color) {
            out.push_str(&format!("{}\n", indent_all_by(2, table)));
            return out;
        }
    }
    out.push_str(&render_block("- ", &removed_dump, removal_style(), color));
    out.push_str(&render_block("+ ", &added_dump, addition_style(), color));
    out
}

fn render_detail(detail: &Detail, opts: &RenderOptions, color: Color) -> String {
    match detail {
        Detail::Removal(node) => {
            let mut out = styled(color, removal_style(), &format!("{}\n", entry_header("-", "removed", node)));
            out.push_str(&render_block("- ", &dump(node), removal_style(), color));
            out
        }
        Detail::Addition(node) => {
            let mut out = styled(color, addition_style(), &format!("{}\n", entry_header("+", "added", node)));
            out.push_str(&render_block("+ ", &dump(node), addition_style(), color));
            out
        }
        Detail::Modification(a, b) => render_modification(a, b, opts, color),
        Detail::OrderChange(change) => render_order_change(change, color),
    }
}

/// §4.6.1 header line: `+ 2 list entries added:` / `- 1 map entry removed:`.
fn entry_header(sigil: &str, verb: &str, node: &Node) -> String {
    let (count, noun) = match node {
        Node::Sequence(items) => (items.len(), "list entry"),
        Node::Mapping(pairs) => (pairs.len(), "map entry"),
        _ => (1, "value"),
    };
    let noun = if count == 1 { noun.to_string() } else { format!("{noun}s") };
    format!("{sigil} {count} {noun} {verb}:")
}

fn render_block(prefix: &str, text: &str, style: owo_colors::Style, color: Color) -> String {
    let mut out = String::new();
    for line in text.lines() {
        out.push_str(&styled(color, style, &format!("{prefix}{line}")));
        out.push('\n');
    }
    out
}

fn render_modification(a: &Node, b: &Node, opts: &RenderOptions, color: Color) -> String {
    if let (Node::String(from), Node::String(to)) = (a, b) {
        return render_string_modification(from, to, opts, color);
    }
    let mut out = String::new();
    if a.kind() != b.kind() {
        out.push_str(&styled(color, modification_style(), &format!("± type change from {} to {}\n", a.kind(), b.kind())));
    } else {
        out.push_str(&styled(color, modification_style(), "± value change\n"));
    }
    out.push_str(&render_block("  - ", &dump(a), removal_style(), color));
    out.push_str(&render_block("  + ", &dump(b), addition_style(), color));
    out
}

fn render_string_modification(from: &str, to: &str, opts: &RenderOptions, color: Color) -> String {
    match classify::classify(from, to, &opts.classify) {
        StringChange::Certificates { from: cert_a, to: cert_b } => {
            let mut out = styled(color, modification_style(), "± certificate change\n");
            out.push_str(&format!("  subject: {} -> {}\n", cert_a.subject, cert_b.subject));
            out.push_str(&format!("  issuer:  {} -> {}\n", cert_a.issuer, cert_b.issuer));
            out.push_str(&format!("  validity: {}..{} -> {}..{}\n", cert_a.not_before, cert_a.not_after, cert_b.not_before, cert_b.not_after));
            out
        }
        StringChange::InvalidUtf8 => {
            let mut out = styled(color, modification_style(), "± binary change\n");
            out.push_str(&render_block("  - ", &classify::hex_dump(from.as_bytes()), removal_style(), color));
            out.push_str(&render_block("  + ", &classify::hex_dump(to.as_bytes()), addition_style(), color));
            out
        }
        StringChange::Whitespace => {
            let mut out = styled(color, dim_style(), "± whitespace only change\n");
            out.push_str(&render_block("  - ", &show_whitespace(from), removal_style(), color));
            out.push_str(&render_block("  + ", &show_whitespace(to), addition_style(), color));
            out
        }
        StringChange::Minor => {
            let (left, right) = render_inline(from, to, color);
            let mut out = styled(color, modification_style(), "± value change\n");
            out.push_str(&format!("  - {left}\n"));
            out.push_str(&format!("  + {right}\n"));
            out
        }
        StringChange::Plain => {
            let mut out = styled(color, modification_style(), "± value change\n");
            out.push_str(&render_block("  - ", from, removal_style(), color));
            out.push_str(&render_block("  + ", to, addition_style(), color));
            out
        }
        StringChange::Multiline => {
            let mut out = styled(color, modification_style(), "± multiline value change\n");
            let context = opts.multiline_context_lines;
            out.push_str(&render_block("  - ", &take_lines(from, context), removal_style(), color));
            out.push_str(&render_block("  + ", &take_lines(to, context), addition_style(), color));
            out
        }
    }
}

/// Inline word-diff highlighting (§4.6.3 rule 4): only the differing
/// substrings are styled, the shared prefix/suffix is left plain.
fn render_inline(from: &str, to: &str, color: Color) -> (String, String) {
    let (left_parts, right_parts) = compute_inline_diff(from, to);
    let render = |parts: &[super::inline_diff::InlinePart], emphasis: owo_colors::Style| {
        parts
            .iter()
            .map(|part| if part.emphasized { styled(color, emphasis, &part.text) } else { part.text.clone() })
            .collect::<String>()
    };
    (render(&left_parts, emphasis_removal_style()), render(&right_parts, emphasis_addition_style()))
}

/// §4.6.3 rule 3: spaces shown as `·`, newlines as `↵` followed by an
/// actual line break so the whitespace-only difference stays visible.
fn show_whitespace(s: &str) -> String {
    s.replace(' ', "·").replace('\n', "↵\n")
}

fn take_lines(s: &str, max: usize) -> String {
    let lines: Vec<&str> = s.lines().collect();
    if lines.len() <= max {
        return s.to_string();
    }
    let mut out = lines[..max].join("\n");
    out.push_str(&format!("\n... ({} more lines)", lines.len() - max));
    out
}

fn render_order_change(change: &OrderChange, color: Color) -> String {
    let mut out = styled(color, order_style(), "± order change\n");
    match change {
        OrderChange::Named { from, to } => {
            out.push_str(&format!("  from: {}\n", from.join(", ")));
            out.push_str(&format!("  to:   {}\n", to.join(", ")));
        }
        OrderChange::Positional { from, to } => {
            let from_str = from.iter().map(dump).collect::<Vec<_>>().join(", ");
            let to_str = to.iter().map(dump).collect::<Vec<_>>().join(", ");
            out.push_str(&format!("  from: [{from_str}]\n"));
            out.push_str(&format!("  to:   [{to_str}]\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompareOptions;
    use crate::diff::compare;
    use crate::input::{Document, InputFile};

    fn file(location: &str, root: Node) -> InputFile {
        InputFile::new(location, vec![Document::new(root)])
    }

    fn mapping(pairs: Vec<(&str, Node)>) -> Node {
        Node::Mapping(pairs.into_iter().map(|(k, v)| (Node::String(k.into()), v)).collect())
    }

    #[test]
    fn renders_a_value_change() {
        let from = mapping(vec![("name", Node::String("alpha7".into()))]);
        let to = mapping(vec![("name", Node::String("alphaX".into()))]);
        let report = compare(&file("a", from), &file("b", to), &CompareOptions::default()).unwrap();
        let mut opts = RenderOptions::default();
        opts.color = false;
        let rendered = render_human(&report, &opts);
        assert!(rendered.contains("name"));
        assert!(rendered.contains("value change") || rendered.contains("alpha7"));
    }

    #[test]
    fn type_change_is_labelled_as_such() {
        let from = mapping(vec![("bar", Node::String("12".into()))]);
        let to = mapping(vec![("bar", Node::Bool(false))]);
        let report = compare(&file("a", from), &file("b", to), &CompareOptions::default()).unwrap();
        let mut opts = RenderOptions::default();
        opts.color = false;
        let rendered = render_human(&report, &opts);
        assert!(rendered.contains("type change from string to boolean"));
    }

    #[test]
    fn no_diffs_renders_empty_body() {
        let doc = mapping(vec![("a", Node::Int(1))]);
        let report = compare(&file("a", doc.clone()), &file("b", doc), &CompareOptions::default()).unwrap();
        let mut opts = RenderOptions::default();
        opts.color = false;
        assert_eq!(render_human(&report, &opts).trim(), "");
    }
}
