//! GitHub/GitLab/Gitea diff-syntax output (§4.6): suppresses the banner
//! and table layout, and prefixes every content line of a change with
//! `+`/`-`/` ` so a downstream diff-highlighter colors it. Each flavor
//! carries its own sigil set (§4.6: "configurable sigils") for the path
//! line, the root-level description, and the change-type markers, so the
//! three variants are genuinely distinct renderings, not one output under
//! three names.

use super::dump::dump;
use crate::config::{DiffSyntaxFlavor, RenderOptions};
use crate::diff::{Detail, OrderChange, Report};
use crate::node::Node;

struct Sigils {
    /// Code-fence language tag opening the detail block, e.g. "```diff".
    fence: &'static str,
    /// Prefix in front of a rendered path line.
    path: &'static str,
    /// Label used instead of an empty path at the document root.
    root_description: &'static str,
    modification: &'static str,
    order_change: &'static str,
}

fn sigils_for(flavor: DiffSyntaxFlavor) -> Sigils {
    match flavor {
        DiffSyntaxFlavor::GitHub => Sigils {
            fence: "```diff",
            path: "## ",
            root_description: "(root level)",
            modification: "±",
            order_change: "⇆",
        },
        DiffSyntaxFlavor::GitLab => Sigils {
            fence: "```diff",
            path: "### ",
            root_description: "(document root)",
            modification: "~",
            order_change: "\u{21c5}", // ⇅
        },
        DiffSyntaxFlavor::Gitea => Sigils {
            fence: "```diff",
            path: "» ",
            root_description: "(top level)",
            modification: "\u{0394}", // Δ
            order_change: "\u{21bb}", // ↻
        },
    }
}

pub fn render_diffsyntax(report: &Report, flavor: DiffSyntaxFlavor, opts: &RenderOptions) -> String {
    let sigils = sigils_for(flavor);
    let total_docs = report.from.documents.len();
    let show_doc = if opts.show_document_idx { Some(total_docs) } else { None };

    let mut out = String::new();
    for diff in &report.diffs {
        let rendered_path = if diff.path.is_root() {
            sigils.root_description.to_string()
        } else {
            diff.path.render(opts.style, show_doc)
        };
        out.push_str(&format!("{}{rendered_path}\n{}\n", sigils.path, sigils.fence));
        for detail in &diff.details {
            out.push_str(&render_detail(detail, &sigils));
        }
        out.push_str("```\n\n");
    }
    out.trim_end().to_string()
}

fn render_detail(detail: &Detail, sigils: &Sigils) -> String {
    match detail {
        Detail::Removal(node) => {
            format!("-{}\n{}", entry_header("removed", node), prefixed_lines(&dump(node), '-'))
        }
        Detail::Addition(node) => {
            format!("+{}\n{}", entry_header("added", node), prefixed_lines(&dump(node), '+'))
        }
        Detail::Modification(a, b) => {
            let mut out = format!(" {} value change\n", sigils.modification);
            out.push_str(&prefixed_lines(&dump(a), '-'));
            out.push_str(&prefixed_lines(&dump(b), '+'));
            out
        }
        Detail::OrderChange(change) => render_order_change(change, sigils),
    }
}

/// Same count/noun header human-mode prints, minus the sigil (the caller
/// already prefixed the line).
fn entry_header(verb: &str, node: &Node) -> String {
    let (count, noun) = match node {
        Node::Sequence(items) => (items.len(), "list entry"),
        Node::Mapping(pairs) => (pairs.len(), "map entry"),
        _ => (1, "value"),
    };
    let noun = if count == 1 { noun.to_string() } else { format!("{noun}s") };
    format!(" {count} {noun} {verb}:")
}

fn render_order_change(change: &OrderChange, sigils: &Sigils) -> String {
    let mut out = format!(" {} order changed\n", sigils.order_change);
    match change {
        OrderChange::Named { from, to } => {
            out.push_str(&prefixed_lines(&from.join(", "), '-'));
            out.push_str(&prefixed_lines(&to.join(", "), '+'));
        }
        OrderChange::Positional { from, to } => {
            let from_str = from.iter().map(dump).collect::<Vec<_>>().join(", ");
            let to_str = to.iter().map(dump).collect::<Vec<_>>().join(", ");
            out.push_str(&prefixed_lines(&from_str, '-'));
            out.push_str(&prefixed_lines(&to_str, '+'));
        }
    }
    out
}

fn prefixed_lines(text: &str, sigil: char) -> String {
    text.lines().map(|l| format!("{sigil}{l}\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompareOptions;
    use crate::diff::compare;
    use crate::input::{Document, InputFile};

    fn sample_report() -> Report {
        let from = Node::Mapping(vec![(Node::String("a".into()), Node::Int(1))]);
        let to = Node::Mapping(vec![(Node::String("a".into()), Node::Int(2))]);
        compare(
            &InputFile::new("a", vec![Document::new(from)]),
            &InputFile::new("b", vec![Document::new(to)]),
            &CompareOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn wraps_each_diff_in_a_fenced_block() {
        let report = sample_report();
        let mut opts = RenderOptions::default();
        opts.color = false;
        let rendered = render_diffsyntax(&report, DiffSyntaxFlavor::GitHub, &opts);
        assert!(rendered.contains("```diff"));
        assert!(rendered.contains("-1"));
        assert!(rendered.contains("+2"));
    }

    #[test]
    fn flavors_render_distinct_output() {
        let report = sample_report();
        let mut opts = RenderOptions::default();
        opts.color = false;
        let github = render_diffsyntax(&report, DiffSyntaxFlavor::GitHub, &opts);
        let gitlab = render_diffsyntax(&report, DiffSyntaxFlavor::GitLab, &opts);
        let gitea = render_diffsyntax(&report, DiffSyntaxFlavor::Gitea, &opts);
        assert_ne!(github, gitlab);
        assert_ne!(github, gitea);
        assert_ne!(gitlab, gitea);
        assert!(github.contains("## "));
        assert!(gitlab.contains("### "));
        assert!(gitea.contains("» "));
    }
}
