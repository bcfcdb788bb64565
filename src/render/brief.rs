//! The brief writer (§4.6): a single summary sentence instead of the full
//! per-Diff report — "`<n>` change[s] detected between `<from>` and
//! `<to>`" — followed by a blank line. Falls back to a two-line layout
//! when the one-line form would overflow the configured terminal width.

use crate::config::RenderOptions;
use crate::diff::Report;

use super::{bold_style, styled, Color};

pub fn render_brief(report: &Report, opts: &RenderOptions) -> String {
    let color = Color::from(opts);
    let n = report.diffs.len();
    let change_word = if n == 1 { "change" } else { "changes" };
    let one_line = format!("{n} {change_word} detected between {} and {}", report.from.location, report.to.location);

    let width = opts.terminal_width as usize;
    let body = if width > 0 && one_line.chars().count() > width {
        format!(
            "{n} {change_word} detected\nbetween {} and {}",
            report.from.location, report.to.location
        )
    } else {
        one_line
    };

    format!("{}\n\n", styled(color, bold_style(), &body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompareOptions;
    use crate::diff::compare;
    use crate::input::{Document, InputFile};
    use crate::node::Node;

    fn report_with_n_diffs(n: usize) -> Report {
        let from_pairs: Vec<(Node, Node)> = (0..n).map(|i| (Node::String(format!("k{i}")), Node::Int(1))).collect();
        let to_pairs: Vec<(Node, Node)> = (0..n).map(|i| (Node::String(format!("k{i}")), Node::Int(2))).collect();
        compare(
            &InputFile::new("a.yaml", vec![Document::new(Node::Mapping(from_pairs))]),
            &InputFile::new("b.yaml", vec![Document::new(Node::Mapping(to_pairs))]),
            &CompareOptions::default(),
        )
        .unwrap()
    }

    fn plain_opts() -> RenderOptions {
        let mut opts = RenderOptions::default();
        opts.color = false;
        opts
    }

    #[test]
    fn singular_change_is_not_pluralized() {
        let report = report_with_n_diffs(1);
        let rendered = render_brief(&report, &plain_opts());
        assert!(rendered.starts_with("1 change detected between a.yaml and b.yaml"));
    }

    #[test]
    fn multiple_changes_are_pluralized() {
        let report = report_with_n_diffs(3);
        let rendered = render_brief(&report, &plain_opts());
        assert!(rendered.starts_with("3 changes detected between a.yaml and b.yaml"));
    }

    #[test]
    fn ends_with_a_blank_line() {
        let report = report_with_n_diffs(1);
        let rendered = render_brief(&report, &plain_opts());
        assert!(rendered.ends_with("\n\n"));
    }

    #[test]
    fn switches_to_two_lines_when_narrow() {
        let report = report_with_n_diffs(1);
        let mut opts = plain_opts();
        opts.terminal_width = 10;
        let rendered = render_brief(&report, &opts);
        assert_eq!(rendered.lines().count(), 2);
    }
}
