//! Filter/transform operations on a `Report` (§4.5). Each operation
//! produces a new `Report`; the input is never mutated.

use regex::Regex;

use crate::diff::{Detail, Diff, Report};
use crate::node::Node;
use crate::path::Style;

impl Report {
    /// Keep Diffs whose path renders to one of `paths` (either style).
    pub fn filter(&self, paths: &[String]) -> Report {
        self.retaining(|diff| {
            let dot = diff.path.render(Style::Dot, None);
            let slash = diff.path.render(Style::Slash, None);
            paths.iter().any(|p| p == &dot || p == &slash)
        })
    }

    /// Drop Diffs whose path matches one of `paths`.
    pub fn exclude(&self, paths: &[String]) -> Report {
        self.retaining(|diff| {
            let dot = diff.path.render(Style::Dot, None);
            let slash = diff.path.render(Style::Slash, None);
            !paths.iter().any(|p| p == &dot || p == &slash)
        })
    }

    pub fn filter_regexp(&self, patterns: &[Regex]) -> Report {
        self.retaining(|diff| {
            let rendered = diff.path.render(Style::Slash, None);
            patterns.iter().any(|re| re.is_match(&rendered))
        })
    }

    /// Drops a Diff either when its own path matches, or when a listed
    /// sub-key inside an Addition/Removal mapping matches (used to exclude
    /// noisy sub-fields like `metadata.managedFields`).
    pub fn exclude_regexp(&self, patterns: &[Regex]) -> Report {
        let mut diffs = Vec::new();
        for diff in &self.diffs {
            let rendered = diff.path.render(Style::Slash, None);
            if patterns.iter().any(|re| re.is_match(&rendered)) {
                continue;
            }
            let filtered = strip_matching_subkeys(diff, patterns);
            if !filtered.details.is_empty() {
                diffs.push(filtered);
            }
        }
        Report { from: self.from.clone(), to: self.to.clone(), diffs }
    }

    /// Drop Diffs whose every detail is a Modification.
    pub fn ignore_value_changes(&self) -> Report {
        self.retaining(|diff| !diff.details.iter().all(|d| matches!(d, Detail::Modification(_, _))))
    }

    fn retaining(&self, keep: impl Fn(&Diff) -> bool) -> Report {
        Report {
            from: self.from.clone(),
            to: self.to.clone(),
            diffs: self.diffs.iter().filter(|d| keep(d)).cloned().collect(),
        }
    }

    /// All path strings present in this report, rendered in slash style;
    /// used by the `filter(R, all_paths(R)) == R` property.
    pub fn all_paths(&self) -> Vec<String> {
        self.diffs.iter().map(|d| d.path.render(Style::Slash, None)).collect()
    }
}

fn strip_matching_subkeys(diff: &Diff, patterns: &[Regex]) -> Diff {
    let rendered_path = diff.path.render(Style::Slash, None);
    let details = diff
        .details
        .iter()
        .map(|detail| strip_detail(detail, &rendered_path, patterns))
        .collect();
    Diff { path: diff.path.clone(), details }
}

fn strip_detail(detail: &Detail, base_path: &str, patterns: &[Regex]) -> Detail {
    match detail {
        Detail::Addition(node) => Detail::Addition(strip_node(node, base_path, patterns)),
        Detail::Removal(node) => Detail::Removal(strip_node(node, base_path, patterns)),
        other => other.clone(),
    }
}

fn strip_node(node: &Node, base_path: &str, patterns: &[Regex]) -> Node {
    match node {
        Node::Mapping(pairs) => Node::Mapping(
            pairs
                .iter()
                .filter(|(k, _)| {
                    let Some(name) = k.as_str() else { return true };
                    let candidate = format!("{base_path}/{name}");
                    !patterns.iter().any(|re| re.is_match(&candidate))
                })
                .cloned()
                .collect(),
        ),
        other => other.clone(),
    }
}
