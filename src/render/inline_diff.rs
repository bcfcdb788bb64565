//! Character-level inline diffing for "minor" string changes (§4.6.3 rule
//! 4): highlights only the substrings that actually differ instead of
//! dumping both sides in full.

use similar::{ChangeTag, TextDiff};

/// One run of a side's text, tagged with whether it should be emphasized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePart {
    pub text: String,
    pub emphasized: bool,
}

/// Character-level diff between `left` and `right`. Returns
/// `(left_parts, right_parts)`: `left_parts` covers Delete + Equal runs,
/// `right_parts` covers Insert + Equal runs. Concatenating either side's
/// parts reconstructs the original string.
pub fn compute_inline_diff(left: &str, right: &str) -> (Vec<InlinePart>, Vec<InlinePart>) {
    let diff = TextDiff::from_chars(left, right);

    let mut left_parts = Vec::new();
    let mut right_parts = Vec::new();

    let mut current_left = String::new();
    let mut left_emphasized = false;
    let mut current_right = String::new();
    let mut right_emphasized = false;

    for change in diff.iter_all_changes() {
        let ch = change.value();
        if ch.is_empty() {
            continue;
        }
        match change.tag() {
            ChangeTag::Equal => {
                if !current_left.is_empty() && left_emphasized {
                    left_parts.push(InlinePart { text: std::mem::take(&mut current_left), emphasized: true });
                }
                if !current_right.is_empty() && right_emphasized {
                    right_parts.push(InlinePart { text: std::mem::take(&mut current_right), emphasized: true });
                }
                current_left.push_str(ch);
                left_emphasized = false;
                current_right.push_str(ch);
                right_emphasized = false;
            }
            ChangeTag::Delete => {
                if !current_left.is_empty() && !left_emphasized {
                    left_parts.push(InlinePart { text: std::mem::take(&mut current_left), emphasized: false });
                }
                current_left.push_str(ch);
                left_emphasized = true;
            }
            ChangeTag::Insert => {
                if !current_right.is_empty() && !right_emphasized {
                    right_parts.push(InlinePart { text: std::mem::take(&mut current_right), emphasized: false });
                }
                current_right.push_str(ch);
                right_emphasized = true;
            }
        }
    }

    if !current_left.is_empty() {
        left_parts.push(InlinePart { text: current_left, emphasized: left_emphasized });
    }
    if !current_right.is_empty() {
        right_parts.push(InlinePart { text: current_right, emphasized: right_emphasized });
    }

    (left_parts, right_parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_change_highlights_only_differing_parts() {
        let (left_parts, right_parts) = compute_inline_diff("v1.33.1", "v1.35.0");

        let left_emphasized: String = left_parts.iter().filter(|p| p.emphasized).map(|p| p.text.as_str()).collect();
        let right_emphasized: String = right_parts.iter().filter(|p| p.emphasized).map(|p| p.text.as_str()).collect();
        assert!(!left_emphasized.is_empty());
        assert!(!right_emphasized.is_empty());
        assert!(left_emphasized.len() < "v1.33.1".len());

        let left_reconstructed: String = left_parts.iter().map(|p| p.text.as_str()).collect();
        let right_reconstructed: String = right_parts.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(left_reconstructed, "v1.33.1");
        assert_eq!(right_reconstructed, "v1.35.0");
    }

    #[test]
    fn identical_strings_no_emphasis() {
        let (left_parts, right_parts) = compute_inline_diff("same", "same");
        assert!(left_parts.iter().all(|p| !p.emphasized));
        assert!(right_parts.iter().all(|p| !p.emphasized));
    }
}
