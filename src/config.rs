//! Explicit configuration structs threaded through the core (§9: no
//! process-wide state). `CompareOptions` parameterizes the diff engine;
//! `RenderOptions` parameterizes the renderer.

use crate::classify::ClassifyOptions;
use crate::identity::IdentityOptions;
use crate::path::Style;

#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub identity: IdentityOptions,
    pub ignore_order_changes: bool,
    pub ignore_whitespace_changes: bool,
    pub ignore_value_changes: bool,
    /// §4.4.4: align mismatched document counts by Kubernetes identity
    /// tuple instead of erroring.
    pub detect_renames: bool,
    /// §4.4.5: re-serialize string scalars that parse as JSON with a
    /// canonical formatter before comparing.
    pub format_strings: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            identity: IdentityOptions::default(),
            ignore_order_changes: false,
            ignore_whitespace_changes: false,
            ignore_value_changes: false,
            detect_renames: false,
            format_strings: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSyntaxFlavor {
    GitHub,
    GitLab,
    Gitea,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub style: Style,
    pub terminal_width: u16,
    /// Disables side-by-side column layout (§4.6.2) even when it would fit.
    pub no_table: bool,
    pub show_banner: bool,
    pub color: bool,
    pub classify: ClassifyOptions,
    /// Appends ` (document #N)` to rendered paths when the file has more
    /// than one document.
    pub show_document_idx: bool,
    /// Lines of unchanged context kept around a multiline string change.
    pub multiline_context_lines: usize,
    pub diff_syntax: Option<DiffSyntaxFlavor>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            style: Style::Dot,
            terminal_width: 80,
            no_table: false,
            show_banner: false,
            color: true,
            classify: ClassifyOptions::default(),
            show_document_idx: true,
            multiline_context_lines: 5,
            diff_syntax: None,
        }
    }
}
