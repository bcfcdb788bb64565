//! The CLI surface (§4.10, component J): a `bpaf`-derived argument parser
//! exposing a `between` comparison (the implicit default command) and a
//! `yaml`/`json` pass-through subcommand for inspecting a single file's
//! parsed form.
//!
//! §6 names `DYFF_STYLE`, `DYFF_IGNORE_ORDER_CHANGES`,
//! `DYFF_KUBERNETES_ENTITY_DETECTION`, `DYFF_MINOR_CHANGE_THRESHOLD`, and
//! `DYFF_MULTILINE_CONTEXT_LINES` as environment variables parameterizing
//! the equivalent `between` flags. `style`/`minor_change_threshold`/
//! `multiline_context_lines` read their environment variable as the
//! `bpaf` fallback used when the flag is absent from argv, so an explicit
//! flag always wins; the two boolean flags (`kubernetes`,
//! `ignore_order_changes`) OR the environment variable in, since a switch
//! has no "explicitly false" to lose to the environment.

use bpaf::Bpaf;

use crate::cli_error::ConfigError;
use crate::config::{CompareOptions, DiffSyntaxFlavor, RenderOptions};
use crate::identity::IdentityOptions;
use crate::path::Style;

fn env_flag_set(name: &'static str) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn style_env_fallback() -> Result<StyleArg, String> {
    match std::env::var("DYFF_STYLE") {
        Err(_) => Ok(StyleArg::Dot),
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidEnvValue { name: "DYFF_STYLE", value }.to_string()),
    }
}

fn minor_change_threshold_env_fallback() -> Result<f64, String> {
    match std::env::var("DYFF_MINOR_CHANGE_THRESHOLD") {
        Err(_) => Ok(0.1),
        Ok(value) => value.parse().map_err(|_| {
            ConfigError::InvalidEnvValue { name: "DYFF_MINOR_CHANGE_THRESHOLD", value }.to_string()
        }),
    }
}

fn multiline_context_lines_env_fallback() -> Result<usize, String> {
    match std::env::var("DYFF_MULTILINE_CONTEXT_LINES") {
        Err(_) => Ok(5),
        Ok(value) => value.parse().map_err(|_| {
            ConfigError::InvalidEnvValue { name: "DYFF_MULTILINE_CONTEXT_LINES", value }.to_string()
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleArg {
    Dot,
    Slash,
}

impl core::str::FromStr for StyleArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dot" => Ok(StyleArg::Dot),
            "slash" => Ok(StyleArg::Slash),
            other => Err(format!("unknown path style '{other}', expected: dot, slash")),
        }
    }
}

impl From<StyleArg> for Style {
    fn from(arg: StyleArg) -> Style {
        match arg {
            StyleArg::Dot => Style::Dot,
            StyleArg::Slash => Style::Slash,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffSyntaxArg {
    GitHub,
    GitLab,
    Gitea,
}

impl core::str::FromStr for DiffSyntaxArg {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(DiffSyntaxArg::GitHub),
            "gitlab" => Ok(DiffSyntaxArg::GitLab),
            "gitea" => Ok(DiffSyntaxArg::Gitea),
            other => Err(format!("unknown diff-syntax flavor '{other}', expected: github, gitlab, gitea")),
        }
    }
}

impl From<DiffSyntaxArg> for DiffSyntaxFlavor {
    fn from(arg: DiffSyntaxArg) -> DiffSyntaxFlavor {
        match arg {
            DiffSyntaxArg::GitHub => DiffSyntaxFlavor::GitHub,
            DiffSyntaxArg::GitLab => DiffSyntaxFlavor::GitLab,
            DiffSyntaxArg::Gitea => DiffSyntaxFlavor::Gitea,
        }
    }
}

#[derive(Debug, Clone, Bpaf)]
pub struct BetweenArgs {
    /// Treat apiVersion/kind/metadata.name as a document and list-entry identity.
    /// Also enabled by `DYFF_KUBERNETES_ENTITY_DETECTION`.
    #[bpaf(short('k'), long("kubernetes"))]
    pub kubernetes: bool,

    /// Extra field names to try before the non-standard-guess heuristic
    #[bpaf(long("additional-identifier"), argument("FIELD"))]
    pub additional_identifiers: Vec<String>,

    /// Suppress OrderChange details. Also enabled by `DYFF_IGNORE_ORDER_CHANGES`.
    #[bpaf(long("ignore-order-changes"))]
    pub ignore_order_changes: bool,

    /// Treat trim-equal string changes as no change
    #[bpaf(long("ignore-whitespace-changes"))]
    pub ignore_whitespace_changes: bool,

    /// Drop Diffs whose every detail is a plain value Modification
    #[bpaf(long("ignore-value-changes"))]
    pub ignore_value_changes: bool,

    /// Align mismatched document counts by Kubernetes identity instead of erroring
    #[bpaf(long("detect-kubernetes-renames"))]
    pub detect_renames: bool,

    /// Re-serialize string scalars that parse as JSON before comparing
    #[bpaf(long("format-strings-as-yaml"))]
    pub format_strings: bool,

    /// Path rendering style. Falls back to `DYFF_STYLE` when not passed.
    #[bpaf(long("style"), argument("dot|slash"), fallback_with(style_env_fallback))]
    pub style: StyleArg,

    /// Disable the side-by-side column layout even when it would fit
    #[bpaf(long("no-table"))]
    pub no_table: bool,

    /// Disable ANSI color output
    #[bpaf(long("no-color"))]
    pub no_color: bool,

    /// Print a one-sentence change count instead of the full report
    #[bpaf(long("brief"))]
    pub brief: bool,

    /// Emit a GitHub/GitLab/Gitea diff-syntax block per Diff
    #[bpaf(long("diff-syntax"), argument("github|gitlab|gitea"))]
    pub diff_syntax: Option<DiffSyntaxArg>,

    /// Minor-change Levenshtein-ratio threshold (§4.6.3 rule 4). Falls back to
    /// `DYFF_MINOR_CHANGE_THRESHOLD` when not passed.
    #[bpaf(long("minor-change-threshold"), argument("RATIO"), fallback_with(minor_change_threshold_env_fallback))]
    pub minor_change_threshold: f64,

    /// Lines of context kept around a multiline string change. Falls back to
    /// `DYFF_MULTILINE_CONTEXT_LINES` when not passed.
    #[bpaf(long("multiline-context-lines"), argument("N"), fallback_with(multiline_context_lines_env_fallback))]
    pub multiline_context_lines: usize,

    /// Exit 0 with no differences, 1 otherwise
    #[bpaf(long("set-exit-code"))]
    pub set_exit_code: bool,

    /// Enable debug logging regardless of RUST_LOG/DYFF_LOG
    #[bpaf(short('d'), long("debug"))]
    pub debug: bool,

    #[bpaf(positional("FROM"))]
    pub from: String,
    #[bpaf(positional("TO"))]
    pub to: String,
}

impl BetweenArgs {
    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            identity: IdentityOptions {
                additional_candidates: self.additional_identifiers.clone(),
                kubernetes: self.kubernetes || env_flag_set("DYFF_KUBERNETES_ENTITY_DETECTION"),
                ..IdentityOptions::default()
            },
            ignore_order_changes: self.ignore_order_changes || env_flag_set("DYFF_IGNORE_ORDER_CHANGES"),
            ignore_whitespace_changes: self.ignore_whitespace_changes,
            ignore_value_changes: self.ignore_value_changes,
            detect_renames: self.detect_renames,
            format_strings: self.format_strings,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            style: self.style.into(),
            terminal_width: crate::terminal_width(),
            no_table: self.no_table,
            show_banner: true,
            color: !self.no_color,
            classify: crate::classify::ClassifyOptions {
                minor_change_threshold: self.minor_change_threshold,
                ..crate::classify::ClassifyOptions::default()
            },
            show_document_idx: true,
            multiline_context_lines: self.multiline_context_lines,
            diff_syntax: self.diff_syntax.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Bpaf)]
pub struct PassthroughArgs {
    #[bpaf(positional("FILE"))]
    pub file: String,
}

#[derive(Debug, Clone, Bpaf)]
pub enum Command {
    /// Compare two YAML, JSON, or TOML documents
    #[bpaf(command("between"))]
    Between(#[bpaf(external(between_args))] BetweenArgs),

    /// Parse a file as YAML and print dyff's interpretation of it
    #[bpaf(command("yaml"))]
    Yaml(#[bpaf(external(passthrough_args))] PassthroughArgs),

    /// Parse a file as JSON and print dyff's interpretation of it
    #[bpaf(command("json"))]
    Json(#[bpaf(external(passthrough_args))] PassthroughArgs),
}

#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version, fallback_to_usage, generate(cli))]
/// Semantic diff for YAML, JSON, and TOML documents
pub struct Cli {
    #[bpaf(external(command))]
    pub command: Command,
}

/// Rewrites argv so a bare `dyff a.yaml b.yaml` is equivalent to
/// `dyff between a.yaml b.yaml` (§4.10: `between` is the implicit default).
pub fn normalize_args(args: Vec<String>) -> Vec<String> {
    const KNOWN: [&str; 7] = ["between", "yaml", "json", "-h", "--help", "-V", "--version"];
    match args.first() {
        Some(first) if KNOWN.contains(&first.as_str()) => args,
        _ => {
            let mut out = vec!["between".to_string()];
            out.extend(args);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn normalize_args_inserts_between_for_bare_invocation() {
        let normalized = normalize_args(vec!["a.yaml".to_string(), "b.yaml".to_string()]);
        assert_eq!(normalized[0], "between");
    }

    #[test]
    fn normalize_args_leaves_explicit_subcommand_alone() {
        let normalized = normalize_args(vec!["yaml".to_string(), "a.yaml".to_string()]);
        assert_eq!(normalized[0], "yaml");
    }

    // The env-fallback functions read real process environment variables, so
    // these tests serialize on a mutex to avoid racing each other under the
    // default parallel test runner.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<F: FnOnce()>(name: &str, value: &str, f: F) {
        let _guard = ENV_LOCK.lock().unwrap();
        // SAFETY: serialized by ENV_LOCK; no other thread in this process
        // observes the environment between the set and the restore below.
        unsafe { std::env::set_var(name, value) };
        f();
        unsafe { std::env::remove_var(name) };
    }

    #[test]
    fn style_env_fallback_defaults_to_dot_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe { std::env::remove_var("DYFF_STYLE"); }
        assert_eq!(style_env_fallback(), Ok(StyleArg::Dot));
    }

    #[test]
    fn style_env_fallback_reads_a_valid_value() {
        with_env("DYFF_STYLE", "slash", || {
            assert_eq!(style_env_fallback(), Ok(StyleArg::Slash));
        });
    }

    #[test]
    fn style_env_fallback_rejects_garbage() {
        with_env("DYFF_STYLE", "sideways", || {
            assert!(style_env_fallback().is_err());
        });
    }

    #[test]
    fn minor_change_threshold_env_fallback_defaults_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe { std::env::remove_var("DYFF_MINOR_CHANGE_THRESHOLD"); }
        assert_eq!(minor_change_threshold_env_fallback(), Ok(0.1));
    }

    #[test]
    fn minor_change_threshold_env_fallback_reads_a_valid_value() {
        with_env("DYFF_MINOR_CHANGE_THRESHOLD", "0.42", || {
            assert_eq!(minor_change_threshold_env_fallback(), Ok(0.42));
        });
    }

    #[test]
    fn minor_change_threshold_env_fallback_rejects_garbage() {
        with_env("DYFF_MINOR_CHANGE_THRESHOLD", "not-a-number", || {
            assert!(minor_change_threshold_env_fallback().is_err());
        });
    }

    #[test]
    fn multiline_context_lines_env_fallback_defaults_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe { std::env::remove_var("DYFF_MULTILINE_CONTEXT_LINES"); }
        assert_eq!(multiline_context_lines_env_fallback(), Ok(5));
    }

    #[test]
    fn multiline_context_lines_env_fallback_reads_a_valid_value() {
        with_env("DYFF_MULTILINE_CONTEXT_LINES", "12", || {
            assert_eq!(multiline_context_lines_env_fallback(), Ok(12));
        });
    }

    #[test]
    fn multiline_context_lines_env_fallback_rejects_garbage() {
        with_env("DYFF_MULTILINE_CONTEXT_LINES", "-3", || {
            assert!(multiline_context_lines_env_fallback().is_err());
        });
    }

    #[test]
    fn env_flag_set_recognizes_truthy_values_only() {
        with_env("DYFF_TEST_FLAG", "true", || assert!(env_flag_set("DYFF_TEST_FLAG")));
        with_env("DYFF_TEST_FLAG", "YES", || assert!(env_flag_set("DYFF_TEST_FLAG")));
        with_env("DYFF_TEST_FLAG", "0", || assert!(!env_flag_set("DYFF_TEST_FLAG")));
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe { std::env::remove_var("DYFF_TEST_FLAG"); }
        assert!(!env_flag_set("DYFF_TEST_FLAG"));
    }
}
