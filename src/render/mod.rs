//! The report renderer (§4.6, component F). Three writers share this
//! module's helpers: `human` (the default terminal report), `brief` (a
//! one-sentence change count), and `diffsyntax` (GitHub/GitLab/Gitea-
//! flavored diff blocks). `table` supplies the side-by-side column
//! layout human uses for short Addition/Removal pairs, and
//! `inline_diff` the character-level highlighting human uses for minor
//! string changes.

mod brief;
mod diffsyntax;
mod dump;
mod human;
mod inline_diff;
mod table;

pub use brief::render_brief;
pub use diffsyntax::render_diffsyntax;
pub use dump::dump as dump_node;
pub use human::render_human;

use owo_colors::{OwoColorize, Style};

use crate::config::RenderOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Enabled,
    Disabled,
}

impl Color {
    fn from(opts: &RenderOptions) -> Color {
        if opts.color {
            Color::Enabled
        } else {
            Color::Disabled
        }
    }
}

pub fn render(report: &crate::diff::Report, opts: &RenderOptions) -> String {
    if let Some(flavor) = opts.diff_syntax {
        return render_diffsyntax(report, flavor, opts);
    }
    render_human(report, opts)
}

fn styled(color: Color, style: Style, s: &str) -> String {
    match color {
        Color::Enabled => s.style(style).to_string(),
        Color::Disabled => s.to_string(),
    }
}

fn removal_style() -> Style {
    Style::new().red()
}

fn addition_style() -> Style {
    Style::new().green()
}

fn modification_style() -> Style {
    Style::new().yellow()
}

fn order_style() -> Style {
    Style::new().cyan()
}

fn dim_style() -> Style {
    Style::new().dimmed()
}

fn emphasis_removal_style() -> Style {
    Style::new().red().underline()
}

fn emphasis_addition_style() -> Style {
    Style::new().green().underline()
}

fn bold_style() -> Style {
    Style::new().bold()
}

/// The `dyff between` banner (§4.6.1): printed once above the first diff
/// when `RenderOptions::show_banner` is set.
fn banner(from_location: &str, to_location: &str, diff_count: usize, color: Color) -> String {
    let headline = if diff_count == 0 {
        "no differences found".to_string()
    } else if diff_count == 1 {
        "found 1 difference".to_string()
    } else {
        format!("found {diff_count} differences")
    };
    let line = format!("{from_location}  <->  {to_location}\n{headline}");
    styled(color, bold_style(), &line)
}
