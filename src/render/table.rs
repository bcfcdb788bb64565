//! Side-by-side column layout (§4.6.2) for a Removal/Addition pair that
//! both fit within half the terminal width. Falls back to a stacked
//! rendering (the caller's responsibility) when they don't.

use ansi_width::ansi_width;

use super::{addition_style, removal_style, styled, Color};

/// Renders `removed` and `added` (already-dumped YAML-ish text, one
/// logical value per side) as two columns separated by a gutter. Returns
/// `None` when either side has a line wider than the available half-width,
/// signalling the caller to fall back to the stacked rendering.
pub fn render_side_by_side(removed: &str, added: &str, terminal_width: u16, color: Color) -> Option<String> {
    const GUTTER: usize = 3;
    let half_width = (terminal_width as usize).saturating_sub(GUTTER) / 2;
    if half_width < 8 {
        return None;
    }

    let left_lines: Vec<&str> = removed.lines().collect();
    let right_lines: Vec<&str> = added.lines().collect();
    if left_lines.iter().any(|l| ansi_width(l) > half_width) || right_lines.iter().any(|l| ansi_width(l) > half_width) {
        return None;
    }

    let rows = left_lines.len().max(right_lines.len());
    let mut out = String::new();
    for row in 0..rows {
        let left = left_lines.get(row).copied().unwrap_or("");
        let right = right_lines.get(row).copied().unwrap_or("");
        let left_padded = pad(left, half_width);
        let left_colored = styled(color, removal_style(), &left_padded);
        let right_colored = styled(color, addition_style(), right);
        out.push_str(&format!("{left_colored} | {right_colored}\n"));
    }
    Some(out.trim_end_matches('\n').to_string())
}

fn pad(s: &str, width: usize) -> String {
    let visible = ansi_width(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - visible))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_lines_produce_two_columns() {
        let rendered = render_side_by_side("name: a", "name: b", 80, Color::Disabled).unwrap();
        assert_eq!(rendered.lines().count(), 1);
        assert!(rendered.starts_with("name: a"));
        assert!(rendered.ends_with("name: b"));
        assert!(rendered.contains(" | "));
    }

    #[test]
    fn wide_content_falls_back_to_none() {
        let wide = "x".repeat(200);
        assert!(render_side_by_side(&wide, "short", 80, Color::Disabled).is_none());
    }
}
