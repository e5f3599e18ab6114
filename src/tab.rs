// Terminal rendering of tab labels

use ansi_term::Style;
use unicode_width::UnicodeWidthStr;

use crate::line::LinePart;

/// Render one tab label as a padded segment; the active tab is highlighted.
pub fn render_tab(label: &str, position: usize, is_active: bool) -> LinePart {
    let tab_text = format!(" {} ", label);
    let len = UnicodeWidthStr::width(tab_text.as_str());

    let style = if is_active {
        Style::new().bold().reverse()
    } else {
        Style::new()
    };

    LinePart {
        part: style.paint(tab_text).to_string(),
        len,
        position: Some(position),
    }
}

pub fn render_tabs(labels: &[&str], active: usize) -> Vec<LinePart> {
    labels
        .iter()
        .enumerate()
        .map(|(position, label)| render_tab(label, position, position == active))
        .collect()
}
