// Tab strip layout and overflow handling

/// Width of a collapse indicator such as " <-+3 ".
const INDICATOR_WIDTH: usize = 6;

/// A styled segment of the tab strip with its visual width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinePart {
    /// ANSI-styled text content
    pub part: String,
    /// Visual width in terminal columns
    pub len: usize,
    /// Visible-list position the segment selects (None for filler)
    pub position: Option<usize>,
}

impl LinePart {
    fn indicator(text: String, position: usize) -> Self {
        let len = text.chars().count();
        LinePart {
            part: text,
            len,
            position: Some(position),
        }
    }
}

/// Fit the tab segments into `max_width` columns.
///
/// When everything fits the segments are returned unchanged. Otherwise the
/// active tab is always kept and neighbours are added alternately left and
/// right while they fit; the tabs left out are summarised by `<-+N` and
/// `+N->` indicators that select the nearest hidden tab.
pub fn build_tab_line(parts: Vec<LinePart>, active: usize, max_width: usize) -> Vec<LinePart> {
    let total_width: usize = parts.iter().map(|p| p.len).sum();
    if parts.is_empty() || total_width <= max_width {
        return parts;
    }

    let active = active.min(parts.len() - 1);
    let available = max_width.saturating_sub(INDICATOR_WIDTH * 2);

    // Inclusive window of shown tabs
    let (mut first, mut last) = (active, active);
    let mut used = parts[active].len;
    let (mut grow_left, mut grow_right) = (true, true);

    while grow_left || grow_right {
        if grow_left {
            match first.checked_sub(1) {
                Some(prev) if used + parts[prev].len <= available => {
                    used += parts[prev].len;
                    first = prev;
                }
                _ => grow_left = false,
            }
        }
        if grow_right {
            let next = last + 1;
            if next < parts.len() && used + parts[next].len <= available {
                used += parts[next].len;
                last = next;
            } else {
                grow_right = false;
            }
        }
    }

    let hidden_left = first;
    let hidden_right = parts.len() - 1 - last;

    let mut line = Vec::with_capacity(last - first + 3);
    if hidden_left > 0 {
        line.push(LinePart::indicator(format!(" <-+{} ", hidden_left), first - 1));
    }
    line.extend(parts.into_iter().skip(first).take(last - first + 1));
    if hidden_right > 0 {
        line.push(LinePart::indicator(format!(" +{}-> ", hidden_right), last + 1));
    }

    line
}

/// Concatenate the segments, padding with spaces up to `width` columns.
pub fn render_line(parts: &[LinePart], width: usize) -> String {
    let mut output: String = parts.iter().map(|p| p.part.as_str()).collect();
    let used: usize = parts.iter().map(|p| p.len).sum();
    if used < width {
        output.push_str(&" ".repeat(width - used));
    }
    output
}
