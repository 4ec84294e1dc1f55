//! Filter sidebar: every taxonomy key grouped by category and group, with
//! its active state and the number of loaded bugs carrying it.

use crate::model::TaxonomyEntry;
use crate::tui::app::{BrowserApp, FocusPanel};
use crate::tui::theme::{colors, Styles};
use crate::tui::widgets::{self, truncate_str};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// One line of the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SidebarRow<'a> {
    Category(&'a str),
    Group(&'a str),
    /// Index into the taxonomy entries
    Entry(usize),
}

fn sidebar_rows<'a>(entries: &[TaxonomyEntry<'a>]) -> Vec<SidebarRow<'a>> {
    let mut rows = Vec::new();
    let mut last: Option<(&str, &str)> = None;
    for (index, entry) in entries.iter().enumerate() {
        if last.map(|(c, _)| c) != Some(entry.category) {
            rows.push(SidebarRow::Category(entry.category));
        }
        if last != Some((entry.category, entry.group)) {
            rows.push(SidebarRow::Group(entry.group));
        }
        rows.push(SidebarRow::Entry(index));
        last = Some((entry.category, entry.group));
    }
    rows
}

/// First row to draw so that `cursor_row` stays inside `height` rows.
fn scroll_offset(previous: usize, cursor_row: usize, height: usize) -> usize {
    if height == 0 {
        0
    } else if cursor_row < previous {
        cursor_row
    } else if cursor_row >= previous + height {
        cursor_row + 1 - height
    } else {
        previous
    }
}

pub fn render_filters(frame: &mut Frame, area: Rect, app: &mut BrowserApp) {
    app.layout.sidebar = area;
    let scheme = colors();
    let ctrl = app.controller();
    let focused = app.focus == FocusPanel::Filters;

    let entries = app.filter_entries();
    if entries.is_empty() {
        let message = if app.pending.taxonomy {
            "Loading classification..."
        } else {
            "No classification loaded"
        };
        widgets::render_empty_state(frame, area, message, None);
        return;
    }

    let rows = sidebar_rows(&entries);
    let cursor = app.filter_cursor.selected;
    let cursor_row = rows
        .iter()
        .position(|row| *row == SidebarRow::Entry(cursor))
        .unwrap_or(0);
    let height = area.height.saturating_sub(2) as usize;
    let offset = scroll_offset(app.layout.sidebar_offset, cursor_row, height);
    let width = area.width.saturating_sub(2) as usize;

    let lines: Vec<Line> = rows
        .iter()
        .skip(offset)
        .take(height)
        .map(|row| match *row {
            SidebarRow::Category(name) => Line::styled(
                truncate_str(name, width),
                Style::default().fg(scheme.category_color(name)).bold(),
            ),
            SidebarRow::Group(name) => Line::styled(
                format!(" {}", truncate_str(name, width.saturating_sub(1))),
                Styles::label(),
            ),
            SidebarRow::Entry(index) => {
                let entry = &entries[index];
                let active = ctrl.filters().is_active(entry.key);
                let count = ctrl.count_bugs(entry.key);
                let check = if active { "[x]" } else { "[ ]" };
                let suffix = format!(" {count}");
                let label_width = width.saturating_sub(6 + suffix.len());
                let mut style = if active {
                    Style::default().fg(scheme.accent).bold()
                } else {
                    Styles::text()
                };
                if focused && index == cursor {
                    style = style.bg(scheme.selection);
                }
                Line::from(vec![
                    Span::styled(format!("  {check} "), style),
                    Span::styled(
                        format!(
                            "{:<label_width$}",
                            truncate_str(entry.label.display(), label_width)
                        ),
                        style,
                    ),
                    Span::styled(suffix, Style::default().fg(scheme.text_muted)),
                ])
            }
        })
        .collect();

    let border_color = if focused { scheme.border_focused } else { scheme.border };
    let title = format!(
        " Filters ({} active, match {}) ",
        ctrl.filters().active_count(),
        ctrl.match_mode()
    );
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .title_style(Style::default().fg(border_color).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(paragraph, area);

    app.layout.sidebar_offset = offset;
}

/// Taxonomy entry index under a click at `row`, if it hit a key line.
pub fn sidebar_hit(app: &BrowserApp, row: u16) -> Option<usize> {
    let top = app.layout.sidebar.y + 1;
    if row < top {
        return None;
    }
    let entries = app.filter_entries();
    let rows = sidebar_rows(&entries);
    match rows.get(app.layout.sidebar_offset + usize::from(row - top))? {
        SidebarRow::Entry(index) => Some(*index),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::loader::LoadEvent;
    use crate::model::{Label, Taxonomy};

    fn taxonomy() -> Taxonomy {
        let mut tax = Taxonomy::new();
        tax.insert("Repair Actions", "If", "ifAdd", Label::new("If addition"));
        tax.insert("Repair Actions", "If", "ifRem", Label::new("If removal"));
        tax.insert("Repair Actions", "Loop", "loopAdd", Label::new("Loop addition"));
        tax.insert("Repair Patterns", "Wrap", "wrapsIf", Label::new("Wraps-with if"));
        tax
    }

    #[test]
    fn test_rows_interleave_headings() {
        let tax = taxonomy();
        let entries: Vec<_> = tax.entries().collect();
        let rows = sidebar_rows(&entries);
        assert_eq!(
            rows,
            [
                SidebarRow::Category("Repair Actions"),
                SidebarRow::Group("If"),
                SidebarRow::Entry(0),
                SidebarRow::Entry(1),
                SidebarRow::Group("Loop"),
                SidebarRow::Entry(2),
                SidebarRow::Category("Repair Patterns"),
                SidebarRow::Group("Wrap"),
                SidebarRow::Entry(3),
            ]
        );
    }

    #[test]
    fn test_scroll_offset_keeps_cursor_visible() {
        assert_eq!(scroll_offset(0, 3, 10), 0);
        assert_eq!(scroll_offset(0, 12, 10), 3);
        assert_eq!(scroll_offset(5, 2, 10), 2);
        assert_eq!(scroll_offset(4, 0, 0), 0);
    }

    #[test]
    fn test_click_on_heading_hits_nothing() {
        let mut app = BrowserApp::new(&AppConfig::default());
        app.handle_load(LoadEvent::Taxonomy(Ok(taxonomy())));
        app.layout.sidebar = Rect::new(0, 5, 30, 20);

        assert_eq!(sidebar_hit(&app, 5), None);
        assert_eq!(sidebar_hit(&app, 6), None);
        assert_eq!(sidebar_hit(&app, 8), Some(0));
        assert_eq!(sidebar_hit(&app, 9), Some(1));
        assert_eq!(sidebar_hit(&app, 14), Some(3));
        assert_eq!(sidebar_hit(&app, 15), None);
    }
}
