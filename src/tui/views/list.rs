//! Bug table.

use crate::browser::ViewController;
use crate::config::ColumnConfig;
use crate::model::BugRecord;
use crate::tui::app::{BrowserApp, FocusPanel};
use crate::tui::theme::colors;
use crate::tui::widgets::{self, truncate_str};
use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::{
        Block, Borders, Cell, HighlightSpacing, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, TableState,
    },
};

const HIGHLIGHT_SYMBOL: &str = "▶ ";
const COLUMN_SPACING: u16 = 1;
const CLASSIFICATION_TITLE: &str = "Classification";

/// What a click in the table area landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableHit {
    /// Header cell of a sortable column
    Header(usize),
    /// Row at a position of the visible list
    Row(usize),
}

fn constraints(columns: &[ColumnConfig]) -> Vec<Constraint> {
    columns
        .iter()
        .map(|c| Constraint::Length(c.width))
        .chain(std::iter::once(Constraint::Min(10)))
        .collect()
}

/// Inner area of the table without the borders and the highlight gutter.
fn cells_area(table: Rect) -> Rect {
    let inner = table.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    let gutter = HIGHLIGHT_SYMBOL.chars().count() as u16;
    Rect {
        x: inner.x + gutter,
        width: inner.width.saturating_sub(gutter),
        ..inner
    }
}

/// Comma-separated labels of the record's `true` flags.
fn classification_summary(ctrl: &ViewController, bug: &BugRecord) -> String {
    bug.active_flags()
        .map(|key| ctrl.taxonomy().label(key))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render_list(frame: &mut Frame, area: Rect, app: &mut BrowserApp) {
    app.layout.table = area;
    let scheme = colors();
    let ctrl = app.controller();

    if ctrl.visible_len() == 0 {
        let (message, hint) = if app.is_loading() {
            ("Loading bugs...", None)
        } else if ctrl.bugs().is_empty() {
            ("No bugs loaded", Some("Check --bugs or data.bugs in the config file"))
        } else {
            ("No bug matches the active filters", Some("Press [c] to clear filters or [m] to match any"))
        };
        widgets::render_empty_state(frame, area, message, hint);
        return;
    }

    let sort = ctrl.sort_spec();
    let header_cells = app
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let title = if i == app.sort_column {
                let arrow = if sort.reverse { "↓" } else { "↑" };
                format!("{} {arrow}", column.title)
            } else {
                column.title.clone()
            };
            let style = if i == app.sort_column {
                Style::default().fg(scheme.accent).bold()
            } else {
                Style::default().fg(scheme.primary).bold()
            };
            Cell::from(title).style(style)
        })
        .chain(std::iter::once(
            Cell::from(CLASSIFICATION_TITLE).style(Style::default().fg(scheme.primary).bold()),
        ));
    let header = Row::new(header_cells);

    let summary_width = cells_area(area)
        .width
        .saturating_sub(app.columns.iter().map(|c| c.width + COLUMN_SPACING).sum())
        as usize;
    let rows: Vec<Row> = ctrl
        .visible()
        .map(|bug| {
            let cells = app
                .columns
                .iter()
                .map(|column| {
                    let value = bug.field(column.field()).display();
                    Cell::from(truncate_str(&value, column.width as usize))
                })
                .chain(std::iter::once(
                    Cell::from(truncate_str(
                        &classification_summary(ctrl, bug),
                        summary_width.max(10),
                    ))
                    .style(Style::default().fg(scheme.text_muted)),
                ));
            Row::new(cells)
        })
        .collect();
    let row_count = rows.len();

    let focused = app.focus == FocusPanel::List;
    let border_color = if focused { scheme.border_focused } else { scheme.border };
    let title_style = if focused {
        Style::default().fg(scheme.border_focused).bold()
    } else {
        Style::default().fg(scheme.text_muted)
    };

    let table = Table::new(rows, constraints(&app.columns))
        .header(header)
        .flex(Flex::Start)
        .column_spacing(COLUMN_SPACING)
        .block(
            Block::default()
                .title(format!(" Bugs ({row_count} of {}) ", ctrl.bugs().len()))
                .title_style(title_style)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        )
        .row_highlight_style(
            Style::default()
                .bg(scheme.selection)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(HIGHLIGHT_SYMBOL)
        .highlight_spacing(HighlightSpacing::Always);

    let mut state = TableState::default()
        .with_offset(app.layout.table_offset)
        .with_selected(Some(app.list.selected));

    frame.render_stateful_widget(table, area, &mut state);

    // Save scroll offset for next frame (stable viewport)
    app.layout.table_offset = state.offset();

    if row_count > area.height.saturating_sub(3) as usize {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .thumb_style(Style::default().fg(scheme.accent))
            .track_style(Style::default().fg(scheme.muted))
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));
        let mut scrollbar_state = ScrollbarState::new(row_count).position(app.layout.table_offset);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// Map a click inside the last rendered table to a header or a row.
pub fn table_hit(app: &BrowserApp, column: u16, row: u16) -> Option<TableHit> {
    let cells = cells_area(app.layout.table);
    if row < cells.y || row >= cells.y + cells.height {
        return None;
    }

    if row == cells.y {
        if column < cells.x {
            return None;
        }
        let rects = Layout::horizontal(constraints(&app.columns))
            .flex(Flex::Start)
            .spacing(COLUMN_SPACING)
            .split(cells);
        return rects
            .iter()
            .take(app.columns.len())
            .position(|r| column >= r.x && column < r.x + r.width)
            .map(TableHit::Header);
    }

    let position = app.layout.table_offset + usize::from(row - cells.y - 1);
    (position < app.controller().visible_len()).then_some(TableHit::Row(position))
}
