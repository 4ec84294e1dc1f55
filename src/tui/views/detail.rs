//! Bug detail view: classification, metrics and the highlighted patch.

use crate::browser::DetailState;
use crate::model::taxonomy::{REPAIR_ACTIONS, REPAIR_PATTERNS};
use crate::model::{BugRecord, Taxonomy};
use crate::tui::app::BrowserApp;
use crate::tui::theme::{colors, Styles};
use crate::tui::widgets::{self, diff::render_patch};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use serde_json::Value;

/// `label` lines for every active flag that `lookup` resolves.
fn labelled_flags<'a>(
    bug: &'a BugRecord,
    lookup: impl Fn(&'a str) -> Option<&'a str>,
) -> Vec<&'a str> {
    bug.active_flags().filter_map(lookup).collect()
}

fn section(lines: &mut Vec<Line<'static>>, title: &str, color: Color, items: &[&str]) {
    if items.is_empty() {
        return;
    }
    lines.push(Line::styled(title.to_string(), Style::default().fg(color).bold()));
    for item in items {
        lines.push(Line::from(vec![
            Span::styled("  • ", Styles::label()),
            Span::styled((*item).to_string(), Styles::text()),
        ]));
    }
}

/// Scalar fields, with nested objects flattened to `parent.child`.
fn metric_spans(bug: &BugRecord) -> Vec<Span<'static>> {
    let mut pairs = Vec::new();
    for (key, value) in &bug.fields {
        match value {
            Value::Bool(_) => {}
            Value::Object(map) => {
                for (child, value) in map {
                    if !value.is_object() && !value.is_array() {
                        pairs.push((format!("{key}.{child}"), value.clone()));
                    }
                }
            }
            Value::Array(_) | Value::Null => {}
            other => pairs.push((key.clone(), other.clone())),
        }
    }

    let mut spans = Vec::new();
    for (key, value) in pairs {
        if !spans.is_empty() {
            spans.push(Span::styled("  ", Style::default()));
        }
        let text = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        spans.push(Span::styled(format!("{key}: "), Styles::label()));
        spans.push(Span::styled(text, Styles::value()));
    }
    spans
}

fn info_lines(bug: &BugRecord, taxonomy: &Taxonomy) -> Vec<Line<'static>> {
    let scheme = colors();
    let mut lines = Vec::new();

    let metrics = metric_spans(bug);
    if !metrics.is_empty() {
        lines.push(Line::from(metrics));
        lines.push(Line::from(""));
    }

    let actions = labelled_flags(bug, |key| taxonomy.category_label(REPAIR_ACTIONS, key));
    let patterns = labelled_flags(bug, |key| taxonomy.category_label(REPAIR_PATTERNS, key));
    let tools = labelled_flags(bug, |key| taxonomy.repair_label(key));
    let unknown: Vec<&str> = bug
        .active_flags()
        .filter(|key| taxonomy.find(key).is_none())
        .collect();

    section(&mut lines, "Repair Actions", scheme.action, &actions);
    section(&mut lines, "Repair Patterns", scheme.pattern, &patterns);
    section(&mut lines, "Repaired by", scheme.runtime, &tools);
    section(&mut lines, "Other flags", scheme.text_muted, &unknown);

    if lines.is_empty() {
        lines.push(Line::styled("No classification", Styles::text_muted()));
    }
    lines
}

pub fn render_detail(frame: &mut Frame, area: Rect, app: &BrowserApp) {
    let ctrl = app.controller();
    let (DetailState::Open(position), Some(bug)) = (ctrl.detail(), ctrl.open_bug()) else {
        return;
    };
    let scheme = colors();

    let popup = widgets::centered_rect(90, 90, area);
    frame.render_widget(Clear, popup);

    let title = Line::from(vec![
        Span::styled(format!(" {} {} ", bug.project, bug.commit), Styles::header_title()),
        Span::styled(
            format!("({} of {}) ", position + 1, ctrl.visible_len()),
            Styles::text_muted(),
        ),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(scheme.border_focused));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let info = info_lines(bug, ctrl.taxonomy());
    let info_height = (info.len() as u16).min(inner.height / 2).max(1);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(info_height), Constraint::Min(3)])
        .split(inner);

    frame.render_widget(Paragraph::new(info).wrap(Wrap { trim: false }), chunks[0]);

    let (added, removed) = bug.patch_stats();
    let patch_title = Line::from(vec![
        Span::styled(" Patch ", Styles::section_title()),
        Span::styled(format!("+{added} "), Styles::added()),
        Span::styled(format!("-{removed} "), Styles::removed()),
    ]);
    let patch_block = Block::default()
        .title(patch_title)
        .borders(Borders::TOP)
        .border_style(Styles::border());

    if bug.patch.is_empty() {
        let empty = Paragraph::new(Line::styled("No patch available", Styles::text_muted()))
            .block(patch_block);
        frame.render_widget(empty, chunks[1]);
    } else {
        let patch = Paragraph::new(render_patch(&bug.patch))
            .block(patch_block)
            .scroll((app.patch_scroll, 0));
        frame.render_widget(patch, chunks[1]);
    }
}
