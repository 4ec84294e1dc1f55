//! Terminal lifecycle and top-level rendering for the `BrowserApp`.

use super::app::{BrowserApp, FocusPanel};
use super::events::{handle_key_event, handle_mouse_event, Event, EventHandler};
use super::viewmodel::{OverlayKind, StatusLevel};
use super::views;
use crate::config::DataConfig;
use crate::loader;
use crate::tui::constants::SIDEBAR_WIDTH;
use crate::tui::theme::{
    colors, count_badge, filter_badge, render_footer_hints, set_theme, FooterHints, Styles, Theme,
};
use crate::tui::widgets::{self, check_terminal_size, render_size_warning};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::Paragraph};
use std::io::{self, stdout};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Run the browser TUI until the user quits.
///
/// With `data`, both documents are loaded on background threads and applied
/// as they arrive; without it, the app is expected to hold its data already.
pub fn run_browser_tui(app: &mut BrowserApp, data: Option<&DataConfig>) -> io::Result<()> {
    set_theme(Theme::from_name(app.theme));

    let events = EventHandler::default();
    if let Some(data) = data {
        app.expect_loads();
        loader::spawn_loads(
            data.bugs_source(),
            data.classification_source(),
            &data.load_options(),
            &events.sender(),
        );
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    if app.mouse_enabled {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    } else {
        execute!(stdout, EnterAlternateScreen)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app, &events);

    // Restore terminal
    disable_raw_mode()?;
    if app.mouse_enabled {
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
    } else {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut BrowserApp,
    events: &EventHandler,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            Event::Key(key) => handle_key_event(app, key),
            Event::Mouse(mouse) => handle_mouse_event(app, mouse),
            Event::Resize(_, _) => {}
            Event::Tick => {
                app.tick += 1;
                app.status.expire();
            }
            Event::Loaded(load) => app.handle_load(load),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Main render function.
pub(crate) fn render(frame: &mut Frame, app: &mut BrowserApp) {
    let area = frame.area();

    if check_terminal_size(area.width, area.height).is_err() {
        render_size_warning(frame, area);
        return;
    }

    // Header, content, status bar, footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);
    views::render_filters(frame, body[0], app);
    views::render_list(frame, body[1], app);

    render_status_bar(frame, chunks[2], app);
    render_footer(frame, chunks[3], app);

    if app.controller().detail().is_open() {
        views::render_detail(frame, chunks[1], app);
    }

    match app.overlays.current() {
        Some(OverlayKind::Help) => render_help_overlay(frame, area),
        Some(OverlayKind::Welcome) => render_welcome_overlay(frame, area),
        None => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &BrowserApp) {
    let scheme = colors();
    let ctrl = app.controller();

    let mut spans = vec![
        Span::styled(env!("CARGO_PKG_NAME"), Styles::header_title()),
        Span::styled(" │ ", Style::default().fg(scheme.muted)),
        Span::styled(ctrl.route().to_string(), Style::default().fg(scheme.text)),
        Span::styled(" │ ", Style::default().fg(scheme.muted)),
    ];
    spans.extend(filter_badge("Sort", &ctrl.sort_spec().describe()));
    spans.push(Span::raw(" "));
    spans.extend(filter_badge("Match", ctrl.match_mode().as_str()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &BrowserApp) {
    let scheme = colors();
    let ctrl = app.controller();

    let mut spans = vec![
        Span::styled(" Bugs: ", Styles::text_muted()),
        Span::styled(
            ctrl.visible_len().to_string(),
            Style::default().fg(scheme.primary).bold(),
        ),
        Span::styled(format!(" of {}", ctrl.bugs().len()), Styles::text_muted()),
        Span::styled(" │ ", Style::default().fg(scheme.muted)),
        Span::styled("Filters: ", Styles::text_muted()),
        count_badge(ctrl.filters().active_count(), scheme.accent),
    ];

    if app.is_loading() {
        let frame_idx = (app.tick as usize) % SPINNER.len();
        spans.push(Span::styled(" │ ", Style::default().fg(scheme.muted)));
        spans.push(Span::styled(
            format!("{} loading", SPINNER[frame_idx]),
            Style::default().fg(scheme.primary),
        ));
    }

    if ctrl.can_go_back() {
        spans.push(Span::styled(" │ ", Style::default().fg(scheme.muted)));
        spans.push(Span::styled("[b] back", Style::default().fg(scheme.accent)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Styles::status_bar()),
        area,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, app: &BrowserApp) {
    if let Some(msg) = app.status.peek() {
        let (symbol, color) = match app.status.level() {
            StatusLevel::Info => ("ℹ ", colors().accent),
            StatusLevel::Error => ("✗ ", colors().error),
        };
        let status_line = Line::from(vec![
            Span::styled(symbol, Style::default().fg(color)),
            Span::styled(msg.to_string(), Style::default().fg(color).bold()),
        ]);
        frame.render_widget(
            Paragraph::new(status_line).alignment(Alignment::Center),
            area,
        );
        return;
    }

    let hints = if app.controller().detail().is_open() {
        FooterHints::detail()
    } else if app.focus == FocusPanel::Filters {
        FooterHints::filters()
    } else {
        FooterHints::list()
    };
    let footer = Paragraph::new(Line::from(render_footer_hints(&hints)))
        .alignment(Alignment::Center)
        .style(Styles::text_muted());
    frame.render_widget(footer, area);
}

fn key_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<15}"), Styles::shortcut_key()),
        Span::styled(description.to_string(), Styles::text()),
    ])
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let heading = |text: &str| Line::styled(text.to_string(), Styles::section_title());
    let lines = vec![
        heading("Bug list"),
        key_line("↑/↓ or j/k", "Move the cursor"),
        key_line("PgUp/PgDown", "Move by a page"),
        key_line("g/G", "First/last bug"),
        key_line("Enter", "Open the selected bug"),
        key_line("s", "Sort by the next column"),
        key_line("r", "Reverse the current sort"),
        key_line("Tab", "Switch between list and filters"),
        Line::from(""),
        heading("Filters"),
        key_line("Space/Enter", "Toggle the filter under the cursor"),
        key_line("m", "Match all / any active filter"),
        key_line("c", "Clear all filters"),
        Line::from(""),
        heading("Bug detail"),
        key_line("→/l", "Next bug"),
        key_line("←/h", "Previous bug"),
        key_line("↑/↓ or j/k", "Scroll the patch"),
        key_line("Esc/q", "Close"),
        Line::from(""),
        heading("Anywhere"),
        key_line("b/Backspace", "Back to the previous view"),
        key_line("T", "Cycle theme"),
        key_line("?", "Toggle this help"),
        key_line("q / Ctrl+C", "Quit"),
    ];
    widgets::render_popup(frame, area, "Help", lines, (60, 90), colors().accent);
}

fn render_welcome_overlay(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled(
            "Welcome to the defects browser",
            Styles::header_title(),
        ),
        Line::from(""),
        Line::styled(
            "Browse a benchmark of real bug fixes: filter them by repair action, \
             repair pattern or the tools that repaired them, sort the list by any \
             column and open a bug to read its classification and patch.",
            Styles::text(),
        ),
        Line::from(""),
        Line::styled("Press any key to start, ? for help.", Styles::text_muted()),
    ];
    widgets::render_popup(frame, area, "Defects", lines, (60, 40), colors().primary);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::loader::LoadEvent;
    use crate::model::{BugRecord, Label, Taxonomy};
    use ratatui::backend::TestBackend;

    fn app() -> BrowserApp {
        let mut config = AppConfig::default();
        config.browse.show_welcome = false;
        let mut app = BrowserApp::new(&config);

        let mut tax = Taxonomy::new();
        tax.insert("Repair Actions", "If", "ifAdd", Label::new("If addition"));
        app.handle_load(LoadEvent::Taxonomy(Ok(tax)));
        app.handle_load(LoadEvent::Bugs(Ok(vec![
            BugRecord::new("Closure", "12")
                .with_field("ifAdd", true)
                .with_patch("--- a/F.java\n+++ b/F.java\n@@ -1,1 +1,1 @@\n-old\n+new\n"),
            BugRecord::new("Chart", "4"),
        ])));
        app.status.clear();
        app
    }

    fn screen(app: &mut BrowserApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).expect("terminal");
        terminal.draw(|frame| render(frame, app)).expect("draw");
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_list_screen() {
        let mut app = app();
        let text = screen(&mut app);
        assert!(text.contains("Bugs (2 of 2)"));
        assert!(text.contains("Chart"));
        assert!(text.contains("Closure"));
        assert!(text.contains("If addition"));
        assert!(text.contains("[Enter]open"));
        assert!(app.layout.table.width > 0);
    }

    #[test]
    fn test_detail_screen_shows_patch() {
        let mut app = app();
        app.list.selected = 1;
        app.open_selected();
        let text = screen(&mut app);
        assert!(text.contains("Closure 12"));
        assert!(text.contains("(2 of 2)"));
        assert!(text.contains("Patch +1 -1"));
        assert!(text.contains("+new"));
    }

    #[test]
    fn test_help_and_small_terminal() {
        let mut app = app();
        app.overlays.toggle_help();
        assert!(screen(&mut app).contains("Toggle the filter under the cursor"));

        let mut terminal = Terminal::new(TestBackend::new(40, 10)).expect("terminal");
        terminal.draw(|frame| render(frame, &mut app)).expect("draw");
        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Terminal too small"));
    }
}
