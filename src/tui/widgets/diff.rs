//! Patch highlighter.
//!
//! Turns unified diff text into styled terminal lines with an old/new line
//! number gutter. Line numbers come from the `@@ -a,b +c,d @@` hunk headers;
//! lines outside any hunk get an empty gutter.

use crate::tui::theme::colors;
use ratatui::prelude::*;

/// Kind of one line of a unified diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchLineKind {
    /// `diff --git`, `index`, `---` and `+++` lines
    FileHeader,
    /// `@@ ... @@`
    HunkHeader,
    Addition,
    Deletion,
    Context,
}

/// One classified diff line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchLine<'a> {
    pub kind: PatchLineKind,
    /// Line number in the old file
    pub old: Option<usize>,
    /// Line number in the new file
    pub new: Option<usize>,
    pub text: &'a str,
}

/// Start and length of one side of a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HunkRange {
    start: usize,
    len: usize,
}

impl HunkRange {
    /// `12,7` or `12` (length 1).
    fn parse(range: &str) -> Option<Self> {
        let mut parts = range.splitn(2, ',');
        let start = parts.next()?.parse().ok()?;
        let len = match parts.next() {
            Some(len) => len.parse().ok()?,
            None => 1,
        };
        Some(Self { start, len })
    }
}

/// Parse `@@ -12,7 +12,9 @@` into its old and new ranges.
fn hunk_ranges(line: &str) -> Option<(HunkRange, HunkRange)> {
    let mut parts = line.split_whitespace().skip(1);
    let old = HunkRange::parse(parts.next()?.strip_prefix('-')?)?;
    let new = HunkRange::parse(parts.next()?.strip_prefix('+')?)?;
    Some((old, new))
}

fn is_file_header(line: &str) -> bool {
    line.starts_with("diff ")
        || line.starts_with("index ")
        || line.starts_with("--- ")
        || line.starts_with("+++ ")
}

/// Classify every line of `patch`.
///
/// Inside a hunk the header's line counts decide where it ends, so a removed
/// line that itself starts with `--` is still a deletion.
pub fn parse_patch(patch: &str) -> Vec<PatchLine<'_>> {
    let mut old_line = 0;
    let mut new_line = 0;
    let mut old_left = 0;
    let mut new_left = 0;
    let mut lines = Vec::new();

    for text in patch.lines() {
        let in_hunk = old_left > 0 || new_left > 0;
        let (kind, old, new) = if text.starts_with("@@") {
            if let Some((old, new)) = hunk_ranges(text) {
                (old_line, old_left) = (old.start, old.len);
                (new_line, new_left) = (new.start, new.len);
            }
            (PatchLineKind::HunkHeader, None, None)
        } else if !in_hunk && is_file_header(text) {
            (PatchLineKind::FileHeader, None, None)
        } else if text.starts_with('\\') {
            // "\ No newline at end of file"
            (PatchLineKind::Context, None, None)
        } else if text.starts_with('+') {
            let new = in_hunk.then_some(new_line);
            new_left = new_left.saturating_sub(1);
            new_line += 1;
            (PatchLineKind::Addition, None, new)
        } else if text.starts_with('-') {
            let old = in_hunk.then_some(old_line);
            old_left = old_left.saturating_sub(1);
            old_line += 1;
            (PatchLineKind::Deletion, old, None)
        } else {
            let numbers = (in_hunk.then_some(old_line), in_hunk.then_some(new_line));
            old_left = old_left.saturating_sub(1);
            new_left = new_left.saturating_sub(1);
            old_line += 1;
            new_line += 1;
            (PatchLineKind::Context, numbers.0, numbers.1)
        };
        lines.push(PatchLine {
            kind,
            old,
            new,
            text,
        });
    }
    lines
}

fn gutter(number: Option<usize>) -> String {
    number.map_or_else(|| "     ".to_string(), |n| format!("{n:>5}"))
}

/// Styled lines for `patch`, ready for a `Paragraph`.
pub fn render_patch(patch: &str) -> Vec<Line<'static>> {
    let scheme = colors();
    let gutter_style = Style::default().fg(scheme.muted);

    parse_patch(patch)
        .into_iter()
        .map(|line| {
            let body = match line.kind {
                PatchLineKind::FileHeader => {
                    Style::default().fg(scheme.file_header).bold()
                }
                PatchLineKind::HunkHeader => Style::default().fg(scheme.hunk),
                PatchLineKind::Addition => {
                    Style::default().fg(scheme.added).bg(scheme.added_bg)
                }
                PatchLineKind::Deletion => {
                    Style::default().fg(scheme.removed).bg(scheme.removed_bg)
                }
                PatchLineKind::Context => Style::default().fg(scheme.text),
            };
            let text = line.text.replace('\t', "    ");
            match line.kind {
                PatchLineKind::FileHeader | PatchLineKind::HunkHeader => {
                    Line::from(Span::styled(text, body))
                }
                _ => Line::from(vec![
                    Span::styled(gutter(line.old), gutter_style),
                    Span::styled(format!("{} │ ", gutter(line.new)), gutter_style),
                    Span::styled(text, body),
                ]),
            }
        })
        .collect()
}
