// Inline and block mutations
// Each operation rewrites the selection line (or the selection) and places a new selection

use regex::Regex;

use crate::buffer::{CursorEnd, EditorBuffer, Position, advance, byte_index, char_len};
use crate::registry::{FormatKind, FormatSpec};

/// The four mutations a toggle can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    InlineApply,
    InlineRemove,
    BlockApply,
    BlockRemove,
}

impl Operation {
    /// Remove when the format is already active at the cursor, apply otherwise
    pub fn select(kind: FormatKind, active: bool) -> Self {
        match (kind, active) {
            (FormatKind::Inline, false) => Operation::InlineApply,
            (FormatKind::Inline, true) => Operation::InlineRemove,
            (FormatKind::Block, false) => Operation::BlockApply,
            (FormatKind::Block, true) => Operation::BlockRemove,
        }
    }

    pub fn run<B: EditorBuffer + ?Sized>(self, buffer: &mut B, spec: &FormatSpec) {
        match self {
            Operation::InlineApply => inline_apply(buffer, spec),
            Operation::InlineRemove => inline_remove(buffer, spec),
            Operation::BlockApply => block_apply(buffer, spec),
            Operation::BlockRemove => block_remove(buffer, spec),
        }
        buffer.focus();
    }
}

/// A rewritten line together with the selection to place on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl LineEdit {
    /// Replace line `line` (previously `old`) and select the edit's range
    fn commit<B: EditorBuffer + ?Sized>(self, buffer: &mut B, line: usize, old: &str) {
        buffer.replace_range(
            &self.text,
            Position::new(line, 0),
            Position::new(line, char_len(old)),
        );
        buffer.set_selection(Position::new(line, self.start), Position::new(line, self.end));
    }
}

fn inline_apply<B: EditorBuffer + ?Sized>(buffer: &mut B, spec: &FormatSpec) {
    let start = buffer.cursor(CursorEnd::Start);
    let end = buffer.cursor(CursorEnd::End);

    let inner = if start == end {
        spec.placeholder().to_string()
    } else {
        buffer.selection_text()
    };

    buffer.replace_selection(&format!("{}{}{}", spec.before(), inner, spec.after()));

    let inner_start = Position::new(start.line, start.ch + char_len(spec.before()));
    buffer.set_selection(inner_start, advance(inner_start, &inner));
}

fn inline_remove<B: EditorBuffer + ?Sized>(buffer: &mut B, spec: &FormatSpec) {
    let start = buffer.cursor(CursorEnd::Start);
    let end = buffer.cursor(CursorEnd::End);
    let line = buffer.line(start.line);

    // Selections reaching into later lines are reduced to the start line
    let end_ch = if end.line == start.line { end.ch } else { char_len(&line) };

    let edit = match spec.capture_pattern() {
        Some(re) => unwrap_capture(&line, re, start.ch),
        None => unwrap_markers(&line, spec.before(), spec.after(), start.ch, end_ch),
    };

    match edit {
        Some(edit) => edit.commit(buffer, start.line, &line),
        None => tracing::debug!(
            command = %spec.key(),
            line = start.line,
            "no enclosing markers found, leaving line unchanged"
        ),
    }
}

fn block_apply<B: EditorBuffer + ?Sized>(buffer: &mut B, spec: &FormatSpec) {
    let start = buffer.cursor(CursorEnd::Start);
    let line = buffer.line(start.line);
    prefix_line(&line, spec).commit(buffer, start.line, &line);
}

fn block_remove<B: EditorBuffer + ?Sized>(buffer: &mut B, spec: &FormatSpec) {
    let start = buffer.cursor(CursorEnd::Start);
    let line = buffer.line(start.line);
    strip_line(&line, spec).commit(buffer, start.line, &line);
}

/// Replace a pattern match by its first capture group
/// Prefers the match under the cursor, falling back to the first match on the line
pub fn unwrap_capture(line: &str, re: &Regex, cursor: usize) -> Option<LineEdit> {
    let at = byte_index(line, cursor);
    let captures = re
        .captures_iter(line)
        .find(|caps| caps.get(0).is_some_and(|m| m.start() <= at && at <= m.end()))
        .or_else(|| re.captures(line))?;

    let whole = captures.get(0)?;
    let kept = captures.get(1).map_or("", |m| m.as_str());

    let prefix = &line[..whole.start()];
    let start = char_len(prefix);
    Some(LineEdit {
        text: format!("{}{}{}", prefix, kept, &line[whole.end()..]),
        start,
        end: start + char_len(kept),
    })
}

/// Delete the markers enclosing the selection and select the text between them
///
/// Symmetric markers such as `**` are paired up from the start of the line, and the
/// pair covering the selection wins, so a cursor right behind a closing marker never
/// pairs it with a later opening one. Distinct markers prefer a closing marker ending
/// at the selection start, then scan leftward for `before` and rightward for `after`.
/// Returns `None` when no such pair exists on the line.
pub fn unwrap_markers(
    line: &str,
    before: &str,
    after: &str,
    start: usize,
    end: usize,
) -> Option<LineEdit> {
    if before.is_empty() || after.is_empty() {
        return None;
    }

    let chars: Vec<char> = line.chars().collect();
    let before: Vec<char> = before.chars().collect();
    let after: Vec<char> = after.chars().collect();

    let (open, close) = if before == after {
        marker_pairs(&chars, &before)
            .into_iter()
            .find(|&(open, close)| open <= start && end <= close + after.len())?
    } else {
        closing_behind(&chars, &before, &after, start)
            .or_else(|| enclosing(&chars, &before, &after, start, end))?
    };

    let head: String = chars[..open].iter().collect();
    let inner: String = chars[open + before.len()..close].iter().collect();
    let tail: String = chars[close + after.len()..].iter().collect();

    Some(LineEdit {
        start: open,
        end: open + inner.chars().count(),
        text: format!("{head}{inner}{tail}"),
    })
}

fn matches_at(chars: &[char], pos: usize, marker: &[char]) -> bool {
    chars.get(pos..pos + marker.len()) == Some(marker)
}

/// Non-overlapping occurrences of `marker`, taken two at a time as (open, close)
fn marker_pairs(chars: &[char], marker: &[char]) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    let mut pos = 0;
    while pos + marker.len() <= chars.len() {
        if matches_at(chars, pos, marker) {
            found.push(pos);
            pos += marker.len();
        } else {
            pos += 1;
        }
    }
    found.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

/// A closing marker ending exactly at `start` and the nearest opening marker before it
fn closing_behind(
    chars: &[char],
    before: &[char],
    after: &[char],
    start: usize,
) -> Option<(usize, usize)> {
    let close = start.checked_sub(after.len())?;
    if !matches_at(chars, close, after) {
        return None;
    }
    let last_open = close.checked_sub(before.len())?;
    (0..=last_open)
        .rev()
        .find(|&open| matches_at(chars, open, before))
        .map(|open| (open, close))
}

/// Leftward scan for `before` from the selection start, then rightward for `after`
fn enclosing(
    chars: &[char],
    before: &[char],
    after: &[char],
    start: usize,
    end: usize,
) -> Option<(usize, usize)> {
    let scan_from = start.min(chars.len().saturating_sub(before.len()));
    (0..=scan_from)
        .rev()
        .filter(|&open| matches_at(chars, open, before))
        .find_map(|open| {
            let from = (open + before.len()).max(end.saturating_sub(after.len()));
            (from..=chars.len())
                .find(|&close| matches_at(chars, close, after))
                .map(|close| (open, close))
        })
}

/// Put a block marker in front of the line, or the placeholder if the line is empty
pub fn prefix_line(line: &str, spec: &FormatSpec) -> LineEdit {
    let content = if line.is_empty() { spec.placeholder() } else { line };
    let text = format!("{} {}", spec.before(), content);
    LineEdit {
        start: char_len(spec.before()) + 1,
        end: char_len(&text),
        text,
    }
}

/// Delete the first match of the format's detection pattern
pub fn strip_line(line: &str, spec: &FormatSpec) -> LineEdit {
    let text = match spec.pattern() {
        Some(re) => re.replace(line, "").into_owned(),
        None => line.to_string(),
    };
    LineEdit {
        start: 0,
        end: char_len(&text),
        text,
    }
}
