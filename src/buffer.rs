// Editor buffer interface and an in-memory line buffer implementing it
// Offsets are character offsets within a line, not byte offsets

use std::cmp::{max, min};
use std::collections::HashMap;

use crate::token::Token;

/// A cursor position: line index and character offset within the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Position { line, ch }
    }
}

/// An ordered selection range, start <= end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    start: Position,
    end: Position,
}

impl Selection {
    /// Create a selection from two positions in any order
    pub fn new(a: Position, b: Position) -> Self {
        Selection {
            start: min(a, b),
            end: max(a, b),
        }
    }

    pub fn cursor(pos: Position) -> Self {
        Selection { start: pos, end: pos }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Which end of the selection to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorEnd {
    Start,
    End,
}

/// The host editor as seen by the toggle executor
pub trait EditorBuffer {
    fn cursor(&self, which: CursorEnd) -> Position;
    fn selection_text(&self) -> String;
    fn line(&self, index: usize) -> String;
    fn line_tokens(&self, index: usize) -> Vec<Token>;
    fn replace_selection(&mut self, text: &str);
    fn replace_range(&mut self, text: &str, from: Position, to: Position);
    fn set_selection(&mut self, start: Position, end: Position);
    fn focus(&mut self);
}

/// Number of characters in a string
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the character at `ch`, clamped to the end of the text
pub fn byte_index(text: &str, ch: usize) -> usize {
    text.char_indices()
        .nth(ch)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// Slice by character offsets, clamped to the text
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let start = byte_index(text, start);
    let end = byte_index(text, end).max(start);
    &text[start..end]
}

/// Position reached after inserting `text` at `from`
pub fn advance(from: Position, text: &str) -> Position {
    match text.rfind('\n') {
        Some(idx) => Position {
            line: from.line + text.matches('\n').count(),
            ch: char_len(&text[idx + 1..]),
        },
        None => Position {
            line: from.line,
            ch: from.ch + char_len(text),
        },
    }
}

/// Tokenizer callback: line index and line text to the line's tokens
pub type LineTokenizer = Box<dyn Fn(usize, &str) -> Vec<Token>>;

/// Line oriented in-memory text buffer with a single selection
pub struct LineBuffer {
    lines: Vec<String>,
    selection: Selection,
    tokenizer: Option<LineTokenizer>,
    /// Tokens installed by hand, used when no tokenizer is set
    fixed_tokens: HashMap<usize, Vec<Token>>,
    focused: bool,
}

impl LineBuffer {
    pub fn new(text: &str) -> Self {
        LineBuffer {
            lines: text.split('\n').map(str::to_string).collect(),
            selection: Selection::default(),
            tokenizer: None,
            fixed_tokens: HashMap::new(),
            focused: false,
        }
    }

    /// Use a tokenizer to produce line tokens on demand
    pub fn with_tokenizer<F>(mut self, tokenizer: F) -> Self
    where
        F: Fn(usize, &str) -> Vec<Token> + 'static,
    {
        self.tokenizer = Some(Box::new(tokenizer));
        self
    }

    /// Install fixed tokens for a line; they are dropped when the line is edited
    pub fn set_line_tokens(&mut self, line: usize, tokens: Vec<Token>) {
        self.fixed_tokens.insert(line, tokens);
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Select a range on a single line
    pub fn select(&mut self, line: usize, start: usize, end: usize) {
        self.set_selection(Position::new(line, start), Position::new(line, end));
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    fn clamp(&self, pos: Position) -> Position {
        let line = min(pos.line, self.lines.len() - 1);
        let ch = min(pos.ch, char_len(&self.lines[line]));
        Position { line, ch }
    }

    fn invalidate_tokens(&mut self, from_line: usize, to_line: usize, line_delta: bool) {
        if line_delta {
            self.fixed_tokens.retain(|&line, _| line < from_line);
        } else {
            self.fixed_tokens
                .retain(|&line, _| line < from_line || line > to_line);
        }
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

impl EditorBuffer for LineBuffer {
    fn cursor(&self, which: CursorEnd) -> Position {
        match which {
            CursorEnd::Start => self.selection.start(),
            CursorEnd::End => self.selection.end(),
        }
    }

    fn selection_text(&self) -> String {
        let (start, end) = (self.selection.start(), self.selection.end());
        if start.line == end.line {
            return slice_chars(&self.lines[start.line], start.ch, end.ch).to_string();
        }

        let mut text = slice_chars(&self.lines[start.line], start.ch, usize::MAX).to_string();
        for line in &self.lines[start.line + 1..end.line] {
            text.push('\n');
            text.push_str(line);
        }
        text.push('\n');
        text.push_str(slice_chars(&self.lines[end.line], 0, end.ch));
        text
    }

    fn line(&self, index: usize) -> String {
        self.lines.get(index).cloned().unwrap_or_default()
    }

    fn line_tokens(&self, index: usize) -> Vec<Token> {
        match (&self.tokenizer, self.lines.get(index)) {
            (Some(tokenize), Some(line)) => tokenize(index, line),
            _ => self.fixed_tokens.get(&index).cloned().unwrap_or_default(),
        }
    }

    fn replace_selection(&mut self, text: &str) {
        let (start, end) = (self.selection.start(), self.selection.end());
        self.replace_range(text, start, end);
    }

    /// Replace the text between two positions; the selection collapses after the inserted text
    fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        let (from, to) = (self.clamp(min(from, to)), self.clamp(max(from, to)));

        let first = &self.lines[from.line];
        let last = &self.lines[to.line];
        let replaced = format!(
            "{}{}{}",
            slice_chars(first, 0, from.ch),
            text,
            slice_chars(last, to.ch, usize::MAX)
        );
        let new_lines: Vec<String> = replaced.split('\n').map(str::to_string).collect();
        let line_delta = new_lines.len() != to.line - from.line + 1;

        self.lines.splice(from.line..=to.line, new_lines);
        self.invalidate_tokens(from.line, to.line, line_delta);
        self.selection = Selection::cursor(advance(from, text));
    }

    fn set_selection(&mut self, start: Position, end: Position) {
        self.selection = Selection::new(self.clamp(start), self.clamp(end));
    }

    fn focus(&mut self) {
        self.focused = true;
    }
}
