// Lexical tokens produced by the host editor's tokenizer

use crate::buffer::slice_chars;

// Category tags with special meaning to the cursor state resolver
pub const TAG_LINK: &str = "link";
pub const TAG_IMAGE: &str = "image";
/// Plain content inside a styled run, styled by the token that opened the run
pub const TAG_INLINE_TEXT: &str = "string";
/// Marker-bearing content of a list item, not specific to the list type
pub const TAG_LIST_CONTENT: &str = "variable-2";

/// A lexical span on one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Character offset of the first character
    pub start: usize,
    /// Character offset one past the last character
    pub end: usize,
    /// Space separated category tags, e.g. "strong em"
    pub category: String,
    /// Raw text the token covers
    pub text: String,
}

impl Token {
    pub fn new(start: usize, end: usize, category: impl Into<String>, text: impl Into<String>) -> Self {
        Token {
            start,
            end,
            category: category.into(),
            text: text.into(),
        }
    }

    /// Build a token whose text is cut from the line it belongs to
    pub fn from_line(line: &str, start: usize, end: usize, category: impl Into<String>) -> Self {
        let text = slice_chars(line, start, end).to_string();
        Token::new(start, end, category, text)
    }

    /// Inclusive on both ends, so a cursor sitting right after the token still hits it
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.category.split_whitespace()
    }
}

/// How the resolver treats a single category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTag<'a> {
    Image,
    Link,
    InlineText,
    ListContent,
    Other(&'a str),
}

impl<'a> TokenTag<'a> {
    pub fn classify(tag: &'a str) -> Self {
        match tag {
            TAG_IMAGE => TokenTag::Image,
            TAG_LINK => TokenTag::Link,
            TAG_INLINE_TEXT => TokenTag::InlineText,
            TAG_LIST_CONTENT => TokenTag::ListContent,
            other => TokenTag::Other(other),
        }
    }
}
