// A small markdown tokenizer standing in for the host editor's lexer
// Categories follow the tags the resolver expects: header-N, quote, strong, em,
// link, image, string url and variable-2 for list items

use marktoggle::buffer::{char_len, slice_chars};
use marktoggle::{EditorBuffer, LineBuffer, Token};
use regex::Regex;
use std::sync::LazyLock;

static HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,3})\s").unwrap());
static QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s").unwrap());
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:\d+\.|[*-])\s+").unwrap());
static INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<image>!\[[^\]]+\])(?P<image_url>\([^)]+\))",
        r"|(?P<link>\[[^\]]+\])(?P<link_url>\([^)]+\))",
        r"|(?P<strong>\*\*[^*]+\*\*)",
        r"|(?P<em>_[^_]+_)",
    ))
    .unwrap()
});

pub fn tokenize(_line_index: usize, line: &str) -> Vec<Token> {
    let len = char_len(line);
    if len == 0 {
        return Vec::new();
    }

    if let Some(caps) = HEADER.captures(line) {
        let level = caps[1].len();
        return vec![Token::from_line(line, 0, len, format!("header header-{level}"))];
    }
    if QUOTE.is_match(line) {
        return vec![Token::from_line(line, 0, len, "quote")];
    }

    match LIST_MARKER.find(line) {
        Some(marker) => {
            let marker_len = char_len(marker.as_str());
            let mut tokens = vec![Token::from_line(line, 0, marker_len, "variable-2")];
            tokens.extend(inline_tokens(line, marker_len, Some("variable-2")));
            tokens
        }
        None => inline_tokens(line, 0, None),
    }
}

/// Inline tokens from character offset `from`; gaps only get a token when a base tag is given
fn inline_tokens(line: &str, from: usize, base: Option<&str>) -> Vec<Token> {
    let rest = slice_chars(line, from, usize::MAX);
    let mut tokens = Vec::new();
    let mut pos = from;

    let push = |tokens: &mut Vec<Token>, start: usize, end: usize, category: &str| {
        let category = match base {
            Some(base) if category.is_empty() => base.to_string(),
            Some(base) => format!("{base} {category}"),
            None => category.to_string(),
        };
        tokens.push(Token::from_line(line, start, end, category));
    };

    for caps in INLINE.captures_iter(rest) {
        let spans: &[(&str, &str)] = if caps.name("image").is_some() {
            &[("image", "image link"), ("image_url", "string url")]
        } else if caps.name("link").is_some() {
            &[("link", "link"), ("link_url", "string url")]
        } else if caps.name("strong").is_some() {
            &[("strong", "strong")]
        } else {
            &[("em", "em")]
        };

        for (group, category) in spans {
            let Some(m) = caps.name(group) else { continue };
            let start = from + char_len(&rest[..m.start()]);
            let end = from + char_len(&rest[..m.end()]);
            if start > pos && base.is_some() {
                push(&mut tokens, pos, start, "");
            }
            push(&mut tokens, start, end, category);
            pos = end;
        }
    }

    if pos < char_len(line) && base.is_some() {
        push(&mut tokens, pos, char_len(line), "");
    }
    tokens
}

pub fn buffer(text: &str) -> LineBuffer {
    LineBuffer::new(text).with_tokenizer(tokenize)
}

/// The selection line with the selection marked as «…», or | for a bare cursor
pub fn render(buffer: &LineBuffer) -> String {
    let selection = buffer.selection();
    let (start, end) = (selection.start(), selection.end());
    let line = buffer.line(start.line);

    if selection.is_collapsed() {
        return format!(
            "{}|{}",
            slice_chars(&line, 0, start.ch),
            slice_chars(&line, start.ch, usize::MAX)
        );
    }

    let end_ch = if end.line == start.line { end.ch } else { char_len(&line) };
    format!(
        "{}«{}»{}",
        slice_chars(&line, 0, start.ch),
        slice_chars(&line, start.ch, end_ch),
        slice_chars(&line, end_ch, usize::MAX)
    )
}
