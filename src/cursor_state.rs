// Cursor state resolution
// Works out which formats are active at the cursor from the line's token stream

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::registry::{CommandKey, Registry};
use crate::token::{Token, TokenTag};

static ORDERED_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\s").expect("ordered list pattern is valid"));

/// Formats active at the cursor, together with the token the cursor sits in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorState {
    pub token: Option<Token>,
    pub active: BTreeSet<CommandKey>,
}

impl CursorState {
    pub fn is_active(&self, key: CommandKey) -> bool {
        self.active.contains(&key)
    }
}

/// Window over the tokens preceding the cursor token
/// Consumed from both ends, never mutating the underlying slice
struct Lookback<'a> {
    tokens: &'a [Token],
    front: usize,
    back: usize,
}

impl<'a> Lookback<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Lookback {
            tokens,
            front: 0,
            back: tokens.len(),
        }
    }

    fn pop_last(&mut self) -> Option<&'a Token> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(&self.tokens[self.back])
    }

    fn take_first(&mut self) -> Option<&'a Token> {
        if self.front == self.back {
            return None;
        }
        self.front += 1;
        Some(&self.tokens[self.front - 1])
    }
}

/// Resolve the cursor state for a cursor at `cursor` on a line with the given tokens
pub fn resolve(registry: &Registry, tokens: &[Token], cursor: usize) -> CursorState {
    let Some(index) = tokens.iter().position(|token| token.contains(cursor)) else {
        tracing::trace!(cursor, tokens = tokens.len(), "no token under cursor");
        return CursorState::default();
    };

    let token = &tokens[index];
    let mut lookback = Lookback::new(&tokens[..index]);
    let active = token_commands(registry, token, &mut lookback);
    tracing::trace!(cursor, category = %token.category, ?active, "resolved cursor state");

    CursorState {
        token: Some(token.clone()),
        active,
    }
}

fn token_commands(
    registry: &Registry,
    token: &Token,
    lookback: &mut Lookback<'_>,
) -> BTreeSet<CommandKey> {
    let mut active = BTreeSet::new();

    for tag in token.tags() {
        match TokenTag::classify(tag) {
            TokenTag::Image => {
                active.insert(CommandKey::Image);
            }
            TokenTag::Link => {
                if !active.contains(&CommandKey::Image) {
                    active.insert(CommandKey::Link);
                }
            }
            TokenTag::InlineText => {
                // Inherit the styling of the token that opened the run
                if let Some(previous) = lookback.pop_last() {
                    active.extend(token_commands(registry, previous, lookback));
                }
            }
            TokenTag::ListContent => {
                let marker = lookback.take_first().unwrap_or(token);
                if ORDERED_LIST_ITEM.is_match(&marker.text) {
                    active.insert(CommandKey::OrderedList);
                } else {
                    active.insert(CommandKey::UnorderedList);
                }
            }
            TokenTag::Other(category) => {
                if let Some(key) = registry.command_for_category(category) {
                    active.insert(key);
                }
            }
        }
    }

    // An image is lexically a link too, whichever tag comes first
    if active.contains(&CommandKey::Image) {
        active.remove(&CommandKey::Link);
    }

    active
}
