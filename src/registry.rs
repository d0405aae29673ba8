// Format registry
// Maps command keys to format specifications and token categories back to command keys

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::FormatError;

/// The formatting commands the toggle executor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommandKey {
    H1,
    H2,
    H3,
    Bold,
    Italic,
    Quote,
    OrderedList,
    UnorderedList,
    Link,
    Image,
}

impl CommandKey {
    pub const ALL: [CommandKey; 10] = [
        CommandKey::H1,
        CommandKey::H2,
        CommandKey::H3,
        CommandKey::Bold,
        CommandKey::Italic,
        CommandKey::Quote,
        CommandKey::OrderedList,
        CommandKey::UnorderedList,
        CommandKey::Link,
        CommandKey::Image,
    ];

    /// The name used by the command palette and in config files
    pub fn name(self) -> &'static str {
        match self {
            CommandKey::H1 => "h1",
            CommandKey::H2 => "h2",
            CommandKey::H3 => "h3",
            CommandKey::Bold => "bold",
            CommandKey::Italic => "italic",
            CommandKey::Quote => "quote",
            CommandKey::OrderedList => "oList",
            CommandKey::UnorderedList => "uList",
            CommandKey::Link => "link",
            CommandKey::Image => "image",
        }
    }
}

impl fmt::Display for CommandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandKey {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| FormatError::UnknownCommand(s.to_string()))
    }
}

/// Whether a format wraps a span of a line or prefixes the whole line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    Inline,
    Block,
}

/// Uncompiled description of a format, as written in the builtin table or a config file
#[derive(Debug, Clone, PartialEq)]
pub struct FormatDef {
    pub key: CommandKey,
    pub kind: FormatKind,
    /// Token category the tokenizer uses for this format, if it has a single one
    pub category: Option<String>,
    pub before: String,
    pub after: String,
    /// Regex over the raw line text, used by block strip and link/image unwrap
    pub pattern: Option<String>,
    /// Text inserted when applying to an empty selection or line
    pub placeholder: String,
}

impl FormatDef {
    fn inline(
        key: CommandKey,
        category: &str,
        before: &str,
        after: &str,
        placeholder: &str,
    ) -> Self {
        FormatDef {
            key,
            kind: FormatKind::Inline,
            category: Some(category.to_string()),
            before: before.to_string(),
            after: after.to_string(),
            pattern: None,
            placeholder: placeholder.to_string(),
        }
    }

    fn block(
        key: CommandKey,
        category: Option<&str>,
        before: &str,
        pattern: &str,
        placeholder: &str,
    ) -> Self {
        FormatDef {
            key,
            kind: FormatKind::Block,
            category: category.map(str::to_string),
            before: before.to_string(),
            after: String::new(),
            pattern: Some(pattern.to_string()),
            placeholder: placeholder.to_string(),
        }
    }

    fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }
}

/// The default format table
pub fn builtin_defs() -> Vec<FormatDef> {
    vec![
        FormatDef::block(CommandKey::H1, Some("header-1"), "#", r"^#\s+", "Heading"),
        FormatDef::block(CommandKey::H2, Some("header-2"), "##", r"^##\s+", "Heading"),
        FormatDef::block(CommandKey::H3, Some("header-3"), "###", r"^###\s+", "Heading"),
        FormatDef::inline(CommandKey::Bold, "strong", "**", "**", "bold text"),
        FormatDef::inline(CommandKey::Italic, "em", "_", "_", "italic text"),
        FormatDef::block(CommandKey::Quote, Some("quote"), ">", r"^>\s+", "quote"),
        // List items share one token category, the resolver tells them apart by pattern
        FormatDef::block(CommandKey::OrderedList, None, "1.", r"^\d+\.\s+", "List"),
        FormatDef::block(CommandKey::UnorderedList, None, "*", r"^[*-]\s+", "List"),
        FormatDef::inline(CommandKey::Link, "link", "[link](", ")", "Link")
            .with_pattern(r"\[(?:[^\]]+)\]\(([^)]+)\)"),
        FormatDef::inline(CommandKey::Image, "image", "![Alt Text](", ")", "Image")
            .with_pattern(r"!\[(?:[^\]]+)\]\(([^)]+)\)"),
    ]
}

/// A compiled, read-only format specification
#[derive(Debug, Clone)]
pub struct FormatSpec {
    key: CommandKey,
    kind: FormatKind,
    category: Option<String>,
    before: String,
    after: String,
    pattern: Option<Regex>,
    placeholder: String,
}

impl FormatSpec {
    fn compile(def: FormatDef) -> Result<Self, FormatError> {
        let pattern = def
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|source| FormatError::InvalidPattern {
                command: def.key,
                source,
            })?;

        Ok(FormatSpec {
            key: def.key,
            kind: def.kind,
            category: def.category,
            before: def.before,
            after: def.after,
            pattern,
            placeholder: def.placeholder,
        })
    }

    pub fn key(&self) -> CommandKey {
        self.key
    }

    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn before(&self) -> &str {
        &self.before
    }

    pub fn after(&self) -> &str {
        &self.after
    }

    pub fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// The detection pattern, but only when it captures the text to keep on unwrap
    pub fn capture_pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref().filter(|re| re.captures_len() > 1)
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

/// Immutable lookup tables built once at startup and passed by reference
#[derive(Debug, Clone)]
pub struct Registry {
    specs: BTreeMap<CommandKey, FormatSpec>,
    by_category: HashMap<String, CommandKey>,
}

impl Registry {
    /// Build a registry from format definitions
    /// A later definition for the same key replaces the earlier one
    pub fn new<I>(defs: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = FormatDef>,
    {
        let mut specs = BTreeMap::new();
        for def in defs {
            specs.insert(def.key, FormatSpec::compile(def)?);
        }

        let mut by_category: HashMap<String, CommandKey> = HashMap::new();
        for spec in specs.values() {
            let Some(category) = spec.category() else {
                continue;
            };
            if let Some(first) = by_category.insert(category.to_string(), spec.key) {
                return Err(FormatError::DuplicateCategoryMapping {
                    category: category.to_string(),
                    first,
                    second: spec.key,
                });
            }
        }

        tracing::debug!(
            formats = specs.len(),
            categories = by_category.len(),
            "built format registry"
        );

        Ok(Registry { specs, by_category })
    }

    /// The registry with the default format table
    pub fn builtin() -> Result<Self, FormatError> {
        Self::new(builtin_defs())
    }

    pub fn get(&self, key: CommandKey) -> Result<&FormatSpec, FormatError> {
        self.specs
            .get(&key)
            .ok_or_else(|| FormatError::UnknownCommand(key.name().to_string()))
    }

    /// Look up a format by its command name
    pub fn lookup(&self, name: &str) -> Result<&FormatSpec, FormatError> {
        self.get(name.parse()?)
    }

    /// Reverse index from a token category to the command it denotes
    pub fn command_for_category(&self, category: &str) -> Option<CommandKey> {
        self.by_category.get(category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatSpec> {
        self.specs.values()
    }
}
