use std::io;
use std::path::PathBuf;

use crate::registry::CommandKey;

/// Errors raised by the format registry and the toggle executor
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The command name is not one of the registered keys
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    /// Two formats claim the same token category
    #[error("token category {category:?} is claimed by both {first} and {second}")]
    DuplicateCategoryMapping {
        category: String,
        first: CommandKey,
        second: CommandKey,
    },

    #[error("invalid detection pattern for {command}: {source}")]
    InvalidPattern {
        command: CommandKey,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while loading a format configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Format(#[from] FormatError),
}
