use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, FormatError};
use crate::registry::{CommandKey, FormatDef, Registry, builtin_defs};

const QUALIFIER: &str = "net.roblillack";
const ORGANIZATION: &str = "Marktoggle";
const APPLICATION: &str = "marktoggle";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Per-command overrides of the builtin format table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatOverride {
    pub before: Option<String>,
    pub after: Option<String>,
    pub pattern: Option<String>,
    pub placeholder: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    #[serde(default)]
    pub formats: BTreeMap<String, FormatOverride>,
}

pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl FormatConfig {
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file; a missing file yields the default config
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents, path),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no format config, using defaults");
                Ok(FormatConfig::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load from the platform config directory, if there is one
    pub fn load_default() -> Result<Self, ConfigError> {
        match config_file_path() {
            Some(path) => Self::load(&path),
            None => Ok(FormatConfig::default()),
        }
    }

    /// The builtin format table with this config's overrides applied
    pub fn format_defs(&self) -> Result<Vec<FormatDef>, FormatError> {
        let mut overrides = BTreeMap::new();
        for (name, over) in &self.formats {
            overrides.insert(name.parse::<CommandKey>()?, over);
        }

        let defs = builtin_defs()
            .into_iter()
            .map(|def| match overrides.get(&def.key) {
                Some(over) => apply_override(def, over),
                None => def,
            })
            .collect();
        Ok(defs)
    }

    /// Build a registry from the builtin table and this config
    pub fn build_registry(&self) -> Result<Registry, FormatError> {
        Registry::new(self.format_defs()?)
    }
}

/// Load the config at `path`, or from the default location, and build the registry from it
pub fn load_registry(path: Option<&Path>) -> Result<Registry, ConfigError> {
    let config = match path {
        Some(path) => FormatConfig::load(path)?,
        None => FormatConfig::load_default()?,
    };
    Ok(config.build_registry()?)
}

fn apply_override(mut def: FormatDef, over: &FormatOverride) -> FormatDef {
    if let Some(before) = &over.before {
        def.before = before.clone();
    }
    if let Some(after) = &over.after {
        def.after = after.clone();
    }
    if let Some(pattern) = &over.pattern {
        def.pattern = Some(pattern.clone());
    }
    if let Some(placeholder) = &over.placeholder {
        def.placeholder = placeholder.clone();
    }
    if let Some(category) = &over.category {
        def.category = Some(category.clone());
    }
    def
}
