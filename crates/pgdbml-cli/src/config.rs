use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pgdbml_introspect::IntrospectOptions;
use serde::Deserialize;
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pgdbml.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid type mapping: {0}")]
    InvalidTypeMapping(String),
}

/// Contents of `pgdbml.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub schemas: Vec<String>,
    pub all_schemas: bool,
    pub exclude_tables: Vec<String>,
    /// Replaces the built-in system schema deny-list when present.
    pub system_schemas: Option<Vec<String>>,
    pub type_mappings: BTreeMap<String, String>,
}

/// Values given on the command line. Non-empty lists replace the file's.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub schemas: Vec<String>,
    pub all_schemas: bool,
    pub exclude_tables: Vec<String>,
    pub type_mappings: Vec<(String, String)>,
}

/// Load `explicit`, or [`DEFAULT_CONFIG_FILE`] if it exists.
pub fn load(explicit: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !path.is_file() {
                return Ok(FileConfig::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(event = "config_loaded", path = %path.display());
    toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}

/// Merge file values with command-line overrides into introspection options.
pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<IntrospectOptions, ConfigError> {
    let mut options = IntrospectOptions::default();

    let schemas = clean(if overrides.schemas.is_empty() {
        file.schemas
    } else {
        overrides.schemas
    });
    if overrides.all_schemas || file.all_schemas {
        options = options.with_all_schemas();
    } else if !schemas.is_empty() {
        options = options.with_schemas(schemas);
    }

    let exclude_tables = if overrides.exclude_tables.is_empty() {
        file.exclude_tables
    } else {
        overrides.exclude_tables
    };
    options = options.with_exclude_tables(clean(exclude_tables));

    if let Some(system_schemas) = file.system_schemas {
        options = options.with_system_schemas(clean(system_schemas));
    }

    let mut type_mappings = file.type_mappings;
    type_mappings.extend(overrides.type_mappings);
    for (name, target) in &type_mappings {
        if name.trim().is_empty() || target.trim().is_empty() {
            return Err(ConfigError::InvalidTypeMapping(format!("{name}={target}")));
        }
    }

    Ok(options.with_type_mappings(type_mappings))
}

/// Parse a `--type-mapping name=type` argument.
pub fn parse_type_mapping(value: &str) -> Result<(String, String), String> {
    let (name, target) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=TYPE, got `{value}`"))?;
    let (name, target) = (name.trim(), target.trim());
    if name.is_empty() || target.is_empty() {
        return Err(format!("expected NAME=TYPE, got `{value}`"));
    }
    Ok((name.to_string(), target.to_string()))
}

fn clean(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}
