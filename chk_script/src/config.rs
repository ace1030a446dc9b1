//! Compiler options and their TOML loader.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Switches that change how some arguments are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Read memory arguments as absolute addresses instead of death-table offsets.
    pub use_addresses_for_memory: bool,
    /// Address of the first death-table entry, used to convert addresses to offsets.
    pub death_table_offset: u32,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            use_addresses_for_memory: false,
            death_table_offset: Self::DEFAULT_DEATH_TABLE_OFFSET,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid compiler options: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CompilerOptions {
    pub const DEFAULT_DEATH_TABLE_OFFSET: u32 = 0x0058_A364;

    /// Parse options from TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML or a key has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load options from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let options = CompilerOptions::from_toml_str("").expect("parse");
        assert_eq!(options, CompilerOptions::default());
        assert_eq!(options.death_table_offset, 0x0058_A364);
    }

    #[test]
    fn keys_override_defaults() {
        let options = CompilerOptions::from_toml_str("use_addresses_for_memory = true\ndeath_table_offset = 4096\n")
            .expect("parse");
        assert!(options.use_addresses_for_memory);
        assert_eq!(options.death_table_offset, 4096);
    }

    #[test]
    fn wrong_types_are_rejected() {
        let err = CompilerOptions::from_toml_str("use_addresses_for_memory = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
