//! Loading and saving grammar files.
//!
//! A grammar file is JSON (`.json`) or YAML (`.yaml`, `.yml`); the format
//! is picked from the file extension.
//!
//! # Example YAML
//!
//! ```yaml
//! name: test
//! usage: a simple test
//! options:
//!   - name: veryLong
//!   - name: longs
//!     kind: list
//!     value_separator: ";"
//!   - name: define
//!     short_name: D
//!     kind: group
//!   - name: bar
//!     kind: boolean
//!     has_value: false
//! argument:
//!   name: arguments
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use thiserror::Error;

use crate::CommandGrammar;

/// Errors that can occur while reading or writing a grammar file.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension is neither JSON nor YAML.
    #[error("unsupported grammar file format: {0}")]
    UnsupportedFormat(String),
}

/// Convenience alias for results with [`GrammarError`].
pub type Result<T> = std::result::Result<T, GrammarError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(GrammarError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl CommandGrammar {
    /// Loads a grammar from a JSON or YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](GrammarError::UnsupportedFormat) for an
    /// unknown extension, [`IoError`](GrammarError::IoError) if the file
    /// cannot be read, or a JSON/YAML error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let grammar = match format {
            FileFormat::Json => serde_json::from_reader(reader)?,
            FileFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        Ok(grammar)
    }

    /// Saves the grammar, picking the format from the extension.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`load`](Self::load).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            FileFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            FileFormat::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }

    /// Parses a grammar from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parses a grammar from a YAML string.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }
}
