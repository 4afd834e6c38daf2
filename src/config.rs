//! Translator configuration
//!
//! Every option has a default, so an empty YAML document (or no document at
//! all) yields the standard behavior:
//!
//! ```yaml
//! json:
//!   record_marker: json
//!   on_record_error: abort
//! graph:
//!   encoding: quoted
//!   translate_namespaces: true
//! table:
//!   encoding: header_row
//! ```

use crate::table::TableEncoding;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Document is not valid YAML for this configuration
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// What a record-set driver does when one record fails to translate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordErrorPolicy {
    /// Return the first error
    #[default]
    Abort,
    /// Log the failing record and continue with the next one
    Skip,
}

/// JSON record-set options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    /// Head symbol of every record-set line
    pub record_marker: String,
    pub on_record_error: RecordErrorPolicy,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            record_marker: "json".to_string(),
            on_record_error: RecordErrorPolicy::Abort,
        }
    }
}

/// Line layout for graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphEncoding {
    /// `((Graph id) (s p o))` lines, quoted graphs allowed
    #[default]
    Quoted,
    /// `(s p o)` lines for the asserted graph only
    Flat,
}

/// Graph translation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub encoding: GraphEncoding,
    /// Append `(Namespace (label uri))` lines after the triples
    pub translate_namespaces: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            encoding: GraphEncoding::Quoted,
            translate_namespaces: true,
        }
    }
}

/// Tabular translation options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub encoding: TableEncoding,
}

/// Options for all translators
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub json: JsonConfig,
    pub graph: GraphConfig,
    pub table: TableConfig,
}

impl TranslatorConfig {
    /// Load from a YAML document; missing sections keep their defaults
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Render as YAML
    pub fn to_yaml_string(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TranslatorConfig::default();
        assert_eq!(config.json.record_marker, "json");
        assert_eq!(config.json.on_record_error, RecordErrorPolicy::Abort);
        assert_eq!(config.graph.encoding, GraphEncoding::Quoted);
        assert!(config.graph.translate_namespaces);
        assert_eq!(config.table.encoding, TableEncoding::HeaderRow);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = TranslatorConfig::from_yaml_str(
            "json:\n  on_record_error: skip\ntable:\n  encoding: column_header\n",
        )
        .unwrap();
        assert_eq!(config.json.record_marker, "json");
        assert_eq!(config.json.on_record_error, RecordErrorPolicy::Skip);
        assert_eq!(config.table.encoding, TableEncoding::ColumnHeader);
        assert_eq!(config.graph, GraphConfig::default());
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(
            TranslatorConfig::from_yaml_str("").unwrap(),
            TranslatorConfig::default()
        );
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = TranslatorConfig::default();
        config.graph.encoding = GraphEncoding::Flat;
        config.graph.translate_namespaces = false;
        let text = config.to_yaml_string().unwrap();
        assert_eq!(TranslatorConfig::from_yaml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let err = TranslatorConfig::from_yaml_str("graph:\n  encoding: sideways\n").unwrap_err();
        assert!(err.to_string().starts_with("YAML error"));
    }
}
