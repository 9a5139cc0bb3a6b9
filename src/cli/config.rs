//! TOML configuration file support.
//!
//! Reader and writer settings can be given in a config file instead of
//! relying on the defaults:
//!
//! ```toml
//! # hmsa.toml
//! [writer]
//! language = "en-US"
//! checksum = "SHA-1"     # or "SUM32" or "none"
//! indent = true
//!
//! [reader]
//! verify_checksum = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use hmsa::fileformat::{ReaderConfig, WriterConfig};
use hmsa::types::ChecksumAlgorithm;

/// Root configuration structure for hmsa.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Settings of written documents.
    #[serde(default)]
    pub writer: WriterSection,

    /// Settings of document reading.
    #[serde(default)]
    pub reader: ReaderSection,
}

/// `[writer]` table.
#[derive(Debug, Default, Deserialize)]
pub struct WriterSection {
    /// Root `xml:lang` tag.
    pub language: Option<String>,

    /// Checksum algorithm name, or "none".
    pub checksum: Option<String>,

    /// Indent the XML document.
    pub indent: Option<bool>,
}

/// `[reader]` table.
#[derive(Debug, Default, Deserialize)]
pub struct ReaderSection {
    /// Fail on checksum mismatch.
    pub verify_checksum: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load the file at `path`, or the defaults without one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Writer configuration, defaults overridden by the `[writer]` table.
    pub fn writer_config(&self) -> Result<WriterConfig> {
        let mut config = WriterConfig::default();
        if let Some(language) = &self.writer.language {
            config.language = language.clone();
        }
        if let Some(checksum) = &self.writer.checksum {
            config.checksum = if checksum.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(
                    checksum
                        .parse::<ChecksumAlgorithm>()
                        .with_context(|| format!("Invalid checksum setting {:?}", checksum))?,
                )
            };
        }
        if let Some(indent) = self.writer.indent {
            config.indent = indent;
        }
        Ok(config)
    }

    /// Reader configuration, defaults overridden by the `[reader]` table.
    pub fn reader_config(&self) -> ReaderConfig {
        let mut config = ReaderConfig::default();
        if let Some(verify) = self.reader.verify_checksum {
            config.verify_checksum = verify;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [writer]
            language = "fr-CA"
            checksum = "SUM32"
            indent = false

            [reader]
            verify_checksum = false
        "#;

        let config = Config::from_str(toml).unwrap();
        let writer = config.writer_config().unwrap();
        assert_eq!(writer.language, "fr-CA");
        assert_eq!(writer.checksum, Some(ChecksumAlgorithm::Sum32));
        assert!(!writer.indent);
        assert!(!config.reader_config().verify_checksum);
    }

    #[test]
    fn test_checksum_none() {
        let config = Config::from_str("[writer]\nchecksum = \"none\"\n").unwrap();
        assert_eq!(config.writer_config().unwrap().checksum, None);
        assert_eq!(config.writer_config().unwrap().language, "en-US");
    }

    #[test]
    fn test_invalid_checksum() {
        let config = Config::from_str("[writer]\nchecksum = \"md5\"\n").unwrap();
        assert!(config.writer_config().is_err());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.writer_config().unwrap(), WriterConfig::default());
        assert_eq!(config.reader_config(), ReaderConfig::default());
    }
}
