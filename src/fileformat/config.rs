use std::fmt;
use std::path::PathBuf;

use crate::types::ChecksumAlgorithm;

/// Configuration for the HMSA reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Fail when the header checksum does not match the binary file.
    /// When unset a mismatch is only logged.
    pub verify_checksum: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            verify_checksum: true,
        }
    }
}

impl ReaderConfig {
    /// Configuration that logs checksum mismatches instead of failing
    pub fn relaxed() -> Self {
        Self {
            verify_checksum: false,
        }
    }
}

/// Configuration for the HMSA writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterConfig {
    /// Language tag written as the root `xml:lang`
    pub language: String,

    /// Algorithm of the header checksum (None = no checksum)
    pub checksum: Option<ChecksumAlgorithm>,

    /// Indent the XML document
    pub indent: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            checksum: Some(ChecksumAlgorithm::Sha1),
            indent: true,
        }
    }
}

impl WriterConfig {
    /// Unindented XML and no checksum
    pub fn compact() -> Self {
        Self {
            checksum: None,
            indent: false,
            ..Self::default()
        }
    }
}

/// Statistics from a completed write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteStats {
    /// Path of the XML document
    pub xml_path: PathBuf,
    /// Path of the binary file
    pub hmsa_path: PathBuf,
    /// UID binding the pair, as 16 uppercase hex digits
    pub uid: String,
    /// Number of data written
    pub datum_count: usize,
    /// Size of the binary file in bytes
    pub binary_bytes: u64,
}

impl fmt::Display for WriteStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} data ({} bytes) to {} (UID {})",
            self.datum_count,
            self.binary_bytes,
            self.hmsa_path.display(),
            self.uid
        )
    }
}
