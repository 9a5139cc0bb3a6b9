//! Checksums of the binary payload file.

use std::fmt;
use std::str::FromStr;

use sha1::{Digest, Sha1};

use crate::error::{HmsaError, Result};

/// Checksum algorithms admitted in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumAlgorithm {
    /// SHA-1 digest, 40 hex digits
    Sha1,
    /// 32-bit wrapping sum of all bytes, 8 hex digits
    Sum32,
}

impl ChecksumAlgorithm {
    /// Name used in the `Algorithm` attribute.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha1 => "SHA-1",
            ChecksumAlgorithm::Sum32 => "SUM32",
        }
    }

    /// Number of hex digits of a checksum value.
    pub const fn hex_len(&self) -> usize {
        match self {
            ChecksumAlgorithm::Sha1 => 40,
            ChecksumAlgorithm::Sum32 => 8,
        }
    }
}

impl FromStr for ChecksumAlgorithm {
    type Err = HmsaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SHA-1" | "SHA1" => Ok(ChecksumAlgorithm::Sha1),
            "SUM32" => Ok(ChecksumAlgorithm::Sum32),
            _ => Err(HmsaError::validation(format!("Unknown checksum algorithm: {}", s))),
        }
    }
}

impl fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A checksum value (uppercase hex) and the algorithm that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checksum {
    value: String,
    algorithm: ChecksumAlgorithm,
}

impl Checksum {
    /// Create a checksum from its hex representation.
    pub fn new(value: &str, algorithm: ChecksumAlgorithm) -> Result<Self> {
        let value = value.trim().to_ascii_uppercase();
        if value.len() != algorithm.hex_len() || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(HmsaError::validation(format!(
                "Invalid {} checksum: {:?}",
                algorithm, value
            )));
        }
        Ok(Self { value, algorithm })
    }

    /// Checksum of a complete byte buffer.
    pub fn compute(algorithm: ChecksumAlgorithm, bytes: &[u8]) -> Self {
        let mut hasher = ChecksumHasher::new(algorithm);
        hasher.update(bytes);
        hasher.finalize()
    }

    /// Uppercase hex value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Algorithm that produced the value.
    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.value)
    }
}

/// Incremental checksum computation.
#[derive(Debug, Clone)]
pub enum ChecksumHasher {
    /// SHA-1 state
    Sha1(Sha1),
    /// Running byte sum
    Sum32(u32),
}

impl ChecksumHasher {
    /// Start a new computation.
    pub fn new(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::Sha1 => ChecksumHasher::Sha1(Sha1::new()),
            ChecksumAlgorithm::Sum32 => ChecksumHasher::Sum32(0),
        }
    }

    /// Feed more bytes.
    pub fn update(&mut self, bytes: &[u8]) {
        match self {
            ChecksumHasher::Sha1(hasher) => hasher.update(bytes),
            ChecksumHasher::Sum32(sum) => {
                *sum = bytes
                    .iter()
                    .fold(*sum, |acc, &b| acc.wrapping_add(u32::from(b)));
            }
        }
    }

    /// Finish and produce the checksum.
    pub fn finalize(self) -> Checksum {
        match self {
            ChecksumHasher::Sha1(hasher) => {
                let digest = hasher.finalize();
                let value: String = digest.iter().map(|b| format!("{:02X}", b)).collect();
                Checksum {
                    value,
                    algorithm: ChecksumAlgorithm::Sha1,
                }
            }
            ChecksumHasher::Sum32(sum) => Checksum {
                value: format!("{:08X}", sum),
                algorithm: ChecksumAlgorithm::Sum32,
            },
        }
    }
}
