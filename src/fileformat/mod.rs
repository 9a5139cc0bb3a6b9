//! The HMSA file pair.
//!
//! A document is stored as two files sharing a stem:
//!
//! - `<stem>.xml` holds the header, the conditions and one descriptor per
//!   datum under a `MSAHyperDimensionalDataFile` root carrying `Version`,
//!   `UID` and `xml:lang`;
//! - `<stem>.hmsa` starts with the same 8-byte UID, followed by the datum
//!   payloads in document order, little-endian and without padding.
//!
//! [`HmsaReader`] and [`HmsaWriter`] run on a background [`Task`](crate::task::Task)
//! and report progress through [`Monitorable`](crate::task::Monitorable).
//! [`DataFile::read`](crate::DataFile::read) and
//! [`DataFile::write`](crate::DataFile::write) wrap them for blocking use.

pub mod binary;
/// Reader and writer configuration
pub mod config;
mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use binary::{format_uid, parse_uid, FilePair, Uid, UID_LENGTH};
pub use config::{ReaderConfig, WriteStats, WriterConfig};
pub use reader::HmsaReader;
pub use writer::HmsaWriter;

pub(crate) use reader::{open_binary, read_header, read_root};

/// Root element of the XML document.
pub const ROOT_TAG: &str = "MSAHyperDimensionalDataFile";
pub(crate) const HEADER_TAG: &str = "Header";
pub(crate) const CONDITIONS_TAG: &str = "Conditions";
pub(crate) const DATA_TAG: &str = "Data";
