//! The `.hmsa` binary file: an 8-byte UID followed by the datum payloads.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{HmsaError, Result};
use crate::handler::{PayloadSink, PayloadSource};
use crate::types::{Checksum, ChecksumAlgorithm, ChecksumHasher};

/// Length of the UID at the start of the binary file.
pub const UID_LENGTH: u64 = 8;

/// Identifier binding the XML document to its binary file.
pub type Uid = [u8; UID_LENGTH as usize];

/// Fresh random UID.
pub fn generate_uid() -> Uid {
    let mut uid = Uid::default();
    uid.copy_from_slice(&uuid::Uuid::new_v4().as_bytes()[..UID_LENGTH as usize]);
    uid
}

/// UID as 16 uppercase hex digits.
pub fn format_uid(uid: &Uid) -> String {
    uid.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Parse the hex form of a UID (either case).
pub fn parse_uid(text: &str) -> Result<Uid> {
    let invalid = || HmsaError::document(format!("Invalid UID: {:?}", text));
    let text = text.trim();
    if text.len() != 2 * UID_LENGTH as usize || !text.is_ascii() {
        return Err(invalid());
    }
    let mut uid = Uid::default();
    for (i, byte) in uid.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&text[2 * i..2 * i + 2], 16).map_err(|_| invalid())?;
    }
    Ok(uid)
}

/// The two files of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    /// XML document path
    pub xml: PathBuf,
    /// Binary file path
    pub hmsa: PathBuf,
}

impl FilePair {
    /// Pair sharing the stem of `path`, which may name either file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            xml: path.with_extension("xml"),
            hmsa: path.with_extension("hmsa"),
        }
    }
}

/// Appends payloads after the UID and tracks their offsets.
pub struct BinaryWriter<W: Write> {
    inner: W,
    position: u64,
    hasher: Option<ChecksumHasher>,
}

impl BinaryWriter<BufWriter<File>> {
    /// Create the file at `path` and write `uid`.
    pub fn create(path: &Path, uid: &Uid, checksum: Option<ChecksumAlgorithm>) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), uid, checksum)
    }
}

impl<W: Write> BinaryWriter<W> {
    /// Write the header of a new binary file.
    pub fn new(mut inner: W, uid: &Uid, checksum: Option<ChecksumAlgorithm>) -> Result<Self> {
        inner.write_all(uid)?;
        let mut hasher = checksum.map(ChecksumHasher::new);
        if let Some(hasher) = hasher.as_mut() {
            hasher.update(uid);
        }
        Ok(Self {
            inner,
            position: UID_LENGTH,
            hasher,
        })
    }

    /// Bytes written so far, UID included.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Flush and return the file size and the checksum of its content.
    pub fn finish(mut self) -> Result<(u64, Option<Checksum>)> {
        self.inner.flush()?;
        Ok((self.position, self.hasher.map(ChecksumHasher::finalize)))
    }
}

impl<W: Write> PayloadSink for BinaryWriter<W> {
    fn write_payload(&mut self, bytes: &[u8]) -> Result<u64> {
        let offset = self.position;
        self.inner.write_all(bytes)?;
        if let Some(hasher) = self.hasher.as_mut() {
            hasher.update(bytes);
        }
        self.position += bytes.len() as u64;
        debug!("Payload of {} bytes at offset {}", bytes.len(), offset);
        Ok(offset)
    }
}

/// Reads payloads from a binary file after checking its UID header.
pub struct BinaryReader<R: Read + Seek> {
    inner: R,
    length: u64,
    uid: Uid,
}

impl BinaryReader<BufReader<File>> {
    /// Open a binary file and read its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> BinaryReader<R> {
    /// Read the header from `inner`.
    pub fn new(mut inner: R) -> Result<Self> {
        let length = inner.seek(SeekFrom::End(0))?;
        if length < UID_LENGTH {
            return Err(HmsaError::document(format!(
                "Binary file of {} bytes is too short for its UID",
                length
            )));
        }
        inner.seek(SeekFrom::Start(0))?;
        let mut uid = Uid::default();
        inner.read_exact(&mut uid)?;
        Ok(Self { inner, length, uid })
    }

    /// Identifier recorded in the header.
    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// Size of the file in bytes.
    pub fn len(&self) -> u64 {
        self.length
    }

    /// Whether the file holds no payload.
    pub fn is_empty(&self) -> bool {
        self.length == UID_LENGTH
    }

    /// Checksum of the whole file.
    pub fn checksum(&mut self, algorithm: ChecksumAlgorithm) -> Result<Checksum> {
        self.inner.seek(SeekFrom::Start(0))?;
        let mut hasher = ChecksumHasher::new(algorithm);
        let mut buffer = [0u8; 64 * 1024];
        loop {
            let n = self.inner.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
        Ok(hasher.finalize())
    }
}

impl<R: Read + Seek> PayloadSource for BinaryReader<R> {
    fn read_payload(&mut self, offset: u64, length: u64) -> Result<Vec<u8>> {
        let end = offset.checked_add(length);
        if offset < UID_LENGTH || end.map_or(true, |end| end > self.length) {
            return Err(HmsaError::document(format!(
                "Payload of {} bytes at offset {} lies outside the binary file ({} bytes)",
                length, offset, self.length
            )));
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        let mut bytes = vec![0u8; length as usize];
        self.inner.read_exact(&mut bytes)?;
        Ok(bytes)
    }
}
