use std::fs;

use tempfile::tempdir;

use super::*;
use crate::condition::{ElementalID, ProbeEm};
use crate::datafile::DataFile;
use crate::datum::Datum;
use crate::error::HmsaError;
use crate::task::{Monitorable, TaskState};
use crate::types::ChecksumAlgorithm;

fn minimal() -> DataFile {
    let mut datafile = DataFile::new();
    datafile.header_mut().set_title("t").unwrap();
    datafile
        .insert_condition("Probe0", ProbeEm::new(15.0).unwrap())
        .unwrap();
    datafile
        .insert_datum("Spec0", Datum::analysis1d(vec![0i32, 1, 2, 3]).unwrap())
        .unwrap();
    datafile
}

fn write(datafile: &DataFile, path: &std::path::Path, config: WriterConfig) -> WriteStats {
    let mut writer = HmsaWriter::new(config);
    writer.start(datafile, path).unwrap();
    writer.get().unwrap()
}

fn read(path: &std::path::Path, config: ReaderConfig) -> crate::error::Result<DataFile> {
    let mut reader = HmsaReader::new(config);
    reader.start(path)?;
    reader.get()
}

#[test]
fn test_minimal_binary_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("s.xml");
    let stats = write(&minimal(), &path, WriterConfig::default());

    let binary = fs::read(dir.path().join("s.hmsa")).unwrap();
    assert_eq!(binary.len(), 24);
    assert_eq!(stats.binary_bytes, 24);
    assert_eq!(stats.datum_count, 1);
    assert_eq!(
        &binary[8..],
        &[0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0]
    );
    assert_eq!(format_uid(&binary[..8].try_into().unwrap()), stats.uid);

    let root = read_root(&FilePair::new(&path)).unwrap();
    assert_eq!(root.attribute("UID"), Some(stats.uid.as_str()));
    assert_eq!(root.attribute("xml:lang"), Some("en-US"));
    let datum = root.child("Data").unwrap().child("Analysis1D").unwrap();
    assert_eq!(datum.attribute("Name"), Some("Spec0"));
    assert_eq!(datum.child("DataOffset").unwrap().text, "8");
    assert_eq!(datum.child("DataLength").unwrap().text, "16");
}

#[test]
fn test_write_then_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.hmsa");
    let mut datafile = minimal();
    let datum = Datum::analysis0d(2.5f64)
        .with_condition("Element", ElementalID::new(26).unwrap())
        .unwrap();
    datafile.insert_datum("Point", datum).unwrap();

    write(&datafile, &path, WriterConfig::default());
    let loaded = read(&path, ReaderConfig::default()).unwrap();
    assert_eq!(loaded, datafile);
    let view = loaded.datum("Point").unwrap();
    assert!(view.conditions().contains_key("Element"));
    assert_eq!(loaded.header().checksum().unwrap().algorithm(), ChecksumAlgorithm::Sha1);
}

#[test]
fn test_checksum_not_stored_on_source() {
    let dir = tempdir().unwrap();
    let datafile = minimal();
    write(&datafile, &dir.path().join("a.xml"), WriterConfig::default());
    assert!(datafile.header().checksum().is_none());
}

#[test]
fn test_compact_has_no_checksum() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("c.xml");
    write(&minimal(), &path, WriterConfig::compact());
    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("Checksum"));
    assert!(read(&path, ReaderConfig::default()).unwrap().header().checksum().is_none());
}

#[test]
fn test_checksum_mismatch() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("m.xml");
    write(&minimal(), &path, WriterConfig::default());

    let hmsa = dir.path().join("m.hmsa");
    let mut bytes = fs::read(&hmsa).unwrap();
    bytes[10] ^= 0xFF;
    fs::write(&hmsa, bytes).unwrap();

    assert!(matches!(
        read(&path, ReaderConfig::default()),
        Err(HmsaError::InvalidDocument(_))
    ));
    let relaxed = read(&path, ReaderConfig::relaxed()).unwrap();
    assert_eq!(relaxed.datum("Spec0").unwrap().value(&[0]).unwrap(), 16711680.0);
}

#[test]
fn test_uid_mismatch() {
    let dir = tempdir().unwrap();
    write(&minimal(), &dir.path().join("a.xml"), WriterConfig::default());
    write(&minimal(), &dir.path().join("b.xml"), WriterConfig::default());
    fs::copy(dir.path().join("b.hmsa"), dir.path().join("a.hmsa")).unwrap();

    assert!(matches!(
        read(&dir.path().join("a.xml"), ReaderConfig::default()),
        Err(HmsaError::UidMismatch { .. })
    ));
}

#[test]
fn test_unsupported_version() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("v.xml");
    write(&minimal(), &path, WriterConfig::default());
    let text = fs::read_to_string(&path).unwrap();
    fs::write(&path, text.replace("Version=\"1.0\"", "Version=\"2.0\"")).unwrap();

    assert!(matches!(
        read(&path, ReaderConfig::default()),
        Err(HmsaError::UnsupportedVersion(v)) if v == "2.0"
    ));
}

#[test]
fn test_truncated_binary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.xml");
    write(&minimal(), &path, WriterConfig::compact());
    let hmsa = dir.path().join("t.hmsa");
    let bytes = fs::read(&hmsa).unwrap();
    fs::write(&hmsa, &bytes[..20]).unwrap();

    assert!(matches!(
        read(&path, ReaderConfig::default()),
        Err(HmsaError::InvalidDocument(_))
    ));
}

#[test]
fn test_user_header_entries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("h.xml");
    let mut datafile = minimal();
    datafile.header_mut().set_extra("Operator", "Jane").unwrap();
    write(&datafile, &path, WriterConfig::default());

    let loaded = read(&path, ReaderConfig::default()).unwrap();
    assert_eq!(
        loaded.header().extras().next().map(|(k, v)| (k, v.as_str())),
        Some(("Operator", "Jane"))
    );
}

#[test]
fn test_invalid_language() {
    let config = WriterConfig {
        language: "xx-YY".to_string(),
        ..WriterConfig::default()
    };
    let mut writer = HmsaWriter::new(config);
    let dir = tempdir().unwrap();
    assert!(matches!(
        writer.start(&minimal(), dir.path().join("l.xml")),
        Err(HmsaError::ValidationError(_))
    ));
    assert_eq!(writer.state(), TaskState::Idle);
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        read(&dir.path().join("absent.xml"), ReaderConfig::default()),
        Err(HmsaError::IoError(_))
    ));
}

#[test]
fn test_not_started() {
    let mut reader = HmsaReader::new(ReaderConfig::default());
    assert!(matches!(reader.get(), Err(HmsaError::NotStarted)));
    assert_eq!(reader.status(), "Idle");
    assert_eq!(reader.progress(), 0.0);
    assert!(!reader.is_alive());
}

#[test]
fn test_completed_status() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("p.xml");
    write(&minimal(), &path, WriterConfig::default());

    let mut reader = HmsaReader::new(ReaderConfig::default());
    reader.start(&path).unwrap();
    assert!(reader.join(None).unwrap());
    assert_eq!(reader.status(), "Completed");
    assert_eq!(reader.progress(), 1.0);
    assert_eq!(reader.state(), TaskState::Completed);
    reader.get().unwrap();
}

#[test]
fn test_header_whitespace_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("w.xml");
    let mut datafile = minimal();
    datafile.header_mut().set_title("  padded title  ").unwrap();
    datafile.header_mut().set_extra("Note", "line one\n").unwrap();
    write(&datafile, &path, WriterConfig::default());

    let loaded = read(&path, ReaderConfig::default()).unwrap();
    assert_eq!(
        loaded.header().title().map(|t| t.as_str()),
        Some("  padded title  ")
    );
    assert_eq!(loaded, datafile);
}

#[test]
fn test_cancelled_read_yields_no_document() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cancel.xml");
    write(&minimal(), &path, WriterConfig::default());

    // The read starts only once the cancel flag is set.
    let (release, gate) = crossbeam_channel::bounded::<()>(0);
    let pair = FilePair::new(&path);
    let mut task = crate::task::Task::spawn("hmsa-reader", move |monitor| {
        gate.recv().ok();
        reader::read_pair(&pair, &ReaderConfig::default(), monitor)
    })
    .unwrap();
    task.cancel();
    release.send(()).unwrap();

    assert!(task.join(None).is_err());
    assert_eq!(task.status(), "Cancelled");
    assert_eq!(task.progress(), 1.0);
    assert_eq!(task.state(), TaskState::Cancelled);
    assert!(matches!(task.get(), Err(HmsaError::Cancelled)));
}

#[test]
fn test_written_checksum_does_not_break_equality() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sum.xml");
    let datafile = minimal();
    write(&datafile, &path, WriterConfig::default());

    let loaded = read(&path, ReaderConfig::default()).unwrap();
    assert!(datafile.header().checksum().is_none());
    assert!(loaded.header().checksum().is_some());
    assert_eq!(loaded, datafile);

    let mut author_changed = loaded.clone();
    author_changed.header_mut().set_author("someone").unwrap();
    assert_ne!(author_changed, datafile);
}
