use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::datafile::DataFile;
use crate::fileformat::binary::BinaryReader;
use crate::fileformat::{read_header, ReaderConfig};
use crate::xml::Element;

use super::{ValidationCheck, ValidationReport};

/// Step 4: the header checksum matches the binary file.
pub(crate) fn check_checksum(
    root: &Element,
    binary: &mut BinaryReader<BufReader<File>>,
    report: &mut ValidationReport,
) {
    const NAME: &str = "Header checksum";
    let header = match root.child("Header").map(read_header).transpose() {
        Ok(header) => header.unwrap_or_default(),
        Err(e) => {
            report.add_check(ValidationCheck::failed(NAME, e.to_string()));
            return;
        }
    };
    let Some(expected) = header.checksum() else {
        report.add_check(ValidationCheck::warning(NAME, "Document carries no checksum"));
        return;
    };
    match binary.checksum(expected.algorithm()) {
        Ok(actual) if &actual == expected => report.add_check(ValidationCheck::ok(NAME)),
        Ok(actual) => report.add_check(ValidationCheck::failed(
            NAME,
            format!("header has {}, binary file has {}", expected, actual),
        )),
        Err(e) => report.add_check(ValidationCheck::failed(NAME, e.to_string())),
    }
}

/// Step 5: the whole document loads.
pub(crate) fn check_full_read(path: &Path, report: &mut ValidationReport) {
    match DataFile::read_with(path, ReaderConfig::relaxed()) {
        Ok(datafile) => report.add_check(ValidationCheck::ok(format!(
            "Full read ({} conditions, {} data)",
            datafile.conditions().len(),
            datafile.data().len()
        ))),
        Err(e) => report.add_check(ValidationCheck::failed("Full read", e.to_string())),
    }
}
