use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::fileformat::binary::{BinaryReader, FilePair};
use crate::fileformat::{open_binary, read_root};
use crate::xml::Element;

use super::{ValidationCheck, ValidationReport};

/// Step 1: both files exist and the XML root is a version 1.0 document.
pub(crate) fn check_structure(path: &Path, report: &mut ValidationReport) -> Option<(FilePair, Element)> {
    let pair = FilePair::new(path);
    let mut missing = false;
    for (name, file) in [("XML document exists", &pair.xml), ("Binary file exists", &pair.hmsa)] {
        if file.is_file() {
            report.add_check(ValidationCheck::ok(name));
        } else {
            report.add_check(ValidationCheck::failed(
                name,
                format!("Missing {}", file.display()),
            ));
            missing = true;
        }
    }
    if missing {
        return None;
    }

    let root = read_root(&pair);
    report.add_check(ValidationCheck::from_result("Root element and version", &root));
    let root = root.ok()?;

    for section in ["Header", "Conditions", "Data"] {
        let name = format!("<{}> section", section);
        if root.child(section).is_some() {
            report.add_check(ValidationCheck::ok(name));
        } else {
            report.add_check(ValidationCheck::warning(name, "Section is absent"));
        }
    }
    Some((pair, root))
}

/// Step 2: the binary file starts with the UID of the XML root.
pub(crate) fn check_uid(
    pair: &FilePair,
    root: &Element,
    report: &mut ValidationReport,
) -> Option<BinaryReader<BufReader<File>>> {
    let binary = open_binary(pair, root);
    report.add_check(ValidationCheck::from_result("UID binding", &binary));
    binary.ok()
}
