//! # HMSA Validation Module
//!
//! Integrity checks for an `.xml` + `.hmsa` file pair, run without trusting
//! the reader:
//!
//! 1. **Structure**: both files exist, the root element is
//!    `MSAHyperDimensionalDataFile` with version 1.0
//! 2. **UID binding**: the binary file starts with the UID of the XML root
//! 3. **Descriptors**: each datum declares a consistent layout whose payload
//!    lies inside the binary file, without overlapping another payload
//! 4. **Checksum**: the header checksum matches the binary file
//! 5. **Full read**: the document loads into a [`DataFile`](crate::DataFile)
//!
//! ```rust,no_run
//! use hmsa::validator::validate_hmsa_file;
//! use std::path::Path;
//!
//! let report = validate_hmsa_file(Path::new("data.xml"));
//! println!("{}", report);
//! if report.has_failures() {
//!     std::process::exit(1);
//! }
//! ```

use std::path::Path;

use log::debug;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

mod data;
mod integrity;
mod report;
mod structure;

/// Validate the file pair named by `path` (either file).
pub fn validate_hmsa_file(path: &Path) -> ValidationReport {
    let mut report = ValidationReport::new(path.display().to_string());

    let Some((pair, root)) = structure::check_structure(path, &mut report) else {
        return report;
    };
    let Some(mut binary) = structure::check_uid(&pair, &root, &mut report) else {
        return report;
    };

    data::check_descriptors(&root, binary.len(), &mut report);
    integrity::check_checksum(&root, &mut binary, &mut report);
    integrity::check_full_read(&pair.xml, &mut report);

    debug!(
        "Validated {}: {} passed, {} warnings, {} failed",
        report.file_path,
        report.success_count(),
        report.warning_count(),
        report.failure_count()
    );
    report
}
