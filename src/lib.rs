//! # hmsa - Hyper-dimensional Microanalysis Data Format
//!
//! `hmsa` reads and writes HMSA documents: microanalysis measurements
//! (spectra, maps, hyperimages) together with the experimental conditions
//! under which they were acquired.
//!
//! ## Key Features
//!
//! - **File pair**: a human-readable `.xml` document (header, conditions,
//!   datum descriptors) bound by an 8-byte UID to a `.hmsa` binary file of
//!   little-endian payloads.
//!
//! - **Typed conditions**: probes, detectors with calibrations and windows,
//!   acquisitions, specimens, compositions and elemental identifications,
//!   each validated on every attribute assignment.
//!
//! - **Shared conditions**: data reference conditions stored once in the
//!   document; equal conditions are reused and identifier collisions are
//!   renamed.
//!
//! - **Units**: SI prefixes, exponents and the non-SI bases Å, degrees and
//!   eV, normalized and converted.
//!
//! - **Background I/O**: reads and writes run on a worker thread with
//!   progress, status and cooperative cancellation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hmsa::prelude::*;
//!
//! let mut datafile = DataFile::new();
//! datafile.header_mut().set_title("Fe-Cr alloy")?;
//! datafile.insert_condition("Probe0", ProbeEm::new(15.0)?)?;
//!
//! let spectrum = Datum::analysis1d(vec![0i32, 12, 453, 97])?
//!     .with_condition("Element", ElementalID::new(26)?)?;
//! datafile.insert_datum("Spectrum0", spectrum)?;
//!
//! let stats = datafile.write("alloy.xml")?;
//! println!("{}", stats);
//!
//! let loaded = DataFile::read("alloy.hmsa")?;
//! assert_eq!(loaded, datafile);
//! # Ok::<(), hmsa::HmsaError>(())
//! ```
//!
//! This creates two files:
//! ```text
//! alloy.xml    # header, conditions and datum descriptors
//! alloy.hmsa   # UID followed by the datum payloads
//! ```
//!
//! ## Architecture
//!
//! - [`types`]: identifiers, units, numerical values, language strings
//! - [`parameter`]: attribute tables shared by the header and conditions
//! - [`container`]: identifier-keyed ordered map with change events
//! - [`condition`]: the condition types
//! - [`datum`]: typed N-dimensional data
//! - [`datafile`]: the document and its condition linkage
//! - [`handler`]: conversion to and from XML elements
//! - [`fileformat`]: the file pair reader and writer
//! - [`task`]: monitored background work
//! - [`validator`]: integrity checks of a file pair

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![allow(clippy::too_many_arguments)]

#[macro_use]
pub mod parameter;

pub mod condition;
pub mod container;
pub mod datafile;
pub mod datum;
/// Error types
pub mod error;
pub mod fileformat;
pub mod handler;
pub mod header;
pub mod task;
pub mod types;
pub mod validator;
pub mod xml;

pub use datafile::DataFile;
pub use error::{HmsaError, Result};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::condition::*;
    pub use crate::container::{ContainerEvent, IdentifierMap};
    pub use crate::datafile::{
        ConditionRetention, ConditionsView, DataFile, DataFileConfig, DatumRef, LinkedDatum,
    };
    pub use crate::datum::{Datum, DatumKind};
    pub use crate::error::{HmsaError, Result};
    pub use crate::fileformat::{HmsaReader, HmsaWriter, ReaderConfig, WriteStats, WriterConfig};
    pub use crate::header::Header;
    pub use crate::parameter::{AttributeValue, Parameter, ParameterType};
    pub use crate::task::{Monitorable, TaskState};
    pub use crate::types::{
        convert_unit, validate_unit, AtomicNumber, Checksum, ChecksumAlgorithm, DataType, LangStr,
        NdArray, Notation, Numerical, NumericalRange, Scalar, XRayLine,
    };
    pub use crate::validator::{validate_hmsa_file, ValidationReport};
}
