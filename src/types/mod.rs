//! Value types shared by every HMSA entity.

pub mod checksum;
pub mod element;
pub mod identifier;
pub mod language;
pub mod numerical;
pub mod unit;
pub mod xrayline;

pub use checksum::{Checksum, ChecksumAlgorithm, ChecksumHasher};
pub use element::{AtomicNumber, NumericalRange, MAX_ATOMIC_NUMBER};
pub use identifier::{glob_match, validate_identifier};
pub use language::{validate_language_tag, LangStr};
pub use numerical::{DataType, NdArray, NumericValue, Numerical, Scalar};
pub use unit::{convert_unit, validate_unit, Unit};
pub use xrayline::{Notation, XRayLine};
