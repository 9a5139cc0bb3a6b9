//! Experimental conditions attached to data by identifier.
//!
//! [`Condition`] is a closed sum over every condition type. Each type is a
//! [`Parameter`] with a document tag and, for most, a `Class`
//! discriminator.
//!
//! ```
//! use hmsa::prelude::*;
//!
//! let condition = Condition::from(ElementalID::new(13).unwrap());
//! assert_eq!(condition.tag(), "ElementalID");
//!
//! let id = condition.downcast_ref::<ElementalID>().unwrap();
//! assert_eq!(id.atomic_number().unwrap().get(), 13);
//! assert!(condition.downcast_ref::<ProbeEm>().is_none());
//! ```

mod acquisition;
mod calibration;
mod composition;
mod detector;
mod elementalid;
mod instrument;
mod probe;
mod region;
mod specimen;
mod specimenposition;

#[cfg(test)]
mod tests;

pub use acquisition::{
    AcquisitionMultipoint, AcquisitionPoint, AcquisitionRasterLinescan, AcquisitionRasterXY,
    AcquisitionRasterXYZ, RasterMode, RasterModeZ,
};
pub use calibration::{
    Calibration, CalibrationConstant, CalibrationExplicit, CalibrationLinear,
    CalibrationPolynomial, CalibrationType,
};
pub use composition::{CompositionElemental, CompositionUnit};
pub use detector::{
    CollectionMode, DetectorCamera, DetectorSpectrometer, DetectorSpectrometerCL,
    DetectorSpectrometerWDS, DetectorSpectrometerXEDS, SignalType, Window, WindowLayer,
    XedsTechnology,
};
pub use elementalid::{ElementalID, ElementalIDXray};
pub use instrument::Instrument;
pub use probe::{GunType, LensMode, ProbeEm, ProbeTem};
pub use region::RegionOfInterest;
pub use specimen::{Specimen, SpecimenLayer, SpecimenMultilayer};
pub use specimenposition::SpecimenPosition;

use crate::container::IdentifierMap;
use crate::parameter::Parameter;

/// A concrete condition type, recoverable from a [`Condition`].
pub trait ConditionType: Parameter + Into<Condition> + Clone {
    /// Borrow the inner value if `condition` holds this type.
    fn from_condition(condition: &Condition) -> Option<&Self>;

    /// Mutably borrow the inner value if `condition` holds this type.
    fn from_condition_mut(condition: &mut Condition) -> Option<&mut Self>;
}

macro_rules! conditions {
    ($( $(#[$meta:meta])* $variant:ident($ty:ty) ),+ $(,)?) => {
        /// Any condition.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Condition {
            $( $(#[$meta])* $variant($ty), )+
        }

        impl Condition {
            /// The condition as a generic parameter.
            pub fn as_parameter(&self) -> &dyn Parameter {
                match self {
                    $( Condition::$variant(c) => c, )+
                }
            }

            /// The condition as a mutable generic parameter.
            pub fn as_parameter_mut(&mut self) -> &mut dyn Parameter {
                match self {
                    $( Condition::$variant(c) => c, )+
                }
            }

            /// Variant name.
            pub fn kind(&self) -> &'static str {
                match self {
                    $( Condition::$variant(_) => stringify!($variant), )+
                }
            }
        }

        $(
            impl From<$ty> for Condition {
                fn from(condition: $ty) -> Self {
                    Condition::$variant(condition)
                }
            }

            impl ConditionType for $ty {
                fn from_condition(condition: &Condition) -> Option<&Self> {
                    match condition {
                        Condition::$variant(c) => Some(c),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                fn from_condition_mut(condition: &mut Condition) -> Option<&mut Self> {
                    match condition {
                        Condition::$variant(c) => Some(c),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+
    };
}

conditions! {
    /// Single point acquisition
    AcquisitionPoint(AcquisitionPoint),
    /// Multipoint acquisition
    AcquisitionMultipoint(AcquisitionMultipoint),
    /// Line scan
    AcquisitionRasterLinescan(AcquisitionRasterLinescan),
    /// 2-D raster
    AcquisitionRasterXY(AcquisitionRasterXY),
    /// 3-D raster
    AcquisitionRasterXYZ(AcquisitionRasterXYZ),
    /// Elemental composition
    CompositionElemental(CompositionElemental),
    /// Camera
    DetectorCamera(DetectorCamera),
    /// Generic spectrometer
    DetectorSpectrometer(DetectorSpectrometer),
    /// CL spectrometer
    DetectorSpectrometerCL(DetectorSpectrometerCL),
    /// WDS spectrometer
    DetectorSpectrometerWDS(DetectorSpectrometerWDS),
    /// XEDS spectrometer
    DetectorSpectrometerXEDS(DetectorSpectrometerXEDS),
    /// Element
    ElementalID(ElementalID),
    /// Element and X-ray line
    ElementalIDXray(ElementalIDXray),
    /// Instrument
    Instrument(Instrument),
    /// SEM/EPMA probe
    ProbeEm(ProbeEm),
    /// TEM probe
    ProbeTem(ProbeTem),
    /// Channel range
    RegionOfInterest(RegionOfInterest),
    /// Specimen
    Specimen(Specimen),
    /// Layered specimen
    SpecimenMultilayer(SpecimenMultilayer),
    /// Position on the specimen
    SpecimenPosition(SpecimenPosition),
}

impl Condition {
    /// Document tag.
    pub fn tag(&self) -> &'static str {
        self.as_parameter().tag()
    }

    /// `Class` discriminator.
    pub fn class(&self) -> Option<&'static str> {
        self.as_parameter().class()
    }

    /// Check required attributes.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.as_parameter().validate()
    }

    /// Borrow as a concrete type.
    pub fn downcast_ref<T: ConditionType>(&self) -> Option<&T> {
        T::from_condition(self)
    }

    /// Mutably borrow as a concrete type.
    pub fn downcast_mut<T: ConditionType>(&mut self) -> Option<&mut T> {
        T::from_condition_mut(self)
    }

    /// Whether this condition holds a `T`.
    pub fn is<T: ConditionType>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

impl IdentifierMap<Condition> {
    /// Conditions of concrete type `T`, in insertion order.
    pub fn find_by_type<T: ConditionType>(&self) -> Vec<(&str, &T)> {
        self.iter()
            .filter_map(|(id, condition)| condition.downcast_ref::<T>().map(|c| (id, c)))
            .collect()
    }
}
