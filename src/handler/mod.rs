//! Conversion between the data model and document elements.
//!
//! Handlers come from static tables of constructors, one table per entity
//! family: conditions, calibrations nested inside spectrometers, and data.
//! Parsing selects the single handler whose `can_parse` accepts an element;
//! converting selects the first handler whose `can_convert` accepts the
//! entity.
//!
//! ```
//! use hmsa::handler::{condition_registry, VERSION};
//! use hmsa::prelude::*;
//!
//! let registry = condition_registry(VERSION);
//! let condition = Condition::from(ProbeEm::new(15.0).unwrap());
//! let element = registry.convert(&condition).unwrap();
//! assert_eq!(element.name, "Probe");
//! assert_eq!(element.attribute("Class"), Some("EM"));
//! assert_eq!(registry.parse(&element).unwrap(), condition);
//! ```

pub mod attribute;
mod condition;
pub mod datum;

#[cfg(test)]
mod tests;

use std::marker::PhantomData;

use crate::condition::{Calibration, CalibrationType, Condition, ConditionType};
use crate::error::{HmsaError, Result};
use crate::parameter::ParameterType;
use crate::xml::Element;

pub use condition::ElementExtras;
pub use datum::{
    datum_handlers, ArrayDatumHandler, DatumHandler, Descriptor, PayloadSink, PayloadSource,
};

/// Document version produced and understood.
pub const VERSION: &str = "1.0";

/// Parses and converts one concrete entity type of the family `E`.
pub trait Handler<E>: Send + Sync {
    /// Document version the handler was built for.
    fn version(&self) -> &str;

    /// Whether `element` describes this handler's type.
    fn can_parse(&self, element: &Element) -> bool;

    /// Build the entity described by `element`.
    fn parse(&self, element: &Element) -> Result<E>;

    /// Whether `entity` is of this handler's type.
    fn can_convert(&self, entity: &E) -> bool;

    /// Serialize `entity` to an element.
    fn convert(&self, entity: &E) -> Result<Element>;
}

/// Constructor of a handler for a document version.
pub type HandlerFactory<E> = fn(&str) -> Box<dyn Handler<E>>;

/// A concrete type of the entity family `E`.
pub trait Variant<E>: ParameterType + ElementExtras + Into<E> + 'static {
    /// Borrow `entity` as this type if it is one.
    fn downcast(entity: &E) -> Option<&Self>;
}

impl<T> Variant<Condition> for T
where
    T: ConditionType + ParameterType + ElementExtras + 'static,
{
    fn downcast(entity: &Condition) -> Option<&Self> {
        entity.downcast_ref::<T>()
    }
}

impl<T> Variant<Calibration> for T
where
    T: CalibrationType + ElementExtras + 'static,
{
    fn downcast(entity: &Calibration) -> Option<&Self> {
        T::from_calibration(entity)
    }
}

/// Handler driven by a type's attribute table, plus its [`ElementExtras`].
pub struct ParameterHandler<T> {
    version: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ParameterHandler<T> {
    /// Handler registry for documents of version `version`.
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            _marker: PhantomData,
        }
    }
}

impl<E, T> Handler<E> for ParameterHandler<T>
where
    E: 'static,
    T: Variant<E>,
{
    fn version(&self) -> &str {
        &self.version
    }

    fn can_parse(&self, element: &Element) -> bool {
        element.name == T::TAG && element.attribute("Class") == T::CLASS
    }

    fn parse(&self, element: &Element) -> Result<E> {
        let mut entity = T::empty();
        attribute::decode_attributes(&mut entity, element)?;
        entity.read_extras(element, &self.version)?;
        entity.validate()?;
        Ok(entity.into())
    }

    fn can_convert(&self, entity: &E) -> bool {
        T::downcast(entity).is_some()
    }

    fn convert(&self, entity: &E) -> Result<Element> {
        let entity = T::downcast(entity).ok_or_else(|| {
            HmsaError::TypeMismatch(format!("handler for {} got another type", T::TAG))
        })?;
        let mut element = Element::new(T::TAG);
        if let Some(class) = T::CLASS {
            element.set_attribute("Class", class);
        }
        attribute::encode_attributes(entity, &mut element);
        entity.write_extras(&mut element, &self.version)?;
        Ok(element)
    }
}

fn factory<E: 'static, T: Variant<E>>(version: &str) -> Box<dyn Handler<E>> {
    Box::new(ParameterHandler::<T>::new(version))
}

/// Every condition handler.
pub static CONDITION_HANDLERS: &[HandlerFactory<Condition>] = {
    use crate::condition::*;
    &[
        factory::<Condition, AcquisitionPoint>,
        factory::<Condition, AcquisitionMultipoint>,
        factory::<Condition, AcquisitionRasterLinescan>,
        factory::<Condition, AcquisitionRasterXY>,
        factory::<Condition, AcquisitionRasterXYZ>,
        factory::<Condition, CompositionElemental>,
        factory::<Condition, DetectorCamera>,
        factory::<Condition, DetectorSpectrometer>,
        factory::<Condition, DetectorSpectrometerCL>,
        factory::<Condition, DetectorSpectrometerWDS>,
        factory::<Condition, DetectorSpectrometerXEDS>,
        factory::<Condition, ElementalID>,
        factory::<Condition, ElementalIDXray>,
        factory::<Condition, Instrument>,
        factory::<Condition, ProbeEm>,
        factory::<Condition, ProbeTem>,
        factory::<Condition, RegionOfInterest>,
        factory::<Condition, Specimen>,
        factory::<Condition, SpecimenMultilayer>,
        factory::<Condition, SpecimenPosition>,
    ]
};

/// Every calibration handler.
pub static CALIBRATION_HANDLERS: &[HandlerFactory<Calibration>] = {
    use crate::condition::*;
    &[
        factory::<Calibration, CalibrationConstant>,
        factory::<Calibration, CalibrationLinear>,
        factory::<Calibration, CalibrationPolynomial>,
        factory::<Calibration, CalibrationExplicit>,
    ]
};

/// Handlers of one entity family, built for a document version.
pub struct HandlerRegistry<E> {
    handlers: Vec<Box<dyn Handler<E>>>,
}

impl<E> HandlerRegistry<E> {
    /// Instantiate every factory for `version`.
    pub fn new(factories: &[HandlerFactory<E>], version: &str) -> Self {
        Self {
            handlers: factories.iter().map(|factory| factory(version)).collect(),
        }
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Parse with the unique handler accepting `element`.
    ///
    /// # Errors
    ///
    /// [`HmsaError::InvalidDocument`] when no handler or several handlers
    /// accept the element.
    pub fn parse(&self, element: &Element) -> Result<E> {
        let mut candidates = self.handlers.iter().filter(|h| h.can_parse(element));
        let describe = || match element.attribute("Class") {
            Some(class) => format!("<{} Class=\"{}\">", element.name, class),
            None => format!("<{}>", element.name),
        };
        let handler = candidates
            .next()
            .ok_or_else(|| HmsaError::document(format!("No handler for {}", describe())))?;
        if candidates.next().is_some() {
            return Err(HmsaError::document(format!(
                "Several handlers accept {}",
                describe()
            )));
        }
        handler.parse(element)
    }

    /// Convert with the first handler accepting `entity`.
    pub fn convert(&self, entity: &E) -> Result<Element> {
        self.handlers
            .iter()
            .find(|h| h.can_convert(entity))
            .ok_or_else(|| HmsaError::TypeMismatch("No handler converts this entity".to_string()))?
            .convert(entity)
    }
}

/// Condition handlers for `version`.
pub fn condition_registry(version: &str) -> HandlerRegistry<Condition> {
    HandlerRegistry::new(CONDITION_HANDLERS, version)
}

/// Calibration handlers for `version`.
pub fn calibration_registry(version: &str) -> HandlerRegistry<Calibration> {
    HandlerRegistry::new(CALIBRATION_HANDLERS, version)
}
