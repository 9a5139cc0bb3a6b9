//! Content of condition elements beyond the attribute table.

use super::attribute::{decode_attributes, decode_numerical, encode_attributes, encode_numerical};
use super::calibration_registry;
use crate::condition::*;
use crate::error::{HmsaError, Result};
use crate::types::{validate_unit, Numerical};
use crate::xml::Element;

/// Child elements a type writes and reads by hand, next to its attributes.
pub trait ElementExtras {
    /// Append the hand-written children to `element`.
    fn write_extras(&self, _element: &mut Element, _version: &str) -> Result<()> {
        Ok(())
    }

    /// Read back what [`write_extras`](Self::write_extras) wrote.
    fn read_extras(&mut self, _element: &Element, _version: &str) -> Result<()> {
        Ok(())
    }
}

macro_rules! no_extras {
    ($($ty:ty),+ $(,)?) => {
        $( impl ElementExtras for $ty {} )+
    };
}

no_extras!(
    DetectorCamera,
    ElementalID,
    ElementalIDXray,
    Instrument,
    ProbeEm,
    ProbeTem,
    RegionOfInterest,
    Specimen,
    SpecimenPosition,
);

macro_rules! calibration_extras {
    ($($ty:ty),+) => {
        $(
            impl ElementExtras for $ty {
                fn read_extras(&mut self, _element: &Element, _version: &str) -> Result<()> {
                    if let Some(unit) = self.unit() {
                        validate_unit(unit)?;
                    }
                    Ok(())
                }
            }
        )+
    };
}

calibration_extras!(
    CalibrationConstant,
    CalibrationLinear,
    CalibrationPolynomial,
    CalibrationExplicit
);

fn position_element(name: &str, position: &SpecimenPosition) -> Element {
    let mut element = Element::new(name);
    encode_attributes(position, &mut element);
    element
}

fn read_position(element: &Element) -> Result<SpecimenPosition> {
    let mut position = SpecimenPosition::new();
    decode_attributes(&mut position, element)?;
    Ok(position)
}

impl ElementExtras for AcquisitionPoint {
    fn write_extras(&self, element: &mut Element, _version: &str) -> Result<()> {
        element.push(position_element("SpecimenPosition", self.position()));
        Ok(())
    }

    fn read_extras(&mut self, element: &Element, _version: &str) -> Result<()> {
        self.set_position(read_position(element.required_child("SpecimenPosition")?)?);
        Ok(())
    }
}

impl ElementExtras for AcquisitionMultipoint {
    fn write_extras(&self, element: &mut Element, _version: &str) -> Result<()> {
        let mut positions =
            Element::new("Positions").with_attribute("Count", self.point_count().to_string());
        for (index, position) in self.positions().iter().enumerate() {
            positions.push(
                position_element("SpecimenPosition", position)
                    .with_attribute("Index", index.to_string()),
            );
        }
        element.push(positions);
        Ok(())
    }

    fn read_extras(&mut self, element: &Element, _version: &str) -> Result<()> {
        let positions = element.required_child("Positions")?;
        let mut indexed = Vec::new();
        for child in positions.children_named("SpecimenPosition") {
            let index: usize = child
                .required_attribute("Index")?
                .parse()
                .map_err(|_| HmsaError::document("Invalid SpecimenPosition Index"))?;
            indexed.push((index, read_position(child)?));
        }
        if let Some(count) = positions.attribute("Count") {
            if count.parse::<usize>().ok() != Some(indexed.len()) {
                return Err(HmsaError::document(format!(
                    "Positions declares {} points, found {}",
                    count,
                    indexed.len()
                )));
            }
        }
        indexed.sort_by_key(|(index, _)| *index);
        if indexed.is_empty() {
            return Err(HmsaError::document("Multipoint acquisition without positions"));
        }
        for (_, position) in indexed {
            self.push_position(position);
        }
        Ok(())
    }
}

impl ElementExtras for AcquisitionRasterLinescan {
    fn write_extras(&self, element: &mut Element, _version: &str) -> Result<()> {
        element.push(position_element("PositionStart", self.position_start()));
        element.push(position_element("PositionEnd", self.position_end()));
        Ok(())
    }

    fn read_extras(&mut self, element: &Element, _version: &str) -> Result<()> {
        self.set_position_start(read_position(element.required_child("PositionStart")?)?);
        self.set_position_end(read_position(element.required_child("PositionEnd")?)?);
        Ok(())
    }
}

macro_rules! raster_extras {
    ($($ty:ty),+) => {
        $(
            impl ElementExtras for $ty {
                fn write_extras(&self, element: &mut Element, _version: &str) -> Result<()> {
                    if let Some(position) = self.position() {
                        element.push(position_element("SpecimenPosition", position));
                    }
                    Ok(())
                }

                fn read_extras(&mut self, element: &Element, _version: &str) -> Result<()> {
                    let position = element.child("SpecimenPosition").map(read_position).transpose()?;
                    self.set_position(position);
                    Ok(())
                }
            }
        )+
    };
}

raster_extras!(AcquisitionRasterXY, AcquisitionRasterXYZ);

impl ElementExtras for CompositionElemental {
    fn write_extras(&self, element: &mut Element, _version: &str) -> Result<()> {
        for (z, value) in self.iter() {
            element.push(
                encode_numerical("Element", &Numerical::unitless(value))
                    .with_attribute("Z", z.get().to_string()),
            );
        }
        Ok(())
    }

    fn read_extras(&mut self, element: &Element, _version: &str) -> Result<()> {
        for child in element.children_named("Element") {
            let z: u8 = child
                .required_attribute("Z")?
                .trim()
                .parse()
                .map_err(|_| HmsaError::document("Invalid composition atomic number"))?;
            self.insert(z, decode_numerical(child)?.as_f64())?;
        }
        Ok(())
    }
}

impl ElementExtras for SpecimenMultilayer {
    fn write_extras(&self, element: &mut Element, _version: &str) -> Result<()> {
        let mut layers = Element::new("Layers");
        for layer in self.layers() {
            let mut child = Element::new("Layer");
            encode_attributes(layer, &mut child);
            layers.push(child);
        }
        element.push(layers);
        Ok(())
    }

    fn read_extras(&mut self, element: &Element, _version: &str) -> Result<()> {
        if let Some(layers) = element.child("Layers") {
            for child in layers.children_named("Layer") {
                let mut layer = SpecimenLayer::new();
                decode_attributes(&mut layer, child)?;
                self.push_layer(layer);
            }
        }
        Ok(())
    }
}

fn write_calibration(
    calibration: Option<&Calibration>,
    element: &mut Element,
    version: &str,
) -> Result<()> {
    if let Some(calibration) = calibration {
        element.push(calibration_registry(version).convert(calibration)?);
    }
    Ok(())
}

fn read_calibration(element: &Element, version: &str) -> Result<Option<Calibration>> {
    element
        .child("Calibration")
        .map(|child| calibration_registry(version).parse(child))
        .transpose()
}

fn write_window(window: Option<&Window>, element: &mut Element) {
    if let Some(window) = window {
        let mut child = Element::new("Window");
        for layer in window.layers() {
            child.push(
                encode_numerical("Layer", layer.thickness())
                    .with_attribute("Material", layer.material()),
            );
        }
        element.push(child);
    }
}

fn read_window(element: &Element) -> Result<Option<Window>> {
    let Some(child) = element.child("Window") else {
        return Ok(None);
    };
    let mut window = Window::new();
    for layer in child.children_named("Layer") {
        let material = layer.required_attribute("Material")?;
        window.push_layer(WindowLayer::new(material, decode_numerical(layer)?)?);
    }
    Ok(Some(window))
}

macro_rules! spectrometer_extras {
    (windowed $($ty:ty),+) => {
        $(
            impl ElementExtras for $ty {
                fn write_extras(&self, element: &mut Element, version: &str) -> Result<()> {
                    write_calibration(self.calibration(), element, version)?;
                    write_window(self.window(), element);
                    Ok(())
                }

                fn read_extras(&mut self, element: &Element, version: &str) -> Result<()> {
                    if let Some(calibration) = read_calibration(element, version)? {
                        self.set_calibration(calibration);
                    }
                    self.set_window(read_window(element)?);
                    Ok(())
                }
            }
        )+
    };
    ($($ty:ty),+) => {
        $(
            impl ElementExtras for $ty {
                fn write_extras(&self, element: &mut Element, version: &str) -> Result<()> {
                    write_calibration(self.calibration(), element, version)
                }

                fn read_extras(&mut self, element: &Element, version: &str) -> Result<()> {
                    if let Some(calibration) = read_calibration(element, version)? {
                        self.set_calibration(calibration);
                    }
                    Ok(())
                }
            }
        )+
    };
}

spectrometer_extras!(DetectorSpectrometer, DetectorSpectrometerCL);
spectrometer_extras!(windowed DetectorSpectrometerWDS, DetectorSpectrometerXEDS);
