use super::datum::{convert_datum, parse_datum};
use super::*;
use crate::condition::*;
use crate::datafile::DataFile;
use crate::datum::{Datum, DatumKind};
use crate::parameter::ParameterType;
use crate::types::{Notation, NdArray, XRayLine};

fn round_trip(condition: Condition) {
    let registry = condition_registry(VERSION);
    let element = registry.convert(&condition).unwrap();
    let parsed = registry.parse(&element).unwrap();
    assert_eq!(parsed, condition, "{}", condition.kind());
}

fn position(x: f64, y: f64) -> SpecimenPosition {
    SpecimenPosition::from_xyz(x, y, 0.0).unwrap()
}

#[test]
fn test_registry_covers_every_condition() {
    assert_eq!(condition_registry(VERSION).len(), 20);
    assert_eq!(calibration_registry(VERSION).len(), 4);
    assert_eq!(datum_handlers(VERSION).len(), 3);
}

#[test]
fn test_probe_and_instrument_round_trip() {
    let mut probe = ProbeTem::new(200.0).unwrap();
    probe.set_gun_type(GunType::SchottkyFieldEmission).unwrap();
    probe.set_lens_mode(LensMode::Diffraction).unwrap();
    probe.set_camera_magnification(1000.0).unwrap();
    round_trip(probe.into());
    round_trip(Instrument::new("Acme", "X1").unwrap().into());
}

#[test]
fn test_spectrometer_round_trip() {
    let calibration = CalibrationLinear::new("Energy", "eV", 2.49985, -237.098251).unwrap();
    let mut xeds = DetectorSpectrometerXEDS::new(4096, calibration).unwrap();
    xeds.set_technology(XedsTechnology::Sdd).unwrap();
    xeds.set_window(Some(Window::new().with_layer("Al", 0.1).unwrap()));
    let condition = Condition::from(xeds);

    let element = condition_registry(VERSION).convert(&condition).unwrap();
    assert_eq!(element.name, "Detector");
    assert_eq!(element.attribute("Class"), Some("Spectrometer/XEDS"));
    let calibration = element.child("Calibration").unwrap();
    assert_eq!(calibration.attribute("Class"), Some("Linear"));
    let layer = element.child("Window").unwrap().child("Layer").unwrap();
    assert_eq!(layer.attribute("Material"), Some("Al"));
    assert_eq!(layer.attribute("Unit"), Some("um"));

    round_trip(condition);

    let explicit = CalibrationExplicit::new("Wavelength", "nm", vec![400.0, 410.0]).unwrap();
    round_trip(DetectorSpectrometerCL::new(2, explicit).unwrap().into());
    let polynomial = CalibrationPolynomial::new("Energy", "keV", vec![0.1, 0.01]).unwrap();
    round_trip(DetectorSpectrometerWDS::new(100, polynomial).unwrap().into());
    round_trip(DetectorCamera::new(512, 512).unwrap().into());
}

#[test]
fn test_acquisition_round_trip() {
    round_trip(AcquisitionPoint::new(position(1.0, 2.0)).into());
    round_trip(
        AcquisitionMultipoint::new(vec![position(0.0, 0.0), position(1.0, 1.0)])
            .unwrap()
            .into(),
    );
    round_trip(
        AcquisitionRasterLinescan::new(10, 0.5, position(0.0, 0.0), position(5.0, 0.0))
            .unwrap()
            .into(),
    );
    let mut raster = AcquisitionRasterXY::new(64, 32).unwrap();
    raster.set_raster_mode(RasterMode::Beam).unwrap();
    raster.set_position(Some(position(3.0, 4.0)));
    round_trip(raster.into());
    round_trip(AcquisitionRasterXYZ::new(4, 4, 2).unwrap().into());
}

#[test]
fn test_specimen_and_composition_round_trip() {
    let mut composition = CompositionElemental::new(CompositionUnit::MassPercent);
    composition.insert(26, 70.0).unwrap();
    composition.insert(24, 30.0).unwrap();
    round_trip(composition.into());

    let mut multilayer = SpecimenMultilayer::new("stack").unwrap();
    let mut layer = SpecimenLayer::new();
    layer.set_thickness(25.0).unwrap();
    multilayer.push_layer(layer);
    round_trip(multilayer.into());

    round_trip(Specimen::new("Fe-Cr").unwrap().into());
    round_trip(RegionOfInterest::new(10, 20).unwrap().into());
    round_trip(position(1.5, -2.5).into());
}

#[test]
fn test_elemental_id_round_trip() {
    round_trip(ElementalID::new(13).unwrap().into());
    let line = XRayLine::new("K-L3", Notation::Iupac)
        .unwrap()
        .with_alternative("Ka1")
        .unwrap();
    let mut xray = ElementalIDXray::new(29, line).unwrap();
    xray.set_energy(8047.8).unwrap();
    round_trip(xray.into());
}

#[test]
fn test_parse_unknown_element() {
    let registry = condition_registry(VERSION);
    let element = crate::xml::Element::new("Probe").with_attribute("Class", "Laser");
    assert!(matches!(
        registry.parse(&element),
        Err(HmsaError::InvalidDocument(_))
    ));
}

#[test]
fn test_parse_missing_required_attribute() {
    let registry = condition_registry(VERSION);
    let element = crate::xml::Element::new("Instrument");
    assert!(matches!(
        registry.parse(&element),
        Err(HmsaError::ValidationError(_))
    ));
}

#[test]
fn test_calibration_unit_checked_on_parse() {
    let registry = calibration_registry(VERSION);
    let calibration = Calibration::from(CalibrationConstant::new("Energy", "eV", 1.0).unwrap());
    let mut element = registry.convert(&calibration).unwrap();
    for child in element.children.iter_mut() {
        if child.name == "Unit" {
            child.text = "bananas".to_string();
        }
    }
    assert!(registry.parse(&element).is_err());
}

#[test]
fn test_handler_version() {
    let handler = ParameterHandler::<ProbeEm>::new("1.0");
    assert_eq!(Handler::<Condition>::version(&handler), "1.0");
    let element = crate::xml::Element::new("Probe").with_attribute("Class", "EM");
    assert!(Handler::<Condition>::can_parse(&handler, &element));
    assert!(!Handler::<Condition>::can_convert(
        &handler,
        &Condition::from(ProbeTem::empty())
    ));
}

/// In-memory payload area starting after an 8-byte UID.
#[derive(Default)]
struct Payloads {
    bytes: Vec<u8>,
}

impl PayloadSink for Payloads {
    fn write_payload(&mut self, bytes: &[u8]) -> crate::error::Result<u64> {
        let offset = 8 + self.bytes.len() as u64;
        self.bytes.extend_from_slice(bytes);
        Ok(offset)
    }
}

impl PayloadSource for Payloads {
    fn read_payload(&mut self, offset: u64, length: u64) -> crate::error::Result<Vec<u8>> {
        let start = offset
            .checked_sub(8)
            .ok_or_else(|| HmsaError::document("offset inside UID"))? as usize;
        let end = start + length as usize;
        self.bytes
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or_else(|| HmsaError::document("range outside payloads"))
    }
}

fn linked(datum: Datum) -> DataFile {
    let mut datafile = DataFile::new();
    datafile.insert_datum("d", datum).unwrap();
    datafile
}

#[test]
fn test_datum_descriptor_layout() {
    let handlers = datum_handlers(VERSION);
    let datafile = linked(Datum::analysis1d(vec![0i32, 1, 2, 3]).unwrap());
    let stored = datafile.data().get("d").unwrap();

    let mut payloads = Payloads::default();
    let element = convert_datum(&handlers, stored, &mut payloads).unwrap();
    let names: Vec<&str> = element.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["DatumType", "DataOffset", "DataLength", "DatumDimensions"]
    );
    assert_eq!(element.child("DataOffset").unwrap().text, "8");
    assert_eq!(element.child("DataLength").unwrap().text, "16");

    let datum = parse_datum(&handlers, &element, &mut payloads).unwrap();
    assert_eq!(datum.kind(), DatumKind::Analysis1D);
    assert_eq!(datum.array(), stored.array());
}

#[test]
fn test_image_datum_dimensions() {
    let handlers = datum_handlers(VERSION);
    let cube = NdArray::from_shape_vec(&[2, 3, 4], (0..24).collect::<Vec<u16>>()).unwrap();
    let datafile = linked(Datum::image_raster_2d_spectral(cube).unwrap());
    let stored = datafile.data().get("d").unwrap();

    let mut payloads = Payloads::default();
    let element = convert_datum(&handlers, stored, &mut payloads).unwrap();
    let collection = element.child("CollectionDimensions").unwrap();
    let sizes: Vec<(&str, &str)> = collection
        .children
        .iter()
        .map(|d| (d.attribute("Name").unwrap(), d.text.as_str()))
        .collect();
    assert_eq!(sizes, vec![("X", "2"), ("Y", "3")]);

    let datum = parse_datum(&handlers, &element, &mut payloads).unwrap();
    assert_eq!(datum.shape(), &[2, 3, 4]);
    assert_eq!(datum.value(&[1, 2, 3]).unwrap(), 23.0);
}

#[test]
fn test_datum_length_mismatch() {
    let handlers = datum_handlers(VERSION);
    let datafile = linked(Datum::analysis1d(vec![1.0f64, 2.0]).unwrap());
    let mut payloads = Payloads::default();
    let mut element =
        convert_datum(&handlers, datafile.data().get("d").unwrap(), &mut payloads).unwrap();
    for child in element.children.iter_mut() {
        if child.name == "DataLength" {
            child.text = "15".to_string();
        }
    }
    assert!(matches!(
        parse_datum(&handlers, &element, &mut payloads),
        Err(HmsaError::InvalidDocument(_))
    ));
}

#[test]
fn test_unknown_datum_tag() {
    let handlers = datum_handlers(VERSION);
    let mut payloads = Payloads::default();
    let element = crate::xml::Element::new("Analysis3D");
    assert!(parse_datum(&handlers, &element, &mut payloads).is_err());
}
