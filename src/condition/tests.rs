use super::*;
use crate::error::HmsaError;
use crate::parameter::ParameterType;
use crate::types::{Notation, Numerical, XRayLine};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_linear_calibration_call() {
    let calibration: Calibration = CalibrationLinear::new("Energy", "eV", 2.49985, -237.098251)
        .unwrap()
        .into();
    assert_close(calibration.call(0.0).unwrap(), -237.098251);
    assert_close(calibration.call(1.0).unwrap(), -234.598401);
    assert_eq!(calibration.unit(), Some("eV"));
    assert_eq!(calibration.quantity().unwrap().as_str(), "Energy");
}

#[test]
fn test_polynomial_and_constant_calibration() {
    let polynomial: Calibration = CalibrationPolynomial::new("Energy", "eV", vec![1.0, 2.0, 3.0])
        .unwrap()
        .into();
    assert_close(polynomial.call(2.0).unwrap(), 1.0 + 4.0 + 12.0);

    let constant: Calibration = CalibrationConstant::new("Energy", "keV", 7.5).unwrap().into();
    assert_close(constant.call(123.0).unwrap(), 7.5);

    assert!(CalibrationPolynomial::new("Energy", "eV", vec![]).is_err());
    assert!(matches!(
        CalibrationLinear::new("Energy", "bananas", 1.0, 0.0),
        Err(HmsaError::InvalidUnit(_))
    ));
}

#[test]
fn test_explicit_calibration_bounds() {
    let explicit: Calibration = CalibrationExplicit::new("Wavelength", "nm", vec![400.0, 410.0, 425.0])
        .unwrap()
        .into();
    assert_close(explicit.call(2.0).unwrap(), 425.0);
    assert!(explicit.call(3.0).is_err());
    assert!(explicit.call(-1.0).is_err());
    assert!(explicit.call(0.5).is_err());
}

#[test]
fn test_tags_and_classes() {
    let cases: Vec<(Condition, &str, Option<&str>)> = vec![
        (ProbeEm::new(15.0).unwrap().into(), "Probe", Some("EM")),
        (ProbeTem::new(200.0).unwrap().into(), "Probe", Some("TEM")),
        (Instrument::new("Acme", "X1").unwrap().into(), "Instrument", None),
        (
            DetectorSpectrometerXEDS::new(4096, CalibrationConstant::new("E", "eV", 0.0).unwrap())
                .unwrap()
                .into(),
            "Detector",
            Some("Spectrometer/XEDS"),
        ),
        (ElementalID::new(6).unwrap().into(), "ElementalID", None),
        (RegionOfInterest::new(10, 20).unwrap().into(), "RegionOfInterest", None),
        (
            AcquisitionRasterXY::new(8, 8).unwrap().into(),
            "Acquisition",
            Some("Raster/XY"),
        ),
        (
            CompositionElemental::new(CompositionUnit::MassPercent).into(),
            "Composition",
            Some("Elemental"),
        ),
    ];
    for (condition, tag, class) in cases {
        assert_eq!(condition.tag(), tag, "{}", condition.kind());
        assert_eq!(condition.class(), class, "{}", condition.kind());
        assert!(condition.validate().is_ok(), "{}", condition.kind());
    }
}

#[test]
fn test_default_units() {
    let mut probe = ProbeEm::new(15.0).unwrap();
    probe.set_working_distance(10.0).unwrap();
    assert_eq!(probe.beam_voltage().unwrap().unit(), Some("kV"));
    assert_eq!(probe.working_distance().unwrap().unit(), Some("mm"));

    let position = SpecimenPosition::from_xyz(1.0, 2.0, 3.0).unwrap();
    assert_eq!(position.z().unwrap().unit(), Some("mm"));

    let layer = WindowLayer::new("Al", 0.1).unwrap();
    assert_eq!(layer.thickness().unit(), Some("um"));
}

#[test]
fn test_elemental_id_validation() {
    assert!(ElementalID::new(0).is_err());
    assert!(ElementalID::new(119).is_err());

    let line = XRayLine::new("Ka1", Notation::Siegbahn).unwrap();
    let xray = ElementalIDXray::new(29, line).unwrap();
    assert_eq!(xray.line().unwrap().notation(), Notation::Siegbahn);
    assert!(ElementalIDXray::empty().validate().is_err());
}

#[test]
fn test_composition_entries() {
    let mut composition = CompositionElemental::new(CompositionUnit::MolePercent);
    composition.insert(26, 70.0).unwrap();
    composition.insert(24, 30.0).unwrap();
    assert!(composition.insert(0, 1.0).is_err());

    let zs: Vec<u8> = composition.iter().map(|(z, _)| z.get()).collect();
    assert_eq!(zs, vec![24, 26]);
    assert_eq!(composition.get(26), Some(70.0));
}

#[test]
fn test_downcast() {
    let mut condition = Condition::from(ProbeEm::new(15.0).unwrap());
    assert!(condition.is::<ProbeEm>());
    assert!(!condition.is::<ProbeTem>());

    condition
        .downcast_mut::<ProbeEm>()
        .unwrap()
        .set_beam_current(1.0)
        .unwrap();
    let probe = condition.downcast_ref::<ProbeEm>().unwrap();
    assert_eq!(probe.beam_current(), Some(&Numerical::new(1.0, Some("nA")).unwrap()));
}

#[test]
fn test_find_by_type() {
    let mut conditions = IdentifierMap::new();
    conditions.insert("Probe0", Condition::from(ProbeEm::new(15.0).unwrap())).unwrap();
    conditions.insert("Elem0", Condition::from(ElementalID::new(13).unwrap())).unwrap();
    conditions.insert("Probe1", Condition::from(ProbeEm::new(20.0).unwrap())).unwrap();

    let probes = conditions.find_by_type::<ProbeEm>();
    assert_eq!(probes.len(), 2);
    assert_eq!(probes[1].0, "Probe1");
    assert!(conditions.find_by_type::<Instrument>().is_empty());
}

#[test]
fn test_condition_equality() {
    let a = Condition::from(ElementalID::new(13).unwrap());
    let b = Condition::from(ElementalID::new(13).unwrap());
    let c = Condition::from(ElementalID::new(14).unwrap());
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_multilayer_layers() {
    let mut specimen = SpecimenMultilayer::new("stack").unwrap();
    let mut layer = SpecimenLayer::new();
    layer.set_thickness(25.0).unwrap();
    layer.set_formula("SiO2").unwrap();
    specimen.push_layer(layer);
    assert_eq!(specimen.layers().len(), 1);
    assert_eq!(specimen.layers()[0].thickness().unwrap().unit(), Some("nm"));
}
