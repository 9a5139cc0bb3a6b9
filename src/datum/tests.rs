use super::*;
use crate::condition::{ElementalID, ProbeEm};

#[test]
fn test_kind_layouts() {
    assert_eq!(DatumKind::Analysis0D.ndim(), 0);
    assert_eq!(DatumKind::AnalysisList1D.ndim(), 2);
    assert_eq!(DatumKind::ImageRaster2DHyperimage.ndim(), 4);
    assert_eq!(DatumKind::ImageRaster2DSpectral.collection_names(), &["X", "Y"]);
    assert_eq!(DatumKind::ImageRaster2DSpectral.datum_names(), &["Channel"]);
    assert_eq!(DatumKind::AnalysisList2D.analysis_kind(), DatumKind::Analysis2D);
    for kind in DatumKind::ALL {
        assert_eq!(DatumKind::from_tag(kind.tag()), Some(kind));
    }
    assert_eq!(DatumKind::from_tag("Analysis3D"), None);
}

#[test]
fn test_analysis1d() {
    let datum = Datum::analysis1d(vec![0i32, 1, 2, 3]).unwrap();
    assert_eq!(datum.shape(), &[4]);
    assert_eq!(datum.dtype(), DataType::Int32);
    assert_eq!(datum.value(&[2]).unwrap(), 2.0);
    assert_eq!(datum.datum_dimensions(), vec![("Channel", 4)]);
    assert!(datum.collection_dimensions().is_empty());
}

#[test]
fn test_shape_checked() {
    let flat = NdArray::from(vec![1.0f64, 2.0]);
    assert!(matches!(
        Datum::new(DatumKind::Analysis2D, flat),
        Err(HmsaError::ValidationError(_))
    ));
}

#[test]
fn test_value_out_of_range() {
    let datum = Datum::analysis0d(1.0f64);
    assert_eq!(datum.value(&[]).unwrap(), 1.0);
    assert!(datum.value(&[0]).is_err());

    let spectrum = Datum::analysis1d(vec![1u16, 2]).unwrap();
    assert!(spectrum.value(&[2]).is_err());
}

#[test]
fn test_spectral_image_projection() {
    // 2 x 3 pixels, 4 channels
    let cube = NdArray::from_shape_vec(&[2, 3, 4], (0..24).collect::<Vec<u32>>()).unwrap();
    let image = Datum::image_raster_2d_spectral(cube)
        .unwrap()
        .with_condition("Probe0", ProbeEm::new(15.0).unwrap())
        .unwrap();

    assert_eq!(image.collection_dimensions(), vec![("X", 2), ("Y", 3)]);
    assert_eq!(image.datum_dimensions(), vec![("Channel", 4)]);

    let pixel = image.to_analysis(&[1, 2]).unwrap();
    assert_eq!(pixel.kind(), DatumKind::Analysis1D);
    assert_eq!(pixel.array().to_f64_vec(), vec![20.0, 21.0, 22.0, 23.0]);
    assert!(pixel.conditions().contains_key("Probe0"));

    assert!(image.to_analysis(&[2, 0]).is_err());
    assert!(image.to_analysis(&[0]).is_err());
}

#[test]
fn test_analysis_list_projection() {
    let list = Datum::new(
        DatumKind::AnalysisList0D,
        NdArray::from(vec![5.0f32, 6.0, 7.0]),
    )
    .unwrap();
    let second = list.to_analysis(&[1]).unwrap();
    assert_eq!(second.kind(), DatumKind::Analysis0D);
    assert_eq!(second.value(&[]).unwrap(), 6.0);

    let hyper = Datum::zeros(DatumKind::ImageRaster2DHyperimage, DataType::UInt8, &[2, 2, 3, 3]).unwrap();
    let pattern = hyper.to_analysis(&[0, 1]).unwrap();
    assert_eq!(pattern.kind(), DatumKind::Analysis2D);
    assert_eq!(pattern.shape(), &[3, 3]);
}

#[test]
fn test_single_analysis_has_no_projection() {
    let datum = Datum::analysis0d(1u8);
    assert!(datum.to_analysis(&[]).is_err());
}

#[test]
fn test_owned_conditions() {
    let mut datum = Datum::analysis0d(1.0f64)
        .with_condition("cond", ElementalID::new(13).unwrap())
        .unwrap();
    assert_eq!(datum.conditions().len(), 1);
    datum.conditions_mut().remove("cond").unwrap();
    assert!(datum.conditions().is_empty());
}
