//! Property tests of the binary layout: payloads tile the `.hmsa` file
//! after the UID, in document order, whatever the data types and shapes.

use std::fs::{self, File};
use std::io::BufReader;

use hmsa::prelude::*;
use hmsa::xml::parse_document;
use proptest::prelude::*;
use tempfile::tempdir;

fn datum_strategy() -> impl Strategy<Value = Datum> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 1..40).prop_map(|v| Datum::analysis1d(v).unwrap()),
        prop::collection::vec(any::<i32>(), 1..40).prop_map(|v| Datum::analysis1d(v).unwrap()),
        prop::collection::vec(-1e6f64..1e6, 1..40).prop_map(|v| Datum::analysis1d(v).unwrap()),
        any::<u16>().prop_map(Datum::analysis0d),
        (1usize..4, 1usize..4, 1usize..6).prop_map(|(x, y, c)| {
            let values: Vec<f32> = (0..x * y * c).map(|v| v as f32).collect();
            Datum::image_raster_2d_spectral(NdArray::from_shape_vec(&[x, y, c], values).unwrap())
                .unwrap()
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn payloads_tile_the_binary_file(data in prop::collection::vec(datum_strategy(), 1..6)) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.xml");
        let mut datafile = DataFile::new();
        for (i, datum) in data.iter().enumerate() {
            datafile.insert_datum(&format!("D{}", i), datum.clone()).unwrap();
        }
        datafile.write_with(&path, WriterConfig::compact()).unwrap();

        let size = fs::metadata(dir.path().join("p.hmsa")).unwrap().len();
        let root = parse_document(BufReader::new(File::open(&path).unwrap())).unwrap();
        let mut expected = 8u64;
        for (descriptor, datum) in root.child("Data").unwrap().children.iter().zip(&data) {
            let offset: u64 = descriptor.child("DataOffset").unwrap().text.parse().unwrap();
            let length: u64 = descriptor.child("DataLength").unwrap().text.parse().unwrap();
            prop_assert_eq!(offset, expected);
            let width = datum.dtype().size_bytes() as u64;
            prop_assert_eq!(length, datum.array().len() as u64 * width);
            expected += length;
        }
        prop_assert_eq!(expected, size);

        let loaded = DataFile::read(&path).unwrap();
        prop_assert_eq!(loaded, datafile);
    }
}
