use std::ptr;
use std::sync::{Arc, Mutex};

use super::*;
use crate::condition::{ElementalID, Instrument, ProbeEm};
use crate::container::ContainerEvent;
use crate::types::LangStr;

fn atomic_number(condition: &Condition) -> u8 {
    condition
        .downcast_ref::<ElementalID>()
        .and_then(|c| c.atomic_number())
        .map(|z| z.get())
        .unwrap()
}

/// Document after inserting `d0` holding `cond = ElementalID(13)`.
fn with_first_datum() -> DataFile {
    let mut datafile = DataFile::new();
    let datum0 = Datum::analysis0d(1.0)
        .with_condition("cond", ElementalID::new(13).unwrap())
        .unwrap();
    datafile.insert_datum("d0", datum0).unwrap();
    datafile
}

#[test]
fn test_condition_moved_to_globals() {
    let datafile = with_first_datum();

    let global = datafile.conditions().get("cond").unwrap();
    assert_eq!(atomic_number(global), 13);

    let local = datafile.datum("d0").unwrap().conditions().get("cond").unwrap();
    assert!(ptr::eq(local, global));
}

#[test]
fn test_rename_on_conflict() {
    let mut datafile = with_first_datum();
    let datum1 = Datum::analysis0d(2.0)
        .with_condition("cond", ElementalID::new(14).unwrap())
        .unwrap();
    datafile.insert_datum("d1", datum1).unwrap();

    assert_eq!(atomic_number(datafile.conditions().get("cond").unwrap()), 13);
    assert_eq!(atomic_number(datafile.conditions().get("cond1").unwrap()), 14);

    let view = datafile.datum("d1").unwrap().conditions();
    assert_eq!(view.global_id("cond"), Some("cond1"));
    assert!(ptr::eq(
        view.get("cond").unwrap(),
        datafile.conditions().get("cond1").unwrap()
    ));
}

#[test]
fn test_equal_condition_reused() {
    let mut datafile = with_first_datum();
    let datum1 = Datum::analysis0d(2.0)
        .with_condition("element", ElementalID::new(13).unwrap())
        .unwrap();
    datafile.insert_datum("d1", datum1).unwrap();

    assert_eq!(datafile.conditions().len(), 1);
    let view = datafile.datum("d1").unwrap().conditions();
    assert_eq!(view.global_id("element"), Some("cond"));
}

#[test]
fn test_global_update_visible_through_views() {
    let mut datafile = with_first_datum();
    datafile
        .insert_condition("cond", ElementalID::new(26).unwrap())
        .unwrap();
    let local = datafile.datum("d0").unwrap().conditions().get("cond").unwrap();
    assert_eq!(atomic_number(local), 26);
}

#[test]
fn test_cascaded_global_delete() {
    let mut datafile = with_first_datum();
    let datum1 = Datum::analysis0d(2.0)
        .with_condition("cond", ElementalID::new(13).unwrap())
        .unwrap()
        .with_condition("Probe0", ProbeEm::new(15.0).unwrap())
        .unwrap();
    datafile.insert_datum("d1", datum1).unwrap();

    datafile.remove_condition("cond").unwrap();
    assert!(!datafile.conditions().contains_key("cond"));
    assert!(datafile.datum("d0").unwrap().conditions().is_empty());

    let d1 = datafile.datum("d1").unwrap();
    assert_eq!(d1.conditions().len(), 1);
    assert!(d1.conditions().contains_key("Probe0"));
    assert_eq!(datafile.data().len(), 2);
}

#[test]
fn test_local_delete_keeps_global() {
    let mut datafile = with_first_datum();
    let unlinked = datafile.remove_datum_condition("d0", "cond").unwrap();
    assert_eq!(unlinked.as_deref(), Some("cond"));
    assert!(datafile.datum("d0").unwrap().conditions().is_empty());
    assert!(datafile.conditions().contains_key("cond"));
    assert_eq!(datafile.orphan_conditions().len(), 1);
}

#[test]
fn test_insert_datum_condition_reconciles() {
    let mut datafile = with_first_datum();
    let global = datafile
        .insert_datum_condition("d0", "other", ElementalID::new(20).unwrap())
        .unwrap();
    assert_eq!(global, "other");

    let global = datafile
        .insert_datum_condition("d0", "cond", ElementalID::new(21).unwrap())
        .unwrap();
    assert_eq!(global, "cond1");

    assert!(datafile
        .insert_datum_condition("missing", "x", ElementalID::new(1).unwrap())
        .is_err());
}

#[test]
fn test_remove_datum_returns_standalone_copy() {
    let mut datafile = with_first_datum();
    let datum = datafile.remove_datum("d0").unwrap().unwrap();

    assert_eq!(atomic_number(datum.conditions().get("cond").unwrap()), 13);
    assert!(datafile.conditions().contains_key("cond"));
    assert!(datafile.datum("d0").is_none());
    assert_eq!(datafile.remove_datum("d0").unwrap(), None);
}

#[test]
fn test_drop_orphans_retention() {
    let mut datafile = DataFile::with_config(DataFileConfig {
        retention: ConditionRetention::DropOrphans,
    });
    let shared = ElementalID::new(13).unwrap();
    datafile
        .insert_datum("a", Datum::analysis0d(1.0).with_condition("c", shared.clone()).unwrap())
        .unwrap();
    datafile
        .insert_datum("b", Datum::analysis0d(2.0).with_condition("c", shared).unwrap())
        .unwrap();

    datafile.remove_datum("a").unwrap();
    assert!(datafile.conditions().contains_key("c"));
    datafile.remove_datum("b").unwrap();
    assert!(datafile.conditions().is_empty());
}

#[test]
fn test_orphan_conditions() {
    let mut datafile = with_first_datum();
    datafile
        .insert_condition("Inst0", Instrument::new("Acme", "X1").unwrap())
        .unwrap();
    let orphans: Vec<&str> = datafile.orphan_conditions().iter().map(|(id, _)| *id).collect();
    assert_eq!(orphans, vec!["Inst0"]);
}

#[test]
fn test_invalid_identifiers() {
    let mut datafile = DataFile::new();
    assert!(matches!(
        datafile.insert_datum("bad id", Datum::analysis0d(1.0)),
        Err(HmsaError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        datafile.insert_condition("", Instrument::new("a", "b").unwrap()),
        Err(HmsaError::InvalidIdentifier(_))
    ));
}

#[test]
fn test_incomplete_condition_rejected() {
    use crate::parameter::ParameterType;
    let mut datafile = DataFile::new();
    let result = datafile.insert_condition("Inst0", Instrument::empty());
    assert!(matches!(result, Err(HmsaError::ValidationError(_))));
}

#[test]
fn test_merge_never_overwrites() {
    let mut mine = with_first_datum();
    mine.header_mut().set_title("mine").unwrap();

    let mut theirs = DataFile::new();
    theirs.header_mut().set_title("theirs").unwrap();
    theirs.header_mut().set_author("someone").unwrap();
    let datum = Datum::analysis0d(5.0)
        .with_condition("cond", ElementalID::new(14).unwrap())
        .unwrap();
    theirs.insert_datum("d0", datum).unwrap();

    mine.merge(&theirs).unwrap();

    assert_eq!(mine.header().title().unwrap().as_str(), "mine");
    assert_eq!(mine.header().author(), Some(&LangStr::from("someone")));
    assert_eq!(atomic_number(mine.conditions().get("cond").unwrap()), 13);
    assert_eq!(atomic_number(mine.conditions().get("cond1").unwrap()), 14);
    assert_eq!(mine.data().len(), 2);

    let merged = mine.datum("d01").unwrap();
    assert_eq!(merged.value(&[]).unwrap(), 5.0);
    assert_eq!(merged.conditions().global_id("cond"), Some("cond1"));
}

#[test]
fn test_update_overwrites() {
    let mut mine = with_first_datum();
    let mut theirs = DataFile::new();
    theirs
        .insert_datum(
            "d0",
            Datum::analysis0d(9.0)
                .with_condition("cond", ElementalID::new(14).unwrap())
                .unwrap(),
        )
        .unwrap();

    mine.update(&theirs).unwrap();
    assert_eq!(mine.data().len(), 1);
    assert_eq!(atomic_number(mine.conditions().get("cond").unwrap()), 14);
    let d0 = mine.datum("d0").unwrap();
    assert_eq!(d0.value(&[]).unwrap(), 9.0);
    assert_eq!(d0.conditions().global_id("cond"), Some("cond"));
}

#[test]
fn test_condition_events() {
    let mut datafile = DataFile::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    datafile.subscribe_conditions(Box::new(move |event| {
        let kind = match event {
            ContainerEvent::Added { .. } => "added",
            ContainerEvent::Modified { .. } => "modified",
            ContainerEvent::Deleted { .. } => "deleted",
        };
        sink.lock().unwrap().push(format!("{} {}", kind, event.id()));
        Ok(())
    }));

    datafile
        .insert_datum(
            "d0",
            Datum::analysis0d(1.0)
                .with_condition("cond", ElementalID::new(13).unwrap())
                .unwrap(),
        )
        .unwrap();
    datafile.insert_condition("cond", ElementalID::new(14).unwrap()).unwrap();
    datafile.remove_condition("cond").unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["added cond", "modified cond", "deleted cond"]
    );
}

#[test]
fn test_views_and_projection() {
    let mut datafile = DataFile::new();
    let image = Datum::image_raster_2d_spectral(
        NdArray::from_shape_vec(&[2, 2, 3], (0..12).collect::<Vec<i32>>()).unwrap(),
    )
    .unwrap()
    .with_condition("Probe0", ProbeEm::new(15.0).unwrap())
    .unwrap();
    datafile.insert_datum("Map", image).unwrap();

    let view = datafile.datum("Map").unwrap();
    assert_eq!(view.conditions().find_by_type::<ProbeEm>().len(), 1);
    assert_eq!(view.collection_dimensions(), vec![("X", 2), ("Y", 2)]);

    let pixel = view.to_analysis(&[1, 1]).unwrap();
    assert_eq!(pixel.array().to_f64_vec(), vec![9.0, 10.0, 11.0]);
    assert!(pixel.conditions().contains_key("Probe0"));
}

#[test]
fn test_equality_ignores_local_names() {
    let a = with_first_datum();
    let mut b = DataFile::new();
    b.insert_condition("cond", ElementalID::new(13).unwrap()).unwrap();
    b.insert_linked_datum(
        "d0",
        DatumKind::Analysis0D,
        NdArray::from_scalar(1.0f64.into()),
        &["cond".to_string()],
    )
    .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_vetoed_datum_insert_leaves_conditions_unchanged() {
    let mut datafile = DataFile::new();
    datafile
        .insert_condition("Probe", ProbeEm::new(15.0).unwrap())
        .unwrap();
    datafile.subscribe_data(Box::new(|_| Err(HmsaError::validation("veto"))));

    let datum = Datum::analysis0d(1.0)
        .with_condition("cond", ElementalID::new(13).unwrap())
        .unwrap()
        .with_condition("Probe", ProbeEm::new(15.0).unwrap())
        .unwrap();
    assert!(matches!(
        datafile.insert_datum("d0", datum),
        Err(HmsaError::ValidationError(_))
    ));

    assert_eq!(datafile.conditions().ids().collect::<Vec<_>>(), vec!["Probe"]);
    assert!(datafile.data().is_empty());
}

#[test]
fn test_failed_datum_condition_link_leaves_conditions_unchanged() {
    let mut datafile = with_first_datum();
    assert!(datafile
        .insert_datum_condition("missing", "el", ElementalID::new(20).unwrap())
        .is_err());
    assert_eq!(datafile.conditions().len(), 1);
}
