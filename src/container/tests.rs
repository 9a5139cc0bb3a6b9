use std::sync::{Arc, Mutex};

use super::*;
use crate::error::HmsaError;

fn recorder(map: &mut IdentifierMap<i32>) -> Arc<Mutex<Vec<String>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    map.subscribe(Box::new(move |event| {
        let entry = match event {
            ContainerEvent::Added { id, value } => format!("added {}={}", id, value),
            ContainerEvent::Modified { id, old, new } => format!("modified {}:{}->{}", id, old, new),
            ContainerEvent::Deleted { id, value } => format!("deleted {}={}", id, value),
        };
        sink.lock().unwrap().push(entry);
        Ok(())
    }));
    log
}

#[test]
fn test_insertion_order_preserved() {
    let mut map = IdentifierMap::new();
    for (id, value) in [("z", 1), ("a", 2), ("m", 3)] {
        map.insert(id, value).unwrap();
    }
    assert_eq!(map.ids().collect::<Vec<_>>(), vec!["z", "a", "m"]);

    map.insert("a", 20).unwrap();
    assert_eq!(map.ids().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    assert_eq!(map.get("a"), Some(&20));
}

#[test]
fn test_events_in_mutation_order() {
    let mut map = IdentifierMap::new();
    let log = recorder(&mut map);

    map.insert("x", 1).unwrap();
    map.insert("x", 2).unwrap();
    map.insert("y", 3).unwrap();
    map.remove("x").unwrap();
    assert_eq!(map.remove("missing").unwrap(), None);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["added x=1", "modified x:1->2", "added y=3", "deleted x=2"]
    );
}

#[test]
fn test_listener_error_aborts_mutation() {
    let mut map = IdentifierMap::new();
    map.insert("keep", 1).unwrap();
    map.subscribe(Box::new(|event| match event {
        ContainerEvent::Deleted { .. } => Err(HmsaError::validation("locked")),
        _ => Ok(()),
    }));

    assert!(map.remove("keep").is_err());
    assert_eq!(map.get("keep"), Some(&1));

    map.insert("other", 2).unwrap();
    assert_eq!(map.len(), 2);
}

#[test]
fn test_invalid_identifier_rejected() {
    let mut map = IdentifierMap::new();
    for id in ["", "has space", "a.b", "\u{00e9}"] {
        assert!(matches!(
            map.insert(id, 0),
            Err(HmsaError::InvalidIdentifier(_))
        ));
    }
    assert!(map.is_empty());
}

#[test]
fn test_find_operations() {
    let mut map = IdentifierMap::new();
    map.update([("Probe0", 1), ("Probe1", 2), ("Detector0", 3)]).unwrap();

    let probes: Vec<_> = map.find_by_key("Probe*").into_iter().map(|(id, _)| id).collect();
    assert_eq!(probes, vec!["Probe0", "Probe1"]);

    let odd: Vec<_> = map.find_by_value(|v| v % 2 == 1).into_iter().map(|(id, _)| id).collect();
    assert_eq!(odd, vec!["Probe0", "Detector0"]);

    let both = map.find_items("*0", |v| *v > 1);
    assert_eq!(both, vec![("Detector0", &3)]);

    assert_eq!(map.find_by_key_with(|id| id.len() > 6).len(), 1);
    assert_eq!(map.find_id(|v| *v == 2), Some("Probe1"));
}

#[test]
fn test_clone_drops_listeners() {
    let mut map = IdentifierMap::new();
    let log = recorder(&mut map);
    map.insert("a", 1).unwrap();

    let mut copy = map.clone();
    copy.insert("b", 2).unwrap();
    assert_eq!(log.lock().unwrap().len(), 1);
    assert_ne!(map, copy);
    copy.remove("b").unwrap();
    assert_eq!(map, copy);
}

#[test]
fn test_clear_raises_deletes() {
    let mut map = IdentifierMap::new();
    map.update([("a", 1), ("b", 2)]).unwrap();
    let log = recorder(&mut map);
    map.clear().unwrap();
    assert!(map.is_empty());
    assert_eq!(log.lock().unwrap().len(), 2);
}
