use std::collections::HashSet;

use crate::fileformat::UID_LENGTH;
use crate::handler::Descriptor;
use crate::types::validate_identifier;
use crate::xml::Element;

use super::{ValidationCheck, ValidationReport};

/// Step 3: every descriptor is consistent, its payload lies inside the
/// binary file and no two payloads overlap.
pub(crate) fn check_descriptors(root: &Element, file_length: u64, report: &mut ValidationReport) {
    let condition_ids: HashSet<&str> = root
        .child("Conditions")
        .map(|conditions| {
            conditions
                .children
                .iter()
                .filter_map(|c| c.attribute("ID"))
                .collect()
        })
        .unwrap_or_default();

    let Some(data) = root.child("Data") else {
        return;
    };

    let mut problems = Vec::new();
    let mut ranges = Vec::new();
    let mut names = HashSet::new();
    for element in &data.children {
        let name = element.attribute("Name").unwrap_or("?");
        match element.attribute("Name") {
            Some(name) if validate_identifier(name).is_err() => {
                problems.push(format!("invalid datum name {:?}", name));
            }
            Some(name) if !names.insert(name) => {
                problems.push(format!("duplicate datum name {}", name));
            }
            Some(_) => {}
            None => problems.push(format!("<{}> without Name", element.name)),
        }
        for id in element
            .attribute("Conditions")
            .unwrap_or_default()
            .split_whitespace()
        {
            if !condition_ids.contains(id) {
                problems.push(format!("{} references unknown condition {}", name, id));
            }
        }

        let descriptor = match Descriptor::parse(element) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                problems.push(format!("{}: {}", name, e));
                continue;
            }
        };
        let end = descriptor.offset.checked_add(descriptor.length);
        if descriptor.offset < UID_LENGTH || end.map_or(true, |end| end > file_length) {
            problems.push(format!(
                "{}: bytes {}+{} outside the binary file ({} bytes)",
                name, descriptor.offset, descriptor.length, file_length
            ));
            continue;
        }
        ranges.push((descriptor.offset, descriptor.offset + descriptor.length, name));
    }

    ranges.sort_unstable();
    // Furthest end seen so far and the payload reaching it
    let mut reach: Option<(u64, &str)> = None;
    for &(start, end, name) in &ranges {
        if let Some((furthest, owner)) = reach {
            if start < furthest {
                problems.push(format!("payloads of {} and {} overlap", owner, name));
            }
        }
        if reach.map_or(true, |(furthest, _)| end > furthest) {
            reach = Some((end, name));
        }
    }

    let check = format!("{} datum descriptors", data.children.len());
    if problems.is_empty() {
        report.add_check(ValidationCheck::ok(check));
    } else {
        report.add_check(ValidationCheck::failed(check, problems.join("; ")));
    }
}
