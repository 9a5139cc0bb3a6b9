//! The [`DataFile`] aggregate: header, global conditions and data.
//!
//! Data stored in a `DataFile` do not own their conditions. Each keeps a
//! table from its local condition identifier to a global identifier in
//! [`DataFile::conditions`], so a datum's view always resolves to the global
//! condition object:
//!
//! - inserting a datum moves its conditions into the global container,
//!   reusing an equal global condition when there is one and renaming on
//!   identifier collisions (`cond`, `cond1`, `cond2`, ...);
//! - removing a global condition removes it from every datum view;
//! - removing a datum returns it with its own copies of the conditions.
//!
//! ```
//! use hmsa::prelude::*;
//!
//! let mut datafile = DataFile::new();
//! let datum = Datum::analysis0d(1.0)
//!     .with_condition("cond", ElementalID::new(13).unwrap())
//!     .unwrap();
//! datafile.insert_datum("d0", datum).unwrap();
//!
//! let view = datafile.datum("d0").unwrap();
//! let local = view.conditions().get("cond").unwrap();
//! assert!(std::ptr::eq(local, datafile.conditions().get("cond").unwrap()));
//! ```

#[cfg(test)]
mod tests;

use std::path::Path;

use log::debug;

use crate::condition::{Condition, ConditionType};
use crate::container::{IdentifierMap, Listener};
use crate::datum::{self, Datum, DatumKind};
use crate::error::{HmsaError, Result};
use crate::fileformat::{HmsaReader, HmsaWriter, ReaderConfig, WriteStats, WriterConfig};
use crate::header::Header;
use crate::types::{validate_identifier, DataType, NdArray};

/// What happens to global conditions when a datum is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionRetention {
    /// Global conditions stay, possibly as orphans
    #[default]
    Keep,
    /// Global conditions no longer referenced by any datum are removed
    DropOrphans,
}

/// Behaviour of a [`DataFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataFileConfig {
    /// Condition retention on datum removal
    pub retention: ConditionRetention,
}

/// A datum as stored in a [`DataFile`]: its array and the links from local
/// condition identifiers to global ones.
#[derive(Debug, Clone)]
pub struct LinkedDatum {
    kind: DatumKind,
    array: NdArray,
    links: IdentifierMap<String>,
}

impl LinkedDatum {
    /// Datum type.
    pub fn kind(&self) -> DatumKind {
        self.kind
    }

    /// Stored values.
    pub fn array(&self) -> &NdArray {
        &self.array
    }

    /// Local identifier to global identifier, in insertion order.
    pub fn links(&self) -> &IdentifierMap<String> {
        &self.links
    }

    /// Whether any local identifier points at `global_id`.
    pub fn references(&self, global_id: &str) -> bool {
        self.links.values().any(|g| g == global_id)
    }

    fn global_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.links.values().map(String::as_str).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Linked data compare by layout, values and the set of referenced global
/// conditions. Local identifiers are not part of the persisted document.
impl PartialEq for LinkedDatum {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.array == other.array
            && self.global_ids() == other.global_ids()
    }
}

/// An HMSA document in memory.
#[derive(Debug, Clone, Default)]
pub struct DataFile {
    header: Header,
    conditions: IdentifierMap<Condition>,
    data: IdentifierMap<LinkedDatum>,
    config: DataFileConfig,
}

impl PartialEq for DataFile {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.conditions == other.conditions
            && self.data == other.data
    }
}

impl DataFile {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty data file using `config`.
    pub fn with_config(config: DataFileConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &DataFileConfig {
        &self.config
    }

    /// Header entries.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Mutable header entries.
    pub fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    /// Global conditions.
    pub fn conditions(&self) -> &IdentifierMap<Condition> {
        &self.conditions
    }

    /// Stored data.
    pub fn data(&self) -> &IdentifierMap<LinkedDatum> {
        &self.data
    }

    /// Listen to changes of the global conditions.
    pub fn subscribe_conditions(&mut self, listener: Listener<Condition>) {
        self.conditions.subscribe(listener);
    }

    /// Listen to datum insertions, replacements and removals.
    pub fn subscribe_data(&mut self, listener: Listener<LinkedDatum>) {
        self.data.subscribe(listener);
    }

    /// Insert or replace a global condition. Data linked to `id` see the
    /// replacement.
    pub fn insert_condition(
        &mut self,
        id: &str,
        condition: impl Into<Condition>,
    ) -> Result<Option<Condition>> {
        let condition = condition.into();
        condition.validate()?;
        self.conditions.insert(id, condition)
    }

    /// Remove a global condition and drop it from every datum view.
    pub fn remove_condition(&mut self, id: &str) -> Result<Option<Condition>> {
        let removed = self.conditions.remove(id)?;
        if removed.is_some() {
            let ids: Vec<String> = self.data.ids().map(str::to_string).collect();
            for datum_id in ids {
                if let Some(datum) = self.data.get_mut(&datum_id) {
                    let stale: Vec<String> = datum
                        .links
                        .iter()
                        .filter(|(_, global)| global.as_str() == id)
                        .map(|(local, _)| local.to_string())
                        .collect();
                    for local in stale {
                        datum.links.remove(&local)?;
                        debug!("Unlinked condition {} from datum {}", id, datum_id);
                    }
                }
            }
        }
        Ok(removed)
    }

    fn fresh_id<V>(container: &IdentifierMap<V>, base: &str) -> String {
        let mut n = 1usize;
        loop {
            let candidate = format!("{}{}", base, n);
            if !container.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Place `condition` among the globals and return its global identifier,
    /// recording it in `added` when a new global was created.
    fn reconcile(
        &mut self,
        local_id: &str,
        condition: Condition,
        added: &mut Vec<String>,
    ) -> Result<String> {
        if self.conditions.get(local_id) == Some(&condition) {
            return Ok(local_id.to_string());
        }
        if let Some(existing) = self.conditions.find_id(|c| *c == condition) {
            return Ok(existing.to_string());
        }
        let global_id = if self.conditions.contains_key(local_id) {
            Self::fresh_id(&self.conditions, local_id)
        } else {
            local_id.to_string()
        };
        condition.validate()?;
        self.conditions.insert(global_id.as_str(), condition)?;
        added.push(global_id.clone());
        Ok(global_id)
    }

    fn link_conditions(
        &mut self,
        datum_id: &str,
        owned: IdentifierMap<Condition>,
        added: &mut Vec<String>,
    ) -> Result<IdentifierMap<String>> {
        let mut links = IdentifierMap::new();
        for (local_id, condition) in owned {
            let global_id = self.reconcile(&local_id, condition, added)?;
            debug!("Datum {}: condition {} -> {}", datum_id, local_id, global_id);
            links.insert(local_id, global_id)?;
        }
        Ok(links)
    }

    /// Undo the globals created by an aborted insertion.
    fn discard_globals(&mut self, added: &[String]) {
        for global_id in added.iter().rev() {
            if self.conditions.remove(global_id).is_err() {
                self.conditions.retract(global_id);
            }
        }
    }

    /// Insert or replace a datum, moving its conditions into the global
    /// container. On error the document is left unchanged.
    pub fn insert_datum(&mut self, id: &str, datum: Datum) -> Result<()> {
        validate_identifier(id)?;
        let (kind, array, owned) = datum.into_parts();
        for (_, condition) in owned.iter() {
            condition.validate()?;
        }

        let mut added = Vec::new();
        let outcome = self
            .link_conditions(id, owned, &mut added)
            .and_then(|links| self.data.insert(id, LinkedDatum { kind, array, links }));
        match outcome {
            Ok(Some(old)) => self.apply_retention(&old),
            Ok(None) => Ok(()),
            Err(e) => {
                self.discard_globals(&added);
                Err(e)
            }
        }
    }

    /// Insert a datum read from a document, linked to existing globals.
    pub(crate) fn insert_linked_datum(
        &mut self,
        id: &str,
        kind: DatumKind,
        array: NdArray,
        global_ids: &[String],
    ) -> Result<()> {
        let mut links = IdentifierMap::new();
        for global_id in global_ids {
            if !self.conditions.contains_key(global_id) {
                return Err(HmsaError::document(format!(
                    "Datum {} references unknown condition {}",
                    id, global_id
                )));
            }
            links.insert(global_id.as_str(), global_id.clone())?;
        }
        self.data.insert(id, LinkedDatum { kind, array, links })?;
        Ok(())
    }

    /// Remove a datum. The returned datum owns copies of its conditions.
    pub fn remove_datum(&mut self, id: &str) -> Result<Option<Datum>> {
        let Some(linked) = self.data.remove(id)? else {
            return Ok(None);
        };
        let datum = self.standalone(&linked);
        self.apply_retention(&linked)?;
        Ok(Some(datum))
    }

    fn apply_retention(&mut self, removed: &LinkedDatum) -> Result<()> {
        if self.config.retention == ConditionRetention::Keep {
            return Ok(());
        }
        for global_id in removed.global_ids() {
            if !self.is_referenced(global_id) {
                debug!("Dropping orphan condition {}", global_id);
                self.conditions.remove(global_id)?;
            }
        }
        Ok(())
    }

    fn is_referenced(&self, global_id: &str) -> bool {
        self.data.values().any(|d| d.references(global_id))
    }

    fn standalone(&self, linked: &LinkedDatum) -> Datum {
        let mut conditions = IdentifierMap::new();
        for (local_id, global_id) in linked.links.iter() {
            if let Some(condition) = self.conditions.get(global_id) {
                conditions.push_unchecked(local_id, condition.clone());
            }
        }
        Datum::from_parts(linked.kind, linked.array.clone(), conditions)
    }

    /// A stored datum with its resolved condition view.
    pub fn datum(&self, id: &str) -> Option<DatumRef<'_>> {
        self.data
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(id, datum)| DatumRef {
                datafile: self,
                id,
                datum,
            })
    }

    /// Every stored datum, in insertion order.
    pub fn iter_data(&self) -> impl Iterator<Item = DatumRef<'_>> {
        self.data.iter().map(move |(id, datum)| DatumRef {
            datafile: self,
            id,
            datum,
        })
    }

    /// Attach a condition to a stored datum under `local_id`, reconciling
    /// it with the globals. Returns the global identifier.
    pub fn insert_datum_condition(
        &mut self,
        datum_id: &str,
        local_id: &str,
        condition: impl Into<Condition>,
    ) -> Result<String> {
        if !self.data.contains_key(datum_id) {
            return Err(HmsaError::validation(format!("No datum {}", datum_id)));
        }
        validate_identifier(local_id)?;
        let mut added = Vec::new();
        let global_id = self.reconcile(local_id, condition.into(), &mut added)?;
        let linked = match self.data.get_mut(datum_id) {
            Some(datum) => datum.links.insert(local_id, global_id.clone()).map(|_| ()),
            None => Ok(()),
        };
        if let Err(e) = linked {
            self.discard_globals(&added);
            return Err(e);
        }
        Ok(global_id)
    }

    /// Detach a condition from a datum's view. The global condition stays.
    /// Returns the global identifier that was linked.
    pub fn remove_datum_condition(&mut self, datum_id: &str, local_id: &str) -> Result<Option<String>> {
        match self.data.get_mut(datum_id) {
            Some(datum) => datum.links.remove(local_id),
            None => Err(HmsaError::validation(format!("No datum {}", datum_id))),
        }
    }

    /// Global conditions referenced by no datum.
    pub fn orphan_conditions(&self) -> Vec<(&str, &Condition)> {
        self.conditions
            .iter()
            .filter(|(id, _)| !self.is_referenced(id))
            .collect()
    }

    /// Add the content of `other` without overwriting anything: existing
    /// header entries win, colliding identifiers are renamed.
    pub fn merge(&mut self, other: &DataFile) -> Result<()> {
        self.header.absorb(&other.header, false)?;

        for (id, condition) in other.conditions.iter() {
            if self.conditions.get(id) == Some(condition) {
                continue;
            }
            let target = if self.conditions.contains_key(id) {
                Self::fresh_id(&self.conditions, id)
            } else {
                id.to_string()
            };
            self.conditions.insert(target, condition.clone())?;
        }

        for datum in other.iter_data() {
            let target = if self.data.contains_key(datum.id()) {
                Self::fresh_id(&self.data, datum.id())
            } else {
                datum.id().to_string()
            };
            self.insert_datum(&target, datum.to_standalone())?;
        }
        Ok(())
    }

    /// Add the content of `other`, overwriting header entries, conditions
    /// and data with the same identifiers.
    pub fn update(&mut self, other: &DataFile) -> Result<()> {
        self.header.absorb(&other.header, true)?;
        for (id, condition) in other.conditions.iter() {
            self.conditions.insert(id, condition.clone())?;
        }
        for datum in other.iter_data() {
            self.insert_datum(datum.id(), datum.to_standalone())?;
        }
        Ok(())
    }

    /// Read the document at `path` (either file of the pair).
    pub fn read(path: impl AsRef<Path>) -> Result<DataFile> {
        Self::read_with(path, ReaderConfig::default())
    }

    /// Read a file pair with an explicit reader configuration.
    pub fn read_with(path: impl AsRef<Path>, config: ReaderConfig) -> Result<DataFile> {
        let mut reader = HmsaReader::new(config);
        reader.start(path)?;
        reader.get()
    }

    /// Write the document to `path` (either file of the pair).
    pub fn write(&self, path: impl AsRef<Path>) -> Result<WriteStats> {
        self.write_with(path, WriterConfig::default())
    }

    /// Write a file pair with an explicit writer configuration.
    pub fn write_with(&self, path: impl AsRef<Path>, config: WriterConfig) -> Result<WriteStats> {
        let mut writer = HmsaWriter::new(config);
        writer.start(self, path)?;
        writer.get()
    }
}

/// Borrowed view of a stored datum.
#[derive(Debug, Clone, Copy)]
pub struct DatumRef<'a> {
    datafile: &'a DataFile,
    id: &'a str,
    datum: &'a LinkedDatum,
}

impl<'a> DatumRef<'a> {
    /// Identifier in the data container.
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// Datum type.
    pub fn kind(&self) -> DatumKind {
        self.datum.kind
    }

    /// Stored values.
    pub fn array(&self) -> &'a NdArray {
        &self.datum.array
    }

    /// Array shape.
    pub fn shape(&self) -> &'a [usize] {
        self.datum.array.shape()
    }

    /// Element type of the stored values.
    pub fn dtype(&self) -> DataType {
        self.datum.array.dtype()
    }

    /// Element at `index`.
    pub fn value(&self, index: &[usize]) -> Result<f64> {
        datum::value_at(&self.datum.array, index)
    }

    /// Named collection dimensions with their lengths.
    pub fn collection_dimensions(&self) -> Vec<(&'static str, usize)> {
        datum::collection_dimensions(self.datum.kind, &self.datum.array)
    }

    /// Named datum dimensions with their lengths.
    pub fn datum_dimensions(&self) -> Vec<(&'static str, usize)> {
        datum::datum_dimensions(self.datum.kind, &self.datum.array)
    }

    /// Conditions of this datum, resolved against the global container.
    pub fn conditions(&self) -> ConditionsView<'a> {
        ConditionsView {
            conditions: &self.datafile.conditions,
            links: &self.datum.links,
        }
    }

    /// Standalone copy owning its conditions.
    pub fn to_standalone(&self) -> Datum {
        self.datafile.standalone(self.datum)
    }

    /// Single analysis at a collection index, see [`Datum::to_analysis`].
    pub fn to_analysis(&self, index: &[usize]) -> Result<Datum> {
        self.to_standalone().to_analysis(index)
    }
}

/// A datum's conditions, looked up by local identifier.
#[derive(Debug, Clone, Copy)]
pub struct ConditionsView<'a> {
    conditions: &'a IdentifierMap<Condition>,
    links: &'a IdentifierMap<String>,
}

impl<'a> ConditionsView<'a> {
    /// The global condition linked under `local_id`.
    pub fn get(&self, local_id: &str) -> Option<&'a Condition> {
        self.links
            .get(local_id)
            .and_then(|global| self.conditions.get(global))
    }

    /// Global identifier linked under `local_id`.
    pub fn global_id(&self, local_id: &str) -> Option<&'a str> {
        self.links.get(local_id).map(String::as_str)
    }

    /// Whether `local_id` names a condition of this datum.
    pub fn contains_key(&self, local_id: &str) -> bool {
        self.get(local_id).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Local identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &'a str> {
        self.links.ids()
    }

    /// `(local id, condition)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a Condition)> + 'a {
        let conditions = self.conditions;
        self.links
            .iter()
            .filter_map(move |(local, global)| conditions.get(global).map(|c| (local, c)))
    }

    /// Linked conditions of concrete type `T`.
    pub fn find_by_type<T: ConditionType>(&self) -> Vec<(&'a str, &'a T)> {
        self.iter()
            .filter_map(|(id, c)| c.downcast_ref::<T>().map(|t| (id, t)))
            .collect()
    }
}
