//! Ordered identifier-keyed containers with synchronous change events.

#[cfg(test)]
mod tests;

use std::fmt;

use crate::error::Result;
use crate::types::{glob_match, validate_identifier};

/// Change raised by an [`IdentifierMap`] before it is applied.
#[derive(Debug)]
pub enum ContainerEvent<'a, V> {
    /// A new identifier is about to be inserted
    Added {
        /// Identifier
        id: &'a str,
        /// Inserted value
        value: &'a V,
    },
    /// An existing identifier is about to be replaced
    Modified {
        /// Identifier
        id: &'a str,
        /// Current value
        old: &'a V,
        /// Replacement
        new: &'a V,
    },
    /// An identifier is about to be removed
    Deleted {
        /// Identifier
        id: &'a str,
        /// Removed value
        value: &'a V,
    },
}

impl<V> ContainerEvent<'_, V> {
    /// Identifier concerned by the event.
    pub fn id(&self) -> &str {
        match self {
            ContainerEvent::Added { id, .. }
            | ContainerEvent::Modified { id, .. }
            | ContainerEvent::Deleted { id, .. } => id,
        }
    }
}

/// Listener notified of container changes. Returning an error aborts the
/// mutation.
pub type Listener<V> = Box<dyn FnMut(&ContainerEvent<'_, V>) -> Result<()> + Send>;

/// Insertion-ordered mapping from identifier to value.
///
/// Identifiers must match `[A-Za-z0-9_\-|()]+`. Listeners run synchronously
/// in subscription order before each mutation is committed; cloning a map
/// does not clone its listeners.
pub struct IdentifierMap<V> {
    items: Vec<(String, V)>,
    listeners: Vec<Listener<V>>,
}

impl<V> Default for IdentifierMap<V> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

impl<V> IdentifierMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe(&mut self, listener: Listener<V>) {
        self.listeners.push(listener);
    }

    fn notify(&mut self, event: &ContainerEvent<'_, V>) -> Result<()> {
        for listener in self.listeners.iter_mut() {
            listener(event)?;
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|(key, _)| key == id)
    }

    /// Insert or replace a value, returning the replaced one.
    ///
    /// # Errors
    ///
    /// [`HmsaError::InvalidIdentifier`](crate::HmsaError::InvalidIdentifier)
    /// for a malformed identifier, or the first listener error.
    pub fn insert(&mut self, id: impl Into<String>, value: V) -> Result<Option<V>> {
        let id = id.into();
        validate_identifier(&id)?;

        match self.position(&id) {
            Some(index) => {
                let mut listeners = std::mem::take(&mut self.listeners);
                let outcome = listeners.iter_mut().try_for_each(|listener| {
                    listener(&ContainerEvent::Modified {
                        id: &id,
                        old: &self.items[index].1,
                        new: &value,
                    })
                });
                self.listeners = listeners;
                outcome?;
                Ok(Some(std::mem::replace(&mut self.items[index].1, value)))
            }
            None => {
                self.notify(&ContainerEvent::Added { id: &id, value: &value })?;
                self.items.push((id, value));
                Ok(None)
            }
        }
    }

    /// Insert every item, stopping at the first error.
    pub fn update<I, K>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        for (id, value) in items {
            self.insert(id, value)?;
        }
        Ok(())
    }

    /// Remove an identifier, returning its value.
    pub fn remove(&mut self, id: &str) -> Result<Option<V>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };
        let mut listeners = std::mem::take(&mut self.listeners);
        let (key, value) = &self.items[index];
        let outcome = listeners
            .iter_mut()
            .try_for_each(|listener| listener(&ContainerEvent::Deleted { id: key, value }));
        self.listeners = listeners;
        outcome?;
        Ok(Some(self.items.remove(index).1))
    }

    /// Append an item without raising events. The caller guarantees `id`
    /// is valid and absent.
    pub(crate) fn push_unchecked(&mut self, id: impl Into<String>, value: V) {
        self.items.push((id.into(), value));
    }

    /// Remove an item without raising events.
    pub(crate) fn retract(&mut self, id: &str) -> Option<V> {
        self.position(id).map(|index| self.items.remove(index).1)
    }

    /// Remove every item, raising one `Deleted` event per identifier.
    pub fn clear(&mut self) -> Result<()> {
        while let Some(id) = self.items.last().map(|(id, _)| id.clone()) {
            self.remove(&id)?;
        }
        Ok(())
    }

    /// Item with identifier `id`.
    pub fn get(&self, id: &str) -> Option<&V> {
        self.position(id).map(|index| &self.items[index].1)
    }

    /// Mutable access without raising events.
    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut V> {
        self.position(id).map(move |index| &mut self.items[index].1)
    }

    /// Whether an item with identifier `id` exists.
    pub fn contains_key(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Position of an identifier in insertion order.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.position(id)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.items.iter().map(|(id, value)| (id.as_str(), value))
    }

    /// Identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|(id, _)| id.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.items.iter().map(|(_, value)| value)
    }

    /// Items whose identifier matches a shell-style glob.
    pub fn find_by_key(&self, pattern: &str) -> Vec<(&str, &V)> {
        self.find_by_key_with(|id| glob_match(pattern, id))
    }

    /// Items whose identifier satisfies a predicate.
    pub fn find_by_key_with(&self, mut predicate: impl FnMut(&str) -> bool) -> Vec<(&str, &V)> {
        self.iter().filter(|(id, _)| predicate(id)).collect()
    }

    /// Items whose value satisfies a predicate.
    pub fn find_by_value(&self, mut predicate: impl FnMut(&V) -> bool) -> Vec<(&str, &V)> {
        self.iter().filter(|(_, value)| predicate(value)).collect()
    }

    /// Items matching both a key glob and a value predicate.
    pub fn find_items(
        &self,
        pattern: &str,
        mut predicate: impl FnMut(&V) -> bool,
    ) -> Vec<(&str, &V)> {
        self.iter()
            .filter(|(id, value)| glob_match(pattern, id) && predicate(value))
            .collect()
    }

    /// First identifier whose value satisfies a predicate.
    pub fn find_id(&self, mut predicate: impl FnMut(&V) -> bool) -> Option<&str> {
        self.iter().find(|(_, value)| predicate(value)).map(|(id, _)| id)
    }
}

impl<V: Clone> Clone for IdentifierMap<V> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            listeners: Vec::new(),
        }
    }
}

impl<V: PartialEq> PartialEq for IdentifierMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<V: fmt::Debug> fmt::Debug for IdentifierMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a IdentifierMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = std::iter::Map<std::slice::Iter<'a, (String, V)>, fn(&'a (String, V)) -> (&'a str, &'a V)>;

    fn into_iter(self) -> Self::IntoIter {
        fn split<V>(item: &(String, V)) -> (&str, &V) {
            (item.0.as_str(), &item.1)
        }
        self.items
            .iter()
            .map(split as fn(&'a (String, V)) -> (&'a str, &'a V))
    }
}

impl<V> IntoIterator for IdentifierMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
