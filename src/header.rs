//! Document header: recognized metadata entries plus free user entries.

use chrono::{NaiveDate, NaiveTime};

use crate::error::{HmsaError, Result};
use crate::parameter::{AttributeValue, Parameter, ParameterType};
use crate::types::{Checksum, LangStr};

parameter! {
    /// Header of an HMSA document.
    ///
    /// Recognized keys (`Title`, `Author`, `Owner`, `Date`, `Time`,
    /// `Timezone`, `Checksum`) are typed and looked up case-insensitively.
    /// Any other key is a user entry holding text; user keys are
    /// case-sensitive and must be valid XML element names.
    ///
    /// Equality is bag equality and ignores the checksum, which describes
    /// a particular binary file rather than the document content.
    #[derive(Debug, Clone)]
    pub struct Header ["Header"] {
        /// Document title
        title, set_title: LangStr => "Title";
        /// Author
        author, set_author: LangStr => "Author";
        /// Owner
        owner, set_owner: LangStr => "Owner";
        /// Acquisition date
        date, set_date: NaiveDate => "Date";
        /// Acquisition time
        time, set_time: NaiveTime => "Time";
        /// Time zone of `date` and `time`
        timezone, set_timezone: String => "Timezone";
        /// Checksum of the binary file
        checksum, set_checksum: Checksum => "Checksum";
    }
    extra {
        extras: Vec<(String, LangStr)>,
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        let recognized = self
            .attribute_specs()
            .iter()
            .filter(|spec| spec.name != "checksum")
            .all(|spec| self.attribute(spec.name) == other.attribute(spec.name));
        if !recognized || self.extras.len() != other.extras.len() {
            return false;
        }
        let mut mine: Vec<_> = self.extras.iter().collect();
        let mut theirs: Vec<_> = other.extras.iter().collect();
        mine.sort_by(|a, b| a.0.cmp(&b.0));
        theirs.sort_by(|a, b| a.0.cmp(&b.0));
        mine == theirs
    }
}

/// Check an XML element name: a letter or `_` followed by letters, digits,
/// `_`, `-` or `.`; names starting with `xml` are reserved.
pub(crate) fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    if name.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("xml")) {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl Header {
    /// Create an empty header.
    pub fn new() -> Self {
        Self::empty()
    }

    fn recognized(&self, key: &str) -> Option<&'static str> {
        self.attribute_specs()
            .iter()
            .find(|spec| spec.xml_name.eq_ignore_ascii_case(key))
            .map(|spec| spec.name)
    }

    /// Value of an entry.
    pub fn get(&self, key: &str) -> Option<AttributeValue> {
        match self.recognized(key) {
            Some(name) => self.attribute(name),
            None => self
                .extras
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| AttributeValue::Text(v.clone())),
        }
    }

    /// Set an entry. User entries only accept text values.
    pub fn set(&mut self, key: &str, value: AttributeValue) -> Result<()> {
        if let Some(name) = self.recognized(key) {
            return self.set_attribute(name, Some(value));
        }
        match value {
            AttributeValue::Text(text) => self.set_extra(key, text),
            other => Err(HmsaError::TypeMismatch(format!(
                "header entry {} only accepts text, got {:?}",
                key,
                other.kind()
            ))),
        }
    }

    /// Set a user entry.
    pub fn set_extra(&mut self, key: &str, value: impl Into<LangStr>) -> Result<()> {
        if self.recognized(key).is_some() {
            return self.set(key, AttributeValue::Text(value.into()));
        }
        if !is_xml_name(key) {
            return Err(HmsaError::validation(format!(
                "Header key {:?} is not a valid XML name",
                key
            )));
        }
        let value = value.into();
        match self.extras.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.extras.push((key.to_string(), value)),
        }
        Ok(())
    }

    /// Remove an entry, returning its value.
    pub fn remove(&mut self, key: &str) -> Result<Option<AttributeValue>> {
        if let Some(name) = self.recognized(key) {
            let previous = self.attribute(name);
            self.set_attribute(name, None)?;
            return Ok(previous);
        }
        let position = self.extras.iter().position(|(k, _)| k == key);
        Ok(position.map(|i| AttributeValue::Text(self.extras.remove(i).1)))
    }

    /// Whether an entry is set.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys of the set entries: recognized keys first, then user keys in
    /// insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.attributes()
            .iter()
            .map(|(spec, _)| spec.xml_name.to_string())
            .chain(self.extras.iter().map(|(k, _)| k.clone()))
            .collect()
    }

    /// All set entries, in the order of [`Header::keys`].
    pub fn entries(&self) -> Vec<(String, AttributeValue)> {
        self.attributes()
            .into_iter()
            .map(|(spec, value)| (spec.xml_name.to_string(), value))
            .chain(
                self.extras
                    .iter()
                    .map(|(k, v)| (k.clone(), AttributeValue::Text(v.clone()))),
            )
            .collect()
    }

    /// User entries in insertion order.
    pub fn extras(&self) -> impl Iterator<Item = (&str, &LangStr)> {
        self.extras.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.attributes().len() + self.extras.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy entries from `other`. Existing entries are kept unless
    /// `overwrite` is set.
    pub fn absorb(&mut self, other: &Header, overwrite: bool) -> Result<()> {
        for (key, value) in other.entries() {
            if overwrite || !self.contains_key(&key) {
                self.set(&key, value)?;
            }
        }
        Ok(())
    }
}
