use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use log::{debug, info};

use super::binary::{format_uid, generate_uid, BinaryWriter, FilePair};
use super::config::{WriteStats, WriterConfig};
use super::{CONDITIONS_TAG, DATA_TAG, HEADER_TAG, ROOT_TAG};
use crate::datafile::{DataFile, LinkedDatum};
use crate::error::{HmsaError, Result};
use crate::handler::attribute::{encode_attributes, encode_text};
use crate::handler::datum::convert_datum;
use crate::handler::{condition_registry, datum_handlers, VERSION};
use crate::header::Header;
use crate::task::{Monitorable, Task, TaskMonitor, TaskState};
use crate::types::validate_language_tag;
use crate::xml::{self, Element};

/// Writes a [`DataFile`] to an `.xml` + `.hmsa` pair on a background thread.
///
/// ```no_run
/// use hmsa::fileformat::{HmsaWriter, WriterConfig};
/// use hmsa::prelude::*;
///
/// let datafile = DataFile::new();
/// let mut writer = HmsaWriter::new(WriterConfig::default());
/// writer.start(&datafile, "run.xml").unwrap();
/// let stats = writer.get().unwrap();
/// println!("{}", stats);
/// ```
pub struct HmsaWriter {
    config: WriterConfig,
    task: Option<Task<WriteStats>>,
}

impl HmsaWriter {
    /// Writer using `config`.
    pub fn new(config: WriterConfig) -> Self {
        Self { config, task: None }
    }

    /// Active configuration.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Start writing a snapshot of `datafile` to the pair named by `path`.
    ///
    /// # Errors
    ///
    /// [`HmsaError::BusyState`] while a previous write is running, and
    /// [`HmsaError::ValidationError`] for an invalid language tag.
    pub fn start(&mut self, datafile: &DataFile, path: impl AsRef<Path>) -> Result<()> {
        if self.is_alive() {
            return Err(HmsaError::BusyState("writer is already running".to_string()));
        }
        let mut config = self.config.clone();
        config.language = validate_language_tag(&config.language)?;
        let pair = FilePair::new(path);
        let datafile = datafile.clone();

        info!("Writing HMSA document to {}", pair.xml.display());
        self.task = Some(Task::spawn("hmsa-writer", move |monitor| {
            write_pair(&datafile, &pair, &config, monitor)
        })?);
        Ok(())
    }

    /// Wait for the write, at most `timeout` when given.
    pub fn join(&mut self, timeout: Option<Duration>) -> Result<bool> {
        self.task.as_mut().ok_or(HmsaError::NotStarted)?.join(timeout)
    }

    /// Wait for the write and return its statistics.
    pub fn get(&mut self) -> Result<WriteStats> {
        self.task.as_mut().ok_or(HmsaError::NotStarted)?.get()
    }
}

impl Monitorable for HmsaWriter {
    fn progress(&self) -> f64 {
        self.task.as_ref().map_or(0.0, Task::progress)
    }

    fn status(&self) -> String {
        self.task
            .as_ref()
            .map_or_else(|| "Idle".to_string(), Task::status)
    }

    fn state(&self) -> TaskState {
        self.task.as_ref().map_or(TaskState::Idle, Task::state)
    }

    fn is_alive(&self) -> bool {
        self.task.as_ref().map_or(false, Task::is_alive)
    }

    fn cancel(&self) {
        if let Some(task) = &self.task {
            task.cancel();
        }
    }
}

/// `<Header>` with one child per set entry.
pub(crate) fn header_element(header: &Header) -> Element {
    let mut element = Element::new(HEADER_TAG);
    encode_attributes(header, &mut element);
    for (key, value) in header.extras() {
        element.push(encode_text(key, value));
    }
    element
}

/// Distinct global condition identifiers of a datum, in link order.
fn linked_conditions(datum: &LinkedDatum) -> Vec<&str> {
    let mut ids: Vec<&str> = Vec::new();
    for global_id in datum.links().values() {
        if !ids.contains(&global_id.as_str()) {
            ids.push(global_id);
        }
    }
    ids
}

fn write_pair(
    datafile: &DataFile,
    pair: &FilePair,
    config: &WriterConfig,
    monitor: &TaskMonitor,
) -> Result<WriteStats> {
    monitor.update(0.0, "Opening binary file");
    let uid = generate_uid();
    let uid_text = format_uid(&uid);
    let mut binary = BinaryWriter::create(&pair.hmsa, &uid, config.checksum)?;
    debug!("UID {} written to {}", uid_text, pair.hmsa.display());

    monitor.check_cancelled()?;
    monitor.update(0.05, "Writing conditions");
    let registry = condition_registry(VERSION);
    let mut conditions = Element::new(CONDITIONS_TAG);
    for (id, condition) in datafile.conditions() {
        monitor.check_cancelled()?;
        let mut element = registry.convert(condition)?;
        element.set_attribute("ID", id);
        debug!("Condition {} as <{}>", id, element.name);
        conditions.push(element);
    }

    let handlers = datum_handlers(VERSION);
    let mut data = Element::new(DATA_TAG);
    let total = datafile.data().len().max(1) as f64;
    for (index, (id, datum)) in datafile.data().iter().enumerate() {
        monitor.check_cancelled()?;
        monitor.update(
            0.1 + 0.8 * index as f64 / total,
            format!("Writing datum {}", id),
        );
        let mut element = convert_datum(&handlers, datum, &mut binary)?;
        element.set_attribute("Name", id);
        let linked = linked_conditions(datum);
        if !linked.is_empty() {
            element.set_attribute("Conditions", linked.join(" "));
        }
        data.push(element);
    }
    let (binary_bytes, checksum) = binary.finish()?;

    monitor.check_cancelled()?;
    monitor.update(0.9, "Writing XML document");
    let mut header = datafile.header().clone();
    match checksum {
        Some(checksum) => {
            debug!("Header checksum {}", checksum);
            header.set_checksum(checksum)?;
        }
        None => {
            header.remove("Checksum")?;
        }
    }

    let root = Element::new(ROOT_TAG)
        .with_attribute("Version", VERSION)
        .with_attribute("UID", uid_text.as_str())
        .with_attribute("xml:lang", config.language.as_str())
        .with_child(header_element(&header))
        .with_child(conditions)
        .with_child(data);
    let file = File::create(&pair.xml)?;
    xml::write_document(&root, BufWriter::new(file), config.indent)?;

    let stats = WriteStats {
        xml_path: pair.xml.clone(),
        hmsa_path: pair.hmsa.clone(),
        uid: uid_text,
        datum_count: datafile.data().len(),
        binary_bytes,
    };
    info!("{}", stats);
    Ok(stats)
}
