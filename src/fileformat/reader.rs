use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};

use super::binary::{format_uid, parse_uid, BinaryReader, FilePair};
use super::config::ReaderConfig;
use super::{CONDITIONS_TAG, DATA_TAG, HEADER_TAG, ROOT_TAG};
use crate::datafile::DataFile;
use crate::error::{HmsaError, Result};
use crate::handler::attribute::{decode_attributes, decode_text};
use crate::handler::datum::parse_datum;
use crate::handler::{condition_registry, datum_handlers, VERSION};
use crate::header::Header;
use crate::parameter::Parameter;
use crate::task::{Monitorable, Task, TaskMonitor, TaskState};
use crate::xml::{self, Element};

/// Reads an `.xml` + `.hmsa` pair into a [`DataFile`] on a background
/// thread.
///
/// ```no_run
/// use hmsa::fileformat::{HmsaReader, ReaderConfig};
/// use hmsa::task::Monitorable;
///
/// let mut reader = HmsaReader::new(ReaderConfig::default());
/// reader.start("run.hmsa").unwrap();
/// while reader.is_alive() {
///     println!("{:.0}% {}", reader.progress() * 100.0, reader.status());
///     std::thread::sleep(std::time::Duration::from_millis(100));
/// }
/// let datafile = reader.get().unwrap();
/// ```
pub struct HmsaReader {
    config: ReaderConfig,
    task: Option<Task<DataFile>>,
}

impl HmsaReader {
    /// Reader using `config`.
    pub fn new(config: ReaderConfig) -> Self {
        Self { config, task: None }
    }

    /// Active configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Start reading the pair named by `path`.
    ///
    /// # Errors
    ///
    /// [`HmsaError::BusyState`] while a previous read is running.
    pub fn start(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if self.is_alive() {
            return Err(HmsaError::BusyState("reader is already running".to_string()));
        }
        let pair = FilePair::new(path);
        let config = self.config.clone();

        info!("Reading HMSA document {}", pair.xml.display());
        self.task = Some(Task::spawn("hmsa-reader", move |monitor| {
            read_pair(&pair, &config, monitor)
        })?);
        Ok(())
    }

    /// Wait for the read, at most `timeout` when given.
    pub fn join(&mut self, timeout: Option<Duration>) -> Result<bool> {
        self.task.as_mut().ok_or(HmsaError::NotStarted)?.join(timeout)
    }

    /// Wait for the read and return the document.
    pub fn get(&mut self) -> Result<DataFile> {
        self.task.as_mut().ok_or(HmsaError::NotStarted)?.get()
    }
}

impl Monitorable for HmsaReader {
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

/// Parse the XML document of `pair` and check its root.
pub(crate) fn read_root(pair: &FilePair) -> Result<Element> {
    let file = File::open(&pair.xml)?;
    let root = xml::parse_document(BufReader::new(file))?;
    if root.name != ROOT_TAG {
        return Err(HmsaError::document(format!(
            "Root element is <{}>, expected <{}>",
            root.name, ROOT_TAG
        )));
    }
    let version = root.required_attribute("Version")?;
    if version.trim() != VERSION {
        return Err(HmsaError::UnsupportedVersion(version.to_string()));
    }
    Ok(root)
}

/// Open the binary file of `pair` and check it carries the UID of `root`.
pub(crate) fn open_binary(pair: &FilePair, root: &Element) -> Result<BinaryReader<BufReader<File>>> {
    let uid = parse_uid(root.required_attribute("UID")?)?;
    let binary = BinaryReader::open(&pair.hmsa)?;
    if binary.uid() != &uid {
        return Err(HmsaError::UidMismatch {
            xml: format_uid(&uid),
            binary: format_uid(binary.uid()),
        });
    }
    Ok(binary)
}

/// Rebuild the header. Elements outside the recognized set become user
/// entries.
pub(crate) fn read_header(element: &Element) -> Result<Header> {
    let mut header = Header::new();
    decode_attributes(&mut header, element)?;
    let recognized: Vec<&str> = header
        .attribute_specs()
        .iter()
        .map(|spec| spec.xml_name)
        .collect();
    for child in &element.children {
        if recognized.contains(&child.name.as_str()) {
            continue;
        }
        warn!("Preserving unknown header element <{}> as text", child.name);
        header.set_extra(&child.name, decode_text(child)?)?;
    }
    Ok(header)
}

pub(super) fn read_pair(
    pair: &FilePair,
    config: &ReaderConfig,
    monitor: &TaskMonitor,
) -> Result<DataFile> {
    monitor.update(0.0, "Reading XML document");
    let root = read_root(pair)?;
    let mut binary = open_binary(pair, &root)?;
    if let Some(language) = root.attribute("xml:lang") {
        debug!("Document language {}", language);
    }

    monitor.check_cancelled()?;
    monitor.update(0.05, "Reading header");
    let header = match root.child(HEADER_TAG) {
        Some(element) => read_header(element)?,
        None => Header::new(),
    };
    if let Some(expected) = header.checksum() {
        let actual = binary.checksum(expected.algorithm())?;
        if &actual != expected {
            let message = format!(
                "Checksum mismatch: header has {}, binary file has {}",
                expected, actual
            );
            if config.verify_checksum {
                return Err(HmsaError::InvalidDocument(message));
            }
            warn!("{}", message);
        }
    }

    let mut datafile = DataFile::new();
    *datafile.header_mut() = header;

    monitor.check_cancelled()?;
    monitor.update(0.1, "Reading conditions");
    if let Some(conditions) = root.child(CONDITIONS_TAG) {
        let registry = condition_registry(VERSION);
        for element in &conditions.children {
            monitor.check_cancelled()?;
            let id = element.required_attribute("ID")?;
            debug!("Condition {} from <{}>", id, element.name);
            datafile.insert_condition(id, registry.parse(element)?)?;
        }
    }

    if let Some(data) = root.child(DATA_TAG) {
        let handlers = datum_handlers(VERSION);
        let total = data.children.len().max(1) as f64;
        for (index, element) in data.children.iter().enumerate() {
            monitor.check_cancelled()?;
            let id = element.required_attribute("Name")?;
            monitor.update(
                0.2 + 0.8 * index as f64 / total,
                format!("Reading datum {}", id),
            );
            let (kind, array, _) = parse_datum(&handlers, element, &mut binary)?.into_parts();
            let linked: Vec<String> = element
                .attribute("Conditions")
                .map(|ids| ids.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();
            debug!("Datum {} ({}) linked to {:?}", id, kind, linked);
            datafile.insert_linked_datum(id, kind, array, &linked)?;
        }
    }

    monitor.check_cancelled()?;
    info!(
        "Read {} conditions and {} data from {}",
        datafile.conditions().len(),
        datafile.data().len(),
        pair.xml.display()
    );
    Ok(datafile)
}
