use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use hmsa::fileformat::ReaderConfig;
use hmsa::DataFile;

#[derive(Debug, Serialize)]
struct ConditionSummary {
    id: String,
    tag: &'static str,
    class: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct DatumSummary {
    id: String,
    kind: String,
    dtype: String,
    shape: Vec<usize>,
    conditions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct FileSummary {
    file: String,
    header: Vec<(String, String)>,
    conditions: Vec<ConditionSummary>,
    data: Vec<DatumSummary>,
}

impl FileSummary {
    fn new(file: &Path, datafile: &DataFile) -> Self {
        let header = datafile
            .header()
            .entries()
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        let conditions = datafile
            .conditions()
            .iter()
            .map(|(id, condition)| ConditionSummary {
                id: id.to_string(),
                tag: condition.tag(),
                class: condition.class(),
            })
            .collect();
        let data = datafile
            .iter_data()
            .map(|datum| DatumSummary {
                id: datum.id().to_string(),
                kind: datum.kind().to_string(),
                dtype: datum.dtype().to_string(),
                shape: datum.shape().to_vec(),
                conditions: datum
                    .conditions()
                    .ids()
                    .map(|local| {
                        let global = datum.conditions().global_id(local).unwrap_or(local);
                        if global == local {
                            local.to_string()
                        } else {
                            format!("{} -> {}", local, global)
                        }
                    })
                    .collect(),
            })
            .collect();
        Self {
            file: file.display().to_string(),
            header,
            conditions,
            data,
        }
    }
}

/// Display information about an HMSA file pair
pub fn run(file: PathBuf, json: bool, config: ReaderConfig) -> Result<()> {
    if !file.with_extension("xml").exists() {
        anyhow::bail!("File does not exist: {}", file.with_extension("xml").display());
    }

    let datafile = DataFile::read_with(&file, config)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let summary = FileSummary::new(&file, &datafile);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
        return Ok(());
    }

    println!("HMSA File Information");
    println!("=====================");
    println!("File: {}", summary.file);
    println!();

    println!("Header:");
    for (key, value) in &summary.header {
        println!("  {}: {}", key, value);
    }
    println!();

    println!("Conditions ({}):", summary.conditions.len());
    for condition in &summary.conditions {
        match condition.class {
            Some(class) => println!("  {} <{} Class=\"{}\">", condition.id, condition.tag, class),
            None => println!("  {} <{}>", condition.id, condition.tag),
        }
    }
    println!();

    println!("Data ({}):", summary.data.len());
    for datum in &summary.data {
        println!(
            "  {} {} {} {:?}",
            datum.id, datum.kind, datum.dtype, datum.shape
        );
        if !datum.conditions.is_empty() {
            println!("    conditions: {}", datum.conditions.join(", "));
        }
    }

    Ok(())
}
