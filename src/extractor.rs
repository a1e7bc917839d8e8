use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use serde::Serialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::{ExtractError, ExtractResult};

pub const DEFAULT_UNIT: &str = "Gram";
pub const DEFAULT_QUANTITY: &str = "0";

/// Rows made only of separators survive quoting as this literal name
const SEPARATOR_MARKER: &str = ";;";
const MIN_FIELDS: usize = 4;

const NAME_FIELD: usize = 1;
const QUANTITY_FIELD: usize = 2;
const UNIT_FIELD: usize = 3;

/// One ingredient as first seen in the recipe exports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawMaterial {
    pub name: String,
    pub unit: String,
    /// Quantity from the first recipe row, kept as text; never stored
    pub quantity: String,
}

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub sources: Vec<PathBuf>,
    pub skiprows: usize,
    pub separator: u8,
}

impl ExtractOptions {
    pub fn new(sources: Vec<PathBuf>) -> Self {
        Self {
            sources,
            skiprows: crate::plan::DEFAULT_SKIPROWS,
            separator: crate::plan::DEFAULT_SEPARATOR as u8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub path: PathBuf,
    /// Records after the header rows
    pub rows: usize,
    pub skipped: usize,
    pub added: usize,
    pub duplicates: usize,
}

/// Unique materials keyed by name, in discovery order
#[derive(Debug, Default, Serialize)]
pub struct Extraction {
    pub materials: IndexMap<String, RawMaterial>,
    pub files: Vec<FileStats>,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn unit_of(&self, name: &str) -> Option<&str> {
        self.materials.get(name).map(|m| m.unit.as_str())
    }

    /// Materials in ascending name order, the order codes are assigned in
    pub fn sorted(&self) -> Vec<&RawMaterial> {
        let mut materials: Vec<&RawMaterial> = self.materials.values().collect();
        materials.sort_by(|a, b| a.name.cmp(&b.name));
        materials
    }

    /// First occurrence wins; returns false for a name already present
    fn insert(&mut self, material: RawMaterial) -> bool {
        if let Some(existing) = self.materials.get(&material.name) {
            if existing.unit != material.unit {
                debug!(
                    "Ignoring unit '{}' for '{}', keeping '{}'",
                    material.unit, material.name, existing.unit
                );
            }
            return false;
        }
        self.materials.insert(material.name.clone(), material);
        true
    }
}

/// Turns a data record into a material, or None when the row carries no ingredient
pub fn parse_record(record: &StringRecord) -> Option<RawMaterial> {
    if record.len() < MIN_FIELDS {
        return None;
    }

    let name = record.get(NAME_FIELD)?.trim();
    if name.is_empty() || name == SEPARATOR_MARKER {
        return None;
    }

    let quantity = non_blank_or(record.get(QUANTITY_FIELD), DEFAULT_QUANTITY);
    let unit = non_blank_or(record.get(UNIT_FIELD), DEFAULT_UNIT);

    Some(RawMaterial {
        name: name.to_string(),
        unit,
        quantity,
    })
}

fn non_blank_or(field: Option<&str>, default: &str) -> String {
    match field.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}

/// Reads every source in order; the first unreadable file aborts the whole extraction
pub fn extract(options: &ExtractOptions) -> ExtractResult<Extraction> {
    let mut extraction = Extraction::default();

    for path in &options.sources {
        info!("Processing {}...", path.display());
        let file = open_source(path)?;
        let stats = extract_from_reader(file, path, options, &mut extraction)?;
        info!(
            "{}: {} rows, {} skipped, {} new, {} duplicate",
            path.display(),
            stats.rows,
            stats.skipped,
            stats.added,
            stats.duplicates
        );
        extraction.files.push(stats);
    }

    info!("Found {} unique raw materials", extraction.len());
    Ok(extraction)
}

fn open_source(path: &Path) -> ExtractResult<File> {
    File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ExtractError::FileNotFound(path.to_path_buf()),
        _ => ExtractError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Scans one delimited source into `extraction`; `path` only labels stats and errors
pub fn extract_from_reader<R: Read>(
    source: R,
    path: &Path,
    options: &ExtractOptions,
    extraction: &mut Extraction,
) -> ExtractResult<FileStats> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.separator)
        .from_reader(source);

    let mut stats = FileStats {
        path: path.to_path_buf(),
        ..Default::default()
    };
    let mut headers_seen = 0;

    for result in reader.records() {
        let record = result.map_err(|source| ExtractError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        if headers_seen < options.skiprows {
            headers_seen += 1;
            continue;
        }

        stats.rows += 1;
        match parse_record(&record) {
            Some(material) => {
                if extraction.insert(material) {
                    stats.added += 1;
                } else {
                    stats.duplicates += 1;
                }
            }
            None => stats.skipped += 1,
        }
    }

    if headers_seen < options.skiprows {
        return Err(ExtractError::MissingHeader {
            path: path.to_path_buf(),
            expected: options.skiprows,
            found: headers_seen,
        });
    }

    Ok(stats)
}
