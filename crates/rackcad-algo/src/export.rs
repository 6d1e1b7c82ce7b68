//! Writes assemblies to disk and verifies the result.

use crate::assembly::Assembly;
use crate::error::ExportError;
use crate::step_writer::{self, StepOptions};
use rackcad_core::report::{BBoxSize, ComponentRecord, ExportMetadata};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const COMPONENTS_DIR: &str = "components";
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Smallest accepted output size in bytes.
    pub min_size: u64,
    /// Also write one file per placement under `components/`.
    pub components: bool,
    /// Also write `metadata.json` next to the output.
    pub metadata: bool,
    pub step: StepOptions,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            min_size: 1024,
            components: false,
            metadata: false,
            step: StepOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub success: bool,
    pub path: PathBuf,
    pub bytes: u64,
    pub error: Option<String>,
    pub components: Vec<ComponentRecord>,
    pub metadata_path: Option<PathBuf>,
}

impl ExportReport {
    fn failed(path: &Path, err: &ExportError) -> Self {
        Self {
            success: false,
            path: path.to_path_buf(),
            bytes: 0,
            error: Some(err.to_string()),
            components: Vec::new(),
            metadata_path: None,
        }
    }
}

pub struct Exporter {
    opts: ExportOptions,
}

impl Exporter {
    pub fn new(opts: ExportOptions) -> Self {
        Self { opts }
    }

    /// Writes `assembly` to `path`. Never panics or returns an error: failures of
    /// the main file land in the report, and the optional side outputs are skipped
    /// with a warning when they cannot be written.
    pub fn export(&self, assembly: &Assembly, path: &Path) -> ExportReport {
        let bytes = match self.write_verified(assembly, path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "export failed");
                return ExportReport::failed(path, &err);
            }
        };
        info!(path = %path.display(), bytes, placements = assembly.len(), "assembly exported");

        let dir = output_dir(path);
        let components = if self.opts.components {
            self.write_components(assembly, &dir)
        } else {
            Vec::new()
        };

        let metadata_path = if self.opts.metadata {
            let meta = ExportMetadata {
                assembly: path.to_path_buf(),
                components_dir: self.opts.components.then(|| dir.join(COMPONENTS_DIR)),
                bbox: assembly.bbox().map(BBoxSize::from),
                components: components.clone(),
            };
            match write_metadata(&dir, &meta) {
                Ok(p) => Some(p),
                Err(err) => {
                    warn!(error = %err, "metadata not written");
                    None
                }
            }
        } else {
            None
        };

        ExportReport {
            success: true,
            path: path.to_path_buf(),
            bytes,
            error: None,
            components,
            metadata_path,
        }
    }

    fn write_verified(&self, assembly: &Assembly, path: &Path) -> Result<u64, ExportError> {
        if assembly.is_empty() {
            return Err(ExportError::EmptyAssembly);
        }
        let data = step_writer::write_step(assembly, &self.opts.step)?;
        write_file(path, &data)?;

        let bytes = fs::metadata(path)
            .map_err(|_| ExportError::Missing(path.to_path_buf()))?
            .len();
        if bytes < self.opts.min_size {
            return Err(ExportError::Undersized {
                path: path.to_path_buf(),
                bytes,
                min: self.opts.min_size,
            });
        }
        Ok(bytes)
    }

    fn write_components(&self, assembly: &Assembly, dir: &Path) -> Vec<ComponentRecord> {
        let dir = dir.join(COMPONENTS_DIR);
        let mut records = Vec::new();
        for placement in assembly.placements() {
            let path = dir.join(format!("{}.step", file_stem(&placement.name)));
            let written = step_writer::write_placements(
                assembly,
                &placement.name,
                [placement],
                &self.opts.step,
            )
            .and_then(|data| write_file(&path, &data).map(|()| data.len() as u64));
            match written {
                Ok(size_bytes) => {
                    debug!(name = %placement.name, size_bytes, "component exported");
                    records.push(ComponentRecord {
                        name: placement.name.clone(),
                        path,
                        size_bytes,
                    });
                }
                Err(err) => warn!(name = %placement.name, error = %err, "component skipped"),
            }
        }
        records
    }
}

/// Boolean form of [`Exporter::export`] with default options.
pub fn export_step(assembly: &Assembly, path: &Path) -> bool {
    Exporter::new(ExportOptions::default())
        .export(assembly, path)
        .success
}

fn write_metadata(dir: &Path, meta: &ExportMetadata) -> Result<PathBuf, ExportError> {
    let path = dir.join(METADATA_FILE);
    let json = serde_json::to_string_pretty(meta)?;
    write_file(&path, &json)?;
    Ok(path)
}

fn write_file(path: &Path, data: &str) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, data).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn output_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
