use crate::geom::BBox3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    MissingSection,
    NotAnObject,
    TypeMismatch,
    Clamped,
    HeightLogic,
    NonPositiveDepth,
    TooFewLevels,
    Unfillable,
}

/// One advisory produced while validating a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMessage {
    pub kind: MessageKind,
    pub path: Option<String>,
    pub message: String,
}

impl ValidationMessage {
    pub fn new(kind: MessageKind, path: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.map(str::to_string),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BBoxSize {
    pub xlen: f64,
    pub ylen: f64,
    pub zlen: f64,
}

impl From<BBox3> for BBoxSize {
    fn from(b: BBox3) -> Self {
        Self {
            xlen: b.xlen(),
            ylen: b.ylen(),
            zlen: b.zlen(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// The `metadata.json` sidecar written next to an exported assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub assembly: PathBuf,
    pub components_dir: Option<PathBuf>,
    pub bbox: Option<BBoxSize>,
    pub components: Vec<ComponentRecord>,
}
