use crate::error::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Typed view of a completed configuration.
///
/// Every leaf is required, so deserialising a record that skipped validation fails
/// with the name of the first missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackConfig {
    pub warehouse_config: WarehouseConfig,
    pub racking_system: RackingSystem,
}

impl RackConfig {
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        Ok(Self::deserialize(value)?)
    }

    pub fn to_value(&self) -> Result<Value, ConfigError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseConfig {
    pub overall_layout: OverallLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallLayout {
    #[serde(deserialize_with = "count")]
    pub rows: u32,
    pub row_spacing: f64,
    pub orientation: String,
    #[serde(deserialize_with = "count")]
    pub bays_per_row: u32,
    pub double_row: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RackingSystem {
    pub dimensions: Dimensions,
    pub structure: Structure,
    pub components: Components,
    pub connection_details: ConnectionDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub bay_width: f64,
    pub bay_depth: f64,
    pub total_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    #[serde(deserialize_with = "count")]
    pub levels: u32,
    pub first_beam_height: f64,
    pub beam_spacing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Components {
    pub upright: UprightSpec,
    pub beam: BeamSpec,
    pub decking: DeckingSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UprightSpec {
    #[serde(rename = "type")]
    pub profile: String,
    pub section_size: String,
    pub color: String,
    pub material: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSpec {
    #[serde(rename = "type")]
    pub profile: String,
    pub section_size: String,
    pub color: String,
    pub connection_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckingSpec {
    pub has_decking: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub thickness: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionDetails {
    pub beam_to_upright: BeamToUpright,
    pub decking_to_beam: DeckingToBeam,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamToUpright {
    pub method: String,
    #[serde(deserialize_with = "count")]
    pub bolt_count: u32,
    pub weld_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckingToBeam {
    pub method: String,
    pub clip_spacing: f64,
}

/// Accepts `3` as well as `3.0`; rejects fractional or negative counts.
fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;
    if v.is_finite() && v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v) {
        Ok(v as u32)
    } else {
        Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {v}"
        )))
    }
}

/// A two-sided cross-section such as `"80x60"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionSize {
    pub first: f64,
    pub second: f64,
}

impl SectionSize {
    pub fn new(first: f64, second: f64) -> Self {
        Self { first, second }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let malformed = || ConfigError::MalformedSection(s.to_string());
        let mut parts = s.split(['x', 'X', '×']);
        let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let a: f64 = a.trim().parse().map_err(|_| malformed())?;
        let b: f64 = b.trim().parse().map_err(|_| malformed())?;
        if !(a.is_finite() && b.is_finite() && a > 0.0 && b > 0.0) {
            return Err(malformed());
        }
        Ok(Self::new(a, b))
    }
}

impl FromStr for SectionSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SectionSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.first, self.second)
    }
}
