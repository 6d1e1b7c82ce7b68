//! Zig-zag bracing geometry for the end frames.

use crate::error::LayoutError;
use serde::{Deserialize, Serialize};

/// Rotation about X that lays a bar authored along Z flat into the frame plane.
pub const BRACING_BASE_ROTATION_DEG: f64 = 90.0;
pub const DEFAULT_BRACING_SPACING: f64 = 650.0;
/// Upper bound on diagonals per end frame, checked before anything is allocated.
pub const MAX_BRACING_SEGMENTS: u32 = 1000;

/// How many diagonal segments a frame of a given height gets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracingMode {
    Fixed(u32),
    /// One segment per `target_spacing` of height, rounded up.
    Adaptive { target_spacing: f64 },
}

impl Default for BracingMode {
    fn default() -> Self {
        BracingMode::Adaptive {
            target_spacing: DEFAULT_BRACING_SPACING,
        }
    }
}

impl BracingMode {
    pub fn segment_count(&self, total_height: f64) -> Result<u32, LayoutError> {
        match *self {
            BracingMode::Fixed(0) => Err(LayoutError::TooFew {
                what: "bracing segments",
                min: 1,
                value: 0,
            }),
            BracingMode::Fixed(n) if n > MAX_BRACING_SEGMENTS => Err(LayoutError::TooMany {
                what: "bracing segments",
                max: MAX_BRACING_SEGMENTS,
                value: f64::from(n),
            }),
            BracingMode::Fixed(n) => Ok(n),
            BracingMode::Adaptive { target_spacing } => {
                if !(target_spacing.is_finite() && target_spacing > 0.0) {
                    return Err(LayoutError::NonPositive {
                        what: "bracing spacing",
                        value: target_spacing,
                    });
                }
                // Shave a hair off so exact multiples do not round up an extra segment.
                let n = (total_height / target_spacing - 1e-9).ceil().max(1.0);
                if n > f64::from(MAX_BRACING_SEGMENTS) {
                    return Err(LayoutError::TooMany {
                        what: "bracing segments",
                        max: MAX_BRACING_SEGMENTS,
                        value: n,
                    });
                }
                Ok(n as u32)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BracingSegment {
    pub index: u32,
    pub z_mid: f64,
    pub height: f64,
    /// Bar length spanning the frame depth over one segment height.
    pub length: f64,
    /// Signed incline from horizontal: positive on even segments, negative on odd.
    pub tilt_deg: f64,
    /// Total rotation about X to apply to a bar authored along local Z.
    pub rotation_deg: f64,
}

/// Splits a frame of `total_height` × `depth` into alternating diagonals.
pub fn bracing_segments(
    total_height: f64,
    depth: f64,
    mode: BracingMode,
) -> Result<Vec<BracingSegment>, LayoutError> {
    if !(total_height.is_finite() && total_height > 0.0) {
        return Err(LayoutError::NonPositive {
            what: "frame height",
            value: total_height,
        });
    }
    if !(depth.is_finite() && depth > 0.0) {
        return Err(LayoutError::NonPositive {
            what: "frame depth",
            value: depth,
        });
    }

    let count = mode.segment_count(total_height)?;
    let height = total_height / f64::from(count);
    let length = depth.hypot(height);
    let incline = (height / depth).atan().to_degrees();

    Ok((0..count)
        .map(|index| {
            let tilt_deg = if index % 2 == 0 { incline } else { -incline };
            BracingSegment {
                index,
                z_mid: (f64::from(index) + 0.5) * height,
                height,
                length,
                tilt_deg,
                rotation_deg: BRACING_BASE_ROTATION_DEG + tilt_deg,
            }
        })
        .collect())
}
