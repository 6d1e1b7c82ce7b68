use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }
}

pub const FALLBACK_COLOR: &str = "gray";

/// Named display colours, owned by whoever builds the assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    entries: BTreeMap<String, Rgba>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::empty()
            .with("blue", Rgba::rgb(0.1, 0.1, 0.8))
            .with("orange", Rgba::rgb(1.0, 0.5, 0.0))
            .with("gray", Rgba::rgb(0.8, 0.8, 0.8))
            .with("grey", Rgba::rgb(0.8, 0.8, 0.8))
            .with("red", Rgba::rgb(0.8, 0.1, 0.1))
            .with("green", Rgba::rgb(0.1, 0.6, 0.2))
            .with("yellow", Rgba::rgb(0.95, 0.8, 0.1))
            .with("black", Rgba::rgb(0.05, 0.05, 0.05))
            .with("white", Rgba::rgb(0.95, 0.95, 0.95))
            .with("silver", Rgba::rgb(0.75, 0.75, 0.78))
    }
}

impl Palette {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: &str, color: Rgba) -> Self {
        self.insert(name, color);
        self
    }

    pub fn insert(&mut self, name: &str, color: Rgba) {
        self.entries.insert(name.trim().to_ascii_lowercase(), color);
    }

    pub fn get(&self, name: &str) -> Option<Rgba> {
        self.entries.get(&name.trim().to_ascii_lowercase()).copied()
    }

    /// Looks `name` up case-insensitively, falling back to gray (or mid-gray when
    /// the palette has no gray entry).
    pub fn resolve(&self, name: &str) -> Rgba {
        if let Some(color) = self.get(name) {
            return color;
        }
        debug!(color = name, "unknown color name, using fallback");
        self.get(FALLBACK_COLOR)
            .unwrap_or(Rgba::rgb(0.5, 0.5, 0.5))
    }
}
