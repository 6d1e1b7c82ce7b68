//! The closed table of configuration leaves the validator knows about.
//!
//! Every leaf is addressed by a [`ParamPath`] variant instead of a free-form dotted
//! string, so a typo is a compile error rather than a silently ignored key.

use serde_json::{json, Value};

/// The two sections every configuration must carry.
pub const REQUIRED_SECTIONS: [&str; 2] = ["warehouse_config", "racking_system"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    Number,
    Text,
    Flag,
}

impl ParamKind {
    /// Whether `value` has the JSON shape this kind expects.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::Integer => value
                .as_f64()
                .is_some_and(|v| v.is_finite() && v.fract() == 0.0),
            ParamKind::Number => value.is_number(),
            ParamKind::Text => value.is_string(),
            ParamKind::Flag => value.is_boolean(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ParamKind::Integer => "integer",
            ParamKind::Number => "number",
            ParamKind::Text => "string",
            ParamKind::Flag => "boolean",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamPath {
    Rows,
    RowSpacing,
    Orientation,
    BaysPerRow,
    DoubleRow,
    BayWidth,
    BayDepth,
    TotalHeight,
    Levels,
    FirstBeamHeight,
    BeamSpacing,
    UprightType,
    UprightSectionSize,
    UprightColor,
    UprightMaterial,
    BeamType,
    BeamSectionSize,
    BeamColor,
    BeamConnectionType,
    HasDecking,
    DeckingType,
    DeckingThickness,
    DeckingColor,
    BeamToUprightMethod,
    BoltCount,
    WeldLength,
    DeckingToBeamMethod,
    ClipSpacing,
}

impl ParamPath {
    /// Table order; the validator walks ranges and defaults in this order.
    pub const ALL: [ParamPath; 28] = [
        ParamPath::Rows,
        ParamPath::RowSpacing,
        ParamPath::Orientation,
        ParamPath::BaysPerRow,
        ParamPath::DoubleRow,
        ParamPath::BayWidth,
        ParamPath::BayDepth,
        ParamPath::TotalHeight,
        ParamPath::Levels,
        ParamPath::FirstBeamHeight,
        ParamPath::BeamSpacing,
        ParamPath::UprightType,
        ParamPath::UprightSectionSize,
        ParamPath::UprightColor,
        ParamPath::UprightMaterial,
        ParamPath::BeamType,
        ParamPath::BeamSectionSize,
        ParamPath::BeamColor,
        ParamPath::BeamConnectionType,
        ParamPath::HasDecking,
        ParamPath::DeckingType,
        ParamPath::DeckingThickness,
        ParamPath::DeckingColor,
        ParamPath::BeamToUprightMethod,
        ParamPath::BoltCount,
        ParamPath::WeldLength,
        ParamPath::DeckingToBeamMethod,
        ParamPath::ClipSpacing,
    ];

    pub fn dotted(self) -> &'static str {
        match self {
            ParamPath::Rows => "warehouse_config.overall_layout.rows",
            ParamPath::RowSpacing => "warehouse_config.overall_layout.row_spacing",
            ParamPath::Orientation => "warehouse_config.overall_layout.orientation",
            ParamPath::BaysPerRow => "warehouse_config.overall_layout.bays_per_row",
            ParamPath::DoubleRow => "warehouse_config.overall_layout.double_row",
            ParamPath::BayWidth => "racking_system.dimensions.bay_width",
            ParamPath::BayDepth => "racking_system.dimensions.bay_depth",
            ParamPath::TotalHeight => "racking_system.dimensions.total_height",
            ParamPath::Levels => "racking_system.structure.levels",
            ParamPath::FirstBeamHeight => "racking_system.structure.first_beam_height",
            ParamPath::BeamSpacing => "racking_system.structure.beam_spacing",
            ParamPath::UprightType => "racking_system.components.upright.type",
            ParamPath::UprightSectionSize => "racking_system.components.upright.section_size",
            ParamPath::UprightColor => "racking_system.components.upright.color",
            ParamPath::UprightMaterial => "racking_system.components.upright.material",
            ParamPath::BeamType => "racking_system.components.beam.type",
            ParamPath::BeamSectionSize => "racking_system.components.beam.section_size",
            ParamPath::BeamColor => "racking_system.components.beam.color",
            ParamPath::BeamConnectionType => "racking_system.components.beam.connection_type",
            ParamPath::HasDecking => "racking_system.components.decking.has_decking",
            ParamPath::DeckingType => "racking_system.components.decking.type",
            ParamPath::DeckingThickness => "racking_system.components.decking.thickness",
            ParamPath::DeckingColor => "racking_system.components.decking.color",
            ParamPath::BeamToUprightMethod => {
                "racking_system.connection_details.beam_to_upright.method"
            }
            ParamPath::BoltCount => "racking_system.connection_details.beam_to_upright.bolt_count",
            ParamPath::WeldLength => {
                "racking_system.connection_details.beam_to_upright.weld_length"
            }
            ParamPath::DeckingToBeamMethod => {
                "racking_system.connection_details.decking_to_beam.method"
            }
            ParamPath::ClipSpacing => {
                "racking_system.connection_details.decking_to_beam.clip_spacing"
            }
        }
    }

    pub fn segments(self) -> impl Iterator<Item = &'static str> {
        self.dotted().split('.')
    }

    pub fn kind(self) -> ParamKind {
        match self {
            ParamPath::Rows | ParamPath::BaysPerRow | ParamPath::Levels | ParamPath::BoltCount => {
                ParamKind::Integer
            }
            ParamPath::RowSpacing
            | ParamPath::BayWidth
            | ParamPath::BayDepth
            | ParamPath::TotalHeight
            | ParamPath::FirstBeamHeight
            | ParamPath::BeamSpacing
            | ParamPath::DeckingThickness
            | ParamPath::WeldLength
            | ParamPath::ClipSpacing => ParamKind::Number,
            ParamPath::DoubleRow | ParamPath::HasDecking => ParamKind::Flag,
            _ => ParamKind::Text,
        }
    }

    /// Closed `[min, max]` range for range-checked numeric leaves.
    pub fn range(self) -> Option<(f64, f64)> {
        let range = match self {
            ParamPath::Rows => (1.0, 20.0),
            ParamPath::RowSpacing => (1000.0, 5000.0),
            ParamPath::BaysPerRow => (1.0, 50.0),
            ParamPath::BayWidth => (1000.0, 4000.0),
            ParamPath::BayDepth => (800.0, 2000.0),
            ParamPath::TotalHeight => (2000.0, 10000.0),
            ParamPath::Levels => (2.0, 10.0),
            ParamPath::FirstBeamHeight => (100.0, 500.0),
            ParamPath::BeamSpacing => (400.0, 2000.0),
            ParamPath::DeckingThickness => (10.0, 50.0),
            ParamPath::BoltCount => (0.0, 8.0),
            ParamPath::ClipSpacing => (200.0, 600.0),
            _ => return None,
        };
        Some(range)
    }

    pub fn default_value(self) -> Value {
        match self {
            ParamPath::Rows => json!(2),
            ParamPath::RowSpacing => json!(3000),
            ParamPath::Orientation => json!("north-south"),
            ParamPath::BaysPerRow => json!(1),
            ParamPath::DoubleRow => json!(false),
            ParamPath::BayWidth => json!(2400),
            ParamPath::BayDepth => json!(1000),
            ParamPath::TotalHeight => json!(6000),
            ParamPath::Levels => json!(3),
            ParamPath::FirstBeamHeight => json!(200),
            ParamPath::BeamSpacing => json!(1800),
            ParamPath::UprightType => json!("L-beam"),
            ParamPath::UprightSectionSize => json!("80x60"),
            ParamPath::UprightColor => json!("blue"),
            ParamPath::UprightMaterial => json!("steel"),
            ParamPath::BeamType => json!("P-beam"),
            ParamPath::BeamSectionSize => json!("50x100"),
            ParamPath::BeamColor => json!("orange"),
            ParamPath::BeamConnectionType => json!("clip-on"),
            ParamPath::HasDecking => json!(true),
            ParamPath::DeckingType => json!("wire-mesh"),
            ParamPath::DeckingThickness => json!(30),
            ParamPath::DeckingColor => json!("gray"),
            ParamPath::BeamToUprightMethod => json!("clip"),
            ParamPath::BoltCount => json!(0),
            ParamPath::WeldLength => json!(0),
            ParamPath::DeckingToBeamMethod => json!("clip"),
            ParamPath::ClipSpacing => json!(400),
        }
    }

    pub fn ranged() -> impl Iterator<Item = (ParamPath, (f64, f64))> {
        ParamPath::ALL
            .into_iter()
            .filter_map(|p| p.range().map(|r| (p, r)))
    }
}

impl std::fmt::Display for ParamPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dotted())
    }
}
