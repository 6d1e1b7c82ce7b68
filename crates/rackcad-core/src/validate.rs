//! Range-clamping, logic checks and default completion for raw configurations.

use crate::params::{ParamKind, ParamPath, REQUIRED_SECTIONS};
use crate::report::{MessageKind, ValidationMessage};
use crate::tree;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// A completed configuration plus every advisory raised while producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    pub config: Value,
    pub messages: Vec<ValidationMessage>,
}

impl Validation {
    /// No message was raised: the input was already complete and in range.
    pub fn is_clean(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn into_parts(self) -> (Value, Vec<ValidationMessage>) {
        (self.config, self.messages)
    }
}

/// Validates `config` and returns a fully populated copy.
///
/// Never fails: out-of-range numbers are clamped, wrongly typed values are reported
/// and passed through untouched, and every leaf of the parameter table that is still
/// missing afterwards is filled with its default. The input is not modified.
pub fn validate_and_complete(config: &Value) -> Validation {
    let mut completed = config.clone();
    let mut messages = Vec::new();

    if !completed.is_object() {
        messages.push(ValidationMessage::new(
            MessageKind::NotAnObject,
            None,
            "Configuration root is not an object, using defaults",
        ));
        completed = Value::Object(Map::new());
    }

    if let Some(root) = completed.as_object_mut() {
        for section in REQUIRED_SECTIONS {
            if root.get(section).map_or(true, Value::is_null) {
                root.insert(section.to_string(), Value::Object(Map::new()));
                messages.push(ValidationMessage::new(
                    MessageKind::MissingSection,
                    Some(section),
                    format!("Missing required section: {section}, using defaults"),
                ));
            }
        }
    }

    check_ranges(&mut completed, &mut messages);
    check_types(&completed, &mut messages);
    check_logic(&completed, &mut messages);
    fill_defaults(&mut completed, &mut messages);

    info!(messages = messages.len(), "configuration validated");
    Validation {
        config: completed,
        messages,
    }
}

fn check_ranges(config: &mut Value, messages: &mut Vec<ValidationMessage>) {
    for (path, (min, max)) in ParamPath::ranged() {
        let Some(value) = tree::get(config, path) else {
            continue;
        };
        // Non-numeric values are reported by the type pass.
        let Some(v) = value.as_f64() else {
            continue;
        };
        if (min..=max).contains(&v) {
            continue;
        }

        let clamped = v.clamp(min, max);
        let replacement = if value.is_i64() || value.is_u64() {
            Value::from(clamped as i64)
        } else {
            Value::from(clamped)
        };
        debug!(path = path.dotted(), from = v, to = clamped, "clamped out-of-range parameter");
        // The leaf was just read, so its parent is known to be an object.
        if tree::set(config, path, replacement).is_ok() {
            messages.push(ValidationMessage::new(
                MessageKind::Clamped,
                Some(path.dotted()),
                format!("{path}: {v} out of range [{min}, {max}], clamped to {clamped}"),
            ));
        }
    }
}

fn check_types(config: &Value, messages: &mut Vec<ValidationMessage>) {
    for path in ParamPath::ALL {
        let Some(value) = tree::get(config, path) else {
            continue;
        };
        let kind = path.kind();
        if kind.accepts(value) {
            continue;
        }
        let got = match value.as_f64() {
            Some(v) if kind == ParamKind::Integer => format!("non-integer {v}"),
            _ => json_type_name(value).to_string(),
        };
        debug!(path = path.dotted(), expected = kind.name(), "wrongly typed parameter");
        messages.push(ValidationMessage::new(
            MessageKind::TypeMismatch,
            Some(path.dotted()),
            format!("{path}: expected {}, got {got}", kind.name()),
        ));
    }
}

fn check_logic(config: &Value, messages: &mut Vec<ValidationMessage>) {
    let total_height = tree::get_f64(config, ParamPath::TotalHeight);
    let first_beam_height = tree::get_f64(config, ParamPath::FirstBeamHeight);
    let levels = tree::get_f64(config, ParamPath::Levels);
    let beam_spacing = tree::get_f64(config, ParamPath::BeamSpacing);

    if let (Some(h), Some(f), Some(n), Some(s)) = (total_height, first_beam_height, levels, beam_spacing)
    {
        let min_required = minimum_height(f, n, s);
        if h < min_required {
            messages.push(ValidationMessage::new(
                MessageKind::HeightLogic,
                Some(ParamPath::TotalHeight.dotted()),
                format!(
                    "Logic error: total_height ({h}) < first_beam_height ({f}) + (levels-1)×beam_spacing ({min_required}). Consider increasing total_height or decreasing levels."
                ),
            ));
        }
    }

    if tree::get_f64(config, ParamPath::BayDepth).is_some_and(|d| d <= 0.0) {
        messages.push(ValidationMessage::new(
            MessageKind::NonPositiveDepth,
            Some(ParamPath::BayDepth.dotted()),
            "bay_depth must be > 0",
        ));
    }
    if levels.is_some_and(|n| n < 2.0) {
        messages.push(ValidationMessage::new(
            MessageKind::TooFewLevels,
            Some(ParamPath::Levels.dotted()),
            "levels must be at least 2",
        ));
    }
}

/// `first_beam_height + (levels - 1) × beam_spacing`.
pub fn minimum_height(first_beam_height: f64, levels: f64, beam_spacing: f64) -> f64 {
    first_beam_height + (levels - 1.0) * beam_spacing
}

fn fill_defaults(config: &mut Value, messages: &mut Vec<ValidationMessage>) {
    for path in ParamPath::ALL {
        match tree::set_if_absent(config, path, path.default_value()) {
            Ok(true) => debug!(path = path.dotted(), "filled default"),
            Ok(false) => {}
            Err(blocked) => {
                debug!(path = path.dotted(), segment = blocked.segment, "default blocked");
                messages.push(ValidationMessage::new(
                    MessageKind::Unfillable,
                    Some(path.dotted()),
                    format!("{path}: cannot fill default, parent is not an object"),
                ));
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
