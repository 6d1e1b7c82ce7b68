use rackcad_core::model::RackConfig;
use rackcad_core::params::{ParamKind, ParamPath};
use rackcad_core::report::MessageKind;
use rackcad_core::tree;
use rackcad_core::validate::validate_and_complete;
use serde_json::json;

fn complete_input() -> serde_json::Value {
    json!({
        "warehouse_config": {
            "overall_layout": {
                "rows": 3,
                "row_spacing": 2500.0,
                "orientation": "east-west",
                "bays_per_row": 2,
                "double_row": false
            }
        },
        "racking_system": {
            "dimensions": {"bay_width": 2000.0, "bay_depth": 1200.0, "total_height": 5000.0},
            "structure": {"levels": 3, "first_beam_height": 300.0, "beam_spacing": 1500.0},
            "components": {
                "upright": {"type": "omega", "section_size": "90x70", "color": "blue", "material": "steel"},
                "beam": {"type": "box", "section_size": "60x120", "color": "orange", "connection_type": "bolted"},
                "decking": {"has_decking": true, "type": "timber", "thickness": 25, "color": "yellow"}
            },
            "connection_details": {
                "beam_to_upright": {"method": "bolt", "bolt_count": 4, "weld_length": 0},
                "decking_to_beam": {"method": "clip", "clip_spacing": 300}
            }
        }
    })
}

#[test]
fn complete_in_range_config_has_no_messages() {
    let input = complete_input();
    let result = validate_and_complete(&input);
    assert!(result.is_clean(), "{:?}", result.messages);
    assert_eq!(input, result.config);
}

#[test]
fn out_of_range_bay_width_is_clamped() {
    let input = json!({
        "warehouse_config": {"overall_layout": {}},
        "racking_system": {
            "dimensions": {"bay_width": 5000.0, "bay_depth": 1000.0, "total_height": 6000.0},
            "structure": {"levels": 5, "first_beam_height": 200.0, "beam_spacing": 1000.0}
        }
    });
    let result = validate_and_complete(&input);

    assert_eq!(
        Some(4000.0),
        tree::get_f64(&result.config, ParamPath::BayWidth)
    );
    let clamp = result
        .messages
        .iter()
        .find(|m| m.kind == MessageKind::Clamped)
        .expect("clamp message");
    assert!(clamp.message.contains("clamped to 4000"), "{}", clamp.message);
    assert!(clamp.message.contains("5000"));
    assert_eq!(Some(ParamPath::BayWidth.dotted().to_string()), clamp.path);
}

#[test]
fn clamping_keeps_integers_integral() {
    let input = json!({"racking_system": {"structure": {"levels": 40}}});
    let result = validate_and_complete(&input);
    let levels = tree::get(&result.config, ParamPath::Levels).unwrap();
    assert!(levels.is_i64());
    assert_eq!(Some(10), levels.as_i64());
}

#[test]
fn decking_thickness_is_clamped_both_ways() {
    for (given, expected) in [(5.0, 10.0), (100.0, 50.0)] {
        let input = json!({"racking_system": {"components": {"decking": {"thickness": given}}}});
        let result = validate_and_complete(&input);
        assert_eq!(
            Some(expected),
            tree::get_f64(&result.config, ParamPath::DeckingThickness)
        );
    }
}

#[test]
fn reports_height_logic_error_without_correcting() {
    let input = json!({
        "warehouse_config": {"overall_layout": {}},
        "racking_system": {
            "dimensions": {"bay_width": 2000.0, "bay_depth": 1000.0, "total_height": 3000.0},
            "structure": {"levels": 5, "first_beam_height": 200.0, "beam_spacing": 1000.0}
        }
    });
    let result = validate_and_complete(&input);
    let logic: Vec<_> = result
        .messages
        .iter()
        .filter(|m| m.kind == MessageKind::HeightLogic)
        .collect();
    assert_eq!(1, logic.len());
    assert!(logic[0].message.contains("total_height (3000)"));
    assert!(logic[0].message.contains("(4200)"));
    assert_eq!(
        Some(3000.0),
        tree::get_f64(&result.config, ParamPath::TotalHeight)
    );
}

#[test]
fn logic_check_is_skipped_when_an_operand_is_missing() {
    let input = json!({
        "warehouse_config": {},
        "racking_system": {"dimensions": {"total_height": 2000.0}, "structure": {"levels": 10}}
    });
    let result = validate_and_complete(&input);
    assert!(result
        .messages
        .iter()
        .all(|m| m.kind != MessageKind::HeightLogic));
}

#[test]
fn non_numeric_value_is_reported_and_passed_through() {
    let input = json!({
        "warehouse_config": {},
        "racking_system": {"dimensions": {"bay_width": "wide"}}
    });
    let result = validate_and_complete(&input);

    assert_eq!(
        Some(&json!("wide")),
        tree::get(&result.config, ParamPath::BayWidth)
    );
    let msg = result
        .messages
        .iter()
        .find(|m| m.kind == MessageKind::TypeMismatch)
        .expect("type message");
    assert_eq!(
        "racking_system.dimensions.bay_width: expected number, got string",
        msg.message
    );
}

#[test]
fn every_leaf_kind_is_checked() {
    let mut input = complete_input();
    tree::set(&mut input, ParamPath::Levels, json!(2.5)).unwrap();
    tree::set(&mut input, ParamPath::HasDecking, json!("yes")).unwrap();
    tree::set(&mut input, ParamPath::UprightColor, json!(7)).unwrap();
    tree::set(&mut input, ParamPath::DoubleRow, json!(null)).unwrap();
    let result = validate_and_complete(&input);

    let types: Vec<&str> = result
        .messages
        .iter()
        .filter(|m| m.kind == MessageKind::TypeMismatch)
        .map(|m| m.message.as_str())
        .collect();
    assert_eq!(
        vec![
            "racking_system.structure.levels: expected integer, got non-integer 2.5",
            "racking_system.components.upright.color: expected string, got number",
            "racking_system.components.decking.has_decking: expected boolean, got string",
        ],
        types
    );
    // Wrongly typed values pass through untouched; null is filled like a missing leaf.
    assert_eq!(Some(&json!(2.5)), tree::get(&result.config, ParamPath::Levels));
    assert_eq!(Some(&json!("yes")), tree::get(&result.config, ParamPath::HasDecking));
    assert_eq!(Some(&json!(false)), tree::get(&result.config, ParamPath::DoubleRow));
    assert!(RackConfig::from_value(&result.config).is_err());
}

#[test]
fn whole_floats_are_integers() {
    let mut input = complete_input();
    tree::set(&mut input, ParamPath::Levels, json!(4.0)).unwrap();
    tree::set(&mut input, ParamPath::BoltCount, json!(2.0)).unwrap();
    let result = validate_and_complete(&input);
    assert!(result.is_clean(), "{:?}", result.messages);

    let config = RackConfig::from_value(&result.config).unwrap();
    assert_eq!(4, config.racking_system.structure.levels);
}

#[test]
fn empty_config_is_filled_with_defaults() {
    let result = validate_and_complete(&json!({}));

    let kinds: Vec<_> = result.messages.iter().map(|m| m.kind).collect();
    assert_eq!(
        vec![MessageKind::MissingSection, MessageKind::MissingSection],
        kinds
    );
    assert!(result.messages[0].message.contains("warehouse_config"));
    assert!(result.messages[1].message.contains("racking_system"));

    for path in ParamPath::ALL {
        assert_eq!(
            Some(&path.default_value()),
            tree::get(&result.config, path),
            "{path}"
        );
    }
    assert_eq!(Some(2400.0), tree::get_f64(&result.config, ParamPath::BayWidth));
    assert_eq!(Some(3.0), tree::get_f64(&result.config, ParamPath::Levels));
}

#[test]
fn defaults_never_overwrite_present_values() {
    let input = json!({
        "warehouse_config": {"overall_layout": {"orientation": "diagonal"}},
        "racking_system": {"components": {"upright": {"color": "red"}}}
    });
    let result = validate_and_complete(&input);
    assert_eq!(
        Some(&json!("diagonal")),
        tree::get(&result.config, ParamPath::Orientation)
    );
    assert_eq!(
        Some(&json!("red")),
        tree::get(&result.config, ParamPath::UprightColor)
    );
}

#[test]
fn input_is_not_mutated() {
    let input = json!({"racking_system": {"dimensions": {"bay_width": 9000}}});
    let snapshot = input.clone();
    let _ = validate_and_complete(&input);
    assert_eq!(snapshot, input);
}

#[test]
fn non_object_root_and_foreign_sections_do_not_panic() {
    let result = validate_and_complete(&json!([1, 2, 3]));
    assert_eq!(MessageKind::NotAnObject, result.messages[0].kind);
    assert!(tree::get(&result.config, ParamPath::BayDepth).is_some());

    let result = validate_and_complete(&json!({"warehouse_config": {}, "racking_system": 7}));
    assert_eq!(Some(&json!(7)), result.config.get("racking_system"));
    assert!(result
        .messages
        .iter()
        .any(|m| m.kind == MessageKind::Unfillable));
}

#[test]
fn null_leaves_count_as_missing() {
    let input = json!({"warehouse_config": null, "racking_system": {"dimensions": {"bay_depth": null}}});
    let result = validate_and_complete(&input);
    assert_eq!(Some(1000.0), tree::get_f64(&result.config, ParamPath::BayDepth));
    assert!(tree::get(&result.config, ParamPath::Rows).is_some());
}

#[test]
fn default_table_kinds_match_default_values() {
    for path in ParamPath::ALL {
        assert!(path.kind().accepts(&path.default_value()), "{path}");
        if let Some((min, max)) = path.range() {
            assert_ne!(ParamKind::Text, path.kind());
            let v = path.default_value().as_f64().unwrap();
            assert!((min..=max).contains(&v), "{path}");
        }
    }
}
