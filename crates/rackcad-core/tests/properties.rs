use proptest::prelude::*;
use rackcad_core::model::RackConfig;
use rackcad_core::params::ParamPath;
use rackcad_core::report::MessageKind;
use rackcad_core::tree;
use rackcad_core::validate::{minimum_height, validate_and_complete};
use serde_json::{json, Value};

fn arb_leaf() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        3 => Just(None),
        4 => (-20_000.0f64..20_000.0).prop_map(|v| Some(json!(v))),
        2 => (-50i64..15_000).prop_map(|v| Some(json!(v))),
        1 => Just(Some(json!("text"))),
        1 => any::<bool>().prop_map(|b| Some(json!(b))),
    ]
}

fn arb_config() -> impl Strategy<Value = Value> {
    prop::collection::vec(arb_leaf(), ParamPath::ALL.len()).prop_map(|leaves| {
        let mut root = json!({});
        for (path, leaf) in ParamPath::ALL.into_iter().zip(leaves) {
            if let Some(v) = leaf {
                tree::set(&mut root, path, v).unwrap();
            }
        }
        root
    })
}

proptest! {
    #[test]
    fn validation_is_idempotent(config in arb_config()) {
        let once = validate_and_complete(&config);
        let twice = validate_and_complete(&once.config);
        prop_assert_eq!(&once.config, &twice.config);
        prop_assert!(twice.messages.iter().all(|m| m.kind != MessageKind::Clamped));
    }

    #[test]
    fn every_default_path_is_present(config in arb_config()) {
        let result = validate_and_complete(&config);
        for path in ParamPath::ALL {
            prop_assert!(tree::get(&result.config, path).is_some(), "{}", path);
        }

        let mistyped = result.messages.iter().any(|m| m.kind == MessageKind::TypeMismatch);
        if !mistyped {
            for path in ParamPath::ALL {
                let leaf = tree::get(&result.config, path).unwrap();
                prop_assert!(path.kind().accepts(leaf), "{} = {}", path, leaf);
            }
            prop_assert!(RackConfig::from_value(&result.config).is_ok());
        }
    }

    #[test]
    fn ranged_numbers_end_up_in_range(config in arb_config()) {
        let result = validate_and_complete(&config);
        for (path, (min, max)) in ParamPath::ranged() {
            if let Some(v) = tree::get_f64(&result.config, path) {
                prop_assert!((min..=max).contains(&v), "{} = {}", path, v);
            }
        }
    }

    #[test]
    fn no_logic_message_implies_height_invariant(config in arb_config()) {
        let result = validate_and_complete(&config);
        let flagged = result.messages.iter().any(|m| m.kind == MessageKind::HeightLogic);
        let operands = (
            tree::get_f64(&result.config, ParamPath::TotalHeight),
            tree::get_f64(&result.config, ParamPath::FirstBeamHeight),
            tree::get_f64(&result.config, ParamPath::Levels),
            tree::get_f64(&result.config, ParamPath::BeamSpacing),
        );
        // Only meaningful when the operands were supplied (defaults are filled after the check).
        let supplied = [
            ParamPath::TotalHeight,
            ParamPath::FirstBeamHeight,
            ParamPath::Levels,
            ParamPath::BeamSpacing,
        ]
        .iter()
        .all(|p| tree::get_f64(&config, *p).is_some());
        if let (true, false, (Some(h), Some(f), Some(n), Some(s))) = (supplied, flagged, operands) {
            prop_assert!(h >= minimum_height(f, n, s));
        }
    }
}
