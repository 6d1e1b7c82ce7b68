use rackcad_core::color::{Palette, Rgba};
use rackcad_core::error::ConfigError;
use rackcad_core::model::{RackConfig, SectionSize};
use rackcad_core::validate::validate_and_complete;
use serde_json::json;

#[test]
fn completed_defaults_deserialize_into_typed_config() {
    let completed = validate_and_complete(&json!({})).config;
    let cfg = RackConfig::from_value(&completed).expect("typed config");

    assert_eq!(2, cfg.warehouse_config.overall_layout.rows);
    assert!(!cfg.warehouse_config.overall_layout.double_row);
    assert_eq!(2400.0, cfg.racking_system.dimensions.bay_width);
    assert_eq!(3, cfg.racking_system.structure.levels);
    assert_eq!("80x60", cfg.racking_system.components.upright.section_size);
    assert_eq!("L-beam", cfg.racking_system.components.upright.profile);
    assert!(cfg.racking_system.components.decking.has_decking);

    let back = cfg.to_value().unwrap();
    assert_eq!(cfg, RackConfig::from_value(&back).unwrap());
}

#[test]
fn counts_accept_integral_floats() {
    let mut completed = validate_and_complete(&json!({})).config;
    completed["racking_system"]["structure"]["levels"] = json!(4.0);
    let cfg = RackConfig::from_value(&completed).unwrap();
    assert_eq!(4, cfg.racking_system.structure.levels);

    completed["racking_system"]["structure"]["levels"] = json!(4.5);
    assert!(RackConfig::from_value(&completed).is_err());
}

#[test]
fn missing_component_key_is_a_hard_error() {
    let mut completed = validate_and_complete(&json!({})).config;
    completed["racking_system"]["components"]["upright"]
        .as_object_mut()
        .unwrap()
        .remove("section_size");

    let err = RackConfig::from_value(&completed).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert_eq!("invalid rack configuration", err.to_string());
    let cause = std::error::Error::source(&err).unwrap().to_string();
    assert!(cause.contains("section_size"), "{cause}");
    assert!(!err.to_string().contains(&cause));
}

#[test]
fn parses_section_sizes() {
    assert_eq!(SectionSize::new(80.0, 60.0), SectionSize::parse("80x60").unwrap());
    assert_eq!(SectionSize::new(50.0, 100.0), SectionSize::parse(" 50 X 100 ").unwrap());
    assert_eq!(SectionSize::new(80.5, 60.0), "80.5×60".parse().unwrap());
    assert_eq!("80x60", SectionSize::new(80.0, 60.0).to_string());

    for bad in ["", "80", "80x", "x60", "80x60x3", "axb", "0x60", "-80x60", "80xNaN"] {
        assert!(
            matches!(SectionSize::parse(bad), Err(ConfigError::MalformedSection(_))),
            "{bad:?}"
        );
    }
}

#[test]
fn palette_is_case_insensitive_and_falls_back_to_gray() {
    let palette = Palette::default();
    assert_eq!(palette.resolve("Blue"), palette.resolve(" blue "));
    assert_eq!(Rgba::rgb(1.0, 0.5, 0.0), palette.resolve("ORANGE"));
    assert_eq!(palette.resolve("gray"), palette.resolve("mauve"));

    let custom = Palette::empty().with("teal", Rgba::rgb(0.0, 0.5, 0.5));
    assert_eq!(Rgba::rgb(0.0, 0.5, 0.5), custom.resolve("TEAL"));
    assert_eq!(Rgba::rgb(0.5, 0.5, 0.5), custom.resolve("blue"));
}
