use rackcad_algo::error::FactoryError;
use rackcad_algo::solid::{
    self, clamp_decking_thickness, ProfileKind, Role, UprightProfile, DEFAULT_UPRIGHT_WALL,
};
use rackcad_core::model::SectionSize;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn signed_area(s: &solid::Solid) -> f64 {
    let n = s.profile.len();
    (0..n)
        .map(|i| {
            let (a, b) = (s.profile[i], s.profile[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        * 0.5
}

#[test]
fn rectangular_upright_spans_section_and_height() {
    let profile = UprightProfile::parse("box", "80x60", DEFAULT_UPRIGHT_WALL).unwrap();
    assert_eq!(profile.kind, ProfileKind::Rectangular);

    let column = solid::upright(&profile, 6000.0).unwrap();
    assert_eq!(column.role, Role::Upright);
    let bbox = column.local_bbox();
    assert!(approx(bbox.min.x, -40.0) && approx(bbox.max.x, 40.0));
    assert!(approx(bbox.min.y, -30.0) && approx(bbox.max.y, 30.0));
    assert!(approx(bbox.min.z, 0.0) && approx(bbox.max.z, 6000.0));
}

#[test]
fn open_profiles_keep_outer_envelope() {
    for (name, kind, corners) in [
        ("Omega", ProfileKind::Omega, 8),
        ("C-channel", ProfileKind::Channel, 8),
        ("L-beam", ProfileKind::Angle, 6),
    ] {
        let profile = UprightProfile::parse(name, "80 x 60", 2.0).unwrap();
        assert_eq!(profile.kind, kind, "{name}");

        let column = solid::upright(&profile, 3000.0).unwrap();
        assert_eq!(column.profile.len(), corners, "{name}");
        assert!(signed_area(&column) > 0.0, "{name} profile must be counter-clockwise");
        // Open sections enclose far less than the full rectangle.
        assert!(signed_area(&column) < 80.0 * 60.0 * 0.5, "{name}");

        let bbox = column.local_bbox();
        assert!(approx(bbox.xlen(), 80.0) && approx(bbox.ylen(), 60.0), "{name}");
    }
}

#[test]
fn wall_must_fit_inside_section() {
    let profile = UprightProfile::new(ProfileKind::Channel, SectionSize::new(80.0, 60.0), 30.0);
    let err = solid::upright(&profile, 3000.0).unwrap_err();
    assert!(matches!(err, FactoryError::WallTooThick { .. }));

    let profile = UprightProfile::new(ProfileKind::Omega, SectionSize::new(80.0, 60.0), 0.0);
    assert!(matches!(
        solid::upright(&profile, 3000.0),
        Err(FactoryError::NonPositive { .. })
    ));
}

#[test]
fn malformed_section_is_a_hard_error() {
    let err = UprightProfile::parse("box", "eighty by sixty", 2.0).unwrap_err();
    assert!(matches!(err, FactoryError::Section(_)));
    assert!(err.to_string().contains("eighty by sixty"));
}

#[test]
fn beam_runs_along_local_z_with_height_on_x() {
    let beam = solid::beam(SectionSize::new(100.0, 50.0), 2320.0).unwrap();
    let bbox = beam.local_bbox();
    assert!(approx(bbox.xlen(), 100.0));
    assert!(approx(bbox.ylen(), 50.0));
    assert!(approx(bbox.min.z, -1160.0) && approx(bbox.max.z, 1160.0));
    assert!(approx(beam.length(), 2320.0));
}

#[test]
fn decking_thickness_is_clamped() {
    let thin = solid::decking(1000.0, 800.0, 5.0).unwrap();
    assert!(approx(thin.local_bbox().zlen(), 10.0));

    let thick = solid::decking(1000.0, 800.0, 100.0).unwrap();
    assert!(approx(thick.local_bbox().zlen(), 50.0));

    let ok = solid::decking(1000.0, 800.0, 25.0).unwrap();
    assert!(approx(ok.local_bbox().zlen(), 25.0));
    assert!(approx(ok.local_bbox().center().z, 0.0));
}

#[test]
fn clamp_reports_only_when_moved() {
    assert_eq!(clamp_decking_thickness(25.0), (25.0, None));

    let (value, note) = clamp_decking_thickness(5.0);
    assert_eq!(value, 10.0);
    assert!(note.unwrap().contains("clamped to 10"));

    let (value, note) = clamp_decking_thickness(100.0);
    assert_eq!(value, 50.0);
    assert!(note.is_some());
}

#[test]
fn non_positive_dimensions_are_rejected() {
    assert!(matches!(
        solid::decking(0.0, 800.0, 25.0),
        Err(FactoryError::NonPositive { part: Role::Decking, dimension: "width", .. })
    ));
    assert!(matches!(
        solid::decking(1000.0, 800.0, -5.0),
        Err(FactoryError::NonPositive { dimension: "thickness", .. })
    ));
    assert!(solid::beam(SectionSize::new(100.0, 50.0), -1.0).is_err());
    assert!(solid::bracing_bar(f64::NAN, 30.0, 2.0).is_err());
    assert!(solid::spacer_bar(0.0).is_err());

    let profile = UprightProfile::new(ProfileKind::Rectangular, SectionSize::new(80.0, 60.0), 2.0);
    let err = solid::upright(&profile, 0.0).unwrap_err();
    assert_eq!(
        err.to_string(),
        "upright height must be a positive finite length, got 0"
    );
}

#[test]
fn base_plate_sits_under_the_column_foot() {
    let plate = solid::base_plate(SectionSize::new(80.0, 60.0)).unwrap();
    let bbox = plate.local_bbox();
    assert!(approx(bbox.xlen(), 120.0));
    assert!(approx(bbox.ylen(), 100.0));
    assert!(approx(bbox.min.z, -5.0) && approx(bbox.max.z, 0.0));
}

#[test]
fn bars_are_centred_on_their_midpoint() {
    let bar = solid::bracing_bar(1166.0, 30.0, 2.0).unwrap();
    let bbox = bar.local_bbox();
    assert!(approx(bbox.center().z, 0.0));
    assert!(approx(bbox.xlen(), 30.0) && approx(bbox.ylen(), 2.0));

    let spacer = solid::spacer_bar(500.0).unwrap();
    let bbox = spacer.local_bbox();
    assert!(approx(bbox.xlen(), 50.0) && approx(bbox.ylen(), 20.0));
    assert!(approx(bbox.min.z, -250.0) && approx(bbox.max.z, 250.0));
}

#[test]
fn side_beam_turns_the_beam_section() {
    let section = SectionSize::new(100.0, 50.0);
    let side = solid::side_beam(section, 940.0).unwrap();
    assert_eq!(side.role, Role::SideBeam);
    let bbox = side.local_bbox();
    assert!(approx(bbox.xlen(), 50.0) && approx(bbox.ylen(), 100.0));
    assert!(approx(bbox.min.z, -470.0) && approx(bbox.max.z, 470.0));

    let beam = solid::beam(section, 940.0).unwrap();
    assert_ne!(beam.key(), side.key());
    assert!(solid::side_beam(section, 0.0).is_err());
}

#[test]
fn guard_rail_is_an_open_half_ring() {
    let half = solid::guard_rail(SectionSize::new(80.0, 60.0)).unwrap();
    assert_eq!(half.role, Role::GuardRail);
    assert_eq!(half.profile.len(), 8);
    assert!(signed_area(&half) > 0.0);

    let bbox = half.local_bbox();
    assert!(approx(bbox.min.x, -90.0) && approx(bbox.max.x, 90.0));
    assert!(approx(bbox.min.y, -80.0) && approx(bbox.max.y, 0.0));
    assert!(approx(bbox.min.z, 0.0) && approx(bbox.max.z, 150.0));
    // Outer half minus the hollow: 180 x 80 - 140 x 60.
    assert!(approx(signed_area(&half), 14_400.0 - 8_400.0));

    assert!(matches!(
        solid::guard_rail(SectionSize::new(0.0, 60.0)),
        Err(FactoryError::NonPositive { part: Role::GuardRail, .. })
    ));
}

#[test]
fn profile_kind_from_type_names() {
    assert_eq!(ProfileKind::from_type_name("Omega"), ProfileKind::Omega);
    assert_eq!(ProfileKind::from_type_name(" c-section "), ProfileKind::Channel);
    assert_eq!(ProfileKind::from_type_name("U-channel"), ProfileKind::Channel);
    assert_eq!(ProfileKind::from_type_name("L-beam"), ProfileKind::Angle);
    assert_eq!(ProfileKind::from_type_name("steel angle"), ProfileKind::Angle);
    assert_eq!(ProfileKind::from_type_name("box"), ProfileKind::Rectangular);
}
