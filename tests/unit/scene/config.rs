use super::*;

#[test]
fn defaults_match_the_shipped_animation() {
    let cfg = SceneConfig::default();
    assert_eq!(cfg.pillar_count, 50);
    assert_eq!(cfg.particle_count, 7);
    assert_eq!(cfg.pillars.width, Bounds::new(30.0, 70.0));
    assert_eq!(cfg.pillars.height, Bounds::new(100.0, 400.0));
    assert_eq!(cfg.pillars.depth, Bounds::new(200.0, 1000.0));
    assert_eq!(cfg.particles.radius_ratio, Bounds::new(0.15, 0.40));
    assert_eq!(cfg.particles.angular_speed, Bounds::new(0.001, 0.004));
    assert_eq!(cfg.sparkle_probability, 0.05);
    assert!(cfg.validate().is_ok());
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let json = r#"{ "seed": 42, "pillar_count": 3 }"#;
    let cfg = SceneConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.seed, Some(42));
    assert_eq!(cfg.pillar_count, 3);
    assert_eq!(cfg.particle_count, 7);
    assert_eq!(cfg.pillars, PillarBounds::default());
}

#[test]
fn unknown_fields_are_rejected() {
    let err = SceneConfig::from_reader(r#"{ "pillars_count": 3 }"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("serialization error:"));
}

#[test]
fn non_positive_depth_is_rejected() {
    let mut cfg = SceneConfig::default();
    cfg.pillars.depth = Bounds::new(0.0, 10.0);
    assert!(cfg.validate().is_err());
    cfg.pillars.depth = Bounds::new(-5.0, 10.0);
    assert!(cfg.validate().is_err());
}

#[test]
fn inverted_or_non_finite_bounds_are_rejected() {
    let mut cfg = SceneConfig::default();
    cfg.pillars.width = Bounds::new(70.0, 30.0);
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::default();
    cfg.particles.tilt = Bounds::new(f64::NAN, 0.0);
    assert!(cfg.validate().is_err());
}

#[test]
fn negative_speed_magnitude_and_bad_probability_are_rejected() {
    let mut cfg = SceneConfig::default();
    cfg.particles.angular_speed = Bounds::new(-0.001, 0.004);
    assert!(cfg.validate().is_err());

    let mut cfg = SceneConfig::default();
    cfg.sparkle_probability = 1.5;
    assert!(cfg.validate().is_err());
}

#[test]
fn json_pretty_parses_back() {
    let cfg = SceneConfig::seeded(9);
    let json = cfg.to_json_pretty().unwrap();
    let back = SceneConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn explicit_seed_is_used_verbatim() {
    assert_eq!(SceneConfig::seeded(77).resolve_seed(), 77);
}
