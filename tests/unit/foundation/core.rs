use super::*;

#[test]
fn viewport_center_and_min_dim() {
    let vp = Viewport::new(1920, 1080);
    assert_eq!(vp.center(), Point::new(960.0, 540.0));
    assert_eq!(vp.min_dim(), 1080.0);
    assert!(!vp.is_empty());
    assert!(Viewport::new(0, 10).is_empty());
}

#[test]
fn viewport_parses_wxh() {
    let vp: Viewport = "1280x720".parse().unwrap();
    assert_eq!(vp, Viewport::new(1280, 720));
    assert_eq!(vp.to_string(), "1280x720");
    assert!("1280".parse::<Viewport>().is_err());
    assert!("axb".parse::<Viewport>().is_err());
}

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
    let fps = Fps::new(60, 1).unwrap();
    assert!((fps.frame_duration_secs() - 1.0 / 60.0).abs() < 1e-12);
}

#[test]
fn frame_index_next_saturates() {
    assert_eq!(FrameIndex(4).next(), FrameIndex(5));
    assert_eq!(FrameIndex(u64::MAX).next(), FrameIndex(u64::MAX));
}

#[test]
fn straight_color_alpha_quantizes_to_u8() {
    assert_eq!(StraightColor::rgba(200, 100, 0, 0.5).alpha_u8(), 128);
    assert_eq!(StraightColor::rgba(0, 0, 0, 0.08).alpha_u8(), 20);
    assert_eq!(StraightColor::rgba(0, 0, 0, 1.5).alpha_u8(), 255);
}

#[test]
fn straight_color_alpha_scaling_clamps() {
    let c = StraightColor::rgba(1, 2, 3, 0.8);
    assert_eq!(c.with_alpha_scaled(2.0).alpha, 1.0);
    assert_eq!(c.with_alpha_scaled(-1.0).alpha, 0.0);
}
