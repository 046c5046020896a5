use super::*;
use crate::foundation::math::MIN_DEPTH;

fn approx(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

fn pillar(depth: f64) -> Pillar {
    Pillar {
        x_ratio: 0.0,
        depth,
        y_ratio: 0.0,
        width: 40.0,
        height: 200.0,
        bob_speed: 0.0,
        phase_offset: 0.0,
    }
}

fn particle(radius_ratio: f64, angle: f64) -> Particle {
    Particle {
        angle,
        radius_ratio,
        tilt: 0.0,
        angular_speed: 0.003,
        y_offset_ratio: 0.0,
    }
}

#[test]
fn pillar_reference_scenario() {
    let p = project_pillar(&pillar(400.0), Viewport::new(1920, 1080), FrameIndex(0));
    approx(p.scale, 1.0);
    approx(p.center.x, 960.0);
    approx(p.center.y, 540.0);
    approx(p.width, 40.0);
    approx(p.height, 200.0);
    approx(p.alpha, 0.4);
    assert_eq!(p.rect(), Rect::new(940.0, 440.0, 980.0, 640.0));
}

#[test]
fn particle_reference_scenario() {
    let p = project_particle(&particle(0.2, 0.0), Viewport::new(1000, 1000));
    approx(p.depth, 400.0);
    approx(p.scale, 1.0);
    approx(p.center.x, 800.0);
    approx(p.center.y, 500.0);
    approx(p.size, 2.0);
    approx(p.alpha, 1.0);
    assert!(p.in_front);
}

#[test]
fn pillar_scale_is_finite_and_positive_for_positive_depth() {
    for depth in [1e-9, 0.5, 200.0, 1000.0, 1e12] {
        let p = project_pillar(&pillar(depth), Viewport::new(800, 600), FrameIndex(3));
        assert!(p.scale.is_finite() && p.scale > 0.0, "depth {depth}");
        assert!((0.0..=1.0).contains(&p.alpha));
    }
}

#[test]
fn degenerate_pillar_depth_is_clamped() {
    for depth in [0.0, -10.0, f64::NAN] {
        let p = project_pillar(&pillar(depth), Viewport::new(800, 600), FrameIndex(0));
        approx(p.scale, FOCAL_LENGTH / MIN_DEPTH);
        assert!(p.center.x.is_finite() && p.center.y.is_finite());
    }
}

#[test]
fn degenerate_particle_depth_is_clamped() {
    // z3d * 0.5 = -400 at angle -pi/2 with radius 800: depthEff would be exactly 0.
    let q = Particle {
        angle: -std::f64::consts::FRAC_PI_2,
        radius_ratio: 800.0 / 1500.0,
        tilt: 0.0,
        angular_speed: 0.0,
        y_offset_ratio: 0.0,
    };
    let p = project_particle(&q, Viewport::new(1000, 1000));
    assert!(p.depth >= MIN_DEPTH);
    assert!(p.scale.is_finite());
    assert!(p.center.x.is_finite() && p.center.y.is_finite());
    assert!(!p.in_front);
}

#[test]
fn particle_past_the_near_plane_is_behind_the_camera() {
    // Default bounds allow radius_ratio 0.4; at min_dim 1400 the near side reaches depth -20.
    let vp = Viewport::new(2560, 1400);
    let near_side = project_particle(&particle(0.4, -std::f64::consts::FRAC_PI_2), vp);
    approx(near_side.depth, MIN_DEPTH);
    assert!(near_side.scale.is_finite());
    assert!(!near_side.in_front);

    let far_side = project_particle(&particle(0.4, std::f64::consts::FRAC_PI_2), vp);
    assert!(far_side.in_front);
}

#[test]
fn pillar_bob_follows_frame_counter() {
    let mut p = pillar(400.0);
    p.bob_speed = 0.01;
    let vp = Viewport::new(1000, 1000);
    let at = |t: u64| project_pillar(&p, vp, FrameIndex(t)).center.y;
    approx(at(0), 500.0);
    approx(at(157), 500.0 + (1.57f64).sin() * BOB_AMPLITUDE);
    approx(project_pillar(&p, vp, FrameIndex(157)).center.x, 500.0);
}

#[test]
fn projection_is_deterministic() {
    let mut p = pillar(321.0);
    p.x_ratio = 0.7;
    p.y_ratio = -0.3;
    p.bob_speed = 0.002;
    p.phase_offset = 1.1;
    let vp = Viewport::new(1366, 768);
    assert_eq!(
        project_pillar(&p, vp, FrameIndex(42)),
        project_pillar(&p, vp, FrameIndex(42))
    );

    let q = Particle {
        angle: 12.34,
        radius_ratio: 0.3,
        tilt: 0.2,
        angular_speed: -0.002,
        y_offset_ratio: 0.1,
    };
    assert_eq!(project_particle(&q, vp), project_particle(&q, vp));
}

#[test]
fn particle_size_has_a_floor() {
    // Far side of a wide orbit: scale drops well below 0.25.
    let q = particle(1.0, std::f64::consts::FRAC_PI_2);
    let p = project_particle(&q, Viewport::new(4000, 4000));
    assert!(p.scale < 0.25);
    approx(p.size, MIN_PARTICLE_SIZE);
}

#[test]
fn particle_alpha_saturates_on_near_side() {
    let q = particle(0.3, -std::f64::consts::FRAC_PI_2);
    let p = project_particle(&q, Viewport::new(1000, 1000));
    assert!(p.scale > 1.0);
    approx(p.alpha, 1.0);
}

#[test]
fn unbounded_angles_project_like_wrapped_ones() {
    let vp = Viewport::new(1200, 900);
    let a = project_particle(&particle(0.25, 0.75), vp);
    let b = project_particle(&particle(0.25, 0.75 + std::f64::consts::TAU * 1000.0), vp);
    assert!((a.center.x - b.center.x).abs() < 1e-6);
    assert!((a.center.y - b.center.y).abs() < 1e-6);
}

#[test]
fn visibility_excludes_far_offscreen_pillars() {
    let vp = Viewport::new(1920, 1080);
    let on = project_pillar(&pillar(400.0), vp, FrameIndex(0));
    assert!(on.is_visible(vp));

    let mut right = pillar(400.0);
    right.x_ratio = 1.25;
    // center.x = 960 + 2400 = 3360 > 1920 + 40
    assert!(!project_pillar(&right, vp, FrameIndex(0)).is_visible(vp));

    let mut below = pillar(400.0);
    below.y_ratio = 0.75;
    // center.y = 540 + 810 = 1350 > 1080 + 200
    assert!(!project_pillar(&below, vp, FrameIndex(0)).is_visible(vp));
}

#[test]
fn visibility_keeps_pillars_within_their_own_extent_of_the_edge() {
    let vp = Viewport::new(1000, 1000);
    let p = PillarProjection {
        scale: 1.0,
        center: Point::new(-39.0, 500.0),
        width: 40.0,
        height: 100.0,
        alpha: 0.4,
    };
    assert!(p.is_visible(vp));
    let p = PillarProjection {
        center: Point::new(-41.0, 500.0),
        ..p
    };
    assert!(!p.is_visible(vp));
    let p = PillarProjection {
        center: Point::new(500.0, 1099.0),
        ..p
    };
    assert!(p.is_visible(vp));
}

#[test]
fn resize_changes_projection_immediately() {
    let mut p = pillar(400.0);
    p.x_ratio = 0.5;
    let a = project_pillar(&p, Viewport::new(800, 600), FrameIndex(1));
    let b = project_pillar(&p, Viewport::new(1600, 1200), FrameIndex(1));
    approx(a.center.x, 400.0 + 400.0);
    approx(b.center.x, 800.0 + 800.0);
}

#[test]
fn glow_radius_breathes_around_half_min_dim() {
    let vp = Viewport::new(1920, 1080);
    approx(glow_radius(vp, FrameIndex(0)), 540.0);
    let peak = glow_radius(vp, FrameIndex(157));
    assert!(peak > 540.0 && peak <= 594.0 + 1e-9);
    for t in 0..1000 {
        let r = glow_radius(vp, FrameIndex(t));
        assert!((486.0 - 1e-9..=594.0 + 1e-9).contains(&r));
    }
}
