use super::*;

#[test]
fn clamp_depth_keeps_positive_values() {
    assert_eq!(clamp_depth(400.0), 400.0);
    assert_eq!(clamp_depth(MIN_DEPTH), MIN_DEPTH);
}

#[test]
fn clamp_depth_floors_zero_negative_and_nan() {
    for v in [0.0, -0.0, -12.5, f64::NAN, f64::NEG_INFINITY] {
        let d = clamp_depth(v);
        assert_eq!(d, MIN_DEPTH);
        assert!((400.0 / d).is_finite());
    }
}

#[test]
fn clamp01_handles_nan_and_bounds() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(-1.0), 0.0);
    assert_eq!(clamp01(2.5), 1.0);
    assert_eq!(clamp01(0.4), 0.4);
}

#[test]
fn rng_is_deterministic() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..10 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn rng_range_stays_in_bounds() {
    let mut rng = Rng64::new(7);
    for _ in 0..1000 {
        let v = rng.range(30.0, 70.0);
        assert!((30.0..70.0).contains(&v));
    }
    assert_eq!(rng.range(5.0, 5.0), 5.0);
}

#[test]
fn rng_sign_produces_both_signs() {
    let mut rng = Rng64::new(99);
    let signs: Vec<f64> = (0..64).map(|_| rng.sign()).collect();
    assert!(signs.iter().any(|&s| s > 0.0));
    assert!(signs.iter().any(|&s| s < 0.0));
    assert!(signs.iter().all(|&s| s.abs() == 1.0));
}

#[test]
fn chance_extremes() {
    let mut rng = Rng64::new(1);
    assert!((0..100).all(|_| !rng.chance(0.0)));
    assert!((0..100).all(|_| rng.chance(1.0)));
}

#[test]
fn chance_rate_is_close_to_probability() {
    let mut rng = Rng64::new(2024);
    let hits = (0..20_000).filter(|_| rng.chance(0.05)).count();
    assert!((800..1200).contains(&hits), "hits = {hits}");
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}
