use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn over_at_places_and_clips() {
    let size = Viewport::new(3, 2);
    let mut dst = vec![0u8; size.area() * 4];
    let red = [255u8, 0, 0, 255];
    let src: Vec<u8> = red.repeat(4);

    // 2x2 sprite hanging off the right edge at (2, 1): only (2, 1) lands.
    over_at(&mut dst, size, &src, 2, 2, 2, 1).unwrap();
    let painted: Vec<usize> = dst
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, px)| px[3] != 0)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(painted, vec![5]);
}

#[test]
fn over_at_negative_origin_clips_top_left() {
    let size = Viewport::new(2, 2);
    let mut dst = vec![0u8; size.area() * 4];
    let mut src = vec![0u8; 2 * 2 * 4];
    // bottom-right source pixel only
    src[12..16].copy_from_slice(&[0, 255, 0, 255]);

    over_at(&mut dst, size, &src, 2, 2, -1, -1).unwrap();
    assert_eq!(&dst[0..4], &[0, 255, 0, 255]);
    assert!(dst[4..].iter().all(|&b| b == 0));
}

#[test]
fn over_at_fully_outside_is_noop() {
    let size = Viewport::new(2, 2);
    let mut dst = vec![7u8; size.area() * 4];
    let src = [255u8; 4].repeat(4);
    over_at(&mut dst, size, &src, 2, 2, 10, 10).unwrap();
    over_at(&mut dst, size, &src, 2, 2, -5, 0).unwrap();
    assert!(dst.iter().all(|&b| b == 7));
}
