use crate::foundation::core::Viewport;
use crate::foundation::error::{BackdropError, BackdropResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> BackdropResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(BackdropError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Source-over a smaller `src_w x src_h` buffer onto `dst` with its top-left corner at
/// `(x0, y0)`. Parts falling outside `dst` are clipped.
pub fn over_at(
    dst: &mut [u8],
    dst_size: Viewport,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    x0: i64,
    y0: i64,
) -> BackdropResult<()> {
    if dst.len() != dst_size.area() * 4 {
        return Err(BackdropError::render(
            "over_at expects dst matching width*height*4",
        ));
    }
    if src.len() != (src_w as usize) * (src_h as usize) * 4 {
        return Err(BackdropError::render(
            "over_at expects src matching width*height*4",
        ));
    }

    let dw = i64::from(dst_size.width);
    let dh = i64::from(dst_size.height);
    let x_start = x0.max(0);
    let x_end = (x0 + i64::from(src_w)).min(dw);
    let y_start = y0.max(0);
    let y_end = (y0 + i64::from(src_h)).min(dh);
    if x_start >= x_end || y_start >= y_end {
        return Ok(());
    }

    let row_px = (x_end - x_start) as usize;
    for y in y_start..y_end {
        let sy = (y - y0) as usize;
        let sx = (x_start - x0) as usize;
        let s_off = (sy * src_w as usize + sx) * 4;
        let d_off = ((y as usize) * (dw as usize) + x_start as usize) * 4;
        over_in_place(
            &mut dst[d_off..d_off + row_px * 4],
            &src[s_off..s_off + row_px * 4],
            1.0,
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
