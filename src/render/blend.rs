/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over compositing of premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
            }
            out
        }
    }
}

/// Bilinear blend of four premultiplied texels with fractional weights `fx`, `fy` in `[0, 1]`.
pub fn bilerp(
    tl: PremulRgba8,
    tr: PremulRgba8,
    bl: PremulRgba8,
    br: PremulRgba8,
    fx: f32,
    fy: f32,
) -> PremulRgba8 {
    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f32::from(tl[i]) + (f32::from(tr[i]) - f32::from(tl[i])) * fx;
        let bottom = f32::from(bl[i]) + (f32::from(br[i]) - f32::from(bl[i])) * fx;
        let v = top + (bottom - top) * fy;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    // Rounding can push a color channel above alpha; keep the pixel premultiplied.
    let a = out[3];
    for c in &mut out[..3] {
        *c = (*c).min(a);
    }
    out
}

/// Undo premultiplication for encoders that expect straight alpha.
pub fn unpremultiply(px: PremulRgba8) -> PremulRgba8 {
    match px[3] {
        0 => [0, 0, 0, 0],
        255 => px,
        a => {
            let a16 = u16::from(a);
            let un = |c: u8| -> u8 { ((u16::from(c) * 255 + a16 / 2) / a16).min(255) as u8 };
            [un(px[0]), un(px[1]), un(px[2]), a]
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
