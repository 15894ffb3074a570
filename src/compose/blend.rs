//! Straight-alpha source-over blending.
//!
//! GIF pixels carry binary alpha, for which `over` degenerates to
//! replace-or-keep, but the full formula keeps intermediate alphas correct.

/// Straight (non-premultiplied) RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Composite `src` over `dst`.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    let da_inv = mul_div255(da, 255 - sa);
    let out_a = sa + da_inv;
    if out_a == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    out[3] = out_a as u8;
    for i in 0..3 {
        let num = u32::from(src[i]) * sa + u32::from(dst[i]) * da_inv;
        out[i] = ((num + out_a / 2) / out_a) as u8;
    }
    out
}

fn mul_div255(x: u32, y: u32) -> u32 {
    (x * y + 127) / 255
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        let src = [255, 255, 255, 0];
        assert_eq!(over(dst, src), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let dst = [0, 0, 0, 0];
        let src = [100, 110, 120, 200];
        assert_eq!(over(dst, src), src);
    }

    #[test]
    fn over_half_alpha_mixes_towards_src() {
        let dst = [0, 0, 0, 255];
        let src = [255, 255, 255, 128];
        let out = over(dst, src);
        assert_eq!(out[3], 255);
        assert!(out[0] > 120 && out[0] < 136, "got {}", out[0]);
    }
}
