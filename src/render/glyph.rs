//! Luminance-to-glyph mapping.

use std::fmt::Write as _;

/// ANSI attribute reset.
pub(crate) const RESET: &str = "\x1b[0m";

/// Luminance bands, brightest first, each paired with its glyph. A pixel
/// takes the first band whose threshold (scaled by the sensitivity
/// multiplier) its luminance exceeds, falling through to the darkest glyph.
///
/// Tunable table, not a contract. Luminance never exceeds 255, so the top
/// band only fires with multipliers below 0.255.
const GLYPH_RAMP: [(f32, char); 7] = [
    (1000.0, ' '),
    (250.0, '.'),
    (180.0, '◌'),
    (140.0, '*'),
    (120.0, '●'),
    (60.0, '⦾'),
    (30.0, '⦿'),
];

const DARKEST: char = '⬤';

fn luminance(r: u8, g: u8, b: u8) -> f32 {
    0.2126 * f32::from(r) + 0.7152 * f32::from(g) + 0.0722 * f32::from(b)
}

/// Pick the ramp glyph for an opaque pixel.
///
/// Pure and deterministic: equal inputs always yield the same glyph.
pub fn glyph_for(r: u8, g: u8, b: u8, multiplier: f32) -> char {
    let lum = luminance(r, g, b);
    for (threshold, glyph) in GLYPH_RAMP {
        if lum > threshold * multiplier {
            return glyph;
        }
    }
    DARKEST
}

/// Append the rendering of one pixel to `out`.
///
/// Fully transparent pixels always become a color reset plus a space,
/// regardless of their RGB channels. Otherwise the ramp glyph is emitted,
/// wrapped in a true-color foreground escape when `color` is set.
pub fn write_pixel(out: &mut String, px: [u8; 4], multiplier: f32, color: bool) {
    let [r, g, b, a] = px;
    if a == 0 {
        out.push_str(RESET);
        out.push(' ');
        return;
    }

    let glyph = glyph_for(r, g, b, multiplier);
    if color {
        let _ = write!(out, "\x1b[38;2;{r};{g};{b}m{glyph}{RESET}");
    } else {
        out.push(glyph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(px: [u8; 4], multiplier: f32, color: bool) -> String {
        let mut s = String::new();
        write_pixel(&mut s, px, multiplier, color);
        s
    }

    #[test]
    fn mapper_is_deterministic() {
        let a = rendered([200, 120, 40, 255], 1.2, true);
        let b = rendered([200, 120, 40, 255], 1.2, true);
        assert_eq!(a, b);
    }

    #[test]
    fn transparent_always_resets_regardless_of_rgb() {
        assert_eq!(rendered([255, 255, 255, 0], 1.0, true), "\x1b[0m ");
        assert_eq!(rendered([0, 0, 0, 0], 1.0, false), "\x1b[0m ");
    }

    #[test]
    fn ramp_is_ordered_dark_to_light() {
        let dark = glyph_for(0, 0, 0, 1.0);
        let light = glyph_for(255, 255, 255, 1.0);
        assert_eq!(dark, '⬤');
        assert_ne!(light, dark);
    }

    #[test]
    fn multiplier_shifts_bands_darker() {
        // White maps to a light glyph at multiplier 1 but saturates to the
        // darkest glyph once every threshold is pushed past 255.
        assert_ne!(glyph_for(255, 255, 255, 1.0), '⬤');
        assert_eq!(glyph_for(255, 255, 255, 10.0), '⬤');
    }

    #[test]
    fn color_and_mono_differ_only_by_escape_wrapper() {
        let px = [10, 200, 30, 255];
        let mono = rendered(px, 1.2, false);
        let color = rendered(px, 1.2, true);
        assert_eq!(color, format!("\x1b[38;2;10;200;30m{mono}\x1b[0m"));
    }
}
