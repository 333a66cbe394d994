//! Yellow-orange-red sequential color scale for the heatmap.

use plotters::style::RGBColor;

const YL_OR_RD: [(u8, u8, u8); 9] = [
    (255, 255, 204),
    (255, 237, 160),
    (254, 217, 118),
    (254, 178, 76),
    (253, 141, 60),
    (252, 78, 42),
    (227, 26, 28),
    (189, 0, 38),
    (128, 0, 38),
];

/// `t` is clamped to 0..=1; 0 is light yellow, 1 dark red.
pub fn yl_or_rd(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0. } else { t.clamp(0., 1.) };
    let pos = t * (YL_OR_RD.len() - 1) as f64;
    let i = (pos.floor() as usize).min(YL_OR_RD.len() - 2);
    let frac = pos - i as f64;
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (r0, g0, b0) = YL_OR_RD[i];
    let (r1, g1, b1) = YL_OR_RD[i + 1];
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Map `value` from `min..max` into the color scale. A degenerate
/// range maps everything to the middle.
pub fn scaled_color(value: f64, min: f64, max: f64) -> RGBColor {
    if max > min {
        yl_or_rd((value - min) / (max - min))
    } else {
        yl_or_rd(0.5)
    }
}
