//! Deterministic label colours.
//!
//! The hue is the sum of the label's code points modulo 360; lightness and
//! saturation are fixed, so the same label always gets the same colour.

const LIGHTNESS: f64 = 0.6;
const SATURATION: f64 = 0.8;

/// Six lowercase hex digits (no leading `#`) for `label`.
pub fn label_color(label: &str) -> String {
    let hue = label.chars().map(u32::from).sum::<u32>() % 360;
    let (r, g, b) = hls_to_rgb(f64::from(hue) / 360.0, LIGHTNESS, SATURATION);
    format!("{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_to_channel(m1, m2, h + 1.0 / 3.0),
        hue_to_channel(m1, m2, h),
        hue_to_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}
