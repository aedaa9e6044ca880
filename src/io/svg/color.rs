//! Color mapping utilities for SVG visualization.

use std::fmt;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Fill for regions without a classified value.
pub const NO_DATA: Rgb = Rgb { r: 200, g: 200, b: 200 };

/// Anchor colors of a diverging blue-gray-red ramp (matplotlib "coolwarm").
const COOLWARM: [(f64, Rgb); 5] = [
    (0.00, Rgb { r:  59, g:  76, b: 192 }),
    (0.25, Rgb { r: 124, g: 159, b: 249 }),
    (0.50, Rgb { r: 221, g: 221, b: 221 }),
    (0.75, Rgb { r: 245, g: 160, b: 126 }),
    (1.00, Rgb { r: 180, g:   4, b:  38 }),
];

/// Sample the diverging ramp at `t` in [0, 1]. Non-finite input falls back to `NO_DATA`.
pub fn coolwarm(t: f64) -> Rgb {
    if !t.is_finite() { return NO_DATA }
    let t = t.clamp(0.0, 1.0);

    let lerp = |a: u8, b: u8, s: f64| -> u8 {
        (a as f64 + (b as f64 - a as f64) * s).round().clamp(0.0, 255.0) as u8
    };

    for w in COOLWARM.windows(2) {
        let ((t0, c0), (t1, c1)) = (w[0], w[1]);
        if t <= t1 {
            let s = (t - t0) / (t1 - t0);
            return Rgb { r: lerp(c0.r, c1.r, s), g: lerp(c0.g, c1.g, s), b: lerp(c0.b, c1.b, s) };
        }
    }
    COOLWARM[COOLWARM.len() - 1].1
}

/// One evenly spaced ramp color per class, coldest first.
pub fn class_colors(count: usize) -> Vec<Rgb> {
    match count {
        0 => vec![],
        1 => vec![coolwarm(0.5)],
        n => (0..n).map(|i| coolwarm(i as f64 / (n - 1) as f64)).collect(),
    }
}
