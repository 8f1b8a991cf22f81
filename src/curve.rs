//! Synthetic "productivity curve" drawn behind the timer.
//!
//! The curve is a sum of Gaussian bumps (one per attention span inside the
//! session) with a linear fatigue decay, normalised so its peak is exactly 1.

pub const DEFAULT_SAMPLES: usize = 200;

/// Fraction of the curve lost to fatigue by the end of a session.
const FATIGUE: f64 = 0.15;

/// Bumps get narrower as more of them share the session.
const WIDTH_DIVISOR: f64 = 3.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for CurvePoint {
    fn from(v: (f64, f64)) -> Self {
        CurvePoint { x: v.0, y: v.1 }
    }
}

impl From<CurvePoint> for (f64, f64) {
    fn from(p: CurvePoint) -> Self {
        (p.x, p.y)
    }
}

/// Number of attention peaks modelled for a session of `minutes`.
pub fn peak_count(minutes: u32) -> u32 {
    if minutes >= 90 {
        3
    } else if minutes >= 60 {
        2
    } else {
        1
    }
}

/// Sample the curve at `samples + 1` evenly spaced points across the session.
pub fn sample(minutes: u32, samples: usize) -> Vec<CurvePoint> {
    let samples = samples.max(1);
    let total = (minutes.max(1) * 60) as f64;
    let peaks = peak_count(minutes);
    let width = total / (peaks as f64 * WIDTH_DIVISOR);

    let raw: Vec<CurvePoint> = (0..=samples)
        .map(|i| {
            let fraction = i as f64 / samples as f64;
            let t = fraction * total;
            let bumps: f64 = (0..peaks)
                .map(|p| {
                    let center = (p + 1) as f64 / (peaks + 1) as f64 * total;
                    (-((t - center) / width).powi(2)).exp()
                })
                .sum();
            CurvePoint::new(fraction, bumps * (1.0 - FATIGUE * fraction))
        })
        .collect();

    let max_y = raw.iter().map(|p| p.y).fold(f64::MIN, f64::max);
    if max_y <= 0.0 {
        return raw;
    }

    raw.into_iter()
        .map(|p| CurvePoint::new(p.x, p.y / max_y))
        .collect()
}

/// Index of the point the progress dot sits on for a given completion fraction.
pub fn dot_index(fraction: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let fraction = fraction.clamp(0.0, 1.0);
    (fraction * (len - 1) as f64).floor() as usize
}
