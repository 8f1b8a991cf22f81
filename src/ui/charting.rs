/// The curve peaks at exactly 1, leave a little headroom for the dot.
pub const Y_BOUNDS: [f64; 2] = [0.0, 1.05];
pub const X_BOUNDS: [f64; 2] = [0.0, 1.0];

/// Minute labels for the start, middle and end of the session axis.
pub fn x_axis_labels(minutes: u32) -> [String; 3] {
    let total = minutes as f64;
    [
        format_minutes(0.0),
        format_minutes(total / 2.0),
        format_minutes(total),
    ]
}

/// Format a minute count, dropping the fraction when it is whole
pub fn format_minutes(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}m", val.round())
    } else {
        format!("{val:.1}m")
    }
}
