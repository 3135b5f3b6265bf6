//! Pure functions turning raw measures into visual encodings.

use serde::Serialize;
use snow_core::config::{PercentPalette, StrokeColors};

pub use snow_core::record::parse_amount as to_amount;

/// Round to the nearest half unit (0.5").
pub fn round_to_half_unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 2.0).round() / 2.0
}

/// Snowfall bucket used for bar coloring.
///
/// Bucket edges are closed on the upper side: exactly 2" is `Low`,
/// exactly 6" is `Mid`, exactly 10" is `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnowBucket {
    Zero,
    Low,
    Mid,
    High,
    VeryHigh,
}

impl SnowBucket {
    /// CSS class for the bar fill.
    pub fn class(self) -> &'static str {
        match self {
            SnowBucket::Zero => "snow-0",
            SnowBucket::Low => "snow-1-2",
            SnowBucket::Mid => "snow-3-6",
            SnowBucket::High => "snow-7-10",
            SnowBucket::VeryHigh => "snow-10-plus",
        }
    }

    /// Fill color for renderers without the stylesheet.
    pub fn color(self) -> &'static str {
        match self {
            SnowBucket::Zero => "#ECEFF1",
            SnowBucket::Low => "#BBDEFB",
            SnowBucket::Mid => "#64B5F6",
            SnowBucket::High => "#1E88E5",
            SnowBucket::VeryHigh => "#5E35B1",
        }
    }
}

pub fn bucket_for_amount(value: f64) -> SnowBucket {
    let amount = round_to_half_unit(value);
    if amount <= 0.0 {
        SnowBucket::Zero
    } else if amount <= 2.0 {
        SnowBucket::Low
    } else if amount <= 6.0 {
        SnowBucket::Mid
    } else if amount <= 10.0 {
        SnowBucket::High
    } else {
        SnowBucket::VeryHigh
    }
}

/// Bar fill height in percent on a log scale, so a dusting stays visible
/// and a dump doesn't flatten everything else. `max` fills the bar.
pub fn scaled_height(value: f64, max: f64) -> f64 {
    let amount = round_to_half_unit(value);
    if amount <= 0.0 {
        return 0.0;
    }
    if max <= 0.0 {
        return 100.0;
    }
    let scaled = amount.ln_1p() / max.ln_1p();
    scaled.min(1.0) * 100.0
}

/// Marker diameter for a resort with `total` trails, interpolated linearly
/// over the trail domain and clamped to the size range.
pub fn marker_size(total: f64, domain_min: f64, domain_max: f64, size_min: f64, size_max: f64) -> f64 {
    if !(total > 0.0) {
        return size_min;
    }
    let span = domain_max - domain_min;
    if span <= 0.0 {
        return if total >= domain_max { size_max } else { size_min };
    }
    let normalized = (total - domain_min) / span;
    let size = size_min + normalized * (size_max - size_min);
    size.clamp(size_min, size_max)
}

/// True when a status cell reads "closed" in any case.
pub fn is_closed(status: &str) -> bool {
    status.trim().eq_ignore_ascii_case("closed")
}

/// True when a status cell reads "open" in any case.
pub fn is_open(status: &str) -> bool {
    status.trim().eq_ignore_ascii_case("open")
}

/// Marker fill for a terrain-open percentage.
pub fn color_for_percentage<'a>(pct: f64, status: &str, palette: &'a PercentPalette) -> &'a str {
    if is_closed(status) || pct == 0.0 {
        return &palette.closed;
    }
    palette
        .thresholds
        .iter()
        .position(|t| pct < *t)
        .and_then(|i| palette.colors.get(i))
        .or_else(|| palette.colors.last())
        .map(String::as_str)
        .unwrap_or(palette.closed.as_str())
}

/// Marker outline: open resorts get the light stroke, everything else the dark one.
pub fn stroke_for_status<'a>(status: &str, stroke: &'a StrokeColors) -> &'a str {
    if is_open(status) {
        &stroke.open
    } else {
        &stroke.closed
    }
}

/// "3" for whole amounts, "2.5" for halves.
pub fn format_amount(value: f64) -> String {
    let amount = round_to_half_unit(value);
    if amount == 0.0 {
        return "0".to_string();
    }
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.1}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snow_core::config::{PalettePreset, PercentPalette, StrokeColors};

    fn samples() -> Vec<f64> {
        (-40..=160).map(|i| i as f64 * 0.13).collect()
    }

    #[test]
    fn test_round_to_half_unit() {
        for x in samples() {
            let r = round_to_half_unit(x);
            assert_eq!((r * 2.0).fract(), 0.0, "{} is not a half unit", r);
            assert!((r - x).abs() <= 0.25 + 1e-9, "{} -> {}", x, r);
        }
        assert_eq!(round_to_half_unit(2.3), 2.5);
        assert_eq!(round_to_half_unit(2.2), 2.0);
        assert_eq!(round_to_half_unit(f64::NAN), 0.0);
    }

    #[test]
    fn test_to_amount_coerces() {
        assert_eq!(to_amount("3.5"), 3.5);
        assert_eq!(to_amount(" 4 "), 4.0);
        assert_eq!(to_amount("N/A"), 0.0);
        assert_eq!(to_amount(""), 0.0);
    }

    #[test]
    fn test_bucket_for_amount() {
        assert_eq!(bucket_for_amount(0.0), SnowBucket::Zero);
        assert_eq!(bucket_for_amount(0.2), SnowBucket::Zero);
        assert_eq!(bucket_for_amount(2.0), SnowBucket::Low);
        assert_eq!(bucket_for_amount(2.5), SnowBucket::Mid);
        assert_eq!(bucket_for_amount(6.0), SnowBucket::Mid);
        assert_eq!(bucket_for_amount(10.0), SnowBucket::High);
        assert_eq!(bucket_for_amount(11.0), SnowBucket::VeryHigh);
        assert_eq!(bucket_for_amount(-3.0), SnowBucket::Zero);
        assert_eq!(SnowBucket::VeryHigh.class(), "snow-10-plus");
    }

    #[test]
    fn test_bucket_is_monotonic() {
        let mut last = SnowBucket::Zero;
        for x in samples() {
            let bucket = bucket_for_amount(x);
            assert!(bucket >= last, "bucket dropped at {}", x);
            last = bucket;
        }
    }

    #[test]
    fn test_scaled_height() {
        assert_eq!(scaled_height(0.0, 10.0), 0.0);
        assert!((scaled_height(10.0, 10.0) - 100.0).abs() < 1e-9);
        assert_eq!(scaled_height(40.0, 10.0), 100.0);
        assert_eq!(scaled_height(3.0, 0.0), 100.0);
        let one = scaled_height(1.0, 10.0);
        assert!(one > 25.0 && one < 35.0, "log scale keeps small amounts visible: {}", one);

        let mut last = 0.0;
        for x in samples() {
            let h = scaled_height(x, 10.0);
            assert!(h >= last, "height dropped at {}", x);
            last = h;
        }
    }

    #[test]
    fn test_marker_size() {
        assert_eq!(marker_size(0.0, 7.0, 277.0, 12.0, 36.0), 12.0);
        assert_eq!(marker_size(277.0, 7.0, 277.0, 12.0, 36.0), 36.0);
        assert_eq!(marker_size(7.0, 7.0, 277.0, 12.0, 36.0), 12.0);
        assert_eq!(marker_size(3.0, 7.0, 277.0, 12.0, 36.0), 12.0);
        assert_eq!(marker_size(900.0, 7.0, 277.0, 12.0, 36.0), 36.0);
        assert!((marker_size(142.0, 7.0, 277.0, 12.0, 36.0) - 24.0).abs() < 1e-9);

        let mut last = 0.0;
        for trails in 0..400 {
            let size = marker_size(trails as f64, 7.0, 277.0, 12.0, 36.0);
            assert!(size >= last);
            assert!((12.0..=36.0).contains(&size));
            last = size;
        }
    }

    #[test]
    fn test_marker_size_degenerate_domain() {
        assert_eq!(marker_size(50.0, 50.0, 50.0, 10.0, 20.0), 20.0);
        assert_eq!(marker_size(10.0, 50.0, 50.0, 10.0, 20.0), 10.0);
    }

    #[test]
    fn test_color_for_percentage() {
        let palette = PercentPalette::preset(PalettePreset::Greens);
        assert_eq!(color_for_percentage(62.0, "Closed", &palette), "#BDBDBD");
        assert_eq!(color_for_percentage(0.0, "Open", &palette), "#BDBDBD");
        assert_eq!(color_for_percentage(3.0, "Open", &palette), "#90CAF9");
        assert_eq!(color_for_percentage(5.0, "Open", &palette), "#66BB6A");
        assert_eq!(color_for_percentage(24.9, "Open", &palette), "#66BB6A");
        assert_eq!(color_for_percentage(25.0, "Open", &palette), "#43A047");
        assert_eq!(color_for_percentage(62.0, "Open", &palette), "#2E7D32");
        assert_eq!(color_for_percentage(100.0, "open", &palette), "#2E7D32");
    }

    #[test]
    fn test_stroke_for_status() {
        let stroke = StrokeColors::default();
        assert_eq!(stroke_for_status("Open", &stroke), "#F5F5F5");
        assert_eq!(stroke_for_status("Closed", &stroke), "#424242");
        assert_eq!(stroke_for_status("", &stroke), "#424242");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3.0), "3");
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(2.3), "2.5");
        assert_eq!(format_amount(0.1), "0");
        assert_eq!(format_amount(12.74), "12.5");
    }
}
