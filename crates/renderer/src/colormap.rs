//! Colour mapping for scalar fields.
//!
//! Values are mapped through a 256-entry lookup table built once from a list
//! of evenly spaced colour stops. Raw values are never rescaled in place;
//! normalisation against the active [`ColorRange`] happens per lookup.

use serde::{Deserialize, Serialize};

/// Number of entries in a lookup table; also the PNG palette size.
pub const LUT_SIZE: usize = 256;

/// Viridis sampled at ten evenly spaced positions.
const VIRIDIS_STOPS: [&str; 10] = [
    "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779", "#6ece58",
    "#b5de2b", "#fde725",
];

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self::opaque(r, g, b))
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (a as f64 * t_inv + b as f64 * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Value range the colour map spans.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorRange {
    /// Each image spans its own minimum and maximum.
    #[default]
    Auto,
    /// Fixed bounds shared across images.
    Fixed { min: f64, max: f64 },
}

impl ColorRange {
    /// Resolve to concrete bounds for `values`. `None` for an empty
    /// buffer under `Auto`.
    pub fn resolve(&self, values: &[f64]) -> Option<(f64, f64)> {
        match *self {
            ColorRange::Fixed { min, max } => Some((min, max)),
            ColorRange::Auto => {
                let mut finite = values.iter().copied().filter(|v| v.is_finite());
                let first = finite.next()?;
                Some(finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
            }
        }
    }
}

/// A 256-entry colour lookup table.
#[derive(Debug, Clone)]
pub struct ColorMap {
    name: String,
    lut: Vec<Color>,
}

impl ColorMap {
    /// Build a lookup table by interpolating evenly spaced stops.
    pub fn from_stops(name: impl Into<String>, stops: &[Color]) -> Self {
        let lut = match stops {
            [] => vec![Color::opaque(0, 0, 0); LUT_SIZE],
            [only] => vec![*only; LUT_SIZE],
            _ => {
                let segments = (stops.len() - 1) as f64;
                (0..LUT_SIZE)
                    .map(|i| {
                        let pos = i as f64 / (LUT_SIZE - 1) as f64 * segments;
                        let lower = (pos.floor() as usize).min(stops.len() - 2);
                        interpolate_color(stops[lower], stops[lower + 1], pos - lower as f64)
                    })
                    .collect()
            }
        };
        Self {
            name: name.into(),
            lut,
        }
    }

    /// The fixed colour map used for frame previews.
    pub fn viridis() -> Self {
        let stops: Vec<Color> = VIRIDIS_STOPS.iter().filter_map(|s| Color::from_hex(s)).collect();
        Self::from_stops("viridis", &stops)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lut(&self) -> &[Color] {
        &self.lut
    }

    /// Lookup-table index for `value` within `[min, max]`. Values outside
    /// the range clamp to the ends; a degenerate range maps to index 0.
    pub fn index_of(&self, value: f64, (min, max): (f64, f64)) -> usize {
        let span = max - min;
        if !value.is_finite() || span.abs() < f64::EPSILON {
            return 0;
        }
        let t = ((value - min) / span).clamp(0.0, 1.0);
        (t * (self.lut.len() - 1) as f64).round() as usize
    }

    pub fn color_for(&self, value: f64, range: (f64, f64)) -> Color {
        self.lut[self.index_of(value, range)]
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self::viridis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::opaque(255, 0, 0)));
        assert_eq!(Color::from_hex("00ff00"), Some(Color::opaque(0, 255, 0)));
        assert_eq!(Color::from_hex("#GGGGGG"), None);
        assert_eq!(Color::from_hex("#FFF"), None);
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = Color::opaque(0, 0, 0);
        let b = Color::opaque(200, 100, 50);
        assert_eq!(interpolate_color(a, b, 0.0), a);
        assert_eq!(interpolate_color(a, b, 1.0), b);
        assert_eq!(interpolate_color(a, b, 0.5), Color::opaque(100, 50, 25));
        assert_eq!(interpolate_color(a, b, 7.0), b);
    }

    #[test]
    fn test_viridis_lut() {
        let map = ColorMap::viridis();
        assert_eq!(map.lut().len(), LUT_SIZE);
        assert_eq!(map.lut()[0], Color::opaque(0x44, 0x01, 0x54));
        assert_eq!(map.lut()[LUT_SIZE - 1], Color::opaque(0xfd, 0xe7, 0x25));
        assert_eq!(map.name(), "viridis");
    }

    #[test]
    fn test_index_of_clamps() {
        let map = ColorMap::viridis();
        assert_eq!(map.index_of(0.0, (0.0, 10.0)), 0);
        assert_eq!(map.index_of(10.0, (0.0, 10.0)), 255);
        assert_eq!(map.index_of(-5.0, (0.0, 10.0)), 0);
        assert_eq!(map.index_of(50.0, (0.0, 10.0)), 255);
        assert_eq!(map.index_of(3.0, (3.0, 3.0)), 0);
        assert_eq!(map.index_of(f64::NAN, (0.0, 1.0)), 0);
    }

    #[test]
    fn test_color_range_resolve() {
        assert_eq!(ColorRange::Auto.resolve(&[3.0, -2.0, 8.0]), Some((-2.0, 8.0)));
        assert_eq!(ColorRange::Auto.resolve(&[]), None);
        assert_eq!(
            ColorRange::Fixed { min: 0.0, max: 1.0 }.resolve(&[5.0]),
            Some((0.0, 1.0))
        );
    }
}
