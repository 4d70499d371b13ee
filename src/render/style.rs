use plotters::style::RGBColor;
use serde::Deserialize;

/// Everything the renderers need to know about look and feel. Built once
/// from configuration and passed into each chart.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartStyle {
    pub dpi: u32,
    pub font_family: String,
    pub background: [u8; 3],
    pub text_color: [u8; 3],
    pub palette: Palette,
    pub rating_min: f64,
    pub rating_max: f64,
    /// Name used in titles, e.g. "TMDB Ratings"
    pub source_label: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            dpi: 150,
            font_family: "sans-serif".to_string(),
            background: [255, 255, 255],
            text_color: [34, 34, 34],
            palette: Palette::Rocket,
            rating_min: 0.0,
            rating_max: 10.0,
            source_label: "TMDB".to_string(),
        }
    }
}

impl ChartStyle {
    pub fn background(&self) -> RGBColor {
        rgb(self.background)
    }

    pub fn text(&self) -> RGBColor {
        rgb(self.text_color)
    }

    /// Inches to pixels at the configured resolution.
    pub fn px(&self, inches: f64) -> u32 {
        (inches * f64::from(self.dpi)).round().max(1.0) as u32
    }

    /// Font size in pixels for a size given in points.
    pub fn pt(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }

    pub fn rating_color(&self, rating: f64) -> RGBColor {
        let span = self.rating_max - self.rating_min;
        let t = if span > 0.0 {
            (rating - self.rating_min) / span
        } else {
            0.0
        };
        self.palette.color_at(t)
    }
}

fn rgb([r, g, b]: [u8; 3]) -> RGBColor {
    RGBColor(r, g, b)
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Rocket,
    Mako,
    Viridis,
}

const ROCKET: [(u8, u8, u8); 6] = [
    (3, 5, 26),
    (76, 29, 75),
    (161, 26, 91),
    (228, 61, 63),
    (246, 156, 115),
    (250, 235, 221),
];

const MAKO: [(u8, u8, u8); 6] = [
    (11, 4, 5),
    (53, 38, 76),
    (53, 92, 143),
    (52, 150, 160),
    (96, 206, 172),
    (222, 245, 229),
];

const VIRIDIS: [(u8, u8, u8); 6] = [
    (68, 1, 84),
    (65, 68, 135),
    (42, 120, 142),
    (34, 168, 132),
    (122, 209, 81),
    (253, 231, 37),
];

impl Palette {
    fn stops(self) -> &'static [(u8, u8, u8)] {
        match self {
            Palette::Rocket => &ROCKET,
            Palette::Mako => &MAKO,
            Palette::Viridis => &VIRIDIS,
        }
    }

    /// Colour at `t` in `[0, 1]`, linearly interpolated between stops.
    pub fn color_at(self, t: f64) -> RGBColor {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * (stops.len() - 1) as f64;
        let lower = (scaled.floor() as usize).min(stops.len() - 2);
        let frac = scaled - lower as f64;

        let (r0, g0, b0) = stops[lower];
        let (r1, g1, b1) = stops[lower + 1];
        let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
        RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }
}

/// Dark or light text, whichever reads better on `fill`.
pub fn contrasting_text(fill: RGBColor) -> RGBColor {
    let RGBColor(r, g, b) = fill;
    let luminance = 0.2126 * f64::from(r) + 0.7152 * f64::from(g) + 0.0722 * f64::from(b);
    if luminance > 140.0 {
        RGBColor(0, 0, 0)
    } else {
        RGBColor(255, 255, 255)
    }
}
