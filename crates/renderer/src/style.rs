//! Colour maps and JSON style configuration.
//!
//! A [`ColorMap`] is a list of colour stops on `[0, 1]`. The named built-ins
//! cover the maps the plots use by default; further maps can be loaded from a
//! style file:
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "styles": {
//!     "heat": {
//!       "name": "Heat",
//!       "stops": [
//!         { "value": 0,    "color": "#000080" },
//!         { "value": 1000, "color": "#ffff00", "label": "1000 K" },
//!         { "value": 2000, "color": "#ff0000" }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! Stop values are normalized onto `[0, 1]`, so a style only fixes the shape
//! of the ramp. The value range comes from the data or the contour style.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::StyleError;
use crate::gradient::{interpolate_color, Color};

/// Style configuration loaded from JSON
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleConfig {
    pub version: String,
    pub styles: HashMap<String, StyleDefinition>,
}

/// A single style definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StyleDefinition {
    pub name: String,
    pub description: Option<String>,
    pub units: Option<String>,
    pub stops: Vec<ColorStop>,
}

/// Color stop for gradient
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColorStop {
    pub value: f64,
    pub color: String,
    pub label: Option<String>,
}

impl StyleConfig {
    /// Load style configuration from JSON string
    pub fn from_json(json_str: &str) -> Result<Self, StyleError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Load style configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StyleError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Build colour maps for every style, keyed by style id.
    pub fn colormaps(&self) -> Result<HashMap<String, ColorMap>, StyleError> {
        self.styles
            .iter()
            .map(|(key, style)| Ok((key.clone(), ColorMap::from_stops(key, &style.stops)?)))
            .collect()
    }
}

/// Parse a hex colour, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
pub fn hex_to_rgba(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if (hex.len() != 6 && hex.len() != 8) || !hex.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let r = channel(0)?;
    let g = channel(2)?;
    let b = channel(4)?;
    let a = if hex.len() == 8 { channel(6)? } else { 255 };

    Some(Color::new(r, g, b, a))
}

/// Like [`hex_to_rgba`] but reporting the offending string.
pub fn parse_color(hex: &str) -> Result<Color, StyleError> {
    hex_to_rgba(hex).ok_or_else(|| StyleError::InvalidColor(hex.to_string()))
}

/// A continuous colour ramp over `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    name: String,
    /// Sorted by position, first at 0 and last at 1.
    stops: Vec<(f64, Color)>,
}

const COOLWARM: &[(f64, Color)] = &[
    (0.0, Color::rgb(59, 76, 192)),
    (0.25, Color::rgb(141, 176, 254)),
    (0.5, Color::rgb(221, 221, 221)),
    (0.75, Color::rgb(244, 154, 123)),
    (1.0, Color::rgb(180, 4, 38)),
];

const PLASMA: &[(f64, Color)] = &[
    (0.0, Color::rgb(13, 8, 135)),
    (0.25, Color::rgb(126, 3, 168)),
    (0.5, Color::rgb(204, 71, 120)),
    (0.75, Color::rgb(248, 149, 64)),
    (1.0, Color::rgb(240, 249, 33)),
];

const VIRIDIS: &[(f64, Color)] = &[
    (0.0, Color::rgb(68, 1, 84)),
    (0.25, Color::rgb(59, 82, 139)),
    (0.5, Color::rgb(33, 145, 140)),
    (0.75, Color::rgb(94, 201, 98)),
    (1.0, Color::rgb(253, 231, 37)),
];

const BLUES: &[(f64, Color)] = &[
    (0.0, Color::rgb(247, 251, 255)),
    (0.5, Color::rgb(107, 174, 214)),
    (1.0, Color::rgb(8, 48, 107)),
];

const GRAY: &[(f64, Color)] = &[(0.0, Color::BLACK), (1.0, Color::WHITE)];

impl ColorMap {
    /// Names accepted by [`ColorMap::builtin`].
    pub const BUILTIN_NAMES: [&'static str; 5] = ["coolwarm", "plasma", "viridis", "blues", "gray"];

    /// Look up a built-in map (case-insensitive). `grey` is accepted for `gray`.
    pub fn builtin(name: &str) -> Option<Self> {
        let (name, stops) = match name.trim().to_lowercase().as_str() {
            "coolwarm" => ("coolwarm", COOLWARM),
            "plasma" => ("plasma", PLASMA),
            "viridis" => ("viridis", VIRIDIS),
            "blues" => ("blues", BLUES),
            "gray" | "grey" => ("gray", GRAY),
            _ => return None,
        };
        Some(Self {
            name: name.to_string(),
            stops: stops.to_vec(),
        })
    }

    /// Built-in map by name, or [`StyleError::UnknownColormap`].
    pub fn from_name(name: &str) -> Result<Self, StyleError> {
        Self::builtin(name).ok_or_else(|| StyleError::UnknownColormap(name.to_string()))
    }

    /// Build a map from value stops, normalizing the stop values onto `[0, 1]`.
    pub fn from_stops(name: &str, stops: &[ColorStop]) -> Result<Self, StyleError> {
        let mut parsed = stops
            .iter()
            .filter(|stop| stop.value.is_finite())
            .map(|stop| Ok((stop.value, parse_color(&stop.color)?)))
            .collect::<Result<Vec<_>, StyleError>>()?;
        parsed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (first, last) = match (parsed.first(), parsed.last()) {
            (Some(first), Some(last)) if last.0 > first.0 => (first.0, last.0),
            _ => return Err(StyleError::TooFewStops(name.to_string())),
        };
        let span = last - first;

        Ok(Self {
            name: name.to_string(),
            stops: parsed
                .into_iter()
                .map(|(value, color)| ((value - first) / span, color))
                .collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Colour at position `t`, clamped to `[0, 1]`.
    pub fn sample(&self, t: f64) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let upper = self
            .stops
            .partition_point(|(pos, _)| *pos < t)
            .clamp(1, self.stops.len() - 1);
        let (p0, c0) = self.stops[upper - 1];
        let (p1, c1) = self.stops[upper];
        let span = p1 - p0;
        if span <= 0.0 {
            return c1;
        }
        interpolate_color(c0, c1, (t - p0) / span)
    }
}
