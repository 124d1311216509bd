//! CSS-style color strings.
//!
//! Colors travel through the engine untouched; the renderer decides how to
//! paint them. Parsing exists so configuration errors surface at load time
//! and so appearance code can blend alpha.
//!
//! Accepted forms: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and
//! `rgba(r, g, b, a)`.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::Error;

/// Red, green, blue and alpha channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub a: f64,
}

impl Rgba {
    /// Formats as a CSS `rgba()` string.
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// A color as written in configuration.
///
/// # Example
///
/// ```rust
/// use kinetic::Color;
///
/// let teal = Color::from("#4ecdc4");
/// assert_eq!(teal.as_rgba().map(|c| (c.r, c.g, c.b)), Some((0x4e, 0xcd, 0xc4)));
///
/// let ghost = Color::from("rgba(255, 255, 255, 0.5)");
/// assert_eq!(ghost.as_rgba().map(|c| c.a), Some(0.5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(pub String);

impl Color {
    /// Wraps a color string without validating it.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Parses and normalizes a color string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] when `s` is not one of the accepted
    /// forms.
    pub fn parse(s: &str) -> Result<Self, Error> {
        parse_color_str(s)
    }

    /// The string as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes the channels, or `None` if the string is not understood.
    pub fn as_rgba(&self) -> Option<Rgba> {
        let raw = self.0.trim();
        if let Some(hex) = raw.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = raw.to_ascii_lowercase();
        let body = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let channel = |s: &str| s.parse::<u8>().ok();
        match parts.as_slice() {
            [r, g, b] => Some(Rgba {
                r: channel(r)?,
                g: channel(g)?,
                b: channel(b)?,
                a: 1.0,
            }),
            [r, g, b, a] => {
                let a = a.parse::<f64>().ok().filter(|a| (0.0..=1.0).contains(a))?;
                Some(Rgba {
                    r: channel(r)?,
                    g: channel(g)?,
                    b: channel(b)?,
                    a,
                })
            }
            _ => None,
        }
    }

    /// Returns this color with its alpha multiplied by `factor`.
    ///
    /// Unparseable colors are returned unchanged.
    pub fn fade(&self, factor: f64) -> Self {
        self.as_rgba().map_or_else(
            || self.clone(),
            |mut c| {
                c.a = (c.a * factor).clamp(0.0, 1.0);
                Self(c.to_css())
            },
        )
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => Some(Rgba {
            r: byte(&hex[0..1])? * 17,
            g: byte(&hex[1..2])? * 17,
            b: byte(&hex[2..3])? * 17,
            a: 1.0,
        }),
        6 | 8 => Some(Rgba {
            r: byte(&hex[0..2])?,
            g: byte(&hex[2..4])?,
            b: byte(&hex[4..6])?,
            a: if hex.len() == 8 {
                f64::from(byte(&hex[6..8])?) / 255.0
            } else {
                1.0
            },
        }),
        _ => None,
    }
}

fn parse_color_str(s: &str) -> Result<Color, Error> {
    let raw = s.trim();
    let color = Color::new(raw);
    if color.as_rgba().is_none() {
        return Err(Error::InvalidColor {
            input: raw.to_string(),
        });
    }
    Ok(color)
}

impl From<&str> for Color {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ColorVisitor)
    }
}

struct ColorVisitor;

impl Visitor<'_> for ColorVisitor {
    type Value = Color;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a hex, rgb() or rgba() color string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_color_str(v).map_err(E::custom)
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        parse_color_str(&v).map_err(E::custom)
    }
}
