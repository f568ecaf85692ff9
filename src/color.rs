//! Background colors
//!
//! Accepted forms (case-insensitive): `transparent`, `white`, `black`, or a
//! six digit hex color with an optional leading `#`.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// An 8-bit RGBA color. Alpha 0 is the "do not composite" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };
    pub const WHITE: Rgba = Rgba { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Rgba = Rgba { r: 0, g: 0, b: 0, a: 255 };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// True for the transparent sentinel: the rendered alpha channel is kept as-is.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// CSS color for the HTML wrapper. Transparent stays fully transparent so the
    /// browser capture keeps its alpha channel.
    pub fn to_css(&self) -> String {
        if self.is_transparent() {
            "rgba(0,0,0,0)".to_string()
        } else {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_transparent() {
            f.write_str("transparent")
        } else {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_color(s)
    }
}

/// Parse a background color: `transparent`, `white`, `black` or `#RRGGBB`.
pub fn parse_color(spec: &str) -> Result<Rgba> {
    match spec.to_ascii_lowercase().as_str() {
        "transparent" => return Ok(Rgba::TRANSPARENT),
        "white" => return Ok(Rgba::WHITE),
        "black" => return Ok(Rgba::BLACK),
        _ => {}
    }

    let hex = spec.strip_prefix('#').unwrap_or(spec);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidColorFormat(spec.to_string()));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| Error::InvalidColorFormat(spec.to_string()))
    };

    Ok(Rgba::opaque(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
