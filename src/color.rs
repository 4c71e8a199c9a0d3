//! RGB colors written as six-digit hex strings, e.g. `"FF8800"`.
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// An sRGB color.
///
/// Parses from `"RRGGBB"` with an optional leading `#`, and prints back as upper-case `RRGGBB`
/// without the `#`, the form page surfaces are handed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0x00, 0x00, 0x00]);
    pub const WHITE: Rgb = Rgb([0xFF, 0xFF, 0xFF]);

    /// Builds a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Returns the `RRGGBB` hex form.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("{r:02X}{g:02X}{b:02X}")
    }

    /// Converts to an `image` pixel.
    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb(self.0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Returned when a string is not a six-digit hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color `{0}`, expected RRGGBB")]
pub struct ParseColorError(String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ParseColorError(s.to_string()));
        Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}
