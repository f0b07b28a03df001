use std::{collections::HashMap, fmt, str::FromStr};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::CardError;

/// Named colors accepted in addition to hex notation
static NAMED_COLORS: Lazy<HashMap<&'static str, Rgb>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("white", Rgb::new(0xff, 0xff, 0xff));
    map.insert("black", Rgb::new(0x00, 0x00, 0x00));
    map.insert("red", Rgb::new(0xff, 0x00, 0x00));
    map.insert("green", Rgb::new(0x00, 0x80, 0x00));
    map.insert("blue", Rgb::new(0x00, 0x00, 0xff));
    map.insert("yellow", Rgb::new(0xff, 0xff, 0x00));
    map.insert("orange", Rgb::new(0xff, 0xa5, 0x00));
    map.insert("purple", Rgb::new(0x80, 0x00, 0x80));
    map.insert("pink", Rgb::new(0xff, 0xc0, 0xcb));
    map.insert("gray", Rgb::new(0x80, 0x80, 0x80));
    map.insert("grey", Rgb::new(0x80, 0x80, 0x80));
    // Dark wood, reads well behind light text
    map.insert("brown", Rgb::new(0x5c, 0x40, 0x33));
    map
});

/// Card background color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance in [0, 1] (sRGB, ITU-R BT.709 weights)
    pub fn luminance(self) -> f64 {
        fn channel(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// Black or white, whichever contrasts more with `self`
    pub fn contrasting_text(self) -> Rgb {
        if self.luminance() > 0.179 {
            Rgb::new(0, 0, 0)
        } else {
            Rgb::WHITE
        }
    }

    fn parse_hex(digits: &str) -> Option<Self> {
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => Some(Self::new(
                u8::from_str_radix(&digits[0..2], 16).ok()?,
                u8::from_str_radix(&digits[2..4], 16).ok()?,
                u8::from_str_radix(&digits[4..6], 16).ok()?,
            )),
            3 => {
                let mut channels = digits
                    .chars()
                    .map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::new(
                    channels.next()??,
                    channels.next()??,
                    channels.next()??,
                ))
            }
            _ => None,
        }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl FromStr for Rgb {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix('#') {
            Some(digits) => Self::parse_hex(digits),
            None => NAMED_COLORS
                .get(trimmed.to_ascii_lowercase().as_str())
                .copied(),
        };
        parsed.ok_or_else(|| CardError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Rgb {
    type Error = CardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
