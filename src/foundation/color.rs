use serde::{Deserialize, Serialize};

/// Straight-alpha RGBA8 color.
///
/// Serializes as `#RRGGBB` (or `#RRGGBBAA` when not opaque). Deserializes from a hex string or an
/// `[r, g, b]` / `[r, g, b, a]` byte array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque color from RGB bytes.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#FFFFFF`
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);
    /// `#000000`
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    /// `#FFFF00`
    pub const YELLOW: Self = Self::rgb(0xff, 0xff, 0x00);
    /// `#FC6255`
    pub const RED: Self = Self::rgb(0xfc, 0x62, 0x55);
    /// `#FF0000`
    pub const PURE_RED: Self = Self::rgb(0xff, 0x00, 0x00);
    /// `#58C4DD`
    pub const BLUE: Self = Self::rgb(0x58, 0xc4, 0xdd);

    /// Parse `#RRGGBB` / `#RRGGBBAA` (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> Result<u8, String> {
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
        }

        if !s.is_ascii() {
            return Err("hex color must be ASCII".to_owned());
        }
        match s.len() {
            6 => Ok(Self::rgb(
                hex_byte(&s[0..2])?,
                hex_byte(&s[2..4])?,
                hex_byte(&s[4..6])?,
            )),
            8 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: hex_byte(&s[6..8])?,
            }),
            _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
        }
    }

    /// `#rrggbb`, ignoring alpha. Used for SVG `fill`/`stroke` attributes.
    pub fn rgb_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a `[0, 1]` fraction.
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Channel-wise linear interpolation.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        fn mix(a: u8, b: u8, t: f64) -> u8 {
            crate::foundation::math::lerp(f64::from(a), f64::from(b), t)
                .round()
                .clamp(0.0, 255.0) as u8
        }
        let t = t.clamp(0.0, 1.0);
        Self {
            r: mix(self.r, other.r, t),
            g: mix(self.g, other.g, t),
            b: mix(self.b, other.b, t),
            a: mix(self.a, other.a, t),
        }
    }

    /// Straight RGBA8 bytes.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = if self.a == 255 {
            self.rgb_hex()
        } else {
            format!("{}{:02x}", self.rgb_hex(), self.a)
        };
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::from_hex(&s).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Self {
                    r: *r,
                    g: *g,
                    b: *b,
                    a: *a,
                }),
                _ => Err(serde::de::Error::custom(
                    "color array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
