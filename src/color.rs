//! Color strings as accepted by the configuration.
//!
//! The accepted syntax is a small CSS subset: hex notation (`#rgb`, `#rgba`, `#rrggbb`,
//! `#rrggbbaa`), functional `rgb(..)` / `rgba(..)`, the keyword `transparent` and a handful
//! of named colors.

use std::str::FromStr;

use image::Rgba;
use tracing::warn;

use crate::error::ColorError;

/// An RGBA color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub Rgba<u8>);

impl Color {
    pub const BLACK: Color = Color(Rgba([0, 0, 0, 255]));
    pub const WHITE: Color = Color(Rgba([255, 255, 255, 255]));
    pub const TRANSPARENT: Color = Color(Rgba([0, 0, 0, 0]));

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(Rgba([r, g, b, 255]))
    }

    pub fn alpha(&self) -> u8 {
        self.0[3]
    }

    /// Parses `value`, falling back to opaque black when it is not a color.
    ///
    /// This mirrors a 2D canvas, where assigning an invalid `fillStyle` is ignored and the
    /// default black stays in effect.
    pub fn parse_or_black(value: &str) -> Self {
        value.parse().unwrap_or_else(|err: ColorError| {
            warn!(%err, "falling back to black");
            Color::BLACK
        })
    }
}

impl From<Color> for Rgba<u8> {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let invalid = || ColorError(s.to_string());

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = value.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(args).ok_or_else(invalid);
        }

        named(&lower).ok_or_else(invalid)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    let [r, g, b, a] = match hex.len() {
        3 => [nibble(0)?, nibble(1)?, nibble(2)?, 255],
        4 => [nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?],
        6 => [byte(0)?, byte(2)?, byte(4)?, 255],
        8 => [byte(0)?, byte(2)?, byte(4)?, byte(6)?],
        _ => return None,
    };
    Some(Color(Rgba([r, g, b, a])))
}

fn parse_functional(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |p: &str| p.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);

    match parts.as_slice() {
        [r, g, b] => Some(Color::rgb(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => {
            let alpha = a.parse::<f32>().ok()?.clamp(0.0, 1.0);
            Some(Color(Rgba([
                channel(r)?,
                channel(g)?,
                channel(b)?,
                (alpha * 255.0).round() as u8,
            ])))
        }
        _ => None,
    }
}

fn named(name: &str) -> Option<Color> {
    let color = match name {
        "transparent" => Color::TRANSPARENT,
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "lime" => Color::rgb(0, 255, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "navy" => Color::rgb(0, 0, 128),
        "teal" => Color::rgb(0, 128, 128),
        _ => return None,
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!("#FFFFFF".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#000".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("#ff000080".parse::<Color>().unwrap(), Color(Rgba([255, 0, 0, 128])));
        assert_eq!("#0f08".parse::<Color>().unwrap(), Color(Rgba([0, 255, 0, 136])));
    }

    #[test]
    fn test_functional_and_named() {
        assert_eq!("rgb(1, 2, 3)".parse::<Color>().unwrap(), Color::rgb(1, 2, 3));
        assert_eq!(
            "RGBA(10,20,30,0.5)".parse::<Color>().unwrap(),
            Color(Rgba([10, 20, 30, 128]))
        );
        assert_eq!("transparent".parse::<Color>().unwrap().alpha(), 0);
        assert_eq!(" Orange ".parse::<Color>().unwrap(), Color::rgb(255, 165, 0));
    }

    #[test]
    fn test_invalid_falls_back_to_black() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
        assert!("rgb(1,2)".parse::<Color>().is_err());
        assert_eq!(Color::parse_or_black("not-a-color"), Color::BLACK);
    }
}
