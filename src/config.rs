//! The configuration describing one styled QR code.
//!
//! A [`Configuration`] is always fully populated: [`Default`] supplies every field and
//! deserialization fills missing keys from those defaults. Field names serialize in camelCase;
//! the short names used by web QR components (`value`, `bgColor`, `qrStyle`, `ecLevel`, ...)
//! are accepted as aliases.

use std::fmt;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Shape used for data modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotStyle {
    #[default]
    Squares,
    Dots,
    Fluid,
}

/// QR error correction level, from lowest (L, ~7% recovery) to highest (H, ~30%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<ErrorCorrectionLevel> for qrcode::EcLevel {
    fn from(level: ErrorCorrectionLevel) -> Self {
        match level {
            ErrorCorrectionLevel::L => qrcode::EcLevel::L,
            ErrorCorrectionLevel::M => qrcode::EcLevel::M,
            ErrorCorrectionLevel::Q => qrcode::EcLevel::Q,
            ErrorCorrectionLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Shape of the cleared area around the logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoPaddingStyle {
    #[default]
    Square,
    Circle,
}

impl FromStr for DotStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "squares" => Ok(DotStyle::Squares),
            "dots" => Ok(DotStyle::Dots),
            "fluid" => Ok(DotStyle::Fluid),
            _ => Err(ConfigError::UnknownVariant {
                field: Field::DotStyle.as_str(),
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for ErrorCorrectionLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(ErrorCorrectionLevel::L),
            "M" => Ok(ErrorCorrectionLevel::M),
            "Q" => Ok(ErrorCorrectionLevel::Q),
            "H" => Ok(ErrorCorrectionLevel::H),
            _ => Err(ConfigError::UnknownVariant {
                field: Field::ErrorCorrectionLevel.as_str(),
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for LogoPaddingStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "square" => Ok(LogoPaddingStyle::Square),
            "circle" => Ok(LogoPaddingStyle::Circle),
            _ => Err(ConfigError::UnknownVariant {
                field: Field::LogoPaddingStyle.as_str(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ErrorCorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCorrectionLevel::L => "L",
            ErrorCorrectionLevel::M => "M",
            ErrorCorrectionLevel::Q => "Q",
            ErrorCorrectionLevel::H => "H",
        };
        f.write_str(name)
    }
}

/// Content and appearance of one QR artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    /// Text encoded into the code.
    #[serde(alias = "value")]
    pub content: String,
    /// Edge length of the code area in pixels, quiet zone excluded.
    pub size: u32,
    #[serde(alias = "bgColor")]
    pub background_color: String,
    #[serde(alias = "fgColor")]
    pub foreground_color: String,
    pub eye_color: String,
    #[serde(alias = "qrStyle")]
    pub dot_style: DotStyle,
    /// Corner radius of the finder eyes in pixels.
    pub eye_radius: u32,
    #[serde(alias = "ecLevel")]
    pub error_correction_level: ErrorCorrectionLevel,
    /// Margin around the code in pixels.
    pub quiet_zone: u32,
    /// Logo as a data URL, or empty for no logo.
    pub logo_image: String,
    pub logo_width: u32,
    pub logo_height: u32,
    /// Logo opacity between 0.0 and 1.0.
    pub logo_opacity: f32,
    pub logo_padding: u32,
    pub logo_padding_style: LogoPaddingStyle,
    /// Skip data modules that sit under the logo.
    #[serde(alias = "removeQrCodeBehindLogo")]
    pub remove_code_behind_logo: bool,
    /// Export without a background fill.
    pub transparent_background: bool,
    #[serde(alias = "enableCORS")]
    pub cross_origin_mode: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            content: "https://example.com".to_string(),
            size: 256,
            background_color: "#FFFFFF".to_string(),
            foreground_color: "#000000".to_string(),
            eye_color: "#000000".to_string(),
            dot_style: DotStyle::Squares,
            eye_radius: 0,
            error_correction_level: ErrorCorrectionLevel::M,
            quiet_zone: 10,
            logo_image: String::new(),
            logo_width: 60,
            logo_height: 60,
            logo_opacity: 1.0,
            logo_padding: 0,
            logo_padding_style: LogoPaddingStyle::Square,
            remove_code_behind_logo: false,
            transparent_background: false,
            cross_origin_mode: false,
        }
    }
}

impl Configuration {
    /// Parses a JSON document; keys that are absent keep their default value.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading configuration");
        Self::from_json_str(&json)
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn has_logo(&self) -> bool {
        !self.logo_image.is_empty()
    }
}

/// Names of the configuration fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Content,
    Size,
    BackgroundColor,
    ForegroundColor,
    EyeColor,
    DotStyle,
    EyeRadius,
    ErrorCorrectionLevel,
    QuietZone,
    LogoImage,
    LogoWidth,
    LogoHeight,
    LogoOpacity,
    LogoPadding,
    LogoPaddingStyle,
    RemoveCodeBehindLogo,
    TransparentBackground,
    CrossOriginMode,
}

impl Field {
    pub const ALL: [Field; 18] = [
        Field::Content,
        Field::Size,
        Field::BackgroundColor,
        Field::ForegroundColor,
        Field::EyeColor,
        Field::DotStyle,
        Field::EyeRadius,
        Field::ErrorCorrectionLevel,
        Field::QuietZone,
        Field::LogoImage,
        Field::LogoWidth,
        Field::LogoHeight,
        Field::LogoOpacity,
        Field::LogoPadding,
        Field::LogoPaddingStyle,
        Field::RemoveCodeBehindLogo,
        Field::TransparentBackground,
        Field::CrossOriginMode,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Content => "content",
            Field::Size => "size",
            Field::BackgroundColor => "backgroundColor",
            Field::ForegroundColor => "foregroundColor",
            Field::EyeColor => "eyeColor",
            Field::DotStyle => "dotStyle",
            Field::EyeRadius => "eyeRadius",
            Field::ErrorCorrectionLevel => "errorCorrectionLevel",
            Field::QuietZone => "quietZone",
            Field::LogoImage => "logoImage",
            Field::LogoWidth => "logoWidth",
            Field::LogoHeight => "logoHeight",
            Field::LogoOpacity => "logoOpacity",
            Field::LogoPadding => "logoPadding",
            Field::LogoPaddingStyle => "logoPaddingStyle",
            Field::RemoveCodeBehindLogo => "removeCodeBehindLogo",
            Field::TransparentBackground => "transparentBackground",
            Field::CrossOriginMode => "crossOriginMode",
        }
    }

    /// Slider bounds offered to users for numeric fields.
    ///
    /// These are hints only; the store does not enforce them.
    pub fn range(self) -> Option<RangeInclusive<f64>> {
        match self {
            Field::Size => Some(128.0..=512.0),
            Field::EyeRadius | Field::QuietZone => Some(0.0..=50.0),
            Field::LogoWidth | Field::LogoHeight => Some(20.0..=120.0),
            Field::LogoOpacity => Some(0.0..=1.0),
            Field::LogoPadding => Some(0.0..=20.0),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "value" => Field::Content,
            "bgColor" => Field::BackgroundColor,
            "fgColor" => Field::ForegroundColor,
            "qrStyle" => Field::DotStyle,
            "ecLevel" => Field::ErrorCorrectionLevel,
            "removeQrCodeBehindLogo" => Field::RemoveCodeBehindLogo,
            "enableCORS" => Field::CrossOriginMode,
            other => Field::ALL
                .into_iter()
                .find(|field| field.as_str() == other)
                .ok_or_else(|| ConfigError::UnknownField(other.to_string()))?,
        };
        Ok(field)
    }
}

/// A loosely typed value, as submitted by a form control.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Fraction(f64),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Fraction(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}
