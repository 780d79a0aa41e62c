//! The option store: single source of truth for the current [`Configuration`].
//!
//! State changes go through [`reduce`], a pure function that replaces exactly one field.
//! [`OptionStore`] wraps it with observers, so a render surface can follow every change.

use std::path::Path;

use tracing::{debug, info};

use crate::config::{
    Configuration, DotStyle, ErrorCorrectionLevel, Field, FieldValue, LogoPaddingStyle,
};
use crate::error::ConfigError;
use crate::logo::LogoFile;

/// A change to exactly one configuration field.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Content(String),
    Size(u32),
    BackgroundColor(String),
    ForegroundColor(String),
    EyeColor(String),
    DotStyle(DotStyle),
    EyeRadius(u32),
    ErrorCorrectionLevel(ErrorCorrectionLevel),
    QuietZone(u32),
    LogoImage(String),
    LogoWidth(u32),
    LogoHeight(u32),
    LogoOpacity(f32),
    LogoPadding(u32),
    LogoPaddingStyle(LogoPaddingStyle),
    RemoveCodeBehindLogo(bool),
    TransparentBackground(bool),
    CrossOriginMode(bool),
}

impl Update {
    /// The field this update replaces.
    pub fn field(&self) -> Field {
        match self {
            Update::Content(_) => Field::Content,
            Update::Size(_) => Field::Size,
            Update::BackgroundColor(_) => Field::BackgroundColor,
            Update::ForegroundColor(_) => Field::ForegroundColor,
            Update::EyeColor(_) => Field::EyeColor,
            Update::DotStyle(_) => Field::DotStyle,
            Update::EyeRadius(_) => Field::EyeRadius,
            Update::ErrorCorrectionLevel(_) => Field::ErrorCorrectionLevel,
            Update::QuietZone(_) => Field::QuietZone,
            Update::LogoImage(_) => Field::LogoImage,
            Update::LogoWidth(_) => Field::LogoWidth,
            Update::LogoHeight(_) => Field::LogoHeight,
            Update::LogoOpacity(_) => Field::LogoOpacity,
            Update::LogoPadding(_) => Field::LogoPadding,
            Update::LogoPaddingStyle(_) => Field::LogoPaddingStyle,
            Update::RemoveCodeBehindLogo(_) => Field::RemoveCodeBehindLogo,
            Update::TransparentBackground(_) => Field::TransparentBackground,
            Update::CrossOriginMode(_) => Field::CrossOriginMode,
        }
    }

    /// Builds a typed update from a field and a loosely typed value.
    ///
    /// Numbers are accepted as text, integers or fractions; ranges are not checked. Only
    /// values the field type cannot hold are rejected.
    pub fn from_value(field: Field, value: FieldValue) -> Result<Self, ConfigError> {
        let name = field.as_str();
        let update = match field {
            Field::Content => Update::Content(text(name, value)?),
            Field::Size => Update::Size(pixels(name, value)?),
            Field::BackgroundColor => Update::BackgroundColor(text(name, value)?),
            Field::ForegroundColor => Update::ForegroundColor(text(name, value)?),
            Field::EyeColor => Update::EyeColor(text(name, value)?),
            Field::DotStyle => Update::DotStyle(text(name, value)?.parse()?),
            Field::EyeRadius => Update::EyeRadius(pixels(name, value)?),
            Field::ErrorCorrectionLevel => {
                Update::ErrorCorrectionLevel(text(name, value)?.parse()?)
            }
            Field::QuietZone => Update::QuietZone(pixels(name, value)?),
            Field::LogoImage => Update::LogoImage(text(name, value)?),
            Field::LogoWidth => Update::LogoWidth(pixels(name, value)?),
            Field::LogoHeight => Update::LogoHeight(pixels(name, value)?),
            Field::LogoOpacity => Update::LogoOpacity(fraction(name, value)? as f32),
            Field::LogoPadding => Update::LogoPadding(pixels(name, value)?),
            Field::LogoPaddingStyle => Update::LogoPaddingStyle(text(name, value)?.parse()?),
            Field::RemoveCodeBehindLogo => Update::RemoveCodeBehindLogo(flag(name, value)?),
            Field::TransparentBackground => Update::TransparentBackground(flag(name, value)?),
            Field::CrossOriginMode => Update::CrossOriginMode(flag(name, value)?),
        };
        Ok(update)
    }
}

fn text(field: &'static str, value: FieldValue) -> Result<String, ConfigError> {
    match value {
        FieldValue::Text(s) => Ok(s),
        _ => Err(ConfigError::TypeMismatch {
            field,
            expected: "text",
        }),
    }
}

fn pixels(field: &'static str, value: FieldValue) -> Result<u32, ConfigError> {
    let mismatch = ConfigError::TypeMismatch {
        field,
        expected: "integer",
    };
    let n = match value {
        FieldValue::Integer(n) => n,
        FieldValue::Fraction(f) if f.is_finite() => f.round() as i64,
        FieldValue::Text(s) => s.trim().parse::<i64>().map_err(|_| mismatch)?,
        _ => return Err(mismatch),
    };
    u32::try_from(n).map_err(|_| ConfigError::Unrepresentable { field, value: n })
}

fn fraction(field: &'static str, value: FieldValue) -> Result<f64, ConfigError> {
    let mismatch = ConfigError::TypeMismatch {
        field,
        expected: "number",
    };
    match value {
        FieldValue::Fraction(f) => Ok(f),
        FieldValue::Integer(n) => Ok(n as f64),
        FieldValue::Text(s) => s.trim().parse().map_err(|_| mismatch),
        FieldValue::Flag(_) => Err(mismatch),
    }
}

fn flag(field: &'static str, value: FieldValue) -> Result<bool, ConfigError> {
    match value {
        FieldValue::Flag(b) => Ok(b),
        FieldValue::Text(s) if s == "true" => Ok(true),
        FieldValue::Text(s) if s == "false" => Ok(false),
        _ => Err(ConfigError::TypeMismatch {
            field,
            expected: "boolean",
        }),
    }
}

/// Returns a copy of `config` with the single field named by `update` replaced.
pub fn reduce(config: &Configuration, update: Update) -> Configuration {
    let mut next = config.clone();
    match update {
        Update::Content(v) => next.content = v,
        Update::Size(v) => next.size = v,
        Update::BackgroundColor(v) => next.background_color = v,
        Update::ForegroundColor(v) => next.foreground_color = v,
        Update::EyeColor(v) => next.eye_color = v,
        Update::DotStyle(v) => next.dot_style = v,
        Update::EyeRadius(v) => next.eye_radius = v,
        Update::ErrorCorrectionLevel(v) => next.error_correction_level = v,
        Update::QuietZone(v) => next.quiet_zone = v,
        Update::LogoImage(v) => next.logo_image = v,
        Update::LogoWidth(v) => next.logo_width = v,
        Update::LogoHeight(v) => next.logo_height = v,
        Update::LogoOpacity(v) => next.logo_opacity = v,
        Update::LogoPadding(v) => next.logo_padding = v,
        Update::LogoPaddingStyle(v) => next.logo_padding_style = v,
        Update::RemoveCodeBehindLogo(v) => next.remove_code_behind_logo = v,
        Update::TransparentBackground(v) => next.transparent_background = v,
        Update::CrossOriginMode(v) => next.cross_origin_mode = v,
    }
    next
}

type Observer = Box<dyn FnMut(&Configuration)>;

/// Holds the session's configuration and notifies observers of every change.
pub struct OptionStore {
    config: Configuration,
    observers: Vec<Observer>,
}

impl Default for OptionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionStore {
    pub fn new() -> Self {
        Self::with_config(Configuration::default())
    }

    pub fn with_config(config: Configuration) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Registers a callback invoked after each mutation with the new configuration.
    pub fn subscribe(&mut self, observer: impl FnMut(&Configuration) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Applies one typed update.
    pub fn set(&mut self, update: Update) {
        debug!(field = %update.field(), "option changed");
        self.replace(reduce(&self.config, update));
    }

    /// Applies one update given by field name, as a form would submit it.
    ///
    /// On error the configuration is left untouched.
    pub fn set_field(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), ConfigError> {
        let field: Field = name.parse()?;
        let update = Update::from_value(field, value.into())?;
        self.set(update);
        Ok(())
    }

    /// Installs a logo file as a data URL.
    ///
    /// Returns `false` and leaves the configuration untouched when no file is given.
    pub fn ingest_logo(&mut self, file: Option<LogoFile>) -> bool {
        let Some(file) = file else {
            debug!("no logo file selected");
            return false;
        };
        let url = file.to_data_url();
        info!(
            name = ?file.name,
            mime = file.mime_type(),
            bytes = file.bytes.len(),
            "logo ingested"
        );
        self.set(Update::LogoImage(url));
        true
    }

    /// Reads a logo from disk; read failures are silent apart from a debug log.
    pub fn ingest_logo_path(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match LogoFile::read(path) {
            Ok(file) => self.ingest_logo(Some(file)),
            Err(err) => {
                debug!(path = %path.display(), %err, "logo read failed");
                false
            }
        }
    }

    pub fn clear_logo(&mut self) {
        self.set(Update::LogoImage(String::new()));
    }

    /// Restores the default configuration.
    pub fn reset(&mut self) {
        self.replace(Configuration::default());
    }

    fn replace(&mut self, config: Configuration) {
        self.config = config;
        for observer in &mut self.observers {
            observer(&self.config);
        }
    }
}
