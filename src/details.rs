//! Human-readable summary of a configuration, as shown next to the preview.

use std::fmt;

use crate::config::Configuration;

/// Label for the export action.
pub fn download_label(config: &Configuration) -> String {
    let mut label = String::from("Download as PNG");
    if config.transparent_background {
        label.push_str(" (Transparent)");
    }
    label
}

/// Formats the details panel, one `Label: value` pair per line.
pub struct Details<'a>(pub &'a Configuration);

impl fmt::Display for Details<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;
        let transparent = if config.transparent_background {
            " (Transparent)"
        } else {
            ""
        };
        writeln!(f, "Content: {}", config.content)?;
        writeln!(f, "Dimensions: {0} × {0}px", config.size)?;
        writeln!(f, "Error Correction: {}", config.error_correction_level)?;
        writeln!(f, "Quiet Zone: {}px", config.quiet_zone)?;
        writeln!(f, "Export Format: PNG{transparent}")?;
        if config.has_logo() {
            let cleared = if config.remove_code_behind_logo {
                " (cleared)"
            } else {
                ""
            };
            writeln!(
                f,
                "Logo: {} × {}px{cleared}",
                config.logo_width, config.logo_height
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_details() {
        let text = Details(&Configuration::default()).to_string();
        assert_eq!(
            text,
            "Content: https://example.com\n\
             Dimensions: 256 × 256px\n\
             Error Correction: M\n\
             Quiet Zone: 10px\n\
             Export Format: PNG\n"
        );
        assert_eq!(download_label(&Configuration::default()), "Download as PNG");
    }

    #[test]
    fn test_logo_and_transparency_details() {
        let config = Configuration {
            logo_image: "data:image/png;base64,AAAA".into(),
            logo_width: 80,
            remove_code_behind_logo: true,
            transparent_background: true,
            ..Configuration::default()
        };
        let text = Details(&config).to_string();
        assert!(text.contains("Export Format: PNG (Transparent)\n"));
        assert!(text.ends_with("Logo: 80 × 60px (cleared)\n"));
        assert_eq!(download_label(&config), "Download as PNG (Transparent)");
    }
}
