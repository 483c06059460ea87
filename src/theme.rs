use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which behaviors the interaction binder wires onto rendered output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionFlags {
    pub clickable: bool,
    pub zoomable: bool,
    pub draggable: bool,
    pub real_time_updates: bool,
    pub edit_mode: bool,
}

impl InteractionFlags {
    pub fn any(&self) -> bool {
        self.clickable
            || self.zoomable
            || self.draggable
            || self.real_time_updates
            || self.edit_mode
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub background: String,
    pub text_color: String,
    #[serde(default)]
    pub interaction: InteractionFlags,
}

impl Theme {
    pub fn document_default() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            primary_color: "#E8EEFF".to_string(),
            secondary_color: "#F1F5F9".to_string(),
            accent_color: "#6366F1".to_string(),
            background: "#FFFFFF".to_string(),
            text_color: "#1C2430".to_string(),
            interaction: InteractionFlags::default(),
        }
    }

    /// Caller contract check. A theme that fails here is a fatal error,
    /// never something the pipeline tries to repair.
    pub fn validate(&self) -> Result<(), Error> {
        if self.font_family.trim().is_empty() {
            return Err(Error::InvalidTheme("font family is empty".to_string()));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(Error::InvalidTheme(format!(
                "font size {} is not positive",
                self.font_size
            )));
        }
        for (name, value) in [
            ("primary_color", &self.primary_color),
            ("secondary_color", &self.secondary_color),
            ("accent_color", &self.accent_color),
            ("background", &self.background),
            ("text_color", &self.text_color),
        ] {
            if !is_hex_color(value) {
                return Err(Error::InvalidTheme(format!(
                    "{name} {value:?} is not a #RGB or #RRGGBB color"
                )));
            }
        }
        Ok(())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::document_default()
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|ch| ch.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_valid() {
        assert!(Theme::document_default().validate().is_ok());
    }

    #[test]
    fn rejects_non_hex_color() {
        let mut theme = Theme::document_default();
        theme.accent_color = "blue".to_string();
        assert!(matches!(theme.validate(), Err(Error::InvalidTheme(_))));
    }

    #[test]
    fn rejects_zero_font_size() {
        let mut theme = Theme::document_default();
        theme.font_size = 0.0;
        assert!(theme.validate().is_err());
    }
}
