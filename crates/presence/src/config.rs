use serde::{Deserialize, Serialize};

use crate::camera::PointOfView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "presence config parse error: {msg}"),
            ConfigError::Invalid(what) => write!(f, "invalid presence config: {what}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything tunable about the globe. Every field has a default, so an
/// empty JSON object (or an empty string) is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub storage_key: String,
    pub strobe: StrobeTiming,
    pub sequence: SequenceTiming,
    pub viewport: ViewportConfig,
    pub textures: TextureConfig,
    pub globe: GlobeStyle,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            storage_key: session::LAST_CITY_KEY.to_string(),
            strobe: StrobeTiming::default(),
            sequence: SequenceTiming::default(),
            viewport: ViewportConfig::default(),
            textures: TextureConfig::default(),
            globe: GlobeStyle::default(),
        }
    }
}

impl PresenceConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: PresenceConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.strobe;
        if s.period_ms <= 0.0 {
            return Err(ConfigError::Invalid("strobe.period_ms must be positive"));
        }
        if s.off_ms < 0.0 || s.on_ms <= 0.0 || s.off_ms + s.on_ms > s.period_ms {
            return Err(ConfigError::Invalid(
                "strobe.off_ms + strobe.on_ms must fit in strobe.period_ms",
            ));
        }
        if self.sequence.hold_warning_ms > self.sequence.hold_ms {
            return Err(ConfigError::Invalid(
                "sequence.hold_warning_ms exceeds sequence.hold_ms",
            ));
        }
        if self.textures.globe.is_empty() || self.textures.bump.is_empty() {
            return Err(ConfigError::Invalid("texture candidate lists must not be empty"));
        }
        Ok(())
    }
}

/// Marker strobe cycle: OFF for `off_ms`, ON for `on_ms`, the rest settles.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrobeTiming {
    pub period_ms: f64,
    pub off_ms: f64,
    pub on_ms: f64,
    /// Minimum spacing between marker refreshes.
    pub refresh_ms: f64,
}

impl StrobeTiming {
    pub fn settle_ms(&self) -> f64 {
        (self.period_ms - self.off_ms - self.on_ms).max(0.0)
    }
}

impl Default for StrobeTiming {
    fn default() -> Self {
        Self {
            period_ms: 1200.0,
            off_ms: 1000.0,
            on_ms: 120.0,
            refresh_ms: 80.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceTiming {
    /// Hold at the closest zoom, measured from the end of the second zoom-in.
    pub hold_ms: u64,
    /// How long before the hold ends the marker turns back to orange.
    pub hold_warning_ms: u64,
}

impl Default for SequenceTiming {
    fn default() -> Self {
        Self {
            hold_ms: 15_050,
            hold_warning_ms: 1_500,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Widths strictly above this are desktop.
    pub desktop_breakpoint_px: f64,
    pub desktop_lat_bias_deg: f64,
    pub mobile_lat_bias_deg: f64,
    /// Westward nudge of the flat map center on desktop.
    pub map_lng_offset_deg: f64,
    pub map_pan_panel_fraction: f64,
    pub map_pan_max_px: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            desktop_breakpoint_px: 980.0,
            desktop_lat_bias_deg: -12.0,
            mobile_lat_bias_deg: -6.0,
            map_lng_offset_deg: -8.0,
            map_pan_panel_fraction: 0.35,
            map_pan_max_px: 140.0,
        }
    }
}

/// Candidate image URLs, best first. The last entry is assumed to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub globe: Vec<String>,
    pub bump: Vec<String>,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            globe: vec![
                "/images/globe/dots-world.png".to_string(),
                "/images/globe/dots-world.jpg".to_string(),
                "/images/globe/earth-custom.jpg".to_string(),
                "https://unpkg.com/three-globe/example/img/earth-dark.jpg".to_string(),
            ],
            bump: vec![
                "/images/globe/earth-custom-topology.png".to_string(),
                "https://unpkg.com/three-globe/example/img/earth-topology.png".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeStyle {
    pub background: String,
    pub atmosphere_color: String,
    pub atmosphere_altitude: f64,
    pub auto_rotate_speed: f64,
    pub initial_view: PointOfView,
    pub initial_view_ms: u32,
    /// Zoom cap when the flat map fits all markers.
    pub map_fit_max_zoom: u8,
}

impl Default for GlobeStyle {
    fn default() -> Self {
        Self {
            background: "#0b0e11".to_string(),
            atmosphere_color: "#3a4b5a".to_string(),
            atmosphere_altitude: 0.18,
            auto_rotate_speed: 0.6,
            initial_view: PointOfView::new(30.0, 25.0, 2.4),
            initial_view_ms: 1200,
            map_fit_max_zoom: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_is_default() {
        assert_eq!(PresenceConfig::from_json("  ").unwrap(), PresenceConfig::default());
        assert_eq!(PresenceConfig::from_json("{}").unwrap(), PresenceConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = PresenceConfig::from_json(
            r#"{ "sequence": { "hold_ms": 5000 }, "viewport": { "mobile_lat_bias_deg": -4.0 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.sequence.hold_ms, 5000);
        assert_eq!(cfg.sequence.hold_warning_ms, 1500);
        assert_eq!(cfg.viewport.mobile_lat_bias_deg, -4.0);
        assert_eq!(cfg.viewport.desktop_lat_bias_deg, -12.0);
        assert_eq!(cfg.storage_key, "cravelle:lastCity");
    }

    #[test]
    fn rejects_strobe_windows_longer_than_period() {
        let err = PresenceConfig::from_json(r#"{ "strobe": { "period_ms": 500 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn reports_parse_errors() {
        let err = PresenceConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn default_settle_window_is_80ms() {
        assert_eq!(StrobeTiming::default().settle_ms(), 80.0);
    }
}
