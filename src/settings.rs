use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub globe: GlobeSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct GlobeSettings {
    /// Base URL of the collector endpoint.
    pub url: Option<String>,
    /// Poll interval in seconds.
    pub interval: Option<f64>,
    // Kept as strings and parsed leniently; bad values fall back to the
    // built-in defaults instead of failing.
    pub lifetime: Option<String>,
    pub max_points: Option<String>,
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("ignoring malformed {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termglobe")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_settings_parse() {
        let settings: Settings = toml::from_str(
            r#"
[globe]
url = "http://collector:5000"
interval = 5.0
lifetime = "60"
max_points = "500"
"#,
        )
        .unwrap();

        assert_eq!(settings.globe.url.as_deref(), Some("http://collector:5000"));
        assert_eq!(settings.globe.interval, Some(5.0));
        assert_eq!(settings.globe.lifetime.as_deref(), Some("60"));
    }

    #[test]
    fn missing_section_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.globe.url.is_none());
        assert!(settings.globe.lifetime.is_none());
    }

    #[test]
    fn malformed_file_is_rejected() {
        assert!(toml::from_str::<Settings>("globe = 3").is_err());
    }
}
