//! Configuration file loading
//!
//! Config files are RON or JSON, chosen by extension.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Supported config file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Rusty Object Notation (`.ron`)
    Ron,
    /// JSON (`.json`)
    Json,
}

impl ConfigFormat {
    /// Pick a format from a file extension
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is missing or unknown
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Ok(Self::Ron),
            Some("json") => Ok(Self::Json),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }
}

/// Parse a config from a string
///
/// # Errors
///
/// Returns an error if the text does not deserialize into `T`
pub fn parse_config<T: DeserializeOwned>(text: &str, format: ConfigFormat) -> Result<T, ConfigError> {
    match format {
        ConfigFormat::Ron => ron::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string())),
        ConfigFormat::Json => {
            serde_json::from_str(text).map_err(|e| ConfigError::ParseError(e.to_string()))
        }
    }
}

/// Load a config file
///
/// # Errors
///
/// Returns an error if the file cannot be read, has an unknown extension,
/// or fails to deserialize
pub fn load_config<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    parse_config(&content, format)
}

/// Render a config in the given format
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn render_config<T: Serialize>(value: &T, format: ConfigFormat) -> Result<String, ConfigError> {
    match format {
        ConfigFormat::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string())),
        ConfigFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|e| ConfigError::SerializeError(e.to_string())),
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Unknown file extension
    UnsupportedFormat(String),
    /// Deserialization error
    ParseError(String),
    /// Serialization error
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::UnsupportedFormat(ext) => write!(f, "Unsupported config format: '{ext}'"),
            Self::ParseError(e) => write!(f, "Parse error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::EnemyConfig;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("level.ron")),
            Ok(ConfigFormat::Ron)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("dir/level.json")),
            Ok(ConfigFormat::Json)
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("level.toml")),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"
        ));
        assert!(ConfigFormat::from_path(Path::new("level")).is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        let result: Result<EnemyConfig, _> = parse_config("(view_radius: \"far\")", ConfigFormat::Ron);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result: Result<EnemyConfig, _> = load_config("/definitely/not/here.ron");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }

    #[test]
    fn test_render_then_parse_ron() {
        let config = EnemyConfig::default().with_view_radius(12.0);
        let text = render_config(&config, ConfigFormat::Ron).unwrap();
        assert!(text.contains("view_radius"));

        let parsed: EnemyConfig = parse_config(&text, ConfigFormat::Ron).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_disk() {
        let path = std::env::temp_dir().join(format!("sentinel-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "view_radius": 9.0 }"#).unwrap();

        let loaded: Result<EnemyConfig, _> = load_config(&path);
        let _ = fs::remove_file(&path);

        let config = loaded.unwrap();
        assert!((config.view_radius - 9.0).abs() < f32::EPSILON);
    }
}
