//! Configuration for RW video directives.
//!
//! Reads the `[video]` section of `rw.toml`, discovered in the current
//! directory or its parents. [`CliSettings`] override file values during
//! [`Config::load`].
//!
//! ```toml
//! [video]
//! basecourse = "thinkcspy"
//! popup = false
//! default_width = 500
//! default_height = 281
//! store_dir = ".rw/content"
//! ```
//!
//! `basecourse` and `store_dir` support `${VAR}` and `${VAR:-default}`
//! environment expansion. `store_dir` is relative to the config file.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "rw.toml";

/// Course identifier used when none is configured.
pub const DEFAULT_BASECOURSE: &str = "default";

const DEFAULT_WIDTH: u32 = 500;
const DEFAULT_HEIGHT: u32 = 281;
const DEFAULT_STORE_DIR: &str = ".rw/content";

/// CLI settings that override configuration file values.
///
/// Only `Some` fields override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the course identifier.
    pub basecourse: Option<String>,
    /// Override the content store directory.
    pub store_dir: Option<PathBuf>,
    /// Override the popup default for self-hosted videos.
    pub popup: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// `[video]` section as written in TOML.
    video: VideoConfigRaw,

    /// Resolved video configuration (set after loading).
    #[serde(skip)]
    pub video_resolved: VideoConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw `[video]` section; paths are strings relative to the config file.
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct VideoConfigRaw {
    basecourse: Option<String>,
    popup: Option<bool>,
    default_width: Option<u32>,
    default_height: Option<u32>,
    store_dir: Option<String>,
}

/// Resolved video configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConfig {
    /// Course identifier content is registered under.
    pub basecourse: String,
    /// Popup presentation for self-hosted videos by default.
    pub popup: bool,
    /// Embed width when a directive leaves `width` unset.
    pub default_width: u32,
    /// Embed height when a directive leaves `height` unset.
    pub default_height: u32,
    /// Root directory of the file-backed content store.
    pub store_dir: PathBuf,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self::with_base(Path::new("."))
    }
}

impl VideoConfig {
    fn with_base(base: &Path) -> Self {
        Self {
            basecourse: DEFAULT_BASECOURSE.to_owned(),
            popup: false,
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            store_dir: base.join(DEFAULT_STORE_DIR),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`video.basecourse`").
        field: String,
        /// Error message (e.g., "${`COURSE`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// With an explicit `config_path` that file must exist. Otherwise
    /// `rw.toml` is searched for in the current directory and its parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit file is missing, parsing or
    /// expansion fails, or the result does not validate.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = discover_config(&std::env::current_dir()?) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_base(&std::env::current_dir()?)
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Default config with paths relative to `base`.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            video: VideoConfigRaw::default(),
            video_resolved: VideoConfig::with_base(base),
            config_path: None,
        }
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(basecourse) = &settings.basecourse {
            self.video_resolved.basecourse.clone_from(basecourse);
        }
        if let Some(store_dir) = &settings.store_dir {
            self.video_resolved.store_dir.clone_from(store_dir);
        }
        if let Some(popup) = settings.popup {
            self.video_resolved.popup = popup;
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate resolved values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for an empty `basecourse` or a zero
    /// default dimension.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let video = &self.video_resolved;
        if video.basecourse.trim().is_empty() {
            return Err(ConfigError::Validation(
                "video.basecourse cannot be empty".to_owned(),
            ));
        }
        if video.default_width == 0 {
            return Err(ConfigError::Validation(
                "video.default_width must be greater than 0".to_owned(),
            ));
        }
        if video.default_height == 0 {
            return Err(ConfigError::Validation(
                "video.default_height must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref basecourse) = self.video.basecourse {
            self.video.basecourse = Some(expand::expand_env(basecourse, "video.basecourse")?);
        }
        if let Some(ref store_dir) = self.video.store_dir {
            self.video.store_dir = Some(expand::expand_env(store_dir, "video.store_dir")?);
        }
        Ok(())
    }

    fn resolve(&mut self, config_dir: &Path) {
        let raw = &self.video;
        self.video_resolved = VideoConfig {
            basecourse: raw
                .basecourse
                .clone()
                .unwrap_or_else(|| DEFAULT_BASECOURSE.to_owned()),
            popup: raw.popup.unwrap_or(false),
            default_width: raw.default_width.unwrap_or(DEFAULT_WIDTH),
            default_height: raw.default_height.unwrap_or(DEFAULT_HEIGHT),
            store_dir: config_dir.join(raw.store_dir.as_deref().unwrap_or(DEFAULT_STORE_DIR)),
        };
    }
}

/// Search for `rw.toml` in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(toml: &str, dir: &Path) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve(dir);
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/book"));
        assert_eq!(
            config.video_resolved,
            VideoConfig {
                basecourse: "default".to_owned(),
                popup: false,
                default_width: 500,
                default_height: 281,
                store_dir: PathBuf::from("/book/.rw/content"),
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_video_section() {
        let config = parse(
            r#"
[video]
basecourse = "thinkcspy"
popup = true
default_width = 640
default_height = 360
store_dir = "build/content"
"#,
            Path::new("/book"),
        );

        assert_eq!(config.video_resolved.basecourse, "thinkcspy");
        assert!(config.video_resolved.popup);
        assert_eq!(config.video_resolved.default_width, 640);
        assert_eq!(config.video_resolved.default_height, 360);
        assert_eq!(
            config.video_resolved.store_dir,
            PathBuf::from("/book/build/content")
        );
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse("", Path::new("/book"));
        assert_eq!(config.video_resolved, VideoConfig::with_base(Path::new("/book")));
    }

    #[test]
    fn test_other_sections_ignored() {
        let config = parse(
            "[server]\nport = 9000\n\n[video]\nbasecourse = \"x\"\n",
            Path::new("/book"),
        );
        assert_eq!(config.video_resolved.basecourse, "x");
    }

    #[test]
    fn test_unknown_video_key_rejected() {
        let result: Result<Config, _> = toml::from_str("[video]\nautoplay = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_empty_basecourse() {
        let config = parse("[video]\nbasecourse = \"\"\n", Path::new("/book"));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("basecourse"));
    }

    #[test]
    fn test_validate_zero_default_width() {
        let config = parse("[video]\ndefault_width = 0\n", Path::new("/book"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_width"));
    }

    #[test]
    fn test_validate_zero_default_height() {
        let config = parse("[video]\ndefault_height = 0\n", Path::new("/book"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("default_height"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/book"));
        config.apply_cli_settings(&CliSettings {
            basecourse: Some("pythonds".to_owned()),
            popup: Some(true),
            ..Default::default()
        });

        assert_eq!(config.video_resolved.basecourse, "pythonds");
        assert!(config.video_resolved.popup);
        // Unchanged
        assert_eq!(
            config.video_resolved.store_dir,
            PathBuf::from("/book/.rw/content")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/book"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.video_resolved, VideoConfig::with_base(Path::new("/book")));
    }

    #[test]
    fn test_expand_basecourse() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("RW_VIDEO_CONFIG_TEST_COURSE", "fopp");
        }
        let config = parse(
            "[video]\nbasecourse = \"${RW_VIDEO_CONFIG_TEST_COURSE}\"\n",
            Path::new("/book"),
        );
        assert_eq!(config.video_resolved.basecourse, "fopp");
        unsafe {
            std::env::remove_var("RW_VIDEO_CONFIG_TEST_COURSE");
        }
    }

    #[test]
    fn test_expand_missing_var_errors() {
        let mut config: Config =
            toml::from_str("[video]\nstore_dir = \"${RW_VIDEO_CONFIG_TEST_UNSET}/out\"\n").unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "video.store_dir"));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[video]\nbasecourse = \"thinkcspy\"\n").unwrap();

        let config = Config::load(
            Some(&path),
            Some(&CliSettings {
                store_dir: Some(PathBuf::from("/elsewhere")),
                ..Default::default()
            }),
        )
        .unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.video_resolved.basecourse, "thinkcspy");
        assert_eq!(config.video_resolved.store_dir, PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_load_rejects_empty_cli_basecourse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            basecourse: Some(String::new()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[video\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs/chapter1");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            discover_config(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }
}
