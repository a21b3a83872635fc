/// Player configuration
use crate::error::{CliError, Result};
use lark_audio::OutputSettings;
use lark_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default config file, read from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "lark.toml";

/// Prefix for environment overrides, e.g. `LARK_PLAYBACK__REPEAT=true`
pub const ENV_PREFIX: &str = "LARK";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CliConfig {
    pub playback: PlaybackConfig,
    pub output: OutputSettings,
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `lark.toml` is used if found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load), reading overrides from `env` instead of the
    /// process environment when given
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (LARK_<SECTION>__<KEY>)
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config = settings.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.playback.buffer_size == 0 {
            return Err(CliError::Config(
                "playback.buffer_size must be greater than zero".to_string(),
            ));
        }

        if self.playback.history_limit == 0 {
            return Err(CliError::Config(
                "playback.history_limit must be greater than zero".to_string(),
            ));
        }

        if self.output.sample_rate == 0 {
            return Err(CliError::Config(
                "output.sample_rate must be greater than zero".to_string(),
            ));
        }

        if self.output.channels == 0 {
            return Err(CliError::Config(
                "output.channels must be greater than zero".to_string(),
            ));
        }

        if self.output.volume > 100 {
            return Err(CliError::Config(format!(
                "output.volume must be at most 100, got {}",
                self.output.volume
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_without_sources() {
        let file = write_config("");
        let config = CliConfig::load_with_env(Some(file.path()), env(&[])).unwrap();

        assert_eq!(config, CliConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            [playback]
            repeat = true
            history_limit = 50

            [output]
            sample_rate = 48000
            "#,
        );

        let config = CliConfig::load_with_env(Some(file.path()), env(&[])).unwrap();

        assert!(config.playback.repeat);
        assert_eq!(config.playback.history_limit, 50);
        assert_eq!(config.playback.buffer_size, 4096);
        assert_eq!(config.output.sample_rate, 48000);
        assert_eq!(config.output.channels, 2);
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_config("[playback]\nshuffle = false\n");

        let config = CliConfig::load_with_env(
            Some(file.path()),
            env(&[
                ("LARK_PLAYBACK__SHUFFLE", "true"),
                ("LARK_PLAYBACK__BUFFER_SIZE", "8192"),
                ("LARK_OUTPUT__VOLUME", "30"),
            ]),
        )
        .unwrap();

        assert!(config.playback.shuffle);
        assert_eq!(config.playback.buffer_size, 8192);
        assert_eq!(config.output.volume, 30);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = CliConfig::load_with_env(Some(Path::new("/nonexistent/lark.toml")), env(&[]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_sizes() {
        let mut config = CliConfig::default();
        config.playback.buffer_size = 0;
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.playback.history_limit = 0;
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.output.channels = 0;
        assert!(config.validate().is_err());

        let mut config = CliConfig::default();
        config.output.sample_rate = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_loud_volume() {
        let mut config = CliConfig::default();
        config.output.volume = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("101"));
    }
}
