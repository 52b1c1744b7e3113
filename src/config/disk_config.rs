use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::ext::BestEffortPathExt;

const CONFIG_FILE_NAME: &str = "dirtally.yaml";

pub const DEFAULT_THRESHOLD: u64 = 100_000;
pub const DEFAULT_TOTAL_CAPACITY: u64 = 70_000_000;
pub const DEFAULT_REQUIRED_FREE: u64 = 30_000_000;

const THRESHOLD_KEY: &str = "threshold";
const TOTAL_CAPACITY_KEY: &str = "totalCapacity";
const REQUIRED_FREE_KEY: &str = "requiredFree";

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Parameters of the disk the transcript was recorded on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskConfig {
    pub threshold: u64,
    pub total_capacity: u64,
    pub required_free: u64,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            total_capacity: DEFAULT_TOTAL_CAPACITY,
            required_free: DEFAULT_REQUIRED_FREE,
        }
    }
}

/// Values given on the command line, taking precedence over the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiskOverrides {
    pub threshold: Option<u64>,
    pub total_capacity: Option<u64>,
    pub required_free: Option<u64>,
}

impl DiskConfig {
    /// Reads `dirtally.yaml` from `root`, falling back to the defaults when
    /// the file does not exist.
    pub async fn read(root: &Path) -> Result<Self, DiskConfigError> {
        Self::from_path(get_config_file_path(root)).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, DiskConfigError> {
        debug!("Opening config file: {}", path.best_effort_path_display());
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config file found, using default disk parameters");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).context(ReadSnafu {
                    file_path: path.best_effort_path_display(),
                });
            }
        };
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        Self::try_from(contents.as_str())
    }

    pub fn with_overrides(self, overrides: &DiskOverrides) -> Self {
        Self {
            threshold: overrides.threshold.unwrap_or(self.threshold),
            total_capacity: overrides.total_capacity.unwrap_or(self.total_capacity),
            required_free: overrides.required_free.unwrap_or(self.required_free),
        }
    }

    fn parse_from_yaml(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, DiskConfigError> {
        let mut config = Self::default();

        for (key, value) in top_level {
            let Yaml::Value(Scalar::String(key)) = key else {
                debug!("Skipping non-string config key: {:?}", key);
                continue;
            };
            let key: &str = key;
            let slot = match key {
                THRESHOLD_KEY => &mut config.threshold,
                TOTAL_CAPACITY_KEY => &mut config.total_capacity,
                REQUIRED_FREE_KEY => &mut config.required_free,
                other => {
                    debug!("Ignoring unknown config key '{}'", other);
                    continue;
                }
            };
            *slot = Self::parse_size(key, value)?;
        }

        Ok(config)
    }

    fn parse_size(key: &str, value: &Yaml) -> Result<u64, DiskConfigError> {
        let size = match value {
            Yaml::Value(Scalar::Integer(n)) => u64::try_from(*n).ok(),
            _ => None,
        };
        size.context(InvalidValueSnafu { key })
    }
}

impl TryFrom<&str> for DiskConfig {
    type Error = DiskConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let contents_vec =
            Yaml::load_from_str(contents).map_err(|e| DiskConfigError::ParseError { source: e })?;
        let contents = contents_vec
            .first()
            .ok_or(DiskConfigError::MalformedConfig)?;

        let top_level = contents
            .as_mapping()
            .ok_or(DiskConfigError::TopLevelNotMap)?;

        let config = Self::parse_from_yaml(top_level)?;
        debug!("Loaded disk config: {:?}", config);
        Ok(config)
    }
}

#[derive(Debug, Snafu)]
pub enum DiskConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Config file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("'{}' should be a non-negative integer", key))]
    InvalidValue { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use tempfile::TempDir;

    #[compio::test]
    async fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = DiskConfig::read(temp_dir.path()).await.unwrap();
        assert_eq!(config, DiskConfig::default());
    }

    #[compio::test]
    async fn reads_values_from_root_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "threshold: 500\ntotalCapacity: 1000\nrequiredFree: 300\n",
        )
        .expect("Failed to write config");

        let config = DiskConfig::read(temp_dir.path()).await.unwrap();
        assert_eq!(
            config,
            DiskConfig {
                threshold: 500,
                total_capacity: 1000,
                required_free: 300,
            }
        );
    }

    #[compio::test]
    async fn unreadable_path_is_read_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // a directory where the file should be
        std::fs::create_dir(temp_dir.path().join(CONFIG_FILE_NAME))
            .expect("Failed to create directory");

        let result = DiskConfig::read(temp_dir.path()).await;
        assert!(matches!(result, Err(DiskConfigError::ReadError { .. })));
    }

    #[compio::test]
    async fn non_utf8_file_is_encoding_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            b"threshold: \xff\xfe\n",
        )
        .expect("Failed to write config");

        let result = DiskConfig::read(temp_dir.path()).await;
        assert!(matches!(result, Err(DiskConfigError::EncodingError { .. })));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: DiskConfig = "requiredFree: 5".try_into().unwrap();
        assert_eq!(config.required_free, 5);
        assert_eq!(config.threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.total_capacity, DEFAULT_TOTAL_CAPACITY);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config: DiskConfig = "other: value\nthreshold: 7".try_into().unwrap();
        assert_eq!(config.threshold, 7);
    }

    #[test]
    fn empty_file_is_malformed() {
        let result: Result<DiskConfig, _> = "".try_into();
        assert!(matches!(result, Err(DiskConfigError::MalformedConfig)));
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let result: Result<DiskConfig, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(DiskConfigError::ParseError { .. })));
    }

    #[rstest]
    #[case("- item1\n- item2")]
    #[case("just a string")]
    fn top_level_must_be_map(#[case] contents: &str) {
        let result: Result<DiskConfig, _> = contents.try_into();
        assert!(matches!(result, Err(DiskConfigError::TopLevelNotMap)));
    }

    #[rstest]
    #[case("threshold: -1", "threshold")]
    #[case("totalCapacity: lots", "totalCapacity")]
    #[case("requiredFree: 1.5", "requiredFree")]
    #[case("threshold: [1, 2]", "threshold")]
    fn rejects_non_integer_values(#[case] contents: &str, #[case] expected_key: &str) {
        match DiskConfig::try_from(contents) {
            Err(DiskConfigError::InvalidValue { key }) => assert_eq!(key, expected_key),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn overrides_take_precedence() {
        let overrides = DiskOverrides {
            threshold: Some(1),
            total_capacity: None,
            required_free: Some(3),
        };
        let config = DiskConfig::default().with_overrides(&overrides);
        assert_eq!(config.threshold, 1);
        assert_eq!(config.total_capacity, DEFAULT_TOTAL_CAPACITY);
        assert_eq!(config.required_free, 3);
    }
}
