//! Generator configuration loaded from environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use arkham_domain::{Era, Gender};

/// How generated investigators are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown output format: {other}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Settings for a generator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory holding `first_names.csv` and `names.csv`
    pub data_dir: PathBuf,
    /// Seed for reproducible runs; system randomness when absent
    pub seed: Option<u64>,
    /// Number of investigators to generate
    pub count: usize,
    /// Fixed age; random in the standard range when absent
    pub age: Option<u32>,
    /// Fixed gender; random when absent
    pub gender: Option<Gender>,
    /// Name table language filter
    pub language: Option<String>,
    /// Name table era filter
    pub era: Option<Era>,
    pub occupation: String,
    pub birthplace: String,
    pub residence: String,
    pub output: OutputFormat,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            seed: None,
            count: 1,
            age: None,
            gender: None,
            language: None,
            era: None,
            occupation: "Writer".to_string(),
            birthplace: "Boston".to_string(),
            residence: "Arkham".to_string(),
            output: OutputFormat::Text,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let defaults = Self::default();

        let count = parsed(&get, "ARKHAM_COUNT")?.unwrap_or(defaults.count);
        if count == 0 {
            return Err(ConfigError::Invalid {
                key: "ARKHAM_COUNT",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            data_dir: get("ARKHAM_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            seed: parsed(&get, "ARKHAM_SEED")?,
            count,
            age: parsed(&get, "ARKHAM_AGE")?,
            gender: parsed(&get, "ARKHAM_GENDER")?,
            language: get("ARKHAM_LANGUAGE"),
            era: parsed(&get, "ARKHAM_ERA")?,
            occupation: get("ARKHAM_OCCUPATION").unwrap_or(defaults.occupation),
            birthplace: get("ARKHAM_BIRTHPLACE").unwrap_or(defaults.birthplace),
            residence: get("ARKHAM_RESIDENCE").unwrap_or(defaults.residence),
            output: parsed(&get, "ARKHAM_OUTPUT")?.unwrap_or(defaults.output),
        })
    }
}

fn parsed<T: FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    get(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value })
        })
        .transpose()
}
