use serde::Deserialize;
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::settings::consts::DEFAULT_CONFIG_EXTENSION;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse config file: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Config file {} has an empty `{field}`", path.display())]
    EmptyField { path: PathBuf, field: &'static str },
}

#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct Credentials {
    #[serde(rename = "apiKey")]
    pub api_key: String,
    #[serde(rename = "apiSecret")]
    pub api_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

pub trait CredentialsStore {
    fn load(&self) -> Result<Credentials, ConfigError>;
}

/// Credentials kept in a JSON file: `{"apiKey": "...", "apiSecret": "..."}`
pub struct JsonFileCredentialsStore {
    path: PathBuf,
}

impl JsonFileCredentialsStore {
    /// `path` gets a `.json` extension when it has none.
    pub fn new(path: &Path) -> Self {
        Self {
            path: with_default_extension(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialsStore for JsonFileCredentialsStore {
    fn load(&self) -> Result<Credentials, ConfigError> {
        let content = fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        let credentials: Credentials =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;

        for (field, value) in [
            ("apiKey", &credentials.api_key),
            ("apiSecret", &credentials.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField {
                    path: self.path.clone(),
                    field,
                });
            }
        }

        Ok(credentials)
    }
}

pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_CONFIG_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_with_default_extension() {
        assert_eq!(
            with_default_extension(Path::new("binance")),
            PathBuf::from("binance.json")
        );
        assert_eq!(
            with_default_extension(Path::new("conf/binance")),
            PathBuf::from("conf/binance.json")
        );
        assert_eq!(
            with_default_extension(Path::new("binance.json")),
            PathBuf::from("binance.json")
        );
        assert_eq!(
            with_default_extension(Path::new("binance.conf")),
            PathBuf::from("binance.conf")
        );
    }

    #[test]
    fn test_load_credentials() {
        let file = config_file(r#"{"apiKey": "key", "apiSecret": "secret"}"#);
        let store = JsonFileCredentialsStore::new(file.path());

        let credentials = store.load().unwrap();

        assert_eq!(credentials.api_key, "key");
        assert_eq!(credentials.api_secret, "secret");
    }

    #[test]
    fn test_load_appends_json_extension() {
        let file = config_file(r#"{"apiKey": "key", "apiSecret": "secret"}"#);
        let without_extension = file.path().with_extension("");
        let store = JsonFileCredentialsStore::new(&without_extension);

        assert_eq!(store.path(), file.path());
        assert_eq!(store.load().unwrap().api_key, "key");
    }

    #[test]
    fn test_load_missing_file() {
        let directory = tempfile::tempdir().unwrap();
        let store = JsonFileCredentialsStore::new(&directory.path().join("missing"));

        match store.load() {
            Err(ConfigError::Read { path, .. }) => {
                assert_eq!(path, directory.path().join("missing.json"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_load_malformed_json() {
        let file = config_file(r#"{"apiKey": "key", "apiSecret": "#);
        let store = JsonFileCredentialsStore::new(file.path());

        assert!(matches!(store.load(), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_wrong_shape() {
        let file = config_file(r#"{"key": "key", "secret": "secret"}"#);
        let store = JsonFileCredentialsStore::new(file.path());

        assert!(matches!(store.load(), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_empty_secret() {
        let file = config_file(r#"{"apiKey": "key", "apiSecret": ""}"#);
        let store = JsonFileCredentialsStore::new(file.path());

        match store.load() {
            Err(ConfigError::EmptyField { field, .. }) => assert_eq!(field, "apiSecret"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = Credentials {
            api_key: "key".to_string(),
            api_secret: "very-secret".to_string(),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("key"));
        assert!(!debug.contains("very-secret"));
    }
}
