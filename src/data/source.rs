//! Where a table comes from: a local JSON file or an http(s) URL.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// Interpret a configured location. Anything starting with http:// or https:// is fetched.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    fn read_raw(&self) -> Result<String, TableError> {
        match self {
            Self::File(path) => fs::read_to_string(path).map_err(|source| TableError::Read {
                source_name: self.to_string(),
                source,
            }),
            Self::Url(url) => {
                let response = ureq::get(url).call().map_err(|err| TableError::Fetch {
                    source_name: self.to_string(),
                    message: err.to_string(),
                })?;
                response.into_string().map_err(|source| TableError::Read {
                    source_name: self.to_string(),
                    source,
                })
            }
        }
    }

    /// Read and decode a JSON array of records.
    pub fn load_records<T: DeserializeOwned>(&self) -> Result<Vec<T>, TableError> {
        let raw = self.read_raw()?;
        serde_json::from_str(&raw).map_err(|source| TableError::Parse {
            source_name: self.to_string(),
            source,
        })
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// A single table that could not be loaded.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read '{source_name}': {source}")]
    Read {
        source_name: String,
        source: std::io::Error,
    },
    #[error("failed to fetch '{source_name}': {message}")]
    Fetch { source_name: String, message: String },
    #[error("failed to parse '{source_name}': {source}")]
    Parse {
        source_name: String,
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_distinguishes_urls_from_paths() {
        assert_eq!(
            DataSource::parse("HTTPS://example.com/ultras.json"),
            DataSource::Url("HTTPS://example.com/ultras.json".to_string())
        );
        assert_eq!(
            DataSource::parse(" data/dungeons.json "),
            DataSource::File(PathBuf::from("data/dungeons.json"))
        );
    }
}
