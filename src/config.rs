//! Runtime configuration: where the two tables live and where the server binds.
//! Values come from CLI flags, falling back to ULTRADROP_* environment variables, then defaults.

use crate::data::loader::DataPaths;
use crate::data::source::DataSource;

pub const DUNGEONS_ENV: &str = "ULTRADROP_DUNGEONS";
pub const ULTRAS_ENV: &str = "ULTRADROP_ULTRAS";
pub const BIND_ENV: &str = "ULTRADROP_BIND";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data: DataPaths,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn new(dungeons: &str, ultras: &str, bind_addr: &str) -> Self {
        Self {
            data: DataPaths {
                dungeons: DataSource::parse(dungeons),
                ultras: DataSource::parse(ultras),
            },
            bind_addr: bind_addr.to_string(),
        }
    }
}
