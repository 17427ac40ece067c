//! Joint table load: both tables are fetched in parallel and joined before either is used.
//! Any failure fails the whole load; there is no partial registry.

use std::time::Instant;

use thiserror::Error;

use crate::data::dungeon::DungeonRecord;
use crate::data::source::{DataSource, TableError};
use crate::data::ultra::UltraRecord;

/// Locations of the two tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub dungeons: DataSource,
    pub ultras: DataSource,
}

/// Combined load failure. Lists every table that failed.
#[derive(Debug, Error)]
#[error("failed to load game data: {}", describe(.failures))]
pub struct LoadError {
    pub failures: Vec<TableError>,
}

fn describe(failures: &[TableError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct LoadedTables {
    pub dungeons: Vec<DungeonRecord>,
    pub ultras: Vec<UltraRecord>,
}

pub fn load_tables(paths: &DataPaths) -> Result<LoadedTables, LoadError> {
    let started = Instant::now();
    let (dungeons, ultras) = rayon::join(
        || paths.dungeons.load_records::<DungeonRecord>(),
        || paths.ultras.load_records::<UltraRecord>(),
    );

    match (dungeons, ultras) {
        (Ok(dungeons), Ok(ultras)) => {
            log::info!(
                "loaded {} dungeons from {} and {} ultras from {} in {:?}",
                dungeons.len(),
                paths.dungeons,
                ultras.len(),
                paths.ultras,
                started.elapsed()
            );
            Ok(LoadedTables { dungeons, ultras })
        }
        (dungeons, ultras) => {
            let failures: Vec<TableError> = [dungeons.err(), ultras.err()]
                .into_iter()
                .flatten()
                .collect();
            for failure in &failures {
                log::error!("{failure}");
            }
            Err(LoadError { failures })
        }
    }
}
