//! Startup-loaded data registry.
//! Load once, then pass (via Arc where shared) into every calculation. Never mutated after load.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::data::dungeon::DungeonRecord;
use crate::data::loader::{load_tables, DataPaths, LoadError};
use crate::data::record::resolve_key;
use crate::data::ultra::UltraRecord;

/// Read-only dungeon and ultra tables.
#[derive(Debug)]
pub struct DataRegistry {
    dungeons: Vec<DungeonRecord>,
    ultras: Vec<UltraRecord>,
    sources: Option<DataPaths>,
    loaded_at: DateTime<Utc>,
}

impl DataRegistry {
    /// Load both tables jointly. Returns an Arc so it can be shared across handlers and threads.
    pub fn load(paths: &DataPaths) -> Result<Arc<DataRegistry>, LoadError> {
        let tables = load_tables(paths)?;
        Ok(Arc::new(DataRegistry {
            dungeons: tables.dungeons,
            ultras: tables.ultras,
            sources: Some(paths.clone()),
            loaded_at: Utc::now(),
        }))
    }

    /// Build a registry from in-memory tables (fixtures, embedding).
    pub fn from_tables(dungeons: Vec<DungeonRecord>, ultras: Vec<UltraRecord>) -> Self {
        DataRegistry {
            dungeons,
            ultras,
            sources: None,
            loaded_at: Utc::now(),
        }
    }

    /// Dungeons in table order.
    pub fn dungeons(&self) -> &[DungeonRecord] {
        &self.dungeons
    }

    /// Ultras in table order.
    pub fn ultras(&self) -> &[UltraRecord] {
        &self.ultras
    }

    pub fn sources(&self) -> Option<&DataPaths> {
        self.sources.as_ref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn resolve_dungeon(&self, key: &str) -> Option<&DungeonRecord> {
        resolve_key(&self.dungeons, key)
    }

    pub fn resolve_ultra(&self, key: &str) -> Option<&UltraRecord> {
        resolve_key(&self.ultras, key)
    }
}
