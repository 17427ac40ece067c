pub mod data_registry;
pub mod dungeon;
pub mod loader;
pub mod record;
pub mod source;
pub mod ultra;
pub mod validate;

pub use data_registry::DataRegistry;
pub use dungeon::DungeonRecord;
pub use loader::{DataPaths, LoadError};
pub use record::{Keyed, RecordId};
pub use source::{DataSource, TableError};
pub use ultra::UltraRecord;
