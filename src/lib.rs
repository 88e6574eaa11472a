// Tue Mar 10 2026 - Alex

pub mod config;
pub mod dump;
pub mod importer;
pub mod logging;
pub mod registry;
pub mod snapshot;

pub use config::ImportConfig;
pub use dump::TypeDump;
pub use importer::{ImportError, ImportStats, Importer};
pub use registry::{InMemoryRegistry, TypeHandle, TypeRegistry};
pub use snapshot::SnapshotStore;
