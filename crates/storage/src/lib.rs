pub mod db;
pub mod error;
pub mod migrations;
pub mod repository;
pub mod state;
pub mod store;

pub use error::{Result, StorageError};
pub use state::AppState;
pub use store::SnapshotStore;
