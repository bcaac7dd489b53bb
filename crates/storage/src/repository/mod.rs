pub mod snapshot;

pub use snapshot::{SnapshotKey, SnapshotRepository};
