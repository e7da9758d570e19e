pub mod snapshot;
pub mod store;
pub use snapshot::Snapshot;
pub use store::{MoveDirection, WindowRecord, WindowStore};
