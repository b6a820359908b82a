pub mod error;
pub mod task_store;

pub use error::{StoreError, StoreResult};
pub use task_store::TaskStore;
