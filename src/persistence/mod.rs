pub mod document;
pub mod files;

pub use document::{load_document, save_document, StoreDocument};
pub use files::{ensure_dir, init_local_data_dir, log_dir_for, resolve_data_file};
