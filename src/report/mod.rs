pub mod generator;

pub use generator::{render_task_table, write_report};
