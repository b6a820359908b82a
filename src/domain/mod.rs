pub mod chart;
pub mod enums;
pub mod task;
pub mod timer;

pub use chart::{ChartBar, ChartSnapshot};
pub use enums::{ConfirmAction, FormField, MessageKind, UiMode};
pub use task::{clamp_progress, format_seconds, DateParts, Task, TaskDraft, DEFAULT_CATEGORY};
pub use timer::SessionTimer;
