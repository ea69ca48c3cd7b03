pub mod contact;
pub mod field_update;
pub mod filter;
pub mod grouped;
pub mod patch;
pub mod summary;
pub mod task;

pub use contact::Contact;
pub use field_update::FieldUpdate;
pub use filter::{BoardFilter, StatusFilter};
pub use grouped::GroupedTasks;
pub use patch::TaskPatch;
pub use summary::BoardSummary;
pub use task::{Subtask, Task, TaskDraft, TaskId, TaskPriority, TaskStatus};
