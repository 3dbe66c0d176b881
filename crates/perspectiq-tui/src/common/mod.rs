pub mod task;
pub mod text;

pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskState, Tasks};
pub use text::{sanitize_for_display, single_line, truncate_with_ellipsis, wrap_text};
