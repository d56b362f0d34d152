pub mod task;
pub mod user;

pub use task::{NewTask, StatusUpdate, Task, TaskInput, TaskPriority, TaskStatus};
pub use user::{NewUser, User};
