//! Practice tasks under `/tasks`: the task record, comments and
//! assignment, statistics, templates and workflows.

pub mod comment;
pub mod statistics;
pub mod task;
pub mod workflow;

pub use comment::{CommentPayload, TaskAssignment, TaskComment};
pub use statistics::{DayCount, NamedCount, StatisticsQuery, TaskStatistics};
pub use task::{Task, TaskPayload, TaskPriority, TaskQuery, TaskStatus};
pub use workflow::{StageMove, TaskTemplate, TaskTemplateStep, TaskWorkflow, WorkflowStage};
