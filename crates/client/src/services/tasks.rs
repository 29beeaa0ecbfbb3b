use serde_json::json;
use tracing::info;

use adala_core::{Page, RecordId, Resource};
use adala_tasks::{
    CommentPayload, StageMove, StatisticsQuery, Task, TaskAssignment, TaskComment, TaskPayload,
    TaskQuery, TaskStatistics, TaskStatus, TaskTemplate, TaskWorkflow,
};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::resource::ResourceService;

type Tasks = ResourceService<Task>;

/// `/tasks` with status changes, assignment, comments, templates and
/// workflow stages.
#[derive(Clone)]
pub struct TaskService {
    records: Tasks,
}

impl TaskService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &Tasks {
        &self.records
    }

    pub async fn create(&self, payload: &TaskPayload) -> ClientResult<Task> {
        payload.validate()?;
        self.records.create(payload).await
    }

    pub async fn update(&self, id: &RecordId, payload: &TaskPayload) -> ClientResult<Task> {
        payload.validate()?;
        self.records.update(id, payload).await
    }

    /// `GET /tasks/search` with every filter of `query`.
    pub async fn search(&self, query: &TaskQuery) -> ClientResult<Page<Task>> {
        let body = self
            .records
            .api()
            .get_value("/tasks/search", query.query_pairs())
            .await?;
        Ok(Page::from_envelope(body, Task::COLLECTION_KEY)?)
    }

    /// `PATCH /tasks/:id/status`.
    pub async fn change_status(&self, id: &RecordId, status: TaskStatus) -> ClientResult<Task> {
        if status == TaskStatus::Unknown {
            return Err(ClientError::InvalidState("cannot set an unknown status".into()));
        }
        let updated: Task = self
            .records
            .api()
            .patch(&Tasks::sub_path(id, "status"), &json!({ "status": status }))
            .await?;
        info!(id = %id, status = %updated.status, "task status changed");
        Ok(updated)
    }

    pub async fn assign(&self, assignment: &TaskAssignment) -> ClientResult<Task> {
        let path = Tasks::sub_path(&assignment.task_id, "assign");
        let assigned: Task = self.records.api().post(&path, assignment).await?;
        info!(id = %assignment.task_id, assignee = %assignment.assigned_to, "task assigned");
        Ok(assigned)
    }

    pub async fn comments(&self, id: &RecordId) -> ClientResult<Vec<TaskComment>> {
        self.records
            .api()
            .get_rows(&Tasks::sub_path(id, "comments"), Vec::new(), "comments")
            .await
    }

    pub async fn add_comment(&self, id: &RecordId, comment: &CommentPayload) -> ClientResult<TaskComment> {
        comment.validate()?;
        self.records
            .api()
            .post(&Tasks::sub_path(id, "comments"), comment)
            .await
    }

    pub async fn statistics(&self, query: &StatisticsQuery) -> ClientResult<TaskStatistics> {
        self.records
            .api()
            .get_with_query("/tasks/statistics", query.query_pairs())
            .await
    }

    pub async fn templates(&self) -> ClientResult<Vec<TaskTemplate>> {
        self.records
            .api()
            .get_rows("/tasks/templates", Vec::new(), "templates")
            .await
    }

    /// Creates a task from a template; `overrides` fills or replaces
    /// template fields.
    pub async fn create_from_template(
        &self,
        template_id: &RecordId,
        overrides: Option<&TaskPayload>,
    ) -> ClientResult<Task> {
        let path = format!("/tasks/templates/{template_id}/create");
        let created: Task = match overrides {
            Some(payload) => {
                payload.validate()?;
                self.records.api().post(&path, payload).await?
            }
            None => self.records.api().post(&path, &json!({})).await?,
        };
        info!(id = %created.id, template = %template_id, "task created from template");
        Ok(created)
    }

    pub async fn workflows(&self) -> ClientResult<Vec<TaskWorkflow>> {
        self.records
            .api()
            .get_rows("/tasks/workflows", Vec::new(), "workflows")
            .await
    }

    /// `POST /tasks/:id/workflow/move`. When `workflow` is given the move
    /// is checked against its stage graph before anything is sent.
    pub async fn move_to_stage(
        &self,
        id: &RecordId,
        to: &StageMove,
        workflow: Option<(&TaskWorkflow, Option<&RecordId>)>,
    ) -> ClientResult<Task> {
        if let Some((workflow, current)) = workflow {
            to.validate_in(workflow, current)?;
        }
        let moved: Task = self
            .records
            .api()
            .post(&Tasks::sub_path(id, "workflow/move"), to)
            .await?;
        info!(id = %id, stage = %to.stage_id, "task moved");
        Ok(moved)
    }
}
