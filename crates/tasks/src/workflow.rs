//! Task templates and the stage workflows tasks move through.

use serde::{Deserialize, Serialize};

use adala_core::wire::opt_decimal;
use adala_core::{FieldErrors, RecordId};

use crate::task::{TaskPriority, TaskStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplateStep {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub estimated_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTemplate {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<RecordId>,
    pub priority: TaskPriority,
    #[serde(default, deserialize_with = "opt_decimal")]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub steps: Vec<TaskTemplateStep>,
}

impl TaskTemplate {
    /// Steps in their declared order.
    pub fn ordered_steps(&self) -> Vec<&TaskTemplateStep> {
        let mut steps: Vec<_> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.order);
        steps
    }

    /// The template's own estimate, else the sum of its steps.
    pub fn total_estimate(&self) -> Option<f64> {
        self.estimated_hours.or_else(|| {
            let hours: Vec<f64> = self.steps.iter().filter_map(|s| s.estimated_hours).collect();
            (!hours.is_empty()).then(|| hours.iter().sum())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStage {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub color: Option<String>,
    pub task_status: TaskStatus,
    #[serde(default)]
    pub allowed_next_stages: Vec<RecordId>,
    #[serde(default)]
    pub allowed_previous_stages: Vec<RecordId>,
    #[serde(default)]
    pub is_initial: bool,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub requires_approval: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWorkflow {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stages: Vec<WorkflowStage>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}

impl TaskWorkflow {
    pub fn stage(&self, id: &RecordId) -> Option<&WorkflowStage> {
        self.stages.iter().find(|s| &s.id == id)
    }

    pub fn initial_stage(&self) -> Option<&WorkflowStage> {
        self.stages
            .iter()
            .find(|s| s.is_initial)
            .or_else(|| self.stages.iter().min_by_key(|s| s.order))
    }

    /// Whether a task sitting in `from` may move to `to`, going either
    /// forward through `allowedNextStages` or back through
    /// `allowedPreviousStages`.
    pub fn can_move(&self, from: &RecordId, to: &RecordId) -> bool {
        match self.stage(from) {
            Some(stage) if self.stage(to).is_some() => {
                stage.allowed_next_stages.contains(to) || stage.allowed_previous_stages.contains(to)
            }
            _ => false,
        }
    }
}

/// Body of `POST /tasks/:id/workflow/move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageMove {
    pub stage_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl StageMove {
    pub fn new(stage_id: RecordId, comment: Option<String>) -> Self {
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Self { stage_id, comment }
    }

    /// Checks the move against `workflow` when the current stage is known.
    pub fn validate_in(&self, workflow: &TaskWorkflow, from: Option<&RecordId>) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        match from {
            _ if workflow.stage(&self.stage_id).is_none() => {
                errors.push("stageId", "not a stage of this workflow");
            }
            Some(current) if !workflow.can_move(current, &self.stage_id) => {
                errors.push("stageId", "this move is not allowed from the current stage");
            }
            _ => {}
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(raw: &str) -> RecordId {
        RecordId::new(raw).unwrap()
    }

    fn workflow() -> TaskWorkflow {
        serde_json::from_value(json!({
            "id": "wf1",
            "name": "دورة القضية",
            "stages": [
                { "id": "s2", "name": "مراجعة", "order": 2, "taskStatus": "review",
                  "allowedNextStages": ["s3"], "allowedPreviousStages": ["s1"] },
                { "id": "s1", "name": "إعداد", "order": 1, "taskStatus": "in_progress",
                  "allowedNextStages": ["s2"] },
                { "id": "s3", "name": "منجزة", "order": 3, "taskStatus": "completed", "isFinal": true }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn moves_follow_allowed_stages() {
        let wf = workflow();
        assert!(wf.is_active);
        assert_eq!(wf.initial_stage().map(|s| s.id.as_str()), Some("s1"));
        assert!(wf.can_move(&id("s1"), &id("s2")));
        assert!(wf.can_move(&id("s2"), &id("s1")));
        assert!(!wf.can_move(&id("s1"), &id("s3")));
        assert!(!wf.can_move(&id("s3"), &id("s2")));
    }

    #[test]
    fn stage_move_is_checked_against_the_workflow() {
        let wf = workflow();
        let skip = StageMove::new(id("s3"), Some("  ".into()));
        assert_eq!(skip.comment, None);
        assert!(skip.validate_in(&wf, Some(&id("s1"))).is_err());
        assert!(skip.validate_in(&wf, None).is_ok());
        assert!(StageMove::new(id("s9"), None).validate_in(&wf, None).is_err());
        assert!(StageMove::new(id("s2"), None).validate_in(&wf, Some(&id("s1"))).is_ok());
    }

    #[test]
    fn template_estimate_falls_back_to_steps() {
        let template: TaskTemplate = serde_json::from_value(json!({
            "id": "tp1",
            "name": "رفع دعوى",
            "priority": "high",
            "steps": [
                { "id": "a", "title": "تقديم", "order": 2, "estimatedHours": 1.5 },
                { "id": "b", "title": "صياغة", "order": 1, "estimatedHours": "3" }
            ]
        }))
        .unwrap();
        assert_eq!(template.total_estimate(), Some(4.5));
        let titles: Vec<_> = template.ordered_steps().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["صياغة", "تقديم"]);
    }
}
