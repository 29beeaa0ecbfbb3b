use serde_json::json;
use tracing::info;

use adala_core::RecordId;
use adala_hr::{
    Employee, EmployeePayload, Leave, LeavePayload, LeaveRejection, LeaveStatus,
    DEFAULT_ENDING_SOON_DAYS,
};

use crate::api::{path_segment, ApiClient};
use crate::error::{ClientError, ClientResult};
use crate::resource::ResourceService;

type Leaves = ResourceService<Leave>;

/// `/hr/employees`.
#[derive(Clone)]
pub struct EmployeeService {
    records: ResourceService<Employee>,
}

impl EmployeeService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &ResourceService<Employee> {
        &self.records
    }

    pub async fn create(&self, payload: &EmployeePayload) -> ClientResult<Employee> {
        payload.validate()?;
        self.records.create(payload).await
    }

    pub async fn update(&self, id: &RecordId, payload: &EmployeePayload) -> ClientResult<Employee> {
        payload.validate()?;
        self.records.update(id, payload).await
    }

    pub async fn by_department(&self, department: &str) -> ClientResult<Vec<Employee>> {
        let path = format!("/hr/employees/department/{}", path_segment(department)?);
        self.records
            .api()
            .get_rows(&path, Vec::new(), "employees")
            .await
    }

    pub async fn by_manager(&self, manager_id: &RecordId) -> ClientResult<Vec<Employee>> {
        let path = format!("/hr/employees/manager/{manager_id}");
        self.records
            .api()
            .get_rows(&path, Vec::new(), "employees")
            .await
    }

    /// Contracts ending within `days` (30 when `None`).
    pub async fn contracts_ending_soon(&self, days: Option<u32>) -> ClientResult<Vec<Employee>> {
        let days = days.unwrap_or(DEFAULT_ENDING_SOON_DAYS);
        self.records
            .api()
            .get_rows(
                "/hr/employees/contracts-ending-soon",
                vec![("days".to_string(), days.to_string())],
                "employees",
            )
            .await
    }
}

/// `/hr/leaves` with the approve/reject decision.
///
/// Only pending requests are decided; anything else is refused without a
/// request.
#[derive(Clone)]
pub struct LeaveService {
    records: Leaves,
}

impl LeaveService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &Leaves {
        &self.records
    }

    pub async fn create(&self, payload: &LeavePayload) -> ClientResult<Leave> {
        payload.validate()?;
        self.records.create(payload).await
    }

    pub async fn update(&self, id: &RecordId, payload: &LeavePayload) -> ClientResult<Leave> {
        payload.validate()?;
        self.records.update(id, payload).await
    }

    pub async fn by_employee(&self, employee_id: &RecordId) -> ClientResult<Vec<Leave>> {
        let path = format!("/hr/leaves/employee/{employee_id}");
        self.records.api().get_rows(&path, Vec::new(), "leaves").await
    }

    pub async fn by_status(&self, status: LeaveStatus) -> ClientResult<Vec<Leave>> {
        if status == LeaveStatus::Unknown {
            return Err(ClientError::InvalidState("cannot filter by an unknown status".into()));
        }
        let path = format!("/hr/leaves/status/{}", status.as_str());
        self.records.api().get_rows(&path, Vec::new(), "leaves").await
    }

    /// Approved leaves that are running now or start later.
    pub async fn current_and_upcoming(&self) -> ClientResult<Vec<Leave>> {
        self.records
            .api()
            .get_rows("/hr/leaves/current-and-upcoming", Vec::new(), "leaves")
            .await
    }

    pub async fn approve(&self, leave: &Leave) -> ClientResult<Leave> {
        pending(leave, "approve")?;
        self.decide(&leave.id, "approve", &json!({})).await
    }

    pub async fn reject(&self, leave: &Leave, rejection: &LeaveRejection) -> ClientResult<Leave> {
        pending(leave, "reject")?;
        rejection.validate()?;
        self.decide(&leave.id, "reject", rejection).await
    }

    async fn decide<B: serde::Serialize + ?Sized>(
        &self,
        id: &RecordId,
        decision: &str,
        body: &B,
    ) -> ClientResult<Leave> {
        let decided: Leave = self
            .records
            .api()
            .post(&Leaves::sub_path(id, decision), body)
            .await?;
        info!(id = %id, decision, status = %decided.status, "leave decided");
        Ok(decided)
    }
}

fn pending(leave: &Leave, decision: &str) -> ClientResult<()> {
    if leave.is_decidable() {
        Ok(())
    } else {
        Err(ClientError::InvalidState(format!(
            "cannot {decision} a leave request that is already {}",
            leave.status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use serde_json::json;

    #[tokio::test]
    async fn ending_soon_defaults_to_thirty_days() {
        let transport = RecordingTransport::new();
        transport.push_json(
            200,
            json!({ "data": [{ "_id": "65f0", "first_name": "ليلى", "last_name": "سعيد" }] }),
        );
        let hr = EmployeeService::new(ApiClient::new(transport.clone()));

        let employees = hr.contracts_ending_soon(None).await.unwrap();
        assert_eq!(employees[0].id.as_str(), "65f0");

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/hr/employees/contracts-ending-soon");
        assert_eq!(sent.query, [("days".to_string(), "30".to_string())]);
    }

    fn leave_row(status: &str) -> serde_json::Value {
        json!({
            "_id": "lv1",
            "employee_id": { "_id": "65f0", "first_name": "ليلى", "last_name": "سعيد" },
            "leave_type": "lt1",
            "start_date": "2024-03-10T00:00:00Z",
            "end_date": "2024-03-12T00:00:00Z",
            "days": 3,
            "status": status
        })
    }

    fn leave(status: &str) -> Leave {
        serde_json::from_value(leave_row(status)).unwrap()
    }

    #[tokio::test]
    async fn approve_posts_empty_body() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "message": "ok", "data": leave_row("approved") }));
        let leaves = LeaveService::new(ApiClient::new(transport.clone()));

        let approved = leaves.approve(&leave("pending")).await.unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(transport.calls(), ["POST /hr/leaves/lv1/approve"]);
        assert_eq!(transport.requests()[0].body, Some(json!({})));
    }

    #[tokio::test]
    async fn reject_sends_the_reason() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": leave_row("rejected") }));
        let leaves = LeaveService::new(ApiClient::new(transport.clone()));

        leaves
            .reject(&leave("pending"), &LeaveRejection::new("ضغط العمل"))
            .await
            .unwrap();
        assert_eq!(transport.calls(), ["POST /hr/leaves/lv1/reject"]);
        assert_eq!(transport.requests()[0].body, Some(json!({ "reason": "ضغط العمل" })));
    }

    #[tokio::test]
    async fn decided_or_unexplained_requests_send_nothing() {
        let transport = RecordingTransport::new();
        let leaves = LeaveService::new(ApiClient::new(transport.clone()));

        assert!(matches!(
            leaves.approve(&leave("approved")).await,
            Err(ClientError::InvalidState(_))
        ));
        assert!(matches!(
            leaves.reject(&leave("rejected"), &LeaveRejection::new("x")).await,
            Err(ClientError::InvalidState(_))
        ));
        assert!(matches!(
            leaves.reject(&leave("pending"), &LeaveRejection::new(" ")).await,
            Err(ClientError::Validation(_))
        ));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn filtered_lists_use_their_routes() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "data": [leave_row("pending")] }));
        transport.push_json(200, json!({ "data": [] }));
        let leaves = LeaveService::new(ApiClient::new(transport.clone()));

        let pending = leaves.by_status(LeaveStatus::Pending).await.unwrap();
        assert_eq!(pending[0].employee_id.label(), "ليلى سعيد");
        leaves.current_and_upcoming().await.unwrap();
        assert_eq!(
            transport.calls(),
            ["GET /hr/leaves/status/pending", "GET /hr/leaves/current-and-upcoming"]
        );
    }
}
