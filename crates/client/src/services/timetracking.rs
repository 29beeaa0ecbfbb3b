use adala_core::RecordId;
use adala_timetracking::{SummaryQuery, TimeEntry, TimeEntryPayload, TimeSummary};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::resource::ResourceService;

const SUMMARY_PATH: &str = "/timetracking/time-entries-summary";

/// `/timetracking/time-entries` and the per-user summary.
#[derive(Clone)]
pub struct TimeEntryService {
    records: ResourceService<TimeEntry>,
}

impl TimeEntryService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &ResourceService<TimeEntry> {
        &self.records
    }

    pub async fn create(&self, payload: &TimeEntryPayload) -> ClientResult<TimeEntry> {
        payload.validate()?;
        self.records.create(payload).await
    }

    pub async fn update(&self, id: &RecordId, payload: &TimeEntryPayload) -> ClientResult<TimeEntry> {
        payload.validate()?;
        self.records.update(id, payload).await
    }

    pub async fn summary(&self, query: &SummaryQuery) -> ClientResult<Vec<TimeSummary>> {
        self.records
            .api()
            .get_rows(SUMMARY_PATH, query.query_pairs(), "summary")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use serde_json::json;

    #[tokio::test]
    async fn summary_passes_filters() {
        let transport = RecordingTransport::new();
        transport.push_json(
            200,
            json!([{ "_id": "u1", "user_name": "سلمى", "total_hours": "12.5" }]),
        );
        let service = TimeEntryService::new(ApiClient::new(transport.clone()));

        let query = SummaryQuery {
            user_id: Some("u1".into()),
            ..Default::default()
        };
        let rows = service.summary(&query).await.unwrap();
        assert_eq!(rows[0].total_hours, Some(12.5));

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, SUMMARY_PATH);
        assert_eq!(sent.query, [("userId".to_string(), "u1".to_string())]);
    }
}
