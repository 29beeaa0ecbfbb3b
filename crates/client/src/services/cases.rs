use serde_json::Value;

use adala_cases::{
    CalendarEvent, CaseDocument, CasePayload, CaseSession, CaseSessionPayload, EventPayload,
    LegalCase,
};
use adala_core::RecordId;

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::resource::ResourceService;

type Cases = ResourceService<LegalCase>;

/// `/cases` plus hearings, attachments and statistics.
#[derive(Clone)]
pub struct CaseService {
    records: Cases,
}

impl CaseService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &Cases {
        &self.records
    }

    pub async fn create(&self, payload: &CasePayload) -> ClientResult<LegalCase> {
        payload.validate()?;
        self.records.create(payload).await
    }

    pub async fn update(&self, id: &RecordId, payload: &CasePayload) -> ClientResult<LegalCase> {
        payload.validate()?;
        self.records.update(id, payload).await
    }

    pub async fn sessions(&self, case_id: &RecordId) -> ClientResult<Vec<CaseSession>> {
        self.records
            .api()
            .get_rows(&Cases::sub_path(case_id, "sessions"), Vec::new(), "sessions")
            .await
    }

    pub async fn add_session(
        &self,
        case_id: &RecordId,
        payload: &CaseSessionPayload,
    ) -> ClientResult<CaseSession> {
        payload.validate()?;
        self.records
            .api()
            .post(&Cases::sub_path(case_id, "sessions"), payload)
            .await
    }

    pub async fn update_session(
        &self,
        case_id: &RecordId,
        session_id: &RecordId,
        payload: &CaseSessionPayload,
    ) -> ClientResult<CaseSession> {
        payload.validate()?;
        let path = Cases::sub_path(case_id, &format!("sessions/{session_id}"));
        self.records.api().put(&path, payload).await
    }

    pub async fn delete_session(&self, case_id: &RecordId, session_id: &RecordId) -> ClientResult<()> {
        let path = Cases::sub_path(case_id, &format!("sessions/{session_id}"));
        self.records.api().delete(&path).await
    }

    pub async fn documents(&self, case_id: &RecordId) -> ClientResult<Vec<CaseDocument>> {
        self.records
            .api()
            .get_rows(&Cases::sub_path(case_id, "documents"), Vec::new(), "documents")
            .await
    }

    pub async fn download_document(
        &self,
        case_id: &RecordId,
        document_id: &RecordId,
    ) -> ClientResult<Vec<u8>> {
        let path = Cases::sub_path(case_id, &format!("documents/{document_id}/download"));
        self.records.api().get_bytes(&path).await
    }

    pub async fn delete_document(&self, case_id: &RecordId, document_id: &RecordId) -> ClientResult<()> {
        let path = Cases::sub_path(case_id, &format!("documents/{document_id}"));
        self.records.api().delete(&path).await
    }

    /// Dashboard counters; the backend decides the shape.
    pub async fn statistics(&self) -> ClientResult<Value> {
        self.records.api().get("/cases/statistics").await
    }
}

/// `/calendar/events`.
#[derive(Clone)]
pub struct CalendarService {
    records: ResourceService<CalendarEvent>,
}

impl CalendarService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &ResourceService<CalendarEvent> {
        &self.records
    }

    pub async fn create(&self, payload: &EventPayload) -> ClientResult<CalendarEvent> {
        payload.validate()?;
        self.records.create(payload).await
    }

    pub async fn update(&self, id: &RecordId, payload: &EventPayload) -> ClientResult<CalendarEvent> {
        payload.validate()?;
        self.records.update(id, payload).await
    }
}
