use chrono::Utc;
use serde_json::json;
use tracing::info;

use adala_consultations::{
    CancelRequest, CompleteRequest, Consultation, ConsultationNote, ConsultationPayload,
    ConsultationStatus, NotePayload, RescheduleRequest, StatusRequest,
};
use adala_core::RecordId;

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::resource::ResourceService;

type Consultations = ResourceService<Consultation>;

/// `/consultations` with lifecycle actions and notes.
///
/// Lifecycle actions check the row's current status first, so an action the
/// screen would not offer is refused without a request.
#[derive(Clone)]
pub struct ConsultationService {
    records: Consultations,
}

impl ConsultationService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &Consultations {
        &self.records
    }

    pub async fn create(&self, payload: &ConsultationPayload) -> ClientResult<Consultation> {
        payload.validate()?;
        self.records.create(payload).await
    }

    pub async fn update(
        &self,
        id: &RecordId,
        payload: &ConsultationPayload,
    ) -> ClientResult<Consultation> {
        payload.validate()?;
        self.records.update(id, payload).await
    }

    /// `PATCH /consultations/:id/status`.
    pub async fn change_status(
        &self,
        id: &RecordId,
        status: ConsultationStatus,
    ) -> ClientResult<Consultation> {
        if status == ConsultationStatus::Unknown {
            return Err(ClientError::InvalidState("cannot set an unknown status".into()));
        }
        let path = Consultations::sub_path(id, "status");
        self.records.api().patch(&path, &StatusRequest { status }).await
    }

    pub async fn start(&self, consultation: &Consultation) -> ClientResult<Consultation> {
        allowed(consultation, "start", consultation.status.can_start())?;
        self.action(&consultation.id, "start", &json!({})).await
    }

    pub async fn complete(
        &self,
        consultation: &Consultation,
        request: &CompleteRequest,
    ) -> ClientResult<Consultation> {
        allowed(consultation, "complete", consultation.status.can_complete())?;
        self.action(&consultation.id, "complete", request).await
    }

    pub async fn cancel(
        &self,
        consultation: &Consultation,
        request: &CancelRequest,
    ) -> ClientResult<Consultation> {
        allowed(consultation, "cancel", consultation.status.can_cancel())?;
        self.action(&consultation.id, "cancel", request).await
    }

    pub async fn reschedule(
        &self,
        consultation: &Consultation,
        request: &RescheduleRequest,
    ) -> ClientResult<Consultation> {
        allowed(consultation, "reschedule", consultation.status.can_reschedule())?;
        request.validate(Utc::now())?;
        self.action(&consultation.id, "reschedule", request).await
    }

    pub async fn notes(&self, id: &RecordId) -> ClientResult<Vec<ConsultationNote>> {
        self.records
            .api()
            .get_rows(&Consultations::sub_path(id, "notes"), Vec::new(), "notes")
            .await
    }

    pub async fn add_note(&self, id: &RecordId, note: &NotePayload) -> ClientResult<ConsultationNote> {
        note.validate()?;
        self.records
            .api()
            .post(&Consultations::sub_path(id, "notes"), note)
            .await
    }

    pub async fn update_note(
        &self,
        id: &RecordId,
        note_id: &RecordId,
        note: &NotePayload,
    ) -> ClientResult<ConsultationNote> {
        note.validate()?;
        let path = Consultations::sub_path(id, &format!("notes/{note_id}"));
        self.records.api().put(&path, note).await
    }

    pub async fn delete_note(&self, id: &RecordId, note_id: &RecordId) -> ClientResult<()> {
        let path = Consultations::sub_path(id, &format!("notes/{note_id}"));
        self.records.api().delete(&path).await
    }

    async fn action<B: serde::Serialize + ?Sized>(
        &self,
        id: &RecordId,
        action: &str,
        body: &B,
    ) -> ClientResult<Consultation> {
        let updated: Consultation = self
            .records
            .api()
            .post(&Consultations::sub_path(id, action), body)
            .await?;
        info!(id = %id, action, status = %updated.status, "consultation updated");
        Ok(updated)
    }
}

fn allowed(consultation: &Consultation, action: &str, ok: bool) -> ClientResult<()> {
    if ok {
        Ok(())
    } else {
        Err(ClientError::InvalidState(format!(
            "cannot {action} a consultation that is {}",
            consultation.status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use serde_json::Value;

    fn row(status: &str) -> Value {
        json!({
            "id": "k1",
            "title": "استشارة عقارية",
            "status": status,
            "scheduledDate": "2030-01-10T10:00:00Z"
        })
    }

    fn consultation(status: &str) -> Consultation {
        serde_json::from_value(row(status)).unwrap()
    }

    #[tokio::test]
    async fn start_posts_empty_body() {
        let transport = RecordingTransport::new();
        transport.push_json(200, row("in_progress"));
        let service = ConsultationService::new(ApiClient::new(transport.clone()));

        let started = service.start(&consultation("scheduled")).await.unwrap();
        assert_eq!(started.status, ConsultationStatus::InProgress);

        let sent = &transport.requests()[0];
        assert_eq!(transport.calls(), ["POST /consultations/k1/start"]);
        assert_eq!(sent.body, Some(json!({})));
    }

    #[tokio::test]
    async fn disallowed_transitions_send_nothing() {
        let transport = RecordingTransport::new();
        let service = ConsultationService::new(ApiClient::new(transport.clone()));

        let done = consultation("completed");
        assert!(matches!(
            service.cancel(&done, &CancelRequest::default()).await,
            Err(ClientError::InvalidState(_))
        ));
        assert!(matches!(
            service.complete(&consultation("scheduled"), &CompleteRequest::default()).await,
            Err(ClientError::InvalidState(_))
        ));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn status_change_uses_patch() {
        let transport = RecordingTransport::new();
        transport.push_json(200, row("no_show"));
        let service = ConsultationService::new(ApiClient::new(transport.clone()));
        service
            .change_status(&RecordId::new("k1").unwrap(), ConsultationStatus::NoShow)
            .await
            .unwrap();
        assert_eq!(transport.calls(), ["PATCH /consultations/k1/status"]);
        assert_eq!(transport.requests()[0].body, Some(json!({ "status": "no_show" })));
    }
}
