use serde_json::Value;

use adala_cases::LegalCase;
use adala_clients::{Client, ClientPayload};
use adala_consultations::Consultation;
use adala_contracts::Contract;
use adala_core::RecordId;
use adala_documents::Document;

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::resource::ResourceService;

type Clients = ResourceService<Client>;

/// `/clients` and the records hanging off one client.
#[derive(Clone)]
pub struct ClientService {
    records: Clients,
}

impl ClientService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &Clients {
        &self.records
    }

    pub async fn create(&self, payload: &ClientPayload) -> ClientResult<Client> {
        payload.validate()?;
        self.records.create(payload).await
    }

    pub async fn update(&self, id: &RecordId, payload: &ClientPayload) -> ClientResult<Client> {
        payload.validate()?;
        self.records.update(id, payload).await
    }

    pub async fn cases(&self, id: &RecordId) -> ClientResult<Vec<LegalCase>> {
        self.rows(id, "cases").await
    }

    pub async fn contracts(&self, id: &RecordId) -> ClientResult<Vec<Contract>> {
        self.rows(id, "contracts").await
    }

    pub async fn documents(&self, id: &RecordId) -> ClientResult<Vec<Document>> {
        self.rows(id, "documents").await
    }

    pub async fn consultations(&self, id: &RecordId) -> ClientResult<Vec<Consultation>> {
        self.rows(id, "consultations").await
    }

    pub async fn statistics(&self) -> ClientResult<Value> {
        self.records.api().get("/clients/statistics").await
    }

    async fn rows<T: serde::de::DeserializeOwned>(
        &self,
        id: &RecordId,
        what: &str,
    ) -> ClientResult<Vec<T>> {
        self.records
            .api()
            .get_rows(&Clients::sub_path(id, what), Vec::new(), what)
            .await
    }
}
