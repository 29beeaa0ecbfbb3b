use serde::Serialize;

use adala_contracts::{
    Contract, ContractPayload, ContractPayment, ContractTemplate, ContractVersion, PaymentPayload,
};
use adala_core::RecordId;

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::resource::ResourceService;

type Contracts = ResourceService<Contract>;

const TEMPLATES_PATH: &str = "/contracts/templates";

/// `/contracts` with payments, templates, versions and the PDF rendering.
#[derive(Clone)]
pub struct ContractService {
    records: Contracts,
}

impl ContractService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &Contracts {
        &self.records
    }

    pub async fn create(&self, payload: &ContractPayload) -> ClientResult<Contract> {
        payload.validate()?;
        self.records.create(payload).await
    }

    pub async fn update(&self, id: &RecordId, payload: &ContractPayload) -> ClientResult<Contract> {
        payload.validate()?;
        self.records.update(id, payload).await
    }

    pub async fn payments(&self, id: &RecordId) -> ClientResult<Vec<ContractPayment>> {
        self.records
            .api()
            .get_rows(&Contracts::sub_path(id, "payments"), Vec::new(), "payments")
            .await
    }

    pub async fn add_payment(
        &self,
        id: &RecordId,
        payload: &PaymentPayload,
    ) -> ClientResult<ContractPayment> {
        payload.validate()?;
        self.records
            .api()
            .post(&Contracts::sub_path(id, "payments"), payload)
            .await
    }

    pub async fn update_payment(
        &self,
        id: &RecordId,
        payment_id: &RecordId,
        payload: &PaymentPayload,
    ) -> ClientResult<ContractPayment> {
        payload.validate()?;
        let path = Contracts::sub_path(id, &format!("payments/{payment_id}"));
        self.records.api().put(&path, payload).await
    }

    pub async fn delete_payment(&self, id: &RecordId, payment_id: &RecordId) -> ClientResult<()> {
        let path = Contracts::sub_path(id, &format!("payments/{payment_id}"));
        self.records.api().delete(&path).await
    }

    pub async fn versions(&self, id: &RecordId) -> ClientResult<Vec<ContractVersion>> {
        self.records
            .api()
            .get_rows(&Contracts::sub_path(id, "versions"), Vec::new(), "versions")
            .await
    }

    pub async fn version(&self, id: &RecordId, version_id: &RecordId) -> ClientResult<ContractVersion> {
        let path = Contracts::sub_path(id, &format!("versions/{version_id}"));
        self.records.api().get(&path).await
    }

    /// `GET /contracts/:id/pdf` as raw bytes.
    pub async fn pdf(&self, id: &RecordId) -> ClientResult<Vec<u8>> {
        self.records.api().get_bytes(&Contracts::sub_path(id, "pdf")).await
    }

    pub async fn templates(&self) -> ClientResult<Vec<ContractTemplate>> {
        self.records
            .api()
            .get_rows(TEMPLATES_PATH, Vec::new(), "templates")
            .await
    }

    pub async fn create_template<P: Serialize + ?Sized>(
        &self,
        template: &P,
    ) -> ClientResult<ContractTemplate> {
        self.records.api().post(TEMPLATES_PATH, template).await
    }

    pub async fn update_template<P: Serialize + ?Sized>(
        &self,
        template_id: &RecordId,
        template: &P,
    ) -> ClientResult<ContractTemplate> {
        let path = format!("{TEMPLATES_PATH}/{template_id}");
        self.records.api().put(&path, template).await
    }

    pub async fn delete_template(&self, template_id: &RecordId) -> ClientResult<()> {
        self.records
            .api()
            .delete(&format!("{TEMPLATES_PATH}/{template_id}"))
            .await
    }

    /// `POST /contracts/from-template/:templateId`.
    pub async fn create_from_template(
        &self,
        template_id: &RecordId,
        payload: &ContractPayload,
    ) -> ClientResult<Contract> {
        payload.validate()?;
        let path = format!("/contracts/from-template/{template_id}");
        self.records.api().post(&path, payload).await
    }
}
