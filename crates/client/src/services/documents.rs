use chrono::Utc;
use serde_json::json;

use adala_core::validation::require_text;
use adala_core::{FieldErrors, RecordId};
use adala_documents::{
    Document, DocumentCategory, DocumentUpdate, DocumentVersion, ShareLink, ShareSettings,
};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::resource::ResourceService;

type Documents = ResourceService<Document>;

const CATEGORIES_PATH: &str = "/documents/categories";

/// `/documents` metadata, versions, downloads, sharing and categories.
#[derive(Clone)]
pub struct DocumentService {
    records: Documents,
}

impl DocumentService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            records: ResourceService::new(api),
        }
    }

    pub fn records(&self) -> &Documents {
        &self.records
    }

    /// Metadata only; uploads go through the web client.
    pub async fn update(&self, id: &RecordId, update: &DocumentUpdate) -> ClientResult<Document> {
        update.validate()?;
        self.records.update(id, update).await
    }

    pub async fn versions(&self, id: &RecordId) -> ClientResult<Vec<DocumentVersion>> {
        self.records
            .api()
            .get_rows(&Documents::sub_path(id, "versions"), Vec::new(), "versions")
            .await
    }

    pub async fn version(&self, id: &RecordId, version_id: &RecordId) -> ClientResult<DocumentVersion> {
        let path = Documents::sub_path(id, &format!("versions/{version_id}"));
        self.records.api().get(&path).await
    }

    pub async fn download(&self, id: &RecordId) -> ClientResult<Vec<u8>> {
        self.records
            .api()
            .get_bytes(&Documents::sub_path(id, "download"))
            .await
    }

    /// `POST /documents/:id/share`; the backend answers with the link.
    pub async fn share(&self, id: &RecordId, settings: &ShareSettings) -> ClientResult<ShareLink> {
        settings.validate(Utc::now())?;
        self.records
            .api()
            .post(&Documents::sub_path(id, "share"), settings)
            .await
    }

    pub async fn categories(&self) -> ClientResult<Vec<DocumentCategory>> {
        self.records
            .api()
            .get_rows(CATEGORIES_PATH, Vec::new(), "categories")
            .await
    }

    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> ClientResult<DocumentCategory> {
        let mut errors = FieldErrors::new();
        require_text(&mut errors, "name", name);
        errors.into_result()?;
        let body = json!({ "name": name.trim(), "description": description });
        self.records.api().post(CATEGORIES_PATH, &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::RecordingTransport;

    #[tokio::test]
    async fn share_returns_link() {
        let transport = RecordingTransport::new();
        transport.push_json(200, json!({ "shareableLink": "https://adala.test/s/abc" }));
        let docs = DocumentService::new(ApiClient::new(transport.clone()));

        let settings = ShareSettings {
            allow_download: true,
            ..Default::default()
        };
        let link = docs.share(&RecordId::new("d1").unwrap(), &settings).await.unwrap();
        assert_eq!(link.shareable_link, "https://adala.test/s/abc");

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/documents/d1/share");
        assert_eq!(sent.body.as_ref().unwrap()["allowDownload"], true);
    }

    #[tokio::test]
    async fn blank_category_name_is_rejected_locally() {
        let transport = RecordingTransport::new();
        let docs = DocumentService::new(ApiClient::new(transport.clone()));
        assert!(matches!(
            docs.create_category("  ", None).await,
            Err(ClientError::Validation(_))
        ));
        assert!(transport.calls().is_empty());
    }
}
