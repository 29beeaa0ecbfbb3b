//! Generic CRUD over one [`Resource`] collection.

use std::marker::PhantomData;

use serde::Serialize;
use tracing::{debug, info};

use adala_core::{Page, PageRequest, RecordId, Resource};

use crate::api::ApiClient;
use crate::error::ClientResult;

/// `list`/`get`/`create`/`update`/`delete` against `R::PATH`.
pub struct ResourceService<R> {
    api: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// `GET R::PATH?page=..&limit=..` decoded from the list envelope.
    pub async fn list(&self, request: &PageRequest) -> ClientResult<Page<R>> {
        debug!(
            resource = R::PATH,
            page = request.page(),
            limit = request.limit(),
            "listing"
        );
        let body = self.api.get_value(R::PATH, request.query_pairs()).await?;
        Ok(Page::from_envelope(body, R::COLLECTION_KEY)?)
    }

    pub async fn get(&self, id: &RecordId) -> ClientResult<R> {
        self.api.get(&R::item_path(id)).await
    }

    pub async fn create<P: Serialize + ?Sized>(&self, payload: &P) -> ClientResult<R> {
        let created: R = self.api.post(R::PATH, payload).await?;
        info!(resource = R::PATH, id = %created.id(), "created");
        Ok(created)
    }

    pub async fn update<P: Serialize + ?Sized>(&self, id: &RecordId, payload: &P) -> ClientResult<R> {
        let updated = self.api.put(&R::item_path(id), payload).await?;
        info!(resource = R::PATH, id = %id, "updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &RecordId) -> ClientResult<()> {
        self.api.delete(&R::item_path(id)).await?;
        info!(resource = R::PATH, id = %id, "deleted");
        Ok(())
    }

    /// `PATH/:id/<suffix>`, for the per-module sub-resources.
    pub(crate) fn sub_path(id: &RecordId, suffix: &str) -> String {
        format!("{}/{}", R::item_path(id), suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use adala_cases::LegalCase;
    use adala_core::SortState;
    use serde_json::json;

    #[tokio::test]
    async fn list_sends_page_query_and_decodes_envelope() {
        let transport = RecordingTransport::new();
        transport.push_json(
            200,
            json!({ "data": {
                "items": [{ "id": 1, "title": "نزاع عمالي", "status": "new" }],
                "pagination": { "total": 11, "pages": 2 }
            }}),
        );
        let cases = ResourceService::<LegalCase>::new(ApiClient::new(transport.clone()));

        let mut request = PageRequest::new(2, 10);
        request.set_search("عمالي");
        request.set_filter("status", Some("new".into()));
        let page = cases.list(&request).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total(), 11);
        assert_eq!(page.pages(), 2);

        let sent = &transport.requests()[0];
        assert_eq!(sent.path, "/cases");
        let q = |k: &str| {
            sent.query
                .iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(q("page"), Some("2"));
        assert_eq!(q("search"), Some("عمالي"));
        assert_eq!(q("status"), Some("new"));
        assert_eq!(q("role"), None);
        assert_eq!(q("sortBy"), Some(SortState::default().column()));
    }

    #[tokio::test]
    async fn crud_paths() {
        let transport = RecordingTransport::new();
        let row = json!({ "id": "c-9", "title": "x", "status": "pending" });
        transport.push_json(200, row.clone());
        transport.push_json(201, row.clone());
        transport.push_json(200, row);
        transport.push_raw(204, Vec::new());
        let cases = ResourceService::<LegalCase>::new(ApiClient::new(transport.clone()));
        let id = RecordId::new("c-9").unwrap();

        cases.get(&id).await.unwrap();
        cases.create(&json!({ "title": "x" })).await.unwrap();
        cases.update(&id, &json!({ "title": "y" })).await.unwrap();
        cases.delete(&id).await.unwrap();

        assert_eq!(
            transport.calls(),
            ["GET /cases/c-9", "POST /cases", "PUT /cases/c-9", "DELETE /cases/c-9"]
        );
    }
}
