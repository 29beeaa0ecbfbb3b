//! Paginated list screen, shared by every resource.

use tracing::debug;

use adala_core::{PageRequest, Resource};

use crate::error::{ClientError, ClientResult};
use crate::notify::Notification;
use crate::resource::ResourceService;
use crate::screens::Collaborators;

/// Result of a delete request from the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the prompt; nothing was sent.
    Cancelled,
    Deleted,
}

/// State behind one resource table: the query, the fetched page and the
/// inline error.
///
/// Every operation finishes its request before returning, and each load
/// bumps [`load_seq`](Self::load_seq).
pub struct ListScreen<R: Resource> {
    service: ResourceService<R>,
    collaborators: Collaborators,
    request: PageRequest,
    rows: Vec<R>,
    total: u64,
    pages: u32,
    loading: bool,
    error: Option<String>,
    load_seq: u64,
}

impl<R: Resource> ListScreen<R> {
    /// Page 1, ten rows, newest first. Nothing is fetched until
    /// [`load`](Self::load).
    pub fn new(service: ResourceService<R>, collaborators: Collaborators) -> Self {
        Self::with_request(service, collaborators, PageRequest::default())
    }

    pub fn with_request(
        service: ResourceService<R>,
        collaborators: Collaborators,
        request: PageRequest,
    ) -> Self {
        Self {
            service,
            collaborators,
            request,
            rows: Vec::new(),
            total: 0,
            pages: 0,
            loading: false,
            error: None,
            load_seq: 0,
        }
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn page(&self) -> u32 {
        self.request.page()
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Inline error text, cleared by the next load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of loads started so far.
    pub fn load_seq(&self) -> u64 {
        self.load_seq
    }

    /// Fetch the current page.
    pub async fn load(&mut self) -> ClientResult<()> {
        self.load_seq += 1;
        self.loading = true;
        self.error = None;
        debug!(
            resource = R::PATH,
            page = self.request.page(),
            seq = self.load_seq,
            "loading list"
        );

        match self.service.list(&self.request).await {
            Ok(page) => {
                self.total = page.total();
                self.pages = page.pages();
                self.rows = page.items;
                self.loading = false;
                Ok(())
            }
            Err(err) => {
                self.loading = false;
                self.error = Some(format!(
                    "فشل في تحميل {}. يرجى المحاولة مرة أخرى.",
                    R::PLURAL_LABEL
                ));
                self.collaborators.errors.handle(&err);
                Err(err)
            }
        }
    }

    pub async fn search(&mut self, term: &str) -> ClientResult<()> {
        self.request.set_search(term);
        self.reload_from_first_page().await
    }

    /// `None` or blank removes the filter.
    pub async fn set_filter(&mut self, key: &str, value: Option<&str>) -> ClientResult<()> {
        self.request.set_filter(key, value.map(str::to_string));
        self.reload_from_first_page().await
    }

    pub async fn set_status(&mut self, status: Option<&str>) -> ClientResult<()> {
        self.set_filter("status", status).await
    }

    pub async fn set_role(&mut self, role: Option<&str>) -> ClientResult<()> {
        self.set_filter("role", role).await
    }

    pub async fn reset_filters(&mut self) -> ClientResult<()> {
        self.request.clear_filters();
        self.reload_from_first_page().await
    }

    pub async fn change_page(&mut self, page: u32) -> ClientResult<()> {
        if page == 0 || (self.pages > 0 && page > self.pages) {
            return Err(ClientError::InvalidState(format!(
                "page {page} is outside 1..={}",
                self.pages
            )));
        }
        self.request.set_page(page);
        self.load().await
    }

    /// Column header click.
    pub async fn change_sort(&mut self, column: &str) -> ClientResult<()> {
        self.request.sort_mut().toggle(column);
        self.load().await
    }

    /// Ask for confirmation, delete the row, then reload the current page.
    ///
    /// Only a failed DELETE is an error. A failed reload afterwards leaves
    /// its inline error set and still reports [`DeleteOutcome::Deleted`].
    pub async fn delete(&mut self, row: &R) -> ClientResult<DeleteOutcome> {
        let prompt = format!(
            "هل أنت متأكد من حذف {} \"{}\"؟",
            R::LABEL,
            row.display_name()
        );
        if !self.collaborators.confirm.confirm(&prompt) {
            debug!(resource = R::PATH, id = %row.id(), "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        if let Err(err) = self.service.delete(row.id()).await {
            self.error = Some(format!("فشل في حذف {}. يرجى المحاولة مرة أخرى.", R::LABEL));
            self.collaborators.errors.handle(&err);
            return Err(err);
        }
        self.collaborators
            .notifier
            .notify(Notification::success(format!("تم حذف {} بنجاح", R::LABEL)));

        // the record is gone either way; a failed reload shows inline
        if let Err(err) = self.load().await {
            debug!(resource = R::PATH, error = %err, "reload after delete failed");
        }
        Ok(DeleteOutcome::Deleted)
    }

    async fn reload_from_first_page(&mut self) -> ClientResult<()> {
        self.request.set_page(1);
        self.load().await
    }
}
