// src/services/jobs.rs
use super::resource::ResourceService;
use crate::core::endpoints::primary;
use crate::core::{ApiError, TransportClient};
use crate::types::job::JobSearch;
use crate::types::{Job, JobDraft, ListQuery, Paged, PagedBody};

/// Job postings on the primary backend, plus free-text search.
#[derive(Clone)]
pub struct JobsService {
    resource: ResourceService<Job>,
}

impl JobsService {
    pub fn new(client: TransportClient) -> Self {
        Self {
            resource: ResourceService::new(client, primary::JOBS_LIST, primary::JOBS_DETAIL),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paged<Job>, ApiError> {
        self.resource.list(query).await
    }

    pub async fn detail(&self, id: &str) -> Result<Job, ApiError> {
        self.resource.detail(id).await
    }

    pub async fn create(&self, draft: &JobDraft) -> Result<Job, ApiError> {
        self.resource.create(draft).await
    }

    pub async fn update(&self, id: &str, draft: &JobDraft) -> Result<Job, ApiError> {
        self.resource.update(id, draft).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.resource.delete(id).await
    }

    /// Search by keyword. The result is normalized like `list`.
    pub async fn search(
        &self,
        q: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Paged<Job>, ApiError> {
        let params = JobSearch {
            q: q.to_string(),
            page,
            page_size,
        };
        let body: PagedBody<Job> = self
            .resource
            .client()
            .get_with(primary::JOBS_SEARCH.path(), &params)
            .await?;
        Ok(body.into_paged(page, page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Backend, TokenSlot};
    use crate::job_insights::is_remote;
    use crate::services::test_support::transport;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_sends_query_and_wraps_array() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "rust"))
            .and(query_param("page", "1"))
            .and(query_param("pageSize", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "j1", "title": "Rust Engineer"},
                {"id": "j2", "title": "Rust Intern"}
            ])))
            .mount(&server)
            .await;

        let jobs = JobsService::new(transport(&server, Backend::Primary, TokenSlot::new()));
        let page = jobs.search("rust", 1, 10).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.items[1].title, "Rust Intern");
    }

    #[tokio::test]
    async fn test_list_forwards_filters_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs"))
            .and(query_param("location", "Remote"))
            .and(header("authorization", "Bearer t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [], "total": 0})))
            .mount(&server)
            .await;

        let tokens = TokenSlot::new();
        tokens.set_static("t-1");
        let jobs = JobsService::new(transport(&server, Backend::Primary, tokens));
        let page = jobs
            .list(&ListQuery::new().filter("location", "Remote"))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 20);
    }

    #[tokio::test]
    async fn test_list_accepts_null_location() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{"id": 1, "title": "Rust", "company": "Acme", "location": null}],
                "total": 1,
                "page": 1,
                "pageSize": 20
            })))
            .mount(&server)
            .await;

        let jobs = JobsService::new(transport(&server, Backend::Primary, TokenSlot::new()));
        let page = jobs.list(&ListQuery::new()).await.unwrap();
        assert_eq!(page.total, 1);
        let job = &page.items[0];
        assert_eq!(job.id, "1");
        assert_eq!(job.location, "");
        assert!(!is_remote(job));
    }
}
