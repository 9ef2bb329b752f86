// src/services/applications.rs
use super::resource::ResourceService;
use crate::core::endpoints::primary;
use crate::core::{ApiError, TransportClient};
use crate::types::application::StatusChange;
use crate::types::{
    Application, ApplicationCreate, ApplicationStatus, ApplicationUpdate, ListQuery, Paged,
};

#[derive(Clone)]
pub struct ApplicationsService {
    resource: ResourceService<Application>,
}

impl ApplicationsService {
    pub fn new(client: TransportClient) -> Self {
        Self {
            resource: ResourceService::new(
                client,
                primary::APPLICATIONS_LIST,
                primary::APPLICATIONS_DETAIL,
            ),
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Paged<Application>, ApiError> {
        self.resource.list(query).await
    }

    pub async fn detail(&self, id: &str) -> Result<Application, ApiError> {
        self.resource.detail(id).await
    }

    pub async fn create(&self, data: &ApplicationCreate) -> Result<Application, ApiError> {
        self.resource.create(data).await
    }

    pub async fn update(&self, id: &str, data: &ApplicationUpdate) -> Result<Application, ApiError> {
        self.resource.update(id, data).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.resource.delete(id).await
    }

    /// Move an application through the hiring pipeline.
    pub async fn set_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, ApiError> {
        self.resource
            .client()
            .put(&primary::APPLICATIONS_STATUS.with_id(id), &StatusChange { status })
            .await
    }
}
