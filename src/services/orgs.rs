// src/services/orgs.rs
use super::resource::ResourceService;
use crate::core::endpoints::primary;
use crate::core::TransportClient;
use crate::types::Org;

/// Organizations have no operations beyond plain CRUD.
pub type OrgsService = ResourceService<Org>;

pub fn orgs_service(client: TransportClient) -> OrgsService {
    ResourceService::new(client, primary::ORGS_LIST, primary::ORGS_DETAIL)
}
