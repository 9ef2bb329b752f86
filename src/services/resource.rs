// src/services/resource.rs
//! Generic list/detail/create/update/delete over one endpoint pair

use crate::core::{ApiError, Endpoint, TransportClient};
use crate::types::{ListQuery, Paged, PagedBody};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::marker::PhantomData;

/// CRUD operations for one resource: `collection` is the fixed list path,
/// `item` the `{id}` template for a single record.
pub struct ResourceService<T> {
    client: TransportClient,
    collection: Endpoint,
    item: Endpoint,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for ResourceService<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            collection: self.collection,
            item: self.item,
            _record: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ResourceService<T> {
    pub fn new(client: TransportClient, collection: Endpoint, item: Endpoint) -> Self {
        Self {
            client,
            collection,
            item,
            _record: PhantomData,
        }
    }

    pub fn client(&self) -> &TransportClient {
        &self.client
    }

    /// List one page. Bare arrays are wrapped with `total = items.len()` and the requested paging.
    pub async fn list(&self, query: &ListQuery) -> Result<Paged<T>, ApiError> {
        let body: PagedBody<T> = self
            .client
            .get_with(self.collection.path(), query)
            .await?;
        Ok(body.into_paged(query.requested_page(), query.requested_page_size()))
    }

    pub async fn detail(&self, id: &str) -> Result<T, ApiError> {
        self.client.get(&self.item.with_id(id)).await
    }

    pub async fn create<B>(&self, data: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.client.post(self.collection.path(), data).await
    }

    pub async fn update<B>(&self, id: &str, data: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.client.put(&self.item.with_id(id), data).await
    }

    /// Delete one record; whatever the server sends back is discarded.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self.client.delete(&self.item.with_id(id)).await?;
        Ok(())
    }
}
