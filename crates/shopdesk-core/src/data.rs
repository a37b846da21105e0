// ── Data adapter ──
//
// Resource CRUD for the console. Each call reads the current token from
// the session store and hands it to the REST client for that request
// only, so a logout or re-login takes effect on the very next call.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shopdesk_api::{BearerToken, CustomRequest, ListPage, ListQuery, RestClient};
use tracing::debug;
use url::Url;

use crate::error::CoreError;
use crate::session::store::SessionStore;

/// Single-record (or custom) result, as the console expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// REST data access for every console resource.
#[derive(Clone)]
pub struct DataProvider {
    client: Arc<RestClient>,
    store: Arc<dyn SessionStore>,
}

impl DataProvider {
    pub fn new(client: Arc<RestClient>, store: Arc<dyn SessionStore>) -> Self {
        Self { client, store }
    }

    /// The configured API base URL.
    pub fn api_url(&self) -> &Url {
        self.client.base_url()
    }

    fn token(&self) -> Result<Option<BearerToken>, CoreError> {
        Ok(self.store.token()?.map(BearerToken::from))
    }

    /// One page of `resource`, normalized to `{data, total}`.
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &ListQuery,
    ) -> Result<ListPage<T>, CoreError> {
        let token = self.token()?;
        Ok(self.client.list(resource, query, token.as_ref()).await?)
    }

    pub async fn get_one<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
    ) -> Result<DataResponse<T>, CoreError> {
        let token = self.token()?;
        let data = self.client.get_one(resource, id, token.as_ref()).await?;
        Ok(DataResponse::new(data))
    }

    /// Fetch several records concurrently. Results keep the order of
    /// `ids`; the first failure fails the whole call.
    pub async fn get_many<T: DeserializeOwned>(
        &self,
        resource: &str,
        ids: &[String],
    ) -> Result<DataResponse<Vec<T>>, CoreError> {
        let token = self.token()?;
        debug!(resource, count = ids.len(), "fetching records");
        let futs = ids
            .iter()
            .map(|id| self.client.get_one::<T>(resource, id, token.as_ref()));
        let data = futures_util::future::try_join_all(futs).await?;
        Ok(DataResponse::new(data))
    }

    pub async fn create<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        resource: &str,
        payload: &B,
    ) -> Result<DataResponse<T>, CoreError> {
        let token = self.token()?;
        let data = self.client.create(resource, payload, token.as_ref()).await?;
        Ok(DataResponse::new(data))
    }

    pub async fn update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        resource: &str,
        id: &str,
        payload: &B,
    ) -> Result<DataResponse<T>, CoreError> {
        let token = self.token()?;
        let data = self
            .client
            .update(resource, id, payload, token.as_ref())
            .await?;
        Ok(DataResponse::new(data))
    }

    pub async fn delete_one<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
    ) -> Result<DataResponse<T>, CoreError> {
        let token = self.token()?;
        let data = self.client.delete_one(resource, id, token.as_ref()).await?;
        Ok(DataResponse::new(data))
    }

    /// Arbitrary request outside the CRUD shape.
    pub async fn custom(&self, request: &CustomRequest) -> Result<DataResponse<Value>, CoreError> {
        let token = self.token()?;
        let data = self.client.custom(request, token.as_ref()).await?;
        Ok(DataResponse::new(data))
    }
}
